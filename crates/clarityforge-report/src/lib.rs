//! clarityforge-report: result presentation.
//!
//! Maps a completed analysis onto dashboard sections and renders them as
//! a self-contained HTML page.

pub mod dashboard;
pub mod html;

pub use dashboard::{Card, Dashboard, GaugeBand};
pub use html::{generate_html, write_html_report};
