//! clarityforge-core: domain model, analysis gateway, and session controller.
//!
//! This crate defines the analysis result type, the schema the remote
//! model must answer with, the provider seam, and the state machine that
//! drives a session through a request.

pub mod bundle;
pub mod error;
pub mod gateway;
pub mod model;
pub mod report;
pub mod schema;
pub mod session;
pub mod traits;

pub use bundle::AnalysisBundle;
pub use error::{AnalysisError, ProviderError, SchemaError};
pub use gateway::AnalysisGateway;
pub use model::{AnalysisRequest, ClarityAnalysis};
pub use session::{Phase, SessionController, SessionState, Status, SubmitOutcome};
