pub mod analyze;
pub mod init;
pub mod render;
pub mod schema;
pub mod session;
