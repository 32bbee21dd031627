pub mod completion_log;
pub mod debug_artifacts;
pub mod portal_login;

pub use completion_log::CompletionLog;
pub use debug_artifacts::DebugArtifacts;
pub use portal_login::{Credentials, PortalLogin};
