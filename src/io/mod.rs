pub mod error;
pub mod event_log;
pub mod loader;
pub mod program;

pub use error::LoadError;
pub use event_log::EventLog;
pub use program::Program;
