//! Conversation orchestration for Intake.
//!
//! Drives the model-call / tool-execution cycle for each chat update and
//! owns all mutation of the persisted message log.

pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod tools;

pub use error::ChatError;
pub use executor::ToolExecutor;
pub use orchestrator::ChatOrchestrator;
pub use tools::{catalog, DeleteArgs, FormTool, SubmitArgs, ToolInvocation, UpdateArgs};
