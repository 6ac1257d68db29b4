pub mod config;
pub mod error;
pub mod types;

pub use config::IntakeConfig;
pub use error::{IntakeError, Result};
pub use types::*;
