//! Core infrastructure shared by every layer
//!
//! - Layered configuration (file, environment, command line)
//! - Error taxonomy and HTTP error responses
//! - Structured logging setup

pub mod config;
pub mod error;
pub mod logging;

pub use config::{CliArgs, Config, ConfigError};
pub use error::{ErrorResponse, Result, ServiceError};
pub use logging::Logger;
