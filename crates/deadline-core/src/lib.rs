//! Deadline Core: shared error type and service configuration.

pub mod config;
pub mod error;

pub use config::{DataPaths, RecognizerKind, ServiceConfig};
pub use error::{Error, Result};
