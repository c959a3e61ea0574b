//! # Conversion Metadata Telemetry
//!
//! Structured logging for hosts of the conversion metadata service.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cm_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `conversion-metadata` | Service name in log records |
//! | `CM_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `CM_JSON_LOGS` | container-dependent | JSON formatted output |
//! | `CM_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
