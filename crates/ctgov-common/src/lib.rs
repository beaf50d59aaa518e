//! ctgov Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error types and logging setup for the ctgov workspace.
//!
//! # Overview
//!
//! This crate provides the infrastructure used by every ctgov workspace member:
//!
//! - **Error Handling**: the [`CtgovError`] type and [`Result`] alias
//! - **Logging**: `tracing`-based structured logging initialization
//!
//! # Example
//!
//! ```no_run
//! use ctgov_common::logging::{init_logging, LogConfig};
//! use tracing::info;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     info!("ingestion starting");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{CtgovError, Result};
