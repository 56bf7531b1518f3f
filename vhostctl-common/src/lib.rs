//! # vhostctl Common
//!
//! Shared utilities for the vhostctl components.
//!
//! ## Logging
//!
//! Log output always goes to stderr. Stdout carries command results that
//! callers (CNI plugins, scripts) read back.
//!
//! ```rust,no_run
//! use vhostctl_common::init_logging;
//!
//! init_logging("warn").unwrap();
//! tracing::info!("ready");
//! ```

pub mod logging;

pub use logging::{init_logging, init_logging_json, is_valid_level, LOG_LEVELS};
