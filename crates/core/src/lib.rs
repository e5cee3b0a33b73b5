//! Core types for appshell build-time configuration tools
//!
//! This crate provides functionality shared by the evaluator and the CLI:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Configuration**: `appshell.toml` loading with defaults and validation
//! - **Properties**: parser for Java-style `.properties` files
//!
//! # Example
//!
//! ```rust,no_run
//! use appshell_core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(None, Path::new(".")).expect("invalid config");
//! println!("application id: {}", config.schema.target.application_id);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod properties;

pub use error::{Error, ErrorCode, Result, ResultExt};
