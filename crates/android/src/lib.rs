//! Build-time configuration evaluation for Android app shells
//!
//! This crate decides, once per build invocation:
//! - Which release signing credentials apply (`key.properties`)
//! - Which optional capabilities are enabled (activation artifacts such as
//!   `google-services.json`)
//! - Which plugins the outer build graph receives
//!
//! # Example
//!
//! ```rust,no_run
//! use appshell_android::diagnostics::StatusSink;
//! use appshell_android::evaluator::ConfigEvaluator;
//! use appshell_android::plan::BuildPlan;
//! use appshell_core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(None, Path::new("android"))?;
//! let evaluated = ConfigEvaluator::new(&config).evaluate(&mut StatusSink)?;
//! println!("{}", BuildPlan::new(&evaluated)?.to_json()?);
//! # Ok::<(), appshell_core::Error>(())
//! ```

#![warn(missing_docs)]

pub mod capability;
pub mod diagnostics;
pub mod doctor;
pub mod evaluator;
pub mod graph;
pub mod plan;
pub mod signing;
pub mod target;

pub use capability::{apply_toggle, evaluate_capability_toggle, CapabilitySpec, CapabilityState, CapabilityToggle};
pub use evaluator::{apply, ConfigEvaluator, EvaluatedConfig};
pub use signing::{resolve_signing_credentials, SigningConfig, SigningCredentials};
