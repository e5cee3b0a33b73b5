//! Configuration loading and schema definitions
//!
//! `appshell.toml` describes the build target, the version catalog, where
//! signing material lives, and which optional capabilities to probe for.

mod loader;
mod schema;

pub use loader::{find_config_file, Config, CONFIG_CANDIDATES};
pub use schema::*;
