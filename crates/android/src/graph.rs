//! The outer build graph
//!
//! The build orchestrator owns the real graph. [`BuildGraph`] is the seam
//! the evaluator talks to; [`PluginRegistry`] is the in-memory graph used
//! for planning and tests.

use crate::signing::SigningConfig;
use appshell_core::error::Result;

/// Receives plugin registrations and the release signing config
pub trait BuildGraph {
    /// Register a plugin. Registering the same id again must be a no-op.
    fn register_plugin(&mut self, id: &str) -> Result<()>;

    /// Attach the signing config used by the release build type
    fn set_release_signing(&mut self, config: &SigningConfig) -> Result<()>;
}

/// Ordered, de-duplicated plugin list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginRegistry {
    plugins: Vec<String>,
    release_signing: Option<SigningConfig>,
}

impl PluginRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered plugins in first-registration order
    #[must_use]
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Whether a plugin id is registered
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.plugins.iter().any(|p| p == id)
    }

    /// Signing config wired to the release build type
    #[must_use]
    pub fn release_signing(&self) -> Option<&SigningConfig> {
        self.release_signing.as_ref()
    }
}

impl BuildGraph for PluginRegistry {
    fn register_plugin(&mut self, id: &str) -> Result<()> {
        if !self.contains(id) {
            self.plugins.push(id.to_string());
        }
        Ok(())
    }

    fn set_release_signing(&mut self, config: &SigningConfig) -> Result<()> {
        self.release_signing = Some(config.clone());
        Ok(())
    }
}
