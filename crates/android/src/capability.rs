//! Capability toggles activated by artifact presence
//!
//! An optional subsystem (push notifications, crash reporting, ...) is
//! enabled if and only if its activation artifact exists when the toggle is
//! evaluated. Nothing is cached: evaluating twice re-checks the filesystem.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::graph::BuildGraph;
use crate::target::BuildTarget;
use appshell_core::config::{CapabilitySettings, Config};
use appshell_core::error::{Error, ErrorCode, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What to probe for and what it unlocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySpec {
    /// Capability name used in diagnostics
    pub name: String,
    /// Activation artifact; absolute once built from settings
    pub artifact: PathBuf,
    /// Plugin id registered when enabled
    pub plugin: String,
    /// Lowest platform version the capability supports
    pub min_platform_version: Option<u32>,
    /// Where to obtain the artifact
    pub obtain: Option<String>,
}

impl CapabilitySpec {
    /// Spec with no platform requirement or obtain hint
    pub fn new(name: impl Into<String>, artifact: impl Into<PathBuf>, plugin: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifact: artifact.into(),
            plugin: plugin.into(),
            min_platform_version: None,
            obtain: None,
        }
    }

    /// Require a minimum platform version when enabled
    #[must_use]
    pub fn with_min_platform_version(mut self, version: u32) -> Self {
        self.min_platform_version = Some(version);
        self
    }

    /// Set the hint shown when the artifact is missing
    #[must_use]
    pub fn with_obtain(mut self, how: impl Into<String>) -> Self {
        self.obtain = Some(how.into());
        self
    }

    /// Build from configuration, resolving the artifact against the project directory
    #[must_use]
    pub fn from_settings(settings: &CapabilitySettings, config: &Config) -> Self {
        Self {
            name: settings.name.clone(),
            artifact: config.resolve(&settings.artifact),
            plugin: settings.plugin.clone(),
            min_platform_version: settings.min_platform_version,
            obtain: settings.obtain.clone(),
        }
    }

    /// Check the activation artifact without reporting anything
    #[must_use]
    pub fn probe(&self) -> CapabilityToggle {
        let state = if artifact_exists(&self.artifact) {
            CapabilityState::Enabled
        } else {
            CapabilityState::Disabled
        };
        CapabilityToggle {
            name: self.name.clone(),
            activation_artifact: self.artifact.clone(),
            plugin: self.plugin.clone(),
            min_platform_version: self.min_platform_version,
            state,
        }
    }

    fn artifact_name(&self) -> String {
        self.artifact
            .file_name()
            .map_or_else(|| self.artifact.display().to_string(), |n| n.to_string_lossy().into_owned())
    }
}

/// Result of probing one capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityState {
    /// Artifact present
    Enabled,
    /// Artifact absent
    Disabled,
}

/// An evaluated capability; immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityToggle {
    /// Capability name
    pub name: String,
    /// Artifact that was probed
    pub activation_artifact: PathBuf,
    /// Plugin registered when enabled
    pub plugin: String,
    /// Copied from the spec for the platform check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_platform_version: Option<u32>,
    /// Outcome of the probe
    pub state: CapabilityState,
}

impl CapabilityToggle {
    /// Whether the artifact was present
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state == CapabilityState::Enabled
    }

    /// Plugin to register, if the capability is enabled
    #[must_use]
    pub fn enabled_plugin(&self) -> Option<&str> {
        self.is_enabled().then_some(self.plugin.as_str())
    }

    /// An enabled capability must be supported by the target's minimum platform
    pub fn check_platform(&self, target: &BuildTarget) -> Result<()> {
        match self.min_platform_version {
            Some(required) if self.is_enabled() && target.min_platform_version < required => {
                Err(Error::new(
                    ErrorCode::PlatformVersionTooLow,
                    format!(
                        "Capability '{}' requires min platform version {required}, but the target declares {}",
                        self.name, target.min_platform_version
                    ),
                )
                .with_suggestion(format!(
                    "Raise target.min_platform_version to {required} or remove {}",
                    self.activation_artifact.display()
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Probe a capability's activation artifact and report the outcome
///
/// Emits exactly one diagnostic. A missing artifact is an expected state and
/// yields a disabled toggle, never an error.
pub fn evaluate_capability_toggle(spec: &CapabilitySpec, sink: &mut dyn DiagnosticSink) -> CapabilityToggle {
    let toggle = spec.probe();
    let exists = toggle.is_enabled();
    let artifact_name = spec.artifact_name();
    tracing::info!(capability = %spec.name, artifact = %spec.artifact.display(), enabled = exists, "Capability evaluated");

    let diagnostic = if exists {
        Diagnostic::success(&spec.name, format!("{artifact_name} found - {} enabled", spec.name))
    } else {
        let obtain = spec
            .obtain
            .clone()
            .unwrap_or_else(|| format!("Provide {artifact_name}"));
        Diagnostic::warning(&spec.name, format!("{artifact_name} not found - {} disabled", spec.name))
            .with_remediation(format!("To enable: {obtain}"))
            .with_remediation(format!("Place in: {}", spec.artifact.display()))
    };
    sink.emit(&diagnostic);

    toggle
}

/// Register the toggle's plugin with the build graph when enabled
///
/// Disabled toggles leave the graph untouched.
pub fn apply_toggle(toggle: &CapabilityToggle, graph: &mut dyn BuildGraph) -> Result<()> {
    match toggle.enabled_plugin() {
        Some(plugin) => {
            tracing::debug!(capability = %toggle.name, plugin, "Registering capability plugin");
            graph.register_plugin(plugin)
        }
        None => Ok(()),
    }
}

fn artifact_exists(path: &Path) -> bool {
    path.is_file()
}
