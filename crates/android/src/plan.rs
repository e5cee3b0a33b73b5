//! Serializable build plan
//!
//! The plan is what an orchestrator consumes: target, plugin list in
//! registration order, capability states and whether release signing is
//! configured. It carries no credential values.

use crate::capability::CapabilityToggle;
use crate::diagnostics::Diagnostic;
use crate::evaluator::{apply, EvaluatedConfig};
use crate::graph::PluginRegistry;
use crate::target::BuildTarget;
use appshell_core::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Serializable view of an evaluation, free of secrets
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    /// Resolved build target
    pub target: BuildTarget,
    /// Signing outcome without credential values
    pub signing: SigningSummary,
    /// Evaluated toggles
    pub capabilities: Vec<CapabilityToggle>,
    /// Plugins in registration order
    pub plugins: Vec<String>,
    /// Diagnostics emitted while evaluating
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    /// When the evaluation ran
    pub evaluated_at: DateTime<Utc>,
    /// Invocation that produced the plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Signing state without secrets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningSummary {
    /// Signing config name
    pub config: String,
    /// Whether credentials were found
    pub signed: bool,
    /// Resolved keystore path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_file: Option<PathBuf>,
}

impl BuildPlan {
    /// Derive the plan by applying `evaluated` to a fresh in-memory graph
    pub fn new(evaluated: &EvaluatedConfig) -> Result<Self> {
        let mut graph = PluginRegistry::new();
        apply(evaluated, &mut graph)?;

        Ok(Self {
            target: evaluated.target.clone(),
            signing: SigningSummary {
                config: evaluated.signing.name.clone(),
                signed: evaluated.signing.is_signed(),
                store_file: evaluated.signing.store_path.clone(),
            },
            capabilities: evaluated.capabilities.clone(),
            plugins: graph.plugins().to_vec(),
            diagnostics: Vec::new(),
            evaluated_at: evaluated.evaluated_at,
            session_id: None,
        })
    }

    /// Attach the diagnostics collected during evaluation
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Tag the plan with the invocation's session id
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
