//! Input artifact checks
//!
//! Reports which evaluation inputs are present without emitting toggle
//! diagnostics or failing on the first problem.

use crate::capability::{CapabilitySpec, CapabilityState};
use crate::signing::{resolve_signing_credentials, SigningConfig};
use crate::target::BuildTarget;
use appshell_core::config::Config;
use serde::Serialize;
use std::path::PathBuf;

/// Status of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Present and usable
    Healthy,
    /// Absent, but evaluation still succeeds
    Degraded,
    /// Evaluation will fail
    Unhealthy,
}

/// One line of the report
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactCheck {
    /// `config`, `target`, `signing`, `keystore` or `capability:<name>`
    pub name: String,
    /// Inspected file, when the check has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Outcome
    pub status: CheckStatus,
    /// Human-readable detail
    pub message: String,
}

impl ArtifactCheck {
    fn new(name: impl Into<String>, path: Option<PathBuf>, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path,
            status,
            message: message.into(),
        }
    }
}

/// Every check, in the order an evaluation reads its inputs
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    /// Checks in report order
    pub checks: Vec<ArtifactCheck>,
}

impl DoctorReport {
    /// No check would abort an evaluation
    #[must_use]
    pub fn is_operational(&self) -> bool {
        self.checks.iter().all(|c| c.status != CheckStatus::Unhealthy)
    }
}

/// Inspect every input the evaluator reads
#[must_use]
pub fn inspect(config: &Config) -> DoctorReport {
    let mut checks = Vec::new();

    checks.push(match &config.path {
        Some(path) => ArtifactCheck::new("config", Some(path.clone()), CheckStatus::Healthy, "loaded"),
        None => ArtifactCheck::new("config", None, CheckStatus::Degraded, "no appshell.toml, using defaults"),
    });

    let target = BuildTarget::from_config(&config.schema.target, &config.schema.catalog);
    checks.push(match &target {
        Ok(target) => ArtifactCheck::new(
            "target",
            None,
            CheckStatus::Healthy,
            format!(
                "{} (platform min {}, target {})",
                target.application_id, target.min_platform_version, target.target_platform_version
            ),
        ),
        Err(e) => ArtifactCheck::new("target", None, CheckStatus::Unhealthy, e.message.clone()),
    });

    let settings = &config.schema.signing;
    let properties = config.resolve(&settings.properties);
    match resolve_signing_credentials(&properties) {
        Ok(Some(credentials)) => {
            checks.push(ArtifactCheck::new(
                "signing",
                Some(properties),
                CheckStatus::Healthy,
                "credentials complete",
            ));
            let signing = SigningConfig::release(Some(credentials), &config.resolve(&settings.store_base));
            if let Some(store) = signing.store_path {
                checks.push(if store.is_file() {
                    ArtifactCheck::new("keystore", Some(store), CheckStatus::Healthy, "present")
                } else {
                    ArtifactCheck::new("keystore", Some(store), CheckStatus::Degraded, "storeFile does not exist")
                });
            }
        }
        Ok(None) => {
            let status = if settings.required { CheckStatus::Unhealthy } else { CheckStatus::Degraded };
            checks.push(ArtifactCheck::new(
                "signing",
                Some(properties),
                status,
                "not found, release builds are unsigned",
            ));
        }
        Err(e) => {
            checks.push(ArtifactCheck::new("signing", Some(properties), CheckStatus::Unhealthy, e.message));
        }
    }

    for capability in &config.schema.capabilities {
        let toggle = CapabilitySpec::from_settings(capability, config).probe();
        let name = format!("capability:{}", toggle.name);
        let platform = match &target {
            Ok(target) => toggle.check_platform(target),
            Err(_) => Ok(()),
        };
        let (status, message) = match (toggle.state, platform) {
            (_, Err(e)) => (CheckStatus::Unhealthy, e.message),
            (CapabilityState::Enabled, Ok(())) => (CheckStatus::Healthy, "enabled".to_string()),
            (CapabilityState::Disabled, Ok(())) => (CheckStatus::Degraded, "disabled".to_string()),
        };
        checks.push(ArtifactCheck::new(name, Some(toggle.activation_artifact), status, message));
    }

    DoctorReport { checks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use crate::evaluator::ConfigEvaluator;
    use std::fs;

    #[test]
    fn test_empty_project_is_degraded_but_operational() {
        let dir = tempfile::tempdir().unwrap();
        let report = inspect(&Config::with_defaults(dir.path()));

        assert!(report.is_operational());
        let names: Vec<&str> = report.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["config", "target", "signing", "capability:push"]);
        assert_eq!(report.checks[1].status, CheckStatus::Healthy);
        assert!(report
            .checks
            .iter()
            .filter(|c| c.name != "target")
            .all(|c| c.status == CheckStatus::Degraded));
    }

    #[test]
    fn test_malformed_signing_is_unhealthy() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("key.properties"), "keyAlias=upload\n").unwrap();

        let report = inspect(&Config::with_defaults(dir.path()));
        assert!(!report.is_operational());
        let signing = report.checks.iter().find(|c| c.name == "signing").unwrap();
        assert_eq!(signing.status, CheckStatus::Unhealthy);
        assert!(signing.message.contains("missing keyPassword"));
    }

    #[test]
    fn test_complete_signing_checks_keystore() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("key.properties"),
            "keyAlias=a\nkeyPassword=b\nstoreFile=/nonexistent/upload.jks\nstorePassword=c\n",
        )
        .unwrap();

        let report = inspect(&Config::with_defaults(dir.path()));
        let keystore = report.checks.iter().find(|c| c.name == "keystore").unwrap();
        assert_eq!(keystore.status, CheckStatus::Degraded);
        assert!(report.is_operational());
    }

    #[test]
    fn test_push_below_min_platform_matches_evaluation() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("app")).unwrap();
        fs::write(dir.path().join("app/google-services.json"), "{}").unwrap();
        let mut config = Config::with_defaults(dir.path());
        config.schema.target.min_platform_version = 19;

        let report = inspect(&config);
        let push = report.checks.iter().find(|c| c.name == "capability:push").unwrap();
        assert_eq!(push.status, CheckStatus::Unhealthy);
        assert!(push.message.contains("requires min platform version 21"));
        assert!(!report.is_operational());
        assert!(ConfigEvaluator::new(&config).evaluate(&mut MemorySink::new()).is_err());
    }

    #[test]
    fn test_push_below_min_platform_without_artifact_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_defaults(dir.path());
        config.schema.target.min_platform_version = 19;

        let report = inspect(&config);
        assert!(report.is_operational());
        assert!(ConfigEvaluator::new(&config).evaluate(&mut MemorySink::new()).is_ok());
    }

    #[test]
    fn test_invalid_target_is_unhealthy() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_defaults(dir.path());
        config.schema.target.application_id = "shell".to_string();

        let report = inspect(&config);
        let target = report.checks.iter().find(|c| c.name == "target").unwrap();
        assert_eq!(target.status, CheckStatus::Unhealthy);
        assert!(target.message.contains("application_id"));
        assert!(!report.is_operational());
    }

    #[test]
    fn test_unresolved_catalog_reference_is_unhealthy() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_defaults(dir.path());
        config.schema.catalog.clear();

        let report = inspect(&config);
        assert!(!report.is_operational());
        assert!(ConfigEvaluator::new(&config).evaluate(&mut MemorySink::new()).is_err());
    }
}
