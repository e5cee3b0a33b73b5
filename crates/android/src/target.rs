//! Build target identity and platform versions
//!
//! The orchestrator supplies these values; the evaluator only validates them
//! and resolves catalog references to concrete numbers.

use appshell_core::config::{TargetConfig, VersionRef};
use appshell_core::error::{Error, ErrorCode, Result, ResultExt};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// At least two dot-separated segments, each starting with a letter
static APPLICATION_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$").expect("valid regex"));

/// Resolved, validated build target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildTarget {
    /// Package name of the shipped app
    pub application_id: String,
    /// Code namespace
    pub namespace: String,
    /// Lowest supported platform version
    pub min_platform_version: u32,
    /// Platform version the app targets
    pub target_platform_version: u32,
    /// Platform version the app compiles against
    pub compile_platform_version: u32,
    /// Monotonic build number
    pub version_code: u32,
    /// User-visible version
    pub version_name: String,
}

impl BuildTarget {
    /// Resolve version references against `catalog` and validate the result
    pub fn from_config(config: &TargetConfig, catalog: &BTreeMap<String, u32>) -> Result<Self> {
        let target_platform_version = resolve(&config.target_platform_version, catalog, "target_platform_version")?;
        let compile_platform_version = resolve(&config.compile_platform_version, catalog, "compile_platform_version")?;

        let target = Self {
            application_id: config.application_id.clone(),
            namespace: config.namespace.clone().unwrap_or_else(|| config.application_id.clone()),
            min_platform_version: config.min_platform_version,
            target_platform_version,
            compile_platform_version,
            version_code: config.version_code,
            version_name: config.version_name.clone(),
        };
        target.validate()?;
        Ok(target)
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [("application_id", &self.application_id), ("namespace", &self.namespace)] {
            if !APPLICATION_ID.is_match(value) {
                return Err(Error::new(
                    ErrorCode::InvalidApplicationId,
                    format!("target.{field} '{value}' is not a valid dotted identifier"),
                )
                .with_suggestion("Use at least two segments that start with a letter, e.g. com.example.app"));
            }
        }

        if self.min_platform_version > self.target_platform_version {
            return Err(Error::config_validation(format!(
                "target.min_platform_version ({}) is above target_platform_version ({})",
                self.min_platform_version, self.target_platform_version
            )));
        }

        if self.version_code == 0 {
            return Err(Error::config_validation("target.version_code must be positive"));
        }

        if self.version_name.trim().is_empty() {
            return Err(Error::config_validation("target.version_name must not be empty"));
        }

        if self.target_platform_version > self.compile_platform_version {
            tracing::warn!(
                target_version = self.target_platform_version,
                compile_version = self.compile_platform_version,
                "Target platform version is newer than the compile platform version"
            );
        }

        Ok(())
    }
}

fn resolve(reference: &VersionRef, catalog: &BTreeMap<String, u32>, field: &str) -> Result<u32> {
    reference.resolve(catalog).context(format!("While resolving target.{field}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> BTreeMap<String, u32> {
        BTreeMap::from([
            ("flutter.targetSdkVersion".to_string(), 34),
            ("flutter.compileSdkVersion".to_string(), 35),
        ])
    }

    fn config(application_id: &str) -> TargetConfig {
        TargetConfig {
            application_id: application_id.to_string(),
            ..TargetConfig::default()
        }
    }

    #[test]
    fn test_resolves_catalog_and_defaults_namespace() {
        let target = BuildTarget::from_config(&config("xyz.example.admin"), &catalog()).unwrap();
        assert_eq!(target.namespace, "xyz.example.admin");
        assert_eq!(target.target_platform_version, 34);
        assert_eq!(target.compile_platform_version, 35);
        assert_eq!(target.min_platform_version, 21);
    }

    #[test]
    fn test_explicit_namespace_is_kept() {
        let mut cfg = config("xyz.example.admin");
        cfg.namespace = Some("xyz.example.shared".to_string());
        let target = BuildTarget::from_config(&cfg, &catalog()).unwrap();
        assert_eq!(target.namespace, "xyz.example.shared");
    }

    #[test]
    fn test_invalid_application_ids() {
        for id in ["app", "1com.example", "com..example", "com.example.", "com.ex-ample"] {
            let err = BuildTarget::from_config(&config(id), &catalog()).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidApplicationId, "{id}");
        }
    }

    #[test]
    fn test_missing_catalog_entry() {
        let err = BuildTarget::from_config(&config("com.example.app"), &BTreeMap::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnresolvedVersionRef);
        assert!(err.context.unwrap().contains("target_platform_version"));
    }

    #[test]
    fn test_min_above_target_rejected() {
        let mut cfg = config("com.example.app");
        cfg.min_platform_version = 35;
        cfg.target_platform_version = VersionRef::Pinned(34);
        let err = BuildTarget::from_config(&cfg, &catalog()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
    }

    #[test]
    fn test_zero_version_code_rejected() {
        let mut cfg = config("com.example.app");
        cfg.version_code = 0;
        assert!(BuildTarget::from_config(&cfg, &catalog()).is_err());
    }
}
