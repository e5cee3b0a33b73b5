//! Configuration schema definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::PathBuf;

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppShellConfig {
    /// Application identity and platform versions
    #[serde(default)]
    pub target: TargetConfig,

    /// Shared `name -> version` map owned by the build orchestrator
    #[serde(default = "default_catalog")]
    pub catalog: BTreeMap<String, u32>,

    /// Where release signing material lives
    #[serde(default)]
    pub signing: SigningSettings,

    /// Plugins applied unconditionally
    #[serde(default)]
    pub plugins: PluginSettings,

    /// Optional capabilities, evaluated in declaration order
    #[serde(default = "default_capabilities", rename = "capability")]
    pub capabilities: Vec<CapabilitySettings>,
}

impl Default for AppShellConfig {
    fn default() -> Self {
        Self {
            target: TargetConfig::default(),
            catalog: default_catalog(),
            signing: SigningSettings::default(),
            plugins: PluginSettings::default(),
            capabilities: default_capabilities(),
        }
    }
}

impl AppShellConfig {
    /// Parse a TOML document
    pub fn from_toml(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as a TOML document
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Structural checks that do not touch the filesystem
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for capability in &self.capabilities {
            if capability.name.trim().is_empty() {
                return Err(Error::config_validation("Capability name must not be empty"));
            }
            if !seen.insert(capability.name.as_str()) {
                return Err(Error::config_validation(format!(
                    "Capability '{}' is declared more than once",
                    capability.name
                )));
            }
            if capability.plugin.trim().is_empty() {
                return Err(Error::config_validation(format!(
                    "Capability '{}' has an empty plugin id",
                    capability.name
                )));
            }
            if capability.artifact.as_os_str().is_empty() {
                return Err(Error::config_validation(format!(
                    "Capability '{}' has an empty artifact path",
                    capability.name
                )));
            }
        }

        if self.plugins.base.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::config_validation("Base plugin ids must not be empty"));
        }

        Ok(())
    }
}

/// Platform version: pinned, or looked up in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionRef {
    /// Literal version number
    Pinned(u32),
    /// Name of a catalog entry
    Catalog(String),
}

impl VersionRef {
    /// Resolve against a catalog
    pub fn resolve(&self, catalog: &BTreeMap<String, u32>) -> Result<u32> {
        match self {
            VersionRef::Pinned(v) => Ok(*v),
            VersionRef::Catalog(name) => catalog
                .get(name)
                .copied()
                .ok_or_else(|| Error::unresolved_version(name)),
        }
    }
}

impl fmt::Display for VersionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRef::Pinned(v) => write!(f, "{v}"),
            VersionRef::Catalog(name) => f.write_str(name),
        }
    }
}

/// Build target as supplied by the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Package name of the shipped app
    #[serde(default = "default_application_id")]
    pub application_id: String,

    /// Code namespace; falls back to `application_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Lowest supported platform version
    #[serde(default = "default_min_platform_version")]
    pub min_platform_version: u32,

    /// Platform version the app targets
    #[serde(default = "default_target_version_ref")]
    pub target_platform_version: VersionRef,

    /// Platform version the app compiles against
    #[serde(default = "default_compile_version_ref")]
    pub compile_platform_version: VersionRef,

    /// Monotonic build number
    #[serde(default = "default_version_code")]
    pub version_code: u32,

    /// User-visible version
    #[serde(default = "default_version_name")]
    pub version_name: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            application_id: default_application_id(),
            namespace: None,
            min_platform_version: default_min_platform_version(),
            target_platform_version: default_target_version_ref(),
            compile_platform_version: default_compile_version_ref(),
            version_code: default_version_code(),
            version_name: default_version_name(),
        }
    }
}

fn default_application_id() -> String {
    "com.example.app".to_string()
}

fn default_min_platform_version() -> u32 {
    21
}

fn default_target_version_ref() -> VersionRef {
    VersionRef::Catalog("flutter.targetSdkVersion".to_string())
}

fn default_compile_version_ref() -> VersionRef {
    VersionRef::Catalog("flutter.compileSdkVersion".to_string())
}

fn default_version_code() -> u32 {
    1
}

fn default_version_name() -> String {
    "1.0.0".to_string()
}

fn default_catalog() -> BTreeMap<String, u32> {
    BTreeMap::from([
        ("flutter.compileSdkVersion".to_string(), 35),
        ("flutter.targetSdkVersion".to_string(), 35),
    ])
}

/// Where release signing material comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigningSettings {
    /// Properties file, relative to the project directory
    #[serde(default = "default_properties_path")]
    pub properties: PathBuf,

    /// Fail evaluation when the properties file is absent
    #[serde(default)]
    pub required: bool,

    /// Base directory for a relative `storeFile`, relative to the project directory
    #[serde(default = "default_store_base")]
    pub store_base: PathBuf,
}

impl Default for SigningSettings {
    fn default() -> Self {
        Self {
            properties: default_properties_path(),
            required: false,
            store_base: default_store_base(),
        }
    }
}

fn default_properties_path() -> PathBuf {
    PathBuf::from("key.properties")
}

fn default_store_base() -> PathBuf {
    PathBuf::from("app")
}

/// Plugins registered on every evaluation, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSettings {
    /// Plugin ids, in registration order
    #[serde(default = "default_base_plugins")]
    pub base: Vec<String>,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            base: default_base_plugins(),
        }
    }
}

fn default_base_plugins() -> Vec<String> {
    ["com.android.application", "kotlin-android", "dev.flutter.flutter-gradle-plugin"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// An optional capability activated by the presence of an artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilitySettings {
    /// Capability name
    pub name: String,

    /// Activation artifact, relative to the project directory
    pub artifact: PathBuf,

    /// Plugin registered when the capability is enabled
    pub plugin: String,

    /// Lowest platform version the capability supports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_platform_version: Option<u32>,

    /// Where to obtain the artifact, shown when it is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obtain: Option<String>,
}

impl CapabilitySettings {
    /// Push notifications backed by Firebase Cloud Messaging
    #[must_use]
    pub fn push() -> Self {
        Self {
            name: "push".to_string(),
            artifact: PathBuf::from("app/google-services.json"),
            plugin: "com.google.gms.google-services".to_string(),
            min_platform_version: Some(21),
            obtain: Some("Download google-services.json from Firebase Console".to_string()),
        }
    }
}

fn default_capabilities() -> Vec<CapabilitySettings> {
    vec![CapabilitySettings::push()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppShellConfig::from_toml("").unwrap();
        assert_eq!(config, AppShellConfig::default());
        assert_eq!(config.capabilities.len(), 1);
        assert_eq!(config.capabilities[0].name, "push");
        assert_eq!(config.signing.properties, PathBuf::from("key.properties"));
        assert!(!config.signing.required);
    }

    #[test]
    fn test_version_refs_pinned_and_catalog() {
        let config = AppShellConfig::from_toml(
            r#"
            [target]
            application_id = "xyz.example.admin"
            target_platform_version = 34
            compile_platform_version = "shared.compileSdk"

            [catalog]
            "shared.compileSdk" = 35
            "#,
        )
        .unwrap();

        assert_eq!(config.target.target_platform_version, VersionRef::Pinned(34));
        assert_eq!(config.target.target_platform_version.resolve(&config.catalog).unwrap(), 34);
        assert_eq!(config.target.compile_platform_version.resolve(&config.catalog).unwrap(), 35);
    }

    #[test]
    fn test_unresolved_catalog_ref() {
        let err = VersionRef::Catalog("missing.sdk".to_string())
            .resolve(&BTreeMap::new())
            .unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::UnresolvedVersionRef);
    }

    #[test]
    fn test_explicit_capabilities_replace_default() {
        let config = AppShellConfig::from_toml(
            r#"
            [[capability]]
            name = "crash-reporting"
            artifact = "app/crashlytics.json"
            plugin = "com.google.firebase.crashlytics"
            "#,
        )
        .unwrap();

        assert_eq!(config.capabilities.len(), 1);
        assert_eq!(config.capabilities[0].name, "crash-reporting");
        assert!(config.capabilities[0].min_platform_version.is_none());
    }

    #[test]
    fn test_duplicate_capability_rejected() {
        let err = AppShellConfig::from_toml(
            r#"
            [[capability]]
            name = "push"
            artifact = "a.json"
            plugin = "p"

            [[capability]]
            name = "push"
            artifact = "b.json"
            plugin = "q"
            "#,
        )
        .unwrap_err();

        assert_eq!(err.code, crate::ErrorCode::ConfigValidationError);
        assert!(err.message.contains("more than once"));
    }

    #[test]
    fn test_default_renders_and_parses_back() {
        let rendered = AppShellConfig::default().to_toml().unwrap();
        assert!(rendered.contains("[[capability]]"));
        assert_eq!(AppShellConfig::from_toml(&rendered).unwrap(), AppShellConfig::default());
    }
}
