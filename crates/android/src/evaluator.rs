//! Configuration evaluation
//!
//! [`ConfigEvaluator`] turns an immutable [`Config`] plus the current
//! filesystem state into an [`EvaluatedConfig`]: the resolved build target,
//! the release signing config, and one toggle per declared capability.
//! Every call re-reads the filesystem; nothing carries over between calls.

use crate::capability::{apply_toggle, evaluate_capability_toggle, CapabilitySpec, CapabilityToggle};
use crate::diagnostics::DiagnosticSink;
use crate::graph::BuildGraph;
use crate::signing::{resolve_signing_credentials, SigningConfig};
use crate::target::BuildTarget;
use appshell_core::config::Config;
use appshell_core::error::{Error, Result, ResultExt};
use chrono::{DateTime, Utc};

/// Outcome of one evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedConfig {
    /// Resolved build target
    pub target: BuildTarget,
    /// Release signing config
    pub signing: SigningConfig,
    /// One toggle per declared capability, in declaration order
    pub capabilities: Vec<CapabilityToggle>,
    /// Plugins registered regardless of capabilities, in order
    pub base_plugins: Vec<String>,
    /// When the evaluation ran
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluatedConfig {
    /// Toggle by capability name
    #[must_use]
    pub fn capability(&self, name: &str) -> Option<&CapabilityToggle> {
        self.capabilities.iter().find(|t| t.name == name)
    }

    /// Enabled capabilities, in declaration order
    pub fn enabled(&self) -> impl Iterator<Item = &CapabilityToggle> {
        self.capabilities.iter().filter(|t| t.is_enabled())
    }
}

/// Evaluates signing and capability decisions for one build invocation
#[derive(Debug)]
pub struct ConfigEvaluator<'a> {
    config: &'a Config,
    require_signing: bool,
}

impl<'a> ConfigEvaluator<'a> {
    /// Evaluator for `config`
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            require_signing: config.schema.signing.required,
        }
    }

    /// Treat missing signing credentials as fatal, on top of `signing.required`
    #[must_use]
    pub fn require_signing(mut self, require: bool) -> Self {
        self.require_signing |= require;
        self
    }

    /// Run the full evaluation
    pub fn evaluate(&self, sink: &mut dyn DiagnosticSink) -> Result<EvaluatedConfig> {
        let schema = &self.config.schema;

        let target = BuildTarget::from_config(&schema.target, &schema.catalog)?;
        tracing::info!(
            application_id = %target.application_id,
            min = target.min_platform_version,
            target = target.target_platform_version,
            "Build target resolved"
        );

        let signing = self.resolve_signing()?;

        let mut capabilities = Vec::with_capacity(schema.capabilities.len());
        for settings in &schema.capabilities {
            let spec = CapabilitySpec::from_settings(settings, self.config);
            let toggle = evaluate_capability_toggle(&spec, sink);
            toggle.check_platform(&target)?;
            capabilities.push(toggle);
        }

        Ok(EvaluatedConfig {
            target,
            signing,
            capabilities,
            base_plugins: schema.plugins.base.clone(),
            evaluated_at: Utc::now(),
        })
    }

    /// Load the release signing config
    pub fn resolve_signing(&self) -> Result<SigningConfig> {
        let settings = &self.config.schema.signing;
        let path = self.config.resolve(&settings.properties);
        let store_base = self.config.resolve(&settings.store_base);

        let credentials = resolve_signing_credentials(&path).context("While resolving release signing")?;
        let signing = SigningConfig::release(credentials, &store_base);

        match &signing.store_path {
            Some(store) if !store.is_file() => {
                tracing::warn!(store = %store.display(), "Keystore referenced by storeFile does not exist");
            }
            Some(_) => {}
            None if self.require_signing => return Err(Error::missing_credentials(&path)),
            None => {
                tracing::warn!(path = %path.display(), "No signing credentials; release build will be unsigned");
            }
        }

        Ok(signing)
    }
}

/// Push an evaluation into a build graph
///
/// Base plugins first, then the release signing config, then every enabled
/// capability. Applying the same evaluation twice yields the same graph.
pub fn apply(evaluated: &EvaluatedConfig, graph: &mut dyn BuildGraph) -> Result<()> {
    for plugin in &evaluated.base_plugins {
        graph.register_plugin(plugin)?;
    }
    graph.set_release_signing(&evaluated.signing)?;
    for toggle in &evaluated.capabilities {
        apply_toggle(toggle, graph)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityState;
    use crate::diagnostics::MemorySink;
    use crate::graph::PluginRegistry;
    use appshell_core::config::AppShellConfig;
    use appshell_core::ErrorCode;
    use std::fs;
    use std::path::Path;

    const KEY_PROPERTIES: &str = "keyAlias=upload\nkeyPassword=kp\nstoreFile=upload.jks\nstorePassword=sp\n";

    fn project(schema: AppShellConfig) -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("app")).unwrap();
        let config = Config {
            schema,
            path: None,
            project_dir: dir.path().to_path_buf(),
        };
        (dir, config)
    }

    fn touch(dir: &Path, relative: &str, content: &str) {
        fs::write(dir.join(relative), content).unwrap();
    }

    #[test]
    fn test_bare_project_is_unsigned_and_push_disabled() {
        let (_dir, config) = project(AppShellConfig::default());
        let mut sink = MemorySink::new();

        let evaluated = ConfigEvaluator::new(&config).evaluate(&mut sink).unwrap();
        assert!(!evaluated.signing.is_signed());
        assert_eq!(evaluated.capability("push").unwrap().state, CapabilityState::Disabled);
        assert_eq!(sink.diagnostics.len(), 1);
        assert!(sink.diagnostics[0].message.contains("disabled"));
    }

    #[test]
    fn test_full_project() {
        let (dir, config) = project(AppShellConfig::default());
        touch(dir.path(), "key.properties", KEY_PROPERTIES);
        touch(dir.path(), "app/upload.jks", "");
        touch(dir.path(), "app/google-services.json", "{}");

        let evaluated = ConfigEvaluator::new(&config).evaluate(&mut MemorySink::new()).unwrap();
        assert!(evaluated.signing.is_signed());
        assert_eq!(evaluated.signing.store_path, Some(dir.path().join("app/upload.jks")));
        assert_eq!(evaluated.enabled().count(), 1);

        let mut graph = PluginRegistry::new();
        apply(&evaluated, &mut graph).unwrap();
        apply(&evaluated, &mut graph).unwrap();
        assert_eq!(
            graph.plugins(),
            [
                "com.android.application",
                "kotlin-android",
                "dev.flutter.flutter-gradle-plugin",
                "com.google.gms.google-services",
            ]
        );
        assert!(graph.release_signing().unwrap().is_signed());
    }

    #[test]
    fn test_reevaluation_sees_new_artifact() {
        let (dir, config) = project(AppShellConfig::default());
        let evaluator = ConfigEvaluator::new(&config);

        let before = evaluator.evaluate(&mut MemorySink::new()).unwrap();
        touch(dir.path(), "app/google-services.json", "{}");
        let after = evaluator.evaluate(&mut MemorySink::new()).unwrap();

        assert!(!before.capability("push").unwrap().is_enabled());
        assert!(after.capability("push").unwrap().is_enabled());
    }

    #[test]
    fn test_required_signing_without_file_fails() {
        let mut schema = AppShellConfig::default();
        schema.signing.required = true;
        let (_dir, config) = project(schema);

        let err = ConfigEvaluator::new(&config).evaluate(&mut MemorySink::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingCredentials);
    }

    #[test]
    fn test_require_signing_flag_overrides_config() {
        let (_dir, config) = project(AppShellConfig::default());
        let err = ConfigEvaluator::new(&config)
            .require_signing(true)
            .evaluate(&mut MemorySink::new())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingCredentials);
    }

    #[test]
    fn test_malformed_credentials_abort() {
        let (dir, config) = project(AppShellConfig::default());
        touch(dir.path(), "key.properties", "keyAlias=upload\n");

        let err = ConfigEvaluator::new(&config).evaluate(&mut MemorySink::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedCredentials);
    }

    #[test]
    fn test_push_with_low_min_platform_fails() {
        let mut schema = AppShellConfig::default();
        schema.target.min_platform_version = 19;
        let (dir, config) = project(schema);

        assert!(ConfigEvaluator::new(&config).evaluate(&mut MemorySink::new()).is_ok());

        touch(dir.path(), "app/google-services.json", "{}");
        let err = ConfigEvaluator::new(&config).evaluate(&mut MemorySink::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::PlatformVersionTooLow);
    }

    #[test]
    fn test_capabilities_evaluated_in_declaration_order() {
        let mut schema = AppShellConfig::default();
        schema.capabilities.push(appshell_core::config::CapabilitySettings {
            name: "crash".to_string(),
            artifact: "app/crash.json".into(),
            plugin: "com.google.firebase.crashlytics".to_string(),
            min_platform_version: None,
            obtain: None,
        });
        let (dir, config) = project(schema);
        touch(dir.path(), "app/crash.json", "{}");
        let mut sink = MemorySink::new();

        let evaluated = ConfigEvaluator::new(&config).evaluate(&mut sink).unwrap();
        let names: Vec<&str> = sink.diagnostics.iter().map(|d| d.subject.as_str()).collect();
        assert_eq!(names, ["push", "crash"]);
        assert_eq!(evaluated.enabled().map(|t| t.name.as_str()).collect::<Vec<_>>(), ["crash"]);
    }
}
