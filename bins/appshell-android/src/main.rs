//! appshell Android CLI
//!
//! Evaluates signing credentials and capability toggles for an Android app
//! shell and reports the resulting build plan.

use anyhow::Result;
use appshell_android::capability::{evaluate_capability_toggle, CapabilitySpec};
use appshell_android::diagnostics::{MemorySink, StatusSink};
use appshell_android::doctor::{self, CheckStatus};
use appshell_android::evaluator::{apply, ConfigEvaluator};
use appshell_android::graph::PluginRegistry;
use appshell_android::plan::BuildPlan;
use appshell_android::signing::resolve_signing_credentials;
use appshell_cli::output::{format_count, format_duration, Status};
use appshell_core::config::{CapabilitySettings, Config, CONFIG_CANDIDATES};
use appshell_core::error::{exit_codes, Error};
use appshell_telemetry::{TelemetryConfig, Timer};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "appshell-android")]
#[command(about = "Build-time signing and capability evaluation for Android app shells")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true, env = "APPSHELL_CONFIG")]
    config: Option<PathBuf>,

    /// Android project directory
    #[arg(short = 'C', long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Write logs to stderr as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate signing and capabilities
    Evaluate {
        /// Output the build plan as JSON
        #[arg(long)]
        json: bool,
        /// Fail when no signing credentials are present
        #[arg(long)]
        require_signing: bool,
    },

    /// Check release signing credentials
    Signing {
        /// Properties file, overriding the configured one
        #[arg(long)]
        properties: Option<PathBuf>,
    },

    /// Evaluate a single capability toggle
    Capability {
        /// Capability name
        name: String,
        /// Activation artifact
        artifact: PathBuf,
        /// Plugin registered when enabled
        #[arg(long, default_value = "com.google.gms.google-services")]
        plugin: String,
    },

    /// Evaluate and print the resulting build graph
    Apply,

    /// Diagnose evaluation inputs
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default appshell.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    appshell_telemetry::init_with_config(
        TelemetryConfig::from_verbosity(cli.verbose, cli.quiet).with_json(cli.log_json),
    )?;

    let exit_code = match &cli.command {
        Commands::Init { force } => run_init(&cli, *force),
        command => match Config::load(cli.config.as_deref(), &cli.project_dir) {
            Ok(config) => match command {
                Commands::Evaluate { json, require_signing } => run_evaluate(&config, *json, *require_signing),
                Commands::Signing { properties } => run_signing(&config, properties.as_deref()),
                Commands::Capability { name, artifact, plugin } => run_capability(&config, name, artifact, plugin),
                Commands::Apply => run_apply(&config),
                Commands::Doctor { json } => run_doctor(&config, *json),
                Commands::Init { .. } => unreachable!("handled above"),
            },
            Err(e) => report_error(&e, false),
        },
    };

    std::process::exit(exit_code);
}

fn report_error(err: &Error, json: bool) -> i32 {
    if json {
        match serde_json::to_string_pretty(&err.to_report()) {
            Ok(report) => println!("{report}"),
            Err(e) => Status::error(&format!("Failed to render error report: {e}")),
        }
    }
    Status::error(&err.to_string());
    err.exit_code()
}

fn run_evaluate(config: &Config, json: bool, require_signing: bool) -> i32 {
    let timer = Timer::start("evaluate");
    let evaluator = ConfigEvaluator::new(config).require_signing(require_signing);

    if json {
        let mut sink = MemorySink::new();
        let plan = evaluator
            .evaluate(&mut sink)
            .and_then(|evaluated| BuildPlan::new(&evaluated))
            .map(|plan| {
                plan.with_diagnostics(sink.diagnostics)
                    .with_session_id(appshell_telemetry::session_id())
            })
            .and_then(|plan| plan.to_json());
        return match plan {
            Ok(rendered) => {
                println!("{rendered}");
                exit_codes::SUCCESS
            }
            Err(e) => report_error(&e, true),
        };
    }

    Status::header("Build configuration");
    let evaluated = match evaluator.evaluate(&mut StatusSink) {
        Ok(evaluated) => evaluated,
        Err(e) => return report_error(&e, false),
    };

    let target = &evaluated.target;
    Status::info(&format!(
        "Target: {} {} ({}), platform min {} / target {} / compile {}",
        target.application_id,
        target.version_name,
        target.version_code,
        target.min_platform_version,
        target.target_platform_version,
        target.compile_platform_version
    ));

    match &evaluated.signing.store_path {
        Some(store) => Status::success(&format!("Release signing configured (keystore: {})", store.display())),
        None => Status::warning("Release signing not configured - release builds will be unsigned"),
    }

    let enabled = evaluated.enabled().count();
    Status::success(&format!(
        "Evaluated {} ({} enabled) in {}",
        format_count(evaluated.capabilities.len(), "capability", "capabilities"),
        enabled,
        format_duration(timer.stop())
    ));

    exit_codes::SUCCESS
}

fn run_signing(config: &Config, properties: Option<&Path>) -> i32 {
    let settings = &config.schema.signing;
    let path = config.resolve(properties.unwrap_or(&settings.properties));

    match resolve_signing_credentials(&path) {
        Ok(Some(credentials)) => {
            Status::success(&format!("Signing credentials found in {}", path.display()));
            let store = credentials.store_file_in(&config.resolve(&settings.store_base));
            if store.is_file() {
                Status::success(&format!("Keystore: {}", store.display()));
            } else {
                Status::warning(&format!("Keystore: {} (not found)", store.display()));
            }
            exit_codes::SUCCESS
        }
        Ok(None) if settings.required => report_error(&Error::missing_credentials(&path), false),
        Ok(None) => {
            Status::warning(&format!("{} not found - release builds will be unsigned", path.display()));
            Status::detail("To sign: create it with keyAlias, keyPassword, storeFile and storePassword");
            exit_codes::SUCCESS
        }
        Err(e) => report_error(&e, false),
    }
}

fn run_capability(config: &Config, name: &str, artifact: &Path, plugin: &str) -> i32 {
    let settings = CapabilitySettings {
        name: name.to_string(),
        artifact: artifact.to_path_buf(),
        plugin: plugin.to_string(),
        min_platform_version: None,
        obtain: None,
    };
    let spec = CapabilitySpec::from_settings(&settings, config);
    let toggle = evaluate_capability_toggle(&spec, &mut StatusSink);
    tracing::debug!(capability = %toggle.name, enabled = toggle.is_enabled(), "Single capability evaluated");
    exit_codes::SUCCESS
}

fn run_apply(config: &Config) -> i32 {
    let evaluated = match ConfigEvaluator::new(config).evaluate(&mut StatusSink) {
        Ok(evaluated) => evaluated,
        Err(e) => return report_error(&e, false),
    };

    let mut graph = PluginRegistry::new();
    if let Err(e) = apply(&evaluated, &mut graph) {
        return report_error(&e, false);
    }

    Status::header("Build graph");
    for plugin in graph.plugins() {
        println!("  - {plugin}");
    }
    let signed = graph.release_signing().is_some_and(|s| s.is_signed());
    println!("  release signing: {}", if signed { "signed" } else { "unsigned" });

    exit_codes::SUCCESS
}

fn run_doctor(config: &Config, json: bool) -> i32 {
    let report = doctor::inspect(config);

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => return report_error(&Error::from(e), true),
        }
    } else {
        Status::header("Environment Check");
        for check in &report.checks {
            let line = match &check.path {
                Some(path) => format!("{}: {} ({})", check.name, check.message, path.display()),
                None => format!("{}: {}", check.name, check.message),
            };
            match check.status {
                CheckStatus::Healthy => Status::success(&line),
                CheckStatus::Degraded => Status::warning(&line),
                CheckStatus::Unhealthy => Status::error(&line),
            }
        }
    }

    if report.is_operational() {
        exit_codes::SUCCESS
    } else {
        exit_codes::FAILURE
    }
}

fn run_init(cli: &Cli, force: bool) -> i32 {
    let path = match &cli.config {
        Some(path) if path.is_relative() => cli.project_dir.join(path),
        Some(path) => path.clone(),
        None => cli.project_dir.join(CONFIG_CANDIDATES[0]),
    };

    match Config::write_default(&path, force) {
        Ok(()) => {
            Status::success(&format!("Wrote {}", path.display()));
            exit_codes::SUCCESS
        }
        Err(e) => report_error(&e, false),
    }
}
