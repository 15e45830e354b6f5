//! build-profile CLI
//!
//! Loads, validates, and renders the Android build profile, and hands a
//! validated profile to Gradle.

use anyhow::Result;
use buildprofile_android::loader::{self, Format};
use buildprofile_android::validate::{validate_with, ValidationPolicy};
use buildprofile_android::{gradle, starter, BuildProfile};
use buildprofile_cli::output::{format_count, print_validation, Status};
use buildprofile_core::config::Config;
use buildprofile_core::error::{exit_codes, Error};
use buildprofile_core::validation::ValidationResult;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "build-profile")]
#[command(about = "Load, validate, and render Android build profiles")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a profile
    Check {
        /// Profile document (defaults to the configured path)
        path: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved profile
    Show {
        /// Profile document (defaults to the configured path)
        path: Option<PathBuf>,
        /// Output format: toml, json
        #[arg(long, default_value = "toml")]
        format: Format,
    },

    /// Render the profile as build.gradle.kts
    Render {
        /// Profile document (defaults to the configured path)
        path: Option<PathBuf>,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate, then run the Gradle build for a variant
    Build {
        /// Profile document (defaults to the configured path)
        path: Option<PathBuf>,
        /// Variant to build
        #[arg(long, default_value = "release")]
        variant: String,
        /// Build bundle (AAB) instead of APK
        #[arg(long)]
        bundle: bool,
        /// Directory holding the Gradle wrapper (defaults to the configured one)
        #[arg(long)]
        project_dir: Option<PathBuf>,
    },

    /// Write a starter profile
    Init {
        /// Where to write it (defaults to the configured path)
        path: Option<PathBuf>,
        /// Application id to put in the profile
        #[arg(long, default_value = "com.example.app")]
        application_id: String,
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
    init_logging(cli.verbose, cli.quiet);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            Status::error(&e.to_string());
            std::process::exit(e.code.exit_code());
        }
    };
    tracing::debug!(config = ?config.path, "tool configuration loaded");

    let exit_code = match cli.command {
        Commands::Check { path, json } => run_check(&config, path, json, cli.quiet),
        Commands::Show { path, format } => run_show(&config, path, format),
        Commands::Render { path, output } => run_render(&config, path, output.as_deref(), cli.quiet),
        Commands::Build { path, variant, bundle, project_dir } => {
            run_build(&config, path, &variant, bundle, project_dir)
        }
        Commands::Init { path, application_id, force } => {
            run_init(&config, path, &application_id, force, cli.quiet)
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn profile_path(config: &Config, path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| config.schema.profile.path.clone())
}

fn load_profile(path: &Path) -> std::result::Result<BuildProfile, Error> {
    loader::load(path).map_err(|e| Error::from(e).with_context(format!("Loading {}", path.display())))
}

fn report_error(err: &Error) -> i32 {
    Status::error(&err.to_string());
    err.code.exit_code()
}

fn summarize(result: &ValidationResult, quiet: bool) -> i32 {
    print_validation(result);
    if !result.is_valid() {
        Status::error(&format!(
            "Build profile has {}",
            format_count(result.errors().len(), "violation", "violations")
        ));
        return exit_codes::VALIDATION_ERROR;
    }
    if !quiet {
        Status::success(&format!(
            "Build profile is valid ({})",
            format_count(result.warnings().len(), "warning", "warnings")
        ));
    }
    exit_codes::SUCCESS
}

fn run_check(config: &Config, path: Option<PathBuf>, json: bool, quiet: bool) -> i32 {
    let path = profile_path(config, path);
    let policy = ValidationPolicy::from(&config.schema.policy);

    let profile = match load_profile(&path) {
        Ok(profile) => profile,
        Err(e) if json => {
            let report = serde_json::json!({ "valid": false, "error": e.to_report() });
            println!("{}", report);
            return e.code.exit_code();
        }
        Err(e) => return report_error(&e),
    };

    let result = validate_with(&profile, &policy);
    if json {
        let report = serde_json::json!({
            "valid": result.is_valid(),
            "errors": result.errors(),
            "warnings": result.warnings(),
        });
        println!("{}", report);
        return if result.is_valid() {
            exit_codes::SUCCESS
        } else {
            exit_codes::VALIDATION_ERROR
        };
    }

    if !quiet {
        Status::header(&format!("{} ({})", profile.application_id, path.display()));
        Status::info(&format!("SDK {}", profile.sdk));
    }
    summarize(&result, quiet)
}

fn run_show(config: &Config, path: Option<PathBuf>, format: Format) -> i32 {
    let path = profile_path(config, path);
    let profile = match load_profile(&path) {
        Ok(profile) => profile,
        Err(e) => return report_error(&e),
    };

    match loader::serialize(&profile, format) {
        Ok(text) => {
            print!("{}", text);
            exit_codes::SUCCESS
        }
        Err(e) => report_error(&e.into()),
    }
}

fn run_render(config: &Config, path: Option<PathBuf>, output: Option<&Path>, quiet: bool) -> i32 {
    let path = profile_path(config, path);
    let profile = match load_profile(&path) {
        Ok(profile) => profile,
        Err(e) => return report_error(&e),
    };

    let result = validate_with(&profile, &ValidationPolicy::from(&config.schema.policy));
    if !result.is_valid() {
        return summarize(&result, quiet);
    }

    let script = match gradle::render_kts(&profile) {
        Ok(script) => script,
        Err(e) => return report_error(&e.into()),
    };

    match output {
        Some(out) => match std::fs::write(out, script) {
            Ok(()) => {
                if !quiet {
                    Status::success(&format!("Wrote {}", out.display()));
                }
                exit_codes::SUCCESS
            }
            Err(e) => report_error(&Error::from(e).with_context(format!("Writing {}", out.display()))),
        },
        None => {
            print!("{}", script);
            exit_codes::SUCCESS
        }
    }
}

fn run_build(
    config: &Config,
    path: Option<PathBuf>,
    variant: &str,
    bundle: bool,
    project_dir: Option<PathBuf>,
) -> i32 {
    let path = profile_path(config, path);
    let profile = match load_profile(&path) {
        Ok(profile) => profile,
        Err(e) => return report_error(&e),
    };

    let result = validate_with(&profile, &ValidationPolicy::from(&config.schema.policy));
    let code = summarize(&result, true);
    if code != exit_codes::SUCCESS {
        return code;
    }

    if !profile.variants.contains_key(variant) && variant != "debug" && variant != "release" {
        Status::error(&format!("Variant `{}` is not declared in {}", variant, path.display()));
        return exit_codes::VALIDATION_ERROR;
    }

    let project_dir = project_dir.unwrap_or_else(|| config.schema.gradle.project_dir.clone());
    let task = gradle::assemble_task(variant, bundle);
    Status::info(&format!("Running {} in {}", task, project_dir.display()));

    match gradle::run_task(&project_dir, &task) {
        Ok(0) => {
            Status::success(&format!("{} finished", task));
            exit_codes::SUCCESS
        }
        Ok(code) => {
            Status::error(&format!("{} failed with exit code {}", task, code));
            code
        }
        Err(e) => report_error(&e),
    }
}

fn run_init(config: &Config, path: Option<PathBuf>, application_id: &str, force: bool, quiet: bool) -> i32 {
    let path = profile_path(config, path);
    if path.exists() && !force {
        Status::error(&format!("{} already exists (use --force to overwrite)", path.display()));
        return exit_codes::FAILURE;
    }

    let document = starter::starter_document(application_id);
    if let Err(e) = loader::parse(&document, Format::Toml) {
        return report_error(&e.into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            return report_error(&Error::from(e).with_context(format!("Creating {}", parent.display())));
        }
    }
    if let Err(e) = std::fs::write(&path, document) {
        return report_error(&Error::from(e).with_context(format!("Writing {}", path.display())));
    }

    if !quiet {
        Status::success(&format!("Wrote {}", path.display()));
    }
    exit_codes::SUCCESS
}
