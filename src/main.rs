//! diffgrade - differential grading for programming exercises
//!
//! Runs each student function next to a reference solution with the same
//! arguments and stdin, then reports any difference in return value,
//! printed output, errors or warnings.
//!
//! ## Usage
//!
//! ```bash
//! # Grade the bundled sample assignment
//! diffgrade run
//!
//! # Ask before showing whole output diffs
//! diffgrade run --progressive
//!
//! # Use a worker pool and export the summary
//! diffgrade run --parallel --workers 4 -o summary.json
//!
//! # List the sample tests
//! diffgrade list
//!
//! # Write an example configuration file
//! diffgrade config init
//! ```

use std::io::{self, BufReader};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use diffgrade::config::{print_env_help, ConfigFile, EnvConfig, RunSettings};
use diffgrade::output::{write_summary_to_file, Console, Render, StatusFormatter, Tone};
use diffgrade::sample::sample_suite;
use diffgrade::units::TestUnit;
use diffgrade::utils::{init_logger, LogLevel};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    match args.command {
        cli::Command::Run(run_args) => run_sample(run_args, args.verbose).await,
        cli::Command::List => {
            init_logger(quiet_level(args.verbose));
            list_tests();
            Ok(ExitCode::SUCCESS)
        }
        cli::Command::Config(config_args) => {
            init_logger(quiet_level(args.verbose));
            manage_config(config_args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn quiet_level(verbose: bool) -> LogLevel {
    if verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    }
}

async fn run_sample(args: cli::RunArgs, verbose: bool) -> Result<ExitCode> {
    let env = EnvConfig::load();
    let config_path = args.config.clone().or_else(|| env.config_file.clone());
    let file = ConfigFile::load_or_default(config_path.as_deref())?;
    let settings = RunSettings::resolve(&args.overrides(verbose), &env, &file.grader)?;

    init_logger(settings.log_level);
    info!(
        "Grading sample assignment ({} mode, {} workers)",
        settings.mode, settings.workers
    );

    let formatter = StatusFormatter::new().with_color(settings.color);
    println!("{}", formatter.super_header("Sample assignment", Tone::Bold));
    println!();

    let render: Arc<dyn Render> = Arc::new(formatter);
    let mut console = Console::terminal(render).progressive(settings.progressive);
    if settings.progressive {
        console = console.with_operator(BufReader::new(io::stdin()));
    }

    let mut suite = sample_suite()
        .with_mode(settings.mode)
        .with_workers(settings.workers)
        .with_callback(|passes| info!("Pass vector: {:?}", passes));

    let summary = suite.run(&mut console).await?;

    if let Some((path, format)) = &settings.export {
        write_summary_to_file(path, &summary, *format)?;
        info!("Summary written to {}", path.display());
    }

    Ok(if summary.is_all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn list_tests() {
    let suite = sample_suite();

    println!("\nSample suite ({} tests)\n", suite.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for (index, test) in suite.tests().iter().enumerate() {
        println!("  {:2}. {}", index, test.start_message().trim_end());
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}

fn manage_config(args: cli::ConfigArgs) -> Result<()> {
    match args.action {
        cli::ConfigAction::Init { output, force } => {
            let path = Path::new(&output);
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {output}. Use --force to overwrite."
                );
            }

            let config = ConfigFile::example();
            config.save(path)?;
            println!("✓ Configuration file created: {output}");
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Show { env, format } => {
            if env {
                let env_config = EnvConfig::load();
                if env_config.has_any() {
                    env_config.print_summary();
                } else {
                    print_env_help();
                }
            } else {
                let config = ConfigFile::load_default()?;
                let output = if format == "json" {
                    serde_json::to_string_pretty(&config)?
                } else {
                    serde_yaml::to_string(&config)?
                };
                println!("{output}");
            }
        }

        cli::ConfigAction::Validate { file } => {
            let path = file.unwrap_or_else(|| {
                ConfigFile::find()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_else(|| "./diffgrade.yaml".to_string())
            });

            match ConfigFile::load(&path) {
                Ok(_) => {
                    println!("✓ Configuration file is valid: {path}");
                }
                Err(e) => {
                    println!("✗ Configuration file is invalid: {path}");
                    println!("  Error: {e}");
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
