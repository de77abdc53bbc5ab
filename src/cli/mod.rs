//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use diffgrade::config::RunOverrides;

/// Differential grader: compares student code against a reference solution
#[derive(Parser, Debug)]
#[command(name = "diffgrade")]
#[command(version)]
#[command(about = "Grade a submission by running it next to a reference solution")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Grade the bundled sample assignment
    Run(RunArgs),

    /// List the tests in the sample suite
    List,

    /// Manage configuration files
    Config(ConfigArgs),
}

/// Arguments for run command
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Ask before revealing the whole printed-output diff of a failed test
    #[arg(short, long)]
    pub progressive: bool,

    /// Run tests on a worker pool; output stays in test order
    #[arg(long)]
    pub parallel: bool,

    /// Worker pool size (default: twice the CPU count)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Configuration file to use instead of the default locations
    #[arg(short, long)]
    pub config: Option<String>,

    /// Write the run summary to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Summary format (json, yaml, csv)
    #[arg(short, long)]
    pub format: Option<String>,
}

impl RunArgs {
    pub fn overrides(&self, verbose: bool) -> RunOverrides {
        RunOverrides {
            parallel: self.parallel,
            progressive: self.progressive,
            workers: self.workers,
            no_color: self.no_color,
            verbose,
            output: self.output.clone(),
            format: self.format.clone(),
        }
    }
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        /// Output file path
        #[arg(short, long, default_value = "./diffgrade.yaml")]
        output: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Show environment variables instead
        #[arg(long)]
        env: bool,

        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Validate a configuration file
    Validate {
        /// File to validate (default: first file found in the search path)
        #[arg(short, long)]
        file: Option<String>,
    },
}
