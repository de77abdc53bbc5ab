//! Configuration module
//!
//! Grader settings come from four layers, highest precedence first:
//! command-line flags, `DIFFGRADE_*` environment variables, a config file,
//! and built-in defaults.

mod env;
mod file;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::executor::{default_workers, ExecutionMode};
use crate::output::ExportFormat;
use crate::utils::LogLevel;

pub use env::{print_env_help, EnvBuilder, EnvConfig, EnvGuard};
pub use file::ConfigFile;

/// When to emit ANSI colors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(ColorChoice::Auto),
            "always" | "true" | "on" => Some(ColorChoice::Always),
            "never" | "false" | "off" => Some(ColorChoice::Never),
            _ => None,
        }
    }

    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => std::io::stdout().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Grader settings as stored in a config file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraderConfig {
    /// Run tests on the worker pool
    pub parallel: bool,

    /// Prompt before revealing long output diffs
    pub progressive: bool,

    /// Worker pool size; twice the CPU count when unset
    pub workers: Option<usize>,

    pub color: ColorChoice,

    pub log_level: String,

    /// Format for exported summaries (json, yaml, csv)
    pub output_format: String,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            progressive: false,
            workers: None,
            color: ColorChoice::Auto,
            log_level: "warn".to_string(),
            output_format: "json".to_string(),
        }
    }
}

/// Settings given on the command line
#[derive(Clone, Debug, Default)]
pub struct RunOverrides {
    pub parallel: bool,
    pub progressive: bool,
    pub workers: Option<usize>,
    pub no_color: bool,
    pub verbose: bool,
    pub output: Option<PathBuf>,
    pub format: Option<String>,
}

/// Effective settings for one grading run
#[derive(Clone, Debug, PartialEq)]
pub struct RunSettings {
    pub mode: ExecutionMode,
    pub progressive: bool,
    pub workers: usize,
    pub color: bool,
    pub log_level: LogLevel,
    /// Where to write the summary, and in which format
    pub export: Option<(PathBuf, ExportFormat)>,
}

impl RunSettings {
    /// Merge the layers; flags beat environment, environment beats file
    pub fn resolve(cli: &RunOverrides, env: &EnvConfig, file: &GraderConfig) -> Result<Self> {
        let parallel = cli.parallel || env.parallel.unwrap_or(file.parallel);
        let progressive = cli.progressive || env.progressive.unwrap_or(file.progressive);

        let workers = cli
            .workers
            .or(env.workers)
            .or(file.workers)
            .unwrap_or_else(default_workers);
        if workers == 0 {
            bail!("Worker count must be at least 1");
        }

        let color = if cli.no_color {
            ColorChoice::Never
        } else if let Some(raw) = &env.color {
            match ColorChoice::from_str(raw) {
                Some(choice) => choice,
                None => bail!("Invalid color choice: {raw}. Valid options: auto, always, never"),
            }
        } else {
            file.color
        };

        let log_level = if cli.verbose {
            LogLevel::Debug
        } else {
            let raw = env.log.as_deref().unwrap_or(&file.log_level);
            match LogLevel::from_str(raw) {
                Some(level) => level,
                None => bail!("Invalid log level: {raw}"),
            }
        };

        let raw_format = cli
            .format
            .as_deref()
            .or(env.format.as_deref())
            .unwrap_or(&file.output_format);
        let Some(format) = ExportFormat::from_str(raw_format) else {
            bail!("Invalid output format: {raw_format}. Valid options: json, yaml, csv");
        };

        let mode = if parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        };

        Ok(Self {
            mode,
            progressive,
            workers,
            color: color.enabled(),
            log_level,
            export: cli.output.clone().map(|path| (path, format)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraderConfig::default();
        assert!(!config.parallel);
        assert_eq!(config.workers, None);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.output_format, "json");
    }

    #[test]
    fn test_color_choice() {
        assert_eq!(ColorChoice::from_str("NEVER"), Some(ColorChoice::Never));
        assert_eq!(ColorChoice::from_str("always"), Some(ColorChoice::Always));
        assert_eq!(ColorChoice::from_str("sometimes"), None);
        assert!(ColorChoice::Always.enabled());
        assert!(!ColorChoice::Never.enabled());
    }

    #[test]
    fn test_resolve_defaults() {
        let file = GraderConfig {
            color: ColorChoice::Never,
            ..Default::default()
        };
        let settings =
            RunSettings::resolve(&RunOverrides::default(), &EnvConfig::default(), &file).unwrap();

        assert_eq!(settings.mode, ExecutionMode::Sequential);
        assert!(!settings.progressive);
        assert_eq!(settings.workers, default_workers());
        assert!(!settings.color);
        assert_eq!(settings.log_level, LogLevel::Warn);
        assert!(settings.export.is_none());
    }

    #[test]
    fn test_resolve_precedence() {
        let file = GraderConfig {
            parallel: false,
            workers: Some(2),
            color: ColorChoice::Always,
            log_level: "error".to_string(),
            output_format: "yaml".to_string(),
            ..Default::default()
        };
        let env = EnvConfig {
            parallel: Some(true),
            workers: Some(6),
            log: Some("info".to_string()),
            ..Default::default()
        };
        let cli = RunOverrides {
            workers: Some(3),
            no_color: true,
            output: Some(PathBuf::from("report.csv")),
            format: Some("csv".to_string()),
            ..Default::default()
        };

        let settings = RunSettings::resolve(&cli, &env, &file).unwrap();
        assert_eq!(settings.mode, ExecutionMode::Parallel);
        assert_eq!(settings.workers, 3);
        assert!(!settings.color);
        assert_eq!(settings.log_level, LogLevel::Info);
        assert_eq!(
            settings.export,
            Some((PathBuf::from("report.csv"), ExportFormat::Csv))
        );
    }

    #[test]
    fn test_resolve_rejects_bad_values() {
        let file = GraderConfig::default();

        let cli = RunOverrides {
            workers: Some(0),
            ..Default::default()
        };
        assert!(RunSettings::resolve(&cli, &EnvConfig::default(), &file).is_err());

        let env = EnvConfig {
            format: Some("xml".to_string()),
            ..Default::default()
        };
        assert!(RunSettings::resolve(&RunOverrides::default(), &env, &file).is_err());

        let env = EnvConfig {
            color: Some("rainbow".to_string()),
            ..Default::default()
        };
        assert!(RunSettings::resolve(&RunOverrides::default(), &env, &file).is_err());
    }

    #[test]
    fn test_verbose_forces_debug() {
        let cli = RunOverrides {
            verbose: true,
            ..Default::default()
        };
        let settings =
            RunSettings::resolve(&cli, &EnvConfig::default(), &GraderConfig::default()).unwrap();
        assert_eq!(settings.log_level, LogLevel::Debug);
    }
}
