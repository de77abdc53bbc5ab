//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "DIFFGRADE";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Parallel from DIFFGRADE_PARALLEL
    pub parallel: Option<bool>,
    /// Progressive from DIFFGRADE_PROGRESSIVE
    pub progressive: Option<bool>,
    /// Workers from DIFFGRADE_WORKERS
    pub workers: Option<usize>,
    /// Color choice from DIFFGRADE_COLOR
    pub color: Option<String>,
    /// Log level from DIFFGRADE_LOG
    pub log: Option<String>,
    /// Config file from DIFFGRADE_CONFIG
    pub config_file: Option<String>,
    /// Export format from DIFFGRADE_FORMAT
    pub format: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            parallel: get_env_bool("PARALLEL"),
            progressive: get_env_bool("PROGRESSIVE"),
            workers: get_env_parse("WORKERS"),
            color: get_env("COLOR"),
            log: get_env("LOG"),
            config_file: get_env("CONFIG"),
            format: get_env("FORMAT"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.parallel.is_some()
            || self.progressive.is_some()
            || self.workers.is_some()
            || self.color.is_some()
            || self.log.is_some()
            || self.config_file.is_some()
            || self.format.is_some()
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_PARALLEL:     {:?}", ENV_PREFIX, self.parallel);
        println!("  {}_PROGRESSIVE:  {:?}", ENV_PREFIX, self.progressive);
        println!("  {}_WORKERS:      {:?}", ENV_PREFIX, self.workers);
        println!("  {}_COLOR:        {:?}", ENV_PREFIX, self.color);
        println!("  {}_LOG:          {:?}", ENV_PREFIX, self.log);
        println!("  {}_CONFIG:       {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_FORMAT:       {:?}", ENV_PREFIX, self.format);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables (useful for testing)
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

impl EnvBuilder {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    fn set(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_{name}"), value.into()));
        self
    }

    pub fn parallel(self, parallel: bool) -> Self {
        self.set("PARALLEL", parallel.to_string())
    }

    pub fn progressive(self, progressive: bool) -> Self {
        self.set("PROGRESSIVE", progressive.to_string())
    }

    pub fn workers(self, workers: usize) -> Self {
        self.set("WORKERS", workers.to_string())
    }

    pub fn color(self, color: impl Into<String>) -> Self {
        self.set("COLOR", color)
    }

    pub fn log(self, level: impl Into<String>) -> Self {
        self.set("LOG", level)
    }

    pub fn config_file(self, path: impl Into<String>) -> Self {
        self.set("CONFIG", path)
    }

    pub fn format(self, format: impl Into<String>) -> Self {
        self.set("FORMAT", format)
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all DIFFGRADE environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_PARALLEL     Run tests on the worker pool (true/false)");
    println!("  {ENV_PREFIX}_PROGRESSIVE  Prompt before revealing output diffs (true/false)");
    println!("  {ENV_PREFIX}_WORKERS      Worker pool size");
    println!("  {ENV_PREFIX}_COLOR        Color output (auto, always, never)");
    println!("  {ENV_PREFIX}_LOG          Log level (trace, debug, info, warn, error)");
    println!("  {ENV_PREFIX}_CONFIG       Path to configuration file");
    println!("  {ENV_PREFIX}_FORMAT       Summary export format (json, yaml, csv)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_PARALLEL=true");
    println!("  export {ENV_PREFIX}_WORKERS=8");
    println!("  diffgrade run");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.parallel.is_none());
        assert!(config.workers.is_none());
        assert!(!config.has_any());
    }

    // The only test in the crate that touches process environment
    #[test]
    fn test_env_builder() {
        let _guard = EnvBuilder::new()
            .parallel(true)
            .progressive(false)
            .workers(6)
            .color("never")
            .log("debug")
            .config_file("/tmp/diffgrade.yaml")
            .format("csv")
            .apply_scoped();

        let config = EnvConfig::load();
        assert_eq!(config.parallel, Some(true));
        assert_eq!(config.progressive, Some(false));
        assert_eq!(config.workers, Some(6));
        assert_eq!(config.color.as_deref(), Some("never"));
        assert_eq!(config.log.as_deref(), Some("debug"));
        assert_eq!(config.config_file.as_deref(), Some("/tmp/diffgrade.yaml"));
        assert_eq!(config.format.as_deref(), Some("csv"));
        assert!(config.has_any());
    }

    #[test]
    fn test_has_any() {
        let with_workers = EnvConfig {
            workers: Some(2),
            ..Default::default()
        };
        assert!(with_workers.has_any());
    }
}
