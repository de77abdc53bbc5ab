//! Output formatters for grading reports
//!
//! Tone rendering for status lines and headers, plus JSON, YAML and CSV
//! export of suite summaries.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::SuiteSummary;

/// Visual tone of a status message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Fail,
    Warning,
    Info,
    Bold,
    Underline,
}

impl Tone {
    fn ansi(&self) -> &'static str {
        match self {
            Tone::Success => "\x1b[92m",
            Tone::Fail => "\x1b[91m",
            Tone::Warning => "\x1b[93m",
            Tone::Info => "\x1b[94m",
            Tone::Bold => "\x1b[1m",
            Tone::Underline => "\x1b[4m",
        }
    }
}

/// Turns plain text into display text for a tone
pub trait Render: Send + Sync {
    fn render(&self, text: &str, tone: Tone) -> String;
}

/// ANSI status renderer
#[derive(Clone, Copy, Debug)]
pub struct StatusFormatter {
    colorize: bool,
}

impl StatusFormatter {
    pub fn new() -> Self {
        Self { colorize: true }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    pub fn with_color(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    /// Centered message over a dashed rule
    pub fn header(&self, message: &str, tone: Tone) -> String {
        let width = (message.chars().count() + 10).max(80);
        let text = format!("{message:^width$}\n{}", "–".repeat(width));
        self.render(&text, tone)
    }

    /// Message inside a box
    pub fn super_header(&self, message: &str, tone: Tone) -> String {
        let width = (message.chars().count() + 10).max(78);
        let inner = width - 2;
        let text = format!(
            "┌{rule}┐\n│ {message:^inner$} │\n└{rule}┘",
            rule = "─".repeat(width)
        );
        self.render(&text, tone)
    }
}

impl Default for StatusFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Render for StatusFormatter {
    fn render(&self, text: &str, tone: Tone) -> String {
        if self.colorize {
            format!("{}{text}\x1b[0m", tone.ansi())
        } else {
            text.to_string()
        }
    }
}

/// Export format for suite summaries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    Csv,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "yaml" | "yml" => Some(ExportFormat::Yaml),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }
}

/// Serialize a summary in the requested format
pub fn format_summary(summary: &SuiteSummary, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(summary).context("Failed to serialize summary as JSON")
        }
        ExportFormat::Yaml => {
            serde_yaml::to_string(summary).context("Failed to serialize summary as YAML")
        }
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(["index", "name", "status", "duration_ms", "message"])?;
            for record in &summary.results {
                writer.write_record([
                    record.index.to_string(),
                    record.name.clone(),
                    record.status.to_string(),
                    record.duration_ms.to_string(),
                    record.message.clone().unwrap_or_default(),
                ])?;
            }
            let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
            String::from_utf8(bytes).context("CSV output was not UTF-8")
        }
    }
}

/// Write a summary to a file
pub fn write_summary_to_file(
    path: impl AsRef<Path>,
    summary: &SuiteSummary,
    format: ExportFormat,
) -> Result<()> {
    let path = path.as_ref();
    let content = format_summary(summary, format)?;

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
