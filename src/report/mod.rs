//! Rendering of analysis results.
//!
//! The engine hands over raw numbers and tagged reasons; formatting,
//! ordering of authors and reason strings are decided here.

pub mod json;
pub mod text;

use crate::detector::{SuspiciousCommit, Thresholds};
use crate::error::{Result, VibeError};
use crate::stats::RepositoryStats;
use clap::ValueEnum;
use std::path::Path;

pub struct ReportData<'a> {
    pub repository_path: String,
    pub stats: &'a RepositoryStats,
    pub thresholds: &'a Thresholds,
    pub suspicious: &'a [SuspiciousCommit],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

impl Format {
    /// Picks a format from an output file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Format::Json),
            "txt" | "text" | "" => Ok(Format::Text),
            other => Err(VibeError::UnsupportedFormat(format!(
                "unsupported file extension: .{other}"
            ))),
        }
    }
}

pub fn render(data: &ReportData<'_>, format: Format) -> Result<String> {
    match format {
        Format::Text => text::render(data),
        Format::Json => json::render(data),
    }
}

/// Renders to `path`; styling is dropped since files are not terminals.
pub fn write_to(data: &ReportData<'_>, format: Format, path: &Path) -> Result<()> {
    let rendered = render(data, format)?;
    let plain = console::strip_ansi_codes(&rendered);
    std::fs::write(path, plain.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(&PathBuf::from("out.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(&PathBuf::from("OUT.JSON")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(&PathBuf::from("report.txt")).unwrap(), Format::Text);
        assert_eq!(Format::from_path(&PathBuf::from("report.text")).unwrap(), Format::Text);
        assert_eq!(Format::from_path(&PathBuf::from("report")).unwrap(), Format::Text);

        let err = Format::from_path(&PathBuf::from("report.xml")).unwrap_err();
        assert!(err.to_string().contains(".xml"));
    }
}
