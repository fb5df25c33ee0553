//! Report aggregation and emission.
//!
//! - [`aggregate`] numbers resolved dependencies in manifest order.
//! - [`csv`] / [`json`] write the six-column record set to a file.
//! - [`terminal`] prints a summary table after a run.

pub mod csv;
pub mod json;
pub mod terminal;

use std::io::Write;
use std::path::Path;

use serde::Deserialize;

use crate::error::InventoryError;
use crate::models::{DependencyRef, Ecosystem, LicenseResult, ReportEntry, UNKNOWN_LICENSE};

/// Zip each dependency with its license result and number them `1..=N`
/// in input order.
pub fn aggregate(
    ecosystem: Ecosystem,
    resolved: impl IntoIterator<Item = (DependencyRef, LicenseResult)>,
) -> Vec<ReportEntry> {
    resolved
        .into_iter()
        .enumerate()
        .map(|(index, (dep, license))| ReportEntry {
            sequence_number: index + 1,
            url: ecosystem.reference_url(&dep),
            name: dep.name,
            version: dep.version,
            identifier: license.identifier,
            full_text: license.full_text,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "oss_list.csv",
            ReportFormat::Json => "oss_list.json",
        }
    }
}

/// Language of the column headers and of the unknown-license sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ja,
    En,
}

impl Locale {
    /// Column headers in report order: number, name, URL, version, license,
    /// license text.
    pub fn headers(&self) -> [&'static str; 6] {
        match self {
            Locale::Ja => ["番号", "ライブラリー", "URL", "バージョン", "ライセンス", "ライセンス内容"],
            Locale::En => ["No.", "Library", "URL", "Version", "License", "License Text"],
        }
    }

    /// Label displayed for an identifier, translating the unknown sentinel.
    pub fn license_label<'a>(&self, identifier: &'a str) -> &'a str {
        match self {
            Locale::Ja if identifier == UNKNOWN_LICENSE => "不明",
            _ => identifier,
        }
    }
}

/// Write `entries` to `path` in `format`.
pub fn write_report(
    entries: &[ReportEntry],
    format: ReportFormat,
    locale: Locale,
    path: &Path,
) -> Result<(), InventoryError> {
    let write_error = |e: std::io::Error| InventoryError::ReportWrite {
        path: path.to_path_buf(),
        details: e.to_string(),
    };

    let file = std::fs::File::create(path).map_err(write_error)?;
    let mut writer = std::io::BufWriter::new(file);

    match format {
        ReportFormat::Csv => csv::write(entries, locale, &mut writer),
        ReportFormat::Json => json::write(entries, &mut writer),
    }
    .and_then(|_| writer.flush())
    .map_err(write_error)
}
