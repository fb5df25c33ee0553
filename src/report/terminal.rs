use std::path::Path;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{Ecosystem, ReportEntry, UNKNOWN_LICENSE};

/// Counts shown in the summary box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub identified: usize,
    pub with_text: usize,
}

impl Summary {
    pub fn of(entries: &[ReportEntry]) -> Self {
        Self {
            total: entries.len(),
            identified: entries.iter().filter(|e| e.identifier != UNKNOWN_LICENSE).count(),
            with_text: entries.iter().filter(|e| !e.full_text.is_empty()).count(),
        }
    }
}

/// Print a colored summary of the report that was just written.
pub fn render(entries: &[ReportEntry], ecosystem: Ecosystem, output: &Path, verbose: bool) {
    let summary = Summary::of(entries);

    println!(
        "\n {} v{}",
        "oss-list".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Ecosystem: {}\n", ecosystem);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(
        " │  {:<48} │",
        format!("Total dependencies : {}", summary.total)
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  License label    : {:>4}",
            "✓".green(),
            summary.identified
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  License text     : {:>4}",
            "✓".green(),
            summary.with_text
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Unknown license  : {:>4}",
            "⚠".yellow(),
            summary.total - summary.identified
        )
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    let unresolved: Vec<&ReportEntry> = entries
        .iter()
        .filter(|e| e.identifier == UNKNOWN_LICENSE || e.full_text.is_empty())
        .collect();

    if verbose {
        println!(" {} All dependencies:\n", "[INFO]".cyan().bold());
        render_table(entries.iter());
        println!();
    } else if !unresolved.is_empty() {
        println!(" {} Dependencies with missing license data:\n", "[WARN]".yellow().bold());
        render_table(unresolved.into_iter());
        println!();
    }

    println!(" Report written to {}", output.display().to_string().bold());
}

fn render_table<'a>(entries: impl Iterator<Item = &'a ReportEntry>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Text").add_attribute(Attribute::Bold),
        ]);

    for entry in entries {
        let license_color = if entry.identifier == UNKNOWN_LICENSE {
            Color::DarkGrey
        } else {
            Color::Green
        };

        let (text_str, text_color) = if entry.full_text.is_empty() {
            ("✗", Color::Yellow)
        } else {
            ("✓", Color::Green)
        };

        table.add_row(vec![
            Cell::new(entry.sequence_number).set_alignment(CellAlignment::Right),
            Cell::new(&entry.name),
            Cell::new(&entry.version),
            Cell::new(&entry.identifier).fg(license_color),
            Cell::new(text_str)
                .fg(text_color)
                .set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{}", table);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(identifier: &str, text: &str) -> ReportEntry {
        ReportEntry {
            sequence_number: 1,
            name: "x".to_string(),
            url: String::new(),
            version: "1".to_string(),
            identifier: identifier.to_string(),
            full_text: text.to_string(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let entries = vec![
            entry("MIT", "text"),
            entry("unknown", ""),
            entry("ISC", ""),
        ];
        assert_eq!(
            Summary::of(&entries),
            Summary {
                total: 3,
                identified: 2,
                with_text: 1
            }
        );
    }
}
