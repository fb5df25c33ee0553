//! CSV emission: one header row, then one record per entry, `\r\n`
//! terminated, with minimal quoting.

use std::io::{self, Write};

use super::Locale;
use crate::models::ReportEntry;

pub fn write<W: Write>(entries: &[ReportEntry], locale: Locale, writer: &mut W) -> io::Result<()> {
    write_record(writer, &locale.headers())?;

    for entry in entries {
        let number = entry.sequence_number.to_string();
        write_record(
            writer,
            &[
                number.as_str(),
                entry.name.as_str(),
                entry.url.as_str(),
                entry.version.as_str(),
                locale.license_label(&entry.identifier),
                entry.full_text.as_str(),
            ],
        )?;
    }

    Ok(())
}

fn write_record<W: Write>(writer: &mut W, fields: &[&str]) -> io::Result<()> {
    let line: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    write!(writer, "{}\r\n", line.join(","))
}

/// Quote a field when it contains a delimiter, a quote, or a line break.
fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
