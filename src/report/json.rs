use std::io::{self, Write};

use crate::models::ReportEntry;

/// Pretty-printed JSON array of entries. The unknown sentinel is kept as-is.
pub fn write<W: Write>(entries: &[ReportEntry], writer: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, entries)?;
    writeln!(writer)
}
