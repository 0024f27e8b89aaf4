use std::io::Write;
use std::path::{Path, PathBuf};

use lexbank_core::{ExtractedText, InsertOutcome, RegulationSummary};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the extraction summary after a document has been extracted.
pub fn print_extraction_summary(
    w: &mut dyn Write,
    path: &Path,
    extracted: &ExtractedText,
    color: ColorMode,
) -> std::io::Result<()> {
    let msg = format!(
        "Extracted {} pages ({} chars) from {}",
        extracted.page_count,
        extracted.char_count(),
        path.display()
    );
    if color.enabled() {
        writeln!(w, "{}", msg.dimmed())
    } else {
        writeln!(w, "{}", msg)
    }
}

/// Print the result of storing one record.
pub fn print_add_result(
    w: &mut dyn Write,
    name: &str,
    page_count: usize,
    outcome: InsertOutcome,
    color: ColorMode,
) -> std::io::Result<()> {
    match outcome {
        InsertOutcome::Inserted => {
            if color.enabled() {
                writeln!(w, "{} \"{}\" ({} pages)", "ADDED".green(), name, page_count)
            } else {
                writeln!(w, "ADDED \"{}\" ({} pages)", name, page_count)
            }
        }
        InsertOutcome::Replaced => {
            if color.enabled() {
                writeln!(
                    w,
                    "{} \"{}\" ({} pages)",
                    "REPLACED".yellow(),
                    name,
                    page_count
                )
            } else {
                writeln!(w, "REPLACED \"{}\" ({} pages)", name, page_count)
            }
        }
    }
}

/// Print the stored records as a simple listing.
pub fn print_record_list(
    w: &mut dyn Write,
    summaries: &[RegulationSummary],
    color: ColorMode,
) -> std::io::Result<()> {
    if summaries.is_empty() {
        writeln!(w, "No records in the corpus.")?;
        return Ok(());
    }
    for s in summaries {
        let detail = format!("{} pages, {} chars", s.page_count, s.body_chars);
        if color.enabled() {
            writeln!(w, "{}  {}", s.name.bold(), detail.dimmed())?;
        } else {
            writeln!(w, "{}  {}", s.name, detail)?;
        }
    }
    writeln!(w)?;
    writeln!(w, "{} records", summaries.len())
}

/// Print the import outcome: how many documents landed, which were skipped.
pub fn print_import_summary(
    w: &mut dyn Write,
    imported: usize,
    failed: &[(PathBuf, String)],
    color: ColorMode,
) -> std::io::Result<()> {
    for (path, reason) in failed {
        let msg = format!("SKIPPED {}: {}", path.display(), reason);
        if color.enabled() {
            writeln!(w, "{}", msg.yellow())?;
        } else {
            writeln!(w, "{}", msg)?;
        }
    }
    let msg = format!("Imported {} documents", imported);
    if color.enabled() {
        writeln!(w, "{}", msg.green())
    } else {
        writeln!(w, "{}", msg)
    }
}
