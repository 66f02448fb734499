use chrono::{DateTime, Local};
use csv::{Terminator, WriterBuilder};

use super::sheet::SheetTable;
use crate::Result;

/// Turns a sheet table into downloadable bytes.
///
/// The engine only hands out tables; storage and transport never depend on
/// a concrete output format.
pub trait QuotationRenderer: Send + Sync {
    /// MIME type of the rendered output.
    fn content_type(&self) -> &'static str;

    /// File extension without the leading dot.
    fn extension(&self) -> &'static str;

    fn render(&self, table: &SheetTable) -> Result<Vec<u8>>;

    /// Download name for a single-quotation table.
    fn file_name(&self, table: &SheetTable) -> String {
        format!("{}.{}", table.title, self.extension())
    }
}

/// Comma separated output with a header row and CRLF line endings.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSheetRenderer;

impl QuotationRenderer for CsvSheetRenderer {
    fn content_type(&self) -> &'static str {
        "text/csv; charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, table: &SheetTable) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(Vec::new());

        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }

        writer
            .into_inner()
            .map_err(|e| crate::Error::Export(e.to_string()))
    }
}

/// Download name for a batch export taken at `now`.
pub fn batch_file_name(renderer: &dyn QuotationRenderer, now: DateTime<Local>) -> String {
    format!(
        "quotations_{}.{}",
        now.format("%Y%m%d%H%M%S"),
        renderer.extension()
    )
}
