//! Export module - flattens quotations into spreadsheet tables and renders
//! them for download.

mod renderer;
mod sheet;

pub use renderer::{batch_file_name, CsvSheetRenderer, QuotationRenderer};
pub use sheet::{quotation_sheet, quotations_sheet, SheetTable, FIXED_HEADERS, LINE_FIELDS};
