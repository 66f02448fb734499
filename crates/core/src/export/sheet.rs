//! Single-row spreadsheet layout: one row per quotation, lines spread
//! across repeating column groups.

use serde::{Deserialize, Serialize};

use crate::quotations::{Quotation, QuotationLine};

/// Header columns every row starts with.
pub const FIXED_HEADERS: [&str; 6] = [
    "Quotation No.",
    "School",
    "Repair Person",
    "Repair Location",
    "Repair Time",
    "Total Price",
];

/// Per-line column group, repeated for every line.
pub const LINE_FIELDS: [&str; 5] = ["Name", "Price", "Quantity", "Unit", "Subtotal"];

/// A rectangular table of cells with a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetTable {
    /// Sheet name; a single-quotation table is titled with its number.
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn width(&self) -> usize {
        self.headers.len()
    }
}

fn headers_for(line_count: usize) -> Vec<String> {
    let mut headers: Vec<String> = FIXED_HEADERS.iter().map(|h| h.to_string()).collect();
    for i in 1..=line_count {
        headers.extend(LINE_FIELDS.iter().map(|field| format!("Item {} {}", i, field)));
    }
    headers
}

fn line_cells(line: &QuotationLine) -> [String; 5] {
    [
        line.name.clone(),
        line.price.to_string(),
        line.quantity.to_string(),
        line.unit.clone(),
        line.subtotal.to_string(),
    ]
}

/// Cells of one quotation, padded with empty cells up to `line_count` groups.
fn row_for(quotation: &Quotation, line_count: usize) -> Vec<String> {
    let mut row = vec![
        quotation.quotation_number.clone(),
        quotation.school_name.clone(),
        quotation.repair_person.clone(),
        quotation.repair_location.clone(),
        quotation.repair_time.clone(),
        quotation.total_price.to_string(),
    ];
    for line in &quotation.lines {
        row.extend(line_cells(line));
    }
    let width = FIXED_HEADERS.len() + line_count * LINE_FIELDS.len();
    row.resize(width, String::new());
    row
}

/// Table for a single quotation: one header row and one data row.
pub fn quotation_sheet(quotation: &Quotation) -> SheetTable {
    let line_count = quotation.lines.len();
    SheetTable {
        title: quotation.quotation_number.clone(),
        headers: headers_for(line_count),
        rows: vec![row_for(quotation, line_count)],
    }
}

/// Table for several quotations, in the order given.
///
/// Columns are sized for the quotation with the most lines.
pub fn quotations_sheet(quotations: &[Quotation]) -> SheetTable {
    let line_count = quotations.iter().map(|q| q.lines.len()).max().unwrap_or(0);
    SheetTable {
        title: "Quotations".to_string(),
        headers: headers_for(line_count),
        rows: quotations
            .iter()
            .map(|quotation| row_for(quotation, line_count))
            .collect(),
    }
}
