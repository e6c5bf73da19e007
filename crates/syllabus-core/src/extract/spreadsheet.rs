//! Spreadsheet (`.xlsx`) text extraction via `calamine`.

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};
use tracing::{debug, warn};

use super::ExtractError;

/// Render every sheet as tab-separated rows, each sheet preceded by a
/// `--- Sheet: <name> ---` marker line. Sheets appear in workbook order.
pub fn extract_spreadsheet_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| ExtractError::Spreadsheet(e.to_string()))?;

    let names = workbook.sheet_names().to_vec();
    debug!(sheets = names.len(), "extracting spreadsheet text");

    let mut text = String::new();
    for name in names {
        match workbook.worksheet_range(&name) {
            Ok(range) => text.push_str(&render_sheet(&name, &range)),
            Err(e) => {
                warn!(sheet = %name, error = %e, "skipping unreadable sheet");
            }
        }
    }

    Ok(text)
}

/// Render one sheet: marker line, then one line per row with cells joined
/// by tabs. Empty cells render as empty strings.
pub(crate) fn render_sheet(name: &str, range: &Range<Data>) -> String {
    let mut out = String::with_capacity(64);
    out.push_str("\n--- Sheet: ");
    out.push_str(name);
    out.push_str(" ---\n");

    for row in range.rows() {
        let line = row
            .iter()
            .map(cell_text)
            .collect::<Vec<_>>()
            .join("\t");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
