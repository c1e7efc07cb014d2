//! XLSX serialization of the result table.
//!
//! One worksheet, header row plus one row per record, no styling.

use std::path::Path;

use rust_xlsxwriter::{Workbook, XlsxError};

use reposheet_shared::{RepoSheetError, Result, ResultTable};

/// Name of the single worksheet.
const SHEET_NAME: &str = "GitHub_Projects";

/// Render `table` as an in-memory XLSX workbook.
pub fn xlsx_bytes(table: &ResultTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME).map_err(export_err)?;

    for (col, title) in ResultTable::COLUMNS.iter().enumerate() {
        sheet
            .write_string(0, col as u16, *title)
            .map_err(export_err)?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, &row.name).map_err(export_err)?;
        sheet
            .write_string(r, 1, row.kind.to_string())
            .map_err(export_err)?;
        sheet.write_string(r, 2, &row.url).map_err(export_err)?;
        sheet.write_string(r, 3, &row.readme).map_err(export_err)?;
    }

    workbook.save_to_buffer().map_err(export_err)
}

/// Write `table` as an XLSX file at `path`.
pub fn write_xlsx(table: &ResultTable, path: &Path) -> Result<()> {
    let bytes = xlsx_bytes(table)?;
    std::fs::write(path, &bytes).map_err(|e| RepoSheetError::io(path, e))
}

fn export_err(e: XlsxError) -> RepoSheetError {
    RepoSheetError::Export(format!("xlsx: {e}"))
}
