// src/storage/xlsx_export.rs
//! Renders a roster as an Excel worksheet.
//!
//! The title is merged across the title block rows and the title span,
//! bucket headers land on row 4 and members from row 5, matching the cell
//! layout of the stored document.

use crate::roster::layout::{title_span, HEADER_ROW, TITLE_BLOCK_ROWS, TITLE_ROW};
use crate::roster::{RosterDocument, StorageError, StorageResult};
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use std::path::Path;
use tracing::{info, trace};

const MAX_COLUMNS: usize = 16_384;
const MAX_ROWS: usize = 1_048_576;

pub fn export_xlsx(document: &RosterDocument, out: &Path) -> StorageResult<()> {
    let grid = &document.grid;
    let bucket_columns = grid
        .get(HEADER_ROW)
        .map(|header| header.iter().filter(|c| !c.trim().is_empty()).count())
        .unwrap_or(0);
    let span = title_span(&document.metadata, bucket_columns);
    let columns = grid.iter().map(Vec::len).max().unwrap_or(0).max(span);
    if columns > MAX_COLUMNS || grid.len() > MAX_ROWS {
        return Err(StorageError::Layout(format!(
            "roster of {}x{} cells does not fit in a worksheet",
            grid.len(),
            columns
        )));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let title = grid
        .get(TITLE_ROW)
        .and_then(|row| row.first())
        .map(String::as_str)
        .unwrap_or("");
    let title_format = Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap();
    worksheet.merge_range(
        TITLE_ROW as u32,
        0,
        (TITLE_ROW + TITLE_BLOCK_ROWS - 1) as u32,
        (span - 1) as u16,
        title,
        &title_format,
    )?;

    for (r, row) in grid.iter().enumerate().skip(TITLE_ROW + TITLE_BLOCK_ROWS) {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(r as u32, c as u16, value)?;
            }
        }
    }

    for (c, width) in document.metadata.column_widths.iter().enumerate() {
        if let Some(width) = width {
            trace!("Column {} width {:.1}", c, width);
            worksheet.set_column_width(c as u16, *width as f64)?;
        }
    }

    workbook.save(out)?;
    info!("Exported roster worksheet to '{}'.", out.display());
    Ok(())
}
