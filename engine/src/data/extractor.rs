// Splits a raw sheet range into stacked tables and prepares each one.
use shared::models::{CellValue, RawBlock, Table};
use std::collections::HashSet;
use tracing::debug;

use crate::config::settings::{SheetLayout, BEL_TABLE_COUNT};
use crate::data::periods;
use crate::error::{EngineError, Result};

/// Coerces a cell to a finite number. Anything else is a missing value.
pub fn coerce_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Cuts the block into maximal runs of non-blank rows.
///
/// A run opens on the first non-blank row after a blank one (or at the start) and closes
/// at the next fully blank row; a run still open at the end of the block is emitted too.
pub fn split_blocks(raw: &RawBlock) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;

    for i in 0..raw.height() {
        if raw.is_blank_row(i) {
            if let Some(s) = start.take() {
                blocks.push(RawBlock::new(raw.rows[s..i].to_vec()));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        blocks.push(RawBlock::new(raw.rows[s..].to_vec()));
    }
    blocks
}

/// Turns one stacked block into a labeled numeric table.
///
/// Column labels come from the header row, row labels from the first column. Columns
/// with a blank header and data rows with a blank label are dropped.
pub fn prepare_table(block: &RawBlock, layout: &SheetLayout, name: &str) -> Result<Table> {
    if block.height() <= layout.header_row_offset {
        return Err(EngineError::LayoutError(format!(
            "table '{}' has {} rows, header expected at offset {}",
            name,
            block.height(),
            layout.header_row_offset
        )));
    }

    let width = block.width();
    let mut kept_columns = Vec::new();
    let mut columns = Vec::new();
    let mut seen = HashSet::new();
    for col in 1..width {
        let header = block.cell(layout.header_row_offset, col);
        if header.is_blank() {
            debug!(table = name, col, "Dropping column with blank header");
            continue;
        }
        let label = periods::resolve_period(header);
        if !seen.insert(label.text.clone()) {
            return Err(EngineError::DuplicateLabel {
                table: name.to_string(),
                axis: "column",
                label: label.text,
            });
        }
        kept_columns.push(col);
        columns.push(label);
    }

    let mut row_labels = Vec::new();
    let mut cells = Vec::new();
    let mut seen = HashSet::new();
    for row in layout.first_data_row_offset..block.height() {
        let label_cell = block.cell(row, 0);
        if label_cell.is_blank() {
            debug!(table = name, row, "Dropping data row with blank label");
            continue;
        }
        let label = label_cell.label_text();
        if !seen.insert(label.clone()) {
            return Err(EngineError::DuplicateLabel {
                table: name.to_string(),
                axis: "row",
                label,
            });
        }
        row_labels.push(label);
        cells.push(kept_columns.iter().map(|&c| coerce_number(block.cell(row, c))).collect());
    }

    let strategy = periods::choose_strategy(&columns);
    debug!(table = name, rows = row_labels.len(), columns = columns.len(), ?strategy, "Prepared table");
    Ok(Table {
        name: name.to_string(),
        row_labels,
        columns,
        cells,
        strategy,
    })
}

/// Extracts the BEL levels, monetary trend and percentage trend tables.
pub fn extract_tables(raw: &RawBlock, layout: &SheetLayout, names: [&str; BEL_TABLE_COUNT]) -> Result<(Table, Table, Table)> {
    let blocks = split_blocks(raw);
    if blocks.len() != BEL_TABLE_COUNT {
        return Err(EngineError::TableCountMismatch {
            sheet: layout.sheet_name.clone(),
            expected: BEL_TABLE_COUNT,
            found: blocks.len(),
        });
    }
    let levels = prepare_table(&blocks[0], layout, names[0])?;
    let monetary = prepare_table(&blocks[1], layout, names[1])?;
    let percentage = prepare_table(&blocks[2], layout, names[2])?;
    Ok((levels, monetary, percentage))
}
