// Loads the ALM sheet: one row per reporting date, four numeric fields.
use chrono::NaiveDate;
use shared::models::{AlmField, AlmRow, AlmTable, CellValue, RawBlock};
use tracing::{debug, warn};

use crate::config::settings::{AlmFields, SheetLayout};
use crate::data::extractor::coerce_number;
use crate::data::periods;
use crate::error::{EngineError, Result};

/// Builds the ALM table from the sheet block.
///
/// The header row sits at `header_row_offset` from the first non-blank row, the first
/// column is the date index and the four fields are located by header name.
pub fn load_alm_table(raw: &RawBlock, layout: &SheetLayout, fields: &AlmFields) -> Result<AlmTable> {
    let Some(top) = (0..raw.height()).find(|&i| !raw.is_blank_row(i)) else {
        return Err(EngineError::LayoutError(format!(
            "worksheet '{}' has no data in columns {}",
            layout.sheet_name, layout.column_range
        )));
    };
    let header_row = top + layout.header_row_offset;
    let first_data_row = top + layout.first_data_row_offset;

    let headers: Vec<String> = (0..raw.width()).map(|c| raw.cell(header_row, c).label_text()).collect();
    // Indexed by `AlmField as usize`.
    let mut positions = [0usize; 4];
    for (slot, field) in positions.iter_mut().zip(AlmField::ALL) {
        let wanted = fields.column(field);
        *slot = headers
            .iter()
            .skip(1)
            .position(|h| h == wanted)
            .map(|p| p + 1)
            .ok_or_else(|| EngineError::MissingColumn {
                sheet: layout.sheet_name.clone(),
                column: wanted.to_string(),
            })?;
    }

    let mut rows = Vec::new();
    for r in first_data_row..raw.height() {
        if raw.is_blank_row(r) {
            continue;
        }
        let Some(date) = parse_index_date(raw.cell(r, 0)) else {
            warn!(sheet = %layout.sheet_name, row = r, value = ?raw.cell(r, 0), "Skipping ALM row with unparseable date");
            continue;
        };
        let value = |field: AlmField| coerce_number(raw.cell(r, positions[field as usize]));
        let row = AlmRow {
            date,
            duration_asset: value(AlmField::DurationAsset),
            duration_liabilities: value(AlmField::DurationLiabilities),
            duration_mismatch: value(AlmField::DurationMismatch),
            surplus_asset_pct: value(AlmField::SurplusAssetPct),
        };
        if row.is_blank() {
            debug!(sheet = %layout.sheet_name, %date, "Dropping ALM row with no values");
            continue;
        }
        rows.push(row);
    }

    Ok(AlmTable {
        rows,
        field_names: fields.names(),
    })
}

fn parse_index_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(d) => Some(*d),
        CellValue::Text(s) => periods::parse_date(s).or_else(|| periods::parse_month_token(s)),
        _ => None,
    }
}
