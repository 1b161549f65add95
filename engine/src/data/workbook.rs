// Reads worksheet ranges through calamine into raw cell blocks.
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use shared::models::{CellValue, RawBlock};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

use crate::config::settings::SheetLayout;
use crate::data::periods;
use crate::error::{EngineError, Result};

pub struct WorkbookSource {
    workbook: Sheets<BufReader<File>>,
    sheet_names: Vec<String>,
}

impl WorkbookSource {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(EngineError::IoError {
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("workbook '{}' does not exist", path.display()),
                ),
            });
        }
        let workbook = open_workbook_auto(path)?;
        let sheet_names = workbook.sheet_names().to_owned();
        info!(path = %path.display(), sheets = sheet_names.len(), "Opened workbook");
        Ok(Self { workbook, sheet_names })
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Reads the configured column span of a worksheet, from its first used row.
    pub fn read_block(&mut self, layout: &SheetLayout) -> Result<RawBlock> {
        if !self.sheet_names.iter().any(|s| s == &layout.sheet_name) {
            return Err(EngineError::SheetNotFound(layout.sheet_name.clone()));
        }
        let range = self.workbook.worksheet_range(&layout.sheet_name)?;
        let block = range_to_block(&range, layout);
        debug!(
            sheet = %layout.sheet_name,
            columns = %layout.column_range,
            rows = block.height(),
            "Read worksheet block"
        );
        Ok(block)
    }
}

/// Copies the absolute column span of `layout` out of a calamine range.
pub fn range_to_block(range: &Range<Data>, layout: &SheetLayout) -> RawBlock {
    let (Some((first_row, _)), Some((last_row, _))) = (range.start(), range.end()) else {
        return RawBlock::default();
    };
    let cols = layout.column_range;
    let rows = (first_row..=last_row)
        .map(|r| {
            (cols.first..=cols.last)
                .map(|c| {
                    u32::try_from(c)
                        .ok()
                        .and_then(|c| range.get_value((r, c)))
                        .map(to_cell)
                        .unwrap_or(CellValue::Empty)
                })
                .collect()
        })
        .collect();
    RawBlock::new(rows)
}

pub fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| CellValue::Date(d.date()))
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => periods::parse_date(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::ColumnRange;

    fn layout(first: usize, last: usize) -> SheetLayout {
        SheetLayout {
            sheet_name: "Sheet1".to_string(),
            column_range: ColumnRange { first, last },
            header_row_offset: 0,
            first_data_row_offset: 1,
        }
    }

    #[test]
    fn test_range_to_block_uses_absolute_columns() {
        // Range covering B2:C3
        let mut range: Range<Data> = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), Data::String("Metric".to_string()));
        range.set_value((1, 2), Data::Float(1.5));
        range.set_value((2, 2), Data::Int(3));

        let block = range_to_block(&range, &layout(0, 2));
        assert_eq!(block.height(), 2);
        assert_eq!(block.width(), 3);
        assert_eq!(block.cell(0, 0), &CellValue::Empty);
        assert_eq!(block.cell(0, 1), &CellValue::Text("Metric".to_string()));
        assert_eq!(block.cell(0, 2), &CellValue::Number(1.5));
        assert_eq!(block.cell(1, 2), &CellValue::Number(3.0));
    }

    #[test]
    fn test_range_to_block_outside_span_is_empty() {
        let mut range: Range<Data> = Range::new((0, 0), (0, 0));
        range.set_value((0, 0), Data::Float(1.0));
        let block = range_to_block(&range, &layout(3, 4));
        assert_eq!(block.height(), 1);
        assert!(block.is_blank_row(0));
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        assert_eq!(range_to_block(&range, &layout(0, 3)), RawBlock::default());
    }

    #[test]
    fn test_to_cell_maps_errors_to_empty() {
        assert_eq!(to_cell(&Data::Error(calamine::CellErrorType::Div0)), CellValue::Empty);
        assert_eq!(
            to_cell(&Data::DateTimeIso("2025-01-31T00:00:00".to_string())),
            CellValue::Date(chrono::NaiveDate::from_ymd_opt(2025, 1, 31).unwrap())
        );
    }

    #[test]
    fn test_open_missing_workbook() {
        let err = WorkbookSource::open(Path::new("/nonexistent/summary.xlsx")).err().unwrap();
        assert!(matches!(err, EngineError::IoError { .. }));
    }
}
