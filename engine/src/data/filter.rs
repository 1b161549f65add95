// Row/period slicing of extracted tables.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::models::{RangeStrategy, Table};

use crate::error::{EngineError, Result};

/// Closed interval on a table's period axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodRange {
    All,
    Dates { start: NaiveDate, end: NaiveDate },
    /// Endpoints by label; everything between their positions, inclusive.
    Labels { start: String, end: String },
}

impl PeriodRange {
    /// The full extent of `table`, in the form its strategy calls for.
    pub fn full(table: &Table) -> PeriodRange {
        match (table.strategy, table.date_bounds()) {
            (RangeStrategy::Dates, Some((start, end))) => PeriodRange::Dates { start, end },
            _ => match (table.columns.first(), table.columns.last()) {
                (Some(first), Some(last)) => PeriodRange::Labels {
                    start: first.text.clone(),
                    end: last.text.clone(),
                },
                _ => PeriodRange::All,
            },
        }
    }
}

/// Column indices of `table` that fall in `range`, in table order.
pub fn select_columns(table: &Table, range: &PeriodRange) -> Result<Vec<usize>> {
    match range {
        PeriodRange::All => Ok((0..table.columns.len()).collect()),
        PeriodRange::Dates { start, end } => {
            if table.strategy != RangeStrategy::Dates {
                return Err(EngineError::RangeError(format!(
                    "table '{}' has non-date period labels; select a range by label",
                    table.name
                )));
            }
            let (lo, hi) = if start <= end { (*start, *end) } else { (*end, *start) };
            Ok(table
                .columns
                .iter()
                .enumerate()
                .filter(|(_, c)| c.date.map_or(false, |d| d >= lo && d <= hi))
                .map(|(i, _)| i)
                .collect())
        }
        PeriodRange::Labels { start, end } => {
            let position = |label: &str| {
                table.column_index(label).ok_or_else(|| {
                    EngineError::RangeError(format!("period '{}' not found in table '{}'", label, table.name))
                })
            };
            let (a, b) = (position(start)?, position(end)?);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            Ok((lo..=hi).collect())
        }
    }
}

/// Sub-table of the selected rows and the periods inside `range`.
///
/// Rows keep the table's order whatever the selection order; labels the table does not
/// contain are ignored. An empty selection gives an empty table, never an error.
pub fn filter_table(table: &Table, rows: &[String], range: &PeriodRange) -> Result<Table> {
    let columns = select_columns(table, range)?;
    let row_indices: Vec<usize> = table
        .row_labels
        .iter()
        .enumerate()
        .filter(|(_, label)| rows.iter().any(|r| r == *label))
        .map(|(i, _)| i)
        .collect();

    Ok(Table {
        name: table.name.clone(),
        row_labels: row_indices.iter().map(|&r| table.row_labels[r].clone()).collect(),
        columns: columns.iter().map(|&c| table.columns[c].clone()).collect(),
        cells: row_indices
            .iter()
            .map(|&r| columns.iter().map(|&c| table.cells[r][c]).collect())
            .collect(),
        strategy: table.strategy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::PeriodLabel;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dated_table() -> Table {
        Table {
            name: "BEL".to_string(),
            row_labels: vec!["BEL Undiscounted".into(), "BEL Discounted".into(), "BEL IR UP".into()],
            columns: vec![
                PeriodLabel::new("Dec '24", Some(ymd(2024, 12, 31))),
                PeriodLabel::new("Jan '25", Some(ymd(2025, 1, 31))),
                PeriodLabel::new("Feb '25", Some(ymd(2025, 2, 28))),
                PeriodLabel::new("Mar '25", Some(ymd(2025, 3, 31))),
            ],
            cells: vec![
                vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
                vec![Some(5.0), None, Some(7.0), Some(8.0)],
                vec![Some(9.0), Some(10.0), Some(11.0), Some(12.0)],
            ],
            strategy: RangeStrategy::Dates,
        }
    }

    fn ordinal_table() -> Table {
        let mut table = dated_table();
        table.columns = ["Q1", "Q2", "Q3", "YE"].iter().map(|s| PeriodLabel::new(*s, None)).collect();
        table.strategy = RangeStrategy::Positions;
        table
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_by_dates() {
        let table = dated_table();
        let range = PeriodRange::Dates { start: ymd(2025, 1, 1), end: ymd(2025, 2, 28) };
        let out = filter_table(&table, &labels(&["BEL Discounted"]), &range).unwrap();
        assert_eq!(out.row_labels, labels(&["BEL Discounted"]));
        assert_eq!(out.column_texts(), labels(&["Jan '25", "Feb '25"]));
        assert_eq!(out.cells, vec![vec![None, Some(7.0)]]);
        assert_eq!(out.strategy, RangeStrategy::Dates);
    }

    #[test]
    fn test_reversed_dates_give_same_table() {
        let table = dated_table();
        let rows = labels(&["BEL IR UP", "BEL Undiscounted"]);
        let forward = PeriodRange::Dates { start: ymd(2024, 12, 31), end: ymd(2025, 2, 1) };
        let backward = PeriodRange::Dates { start: ymd(2025, 2, 1), end: ymd(2024, 12, 31) };
        assert_eq!(
            filter_table(&table, &rows, &forward).unwrap(),
            filter_table(&table, &rows, &backward).unwrap()
        );
    }

    #[test]
    fn test_reversed_labels_give_same_table() {
        let table = ordinal_table();
        let rows = labels(&["BEL Discounted"]);
        let forward = PeriodRange::Labels { start: "Q2".into(), end: "YE".into() };
        let backward = PeriodRange::Labels { start: "YE".into(), end: "Q2".into() };
        let out = filter_table(&table, &rows, &forward).unwrap();
        assert_eq!(out.column_texts(), labels(&["Q2", "Q3", "YE"]));
        assert_eq!(out, filter_table(&table, &rows, &backward).unwrap());
    }

    #[test]
    fn test_row_order_follows_table() {
        let table = dated_table();
        let out = filter_table(&table, &labels(&["BEL IR UP", "BEL Undiscounted", "unknown"]), &PeriodRange::All).unwrap();
        assert_eq!(out.row_labels, labels(&["BEL Undiscounted", "BEL IR UP"]));
        assert_eq!(out.cells[1], vec![Some(9.0), Some(10.0), Some(11.0), Some(12.0)]);
    }

    #[test]
    fn test_empty_selection_is_empty_table() {
        let table = dated_table();
        let out = filter_table(&table, &[], &PeriodRange::All).unwrap();
        assert!(out.is_empty());

        let range = PeriodRange::Dates { start: ymd(2030, 1, 1), end: ymd(2030, 12, 31) };
        let out = filter_table(&table, &labels(&["BEL IR UP"]), &range).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.row_labels.len(), 1);
        assert!(out.cells[0].is_empty());
    }

    #[test]
    fn test_date_range_on_ordinal_table_is_error() {
        let range = PeriodRange::Dates { start: ymd(2025, 1, 1), end: ymd(2025, 2, 28) };
        let err = filter_table(&ordinal_table(), &labels(&["BEL IR UP"]), &range).unwrap_err();
        assert!(matches!(err, EngineError::RangeError(_)));
    }

    #[test]
    fn test_unknown_label_is_error() {
        let range = PeriodRange::Labels { start: "Q1".into(), end: "H2".into() };
        assert!(filter_table(&ordinal_table(), &[], &range).is_err());
    }

    #[test]
    fn test_labels_work_on_dated_table() {
        let range = PeriodRange::Labels { start: "Mar '25".into(), end: "Jan '25".into() };
        let out = filter_table(&dated_table(), &labels(&["BEL IR UP"]), &range).unwrap();
        assert_eq!(out.cells, vec![vec![Some(10.0), Some(11.0), Some(12.0)]]);
    }

    #[test]
    fn test_full_range() {
        assert_eq!(
            PeriodRange::full(&dated_table()),
            PeriodRange::Dates { start: ymd(2024, 12, 31), end: ymd(2025, 3, 31) }
        );
        assert_eq!(
            PeriodRange::full(&ordinal_table()),
            PeriodRange::Labels { start: "Q1".into(), end: "YE".into() }
        );
        assert_eq!(PeriodRange::full(&Table::empty("x", RangeStrategy::Positions)), PeriodRange::All);
    }
}
