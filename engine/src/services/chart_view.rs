// Chart-ready slices: filtered table, one series per metric, tidy records.
use serde::Serialize;
use shared::models::{PeriodLabel, RangeStrategy, Table, TidyRecord};

use crate::data::filter::{filter_table, PeriodRange};
use crate::data::tidy::melt;
use crate::error::Result;

pub const NO_DATA_MESSAGE: &str = "No data for this selection";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub title: String,
    pub strategy: RangeStrategy,
    pub periods: Vec<PeriodLabel>,
    pub series: Vec<Series>,
    pub records: Vec<TidyRecord>,
}

impl ChartView {
    /// Filters `table` to the selected metrics and period range and shapes the result.
    pub fn build(title: &str, table: &Table, rows: &[String], range: &PeriodRange) -> Result<Self> {
        let filtered = filter_table(table, rows, range)?;
        Ok(Self::from_table(title, &filtered))
    }

    pub fn from_table(title: &str, table: &Table) -> Self {
        if table.is_empty() {
            return ChartView {
                title: title.to_string(),
                strategy: table.strategy,
                periods: Vec::new(),
                series: Vec::new(),
                records: Vec::new(),
            };
        }
        ChartView {
            title: title.to_string(),
            strategy: table.strategy,
            periods: table.columns.clone(),
            series: table
                .row_labels
                .iter()
                .zip(&table.cells)
                .map(|(name, values)| Series {
                    name: name.clone(),
                    values: values.clone(),
                })
                .collect(),
            records: melt(table),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty() || self.periods.is_empty()
    }

    /// Neutral message shown instead of a chart when the selection is empty.
    pub fn message(&self) -> Option<&'static str> {
        self.is_empty().then_some(NO_DATA_MESSAGE)
    }

    /// Smallest and largest present value across all series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut values = self.series.iter().flat_map(|s| s.values.iter().flatten().copied());
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Every series' value at one period, for the shared hover readout.
    pub fn values_at(&self, period: usize) -> Vec<(&str, Option<f64>)> {
        self.series
            .iter()
            .map(|s| (s.name.as_str(), s.values.get(period).copied().flatten()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table() -> Table {
        Table {
            name: "BEL".to_string(),
            row_labels: vec!["BEL Discounted".into(), "BEL IR UP".into()],
            columns: vec![
                PeriodLabel::new("Jan '25", NaiveDate::from_ymd_opt(2025, 1, 31)),
                PeriodLabel::new("Feb '25", NaiveDate::from_ymd_opt(2025, 2, 28)),
            ],
            cells: vec![vec![Some(100.0), None], vec![Some(-5.0), Some(120.0)]],
            strategy: RangeStrategy::Dates,
        }
    }

    #[test]
    fn test_build_chart_view() {
        let rows = vec!["BEL IR UP".to_string(), "BEL Discounted".to_string()];
        let view = ChartView::build("BEL", &table(), &rows, &PeriodRange::All).unwrap();
        assert_eq!(view.series.len(), 2);
        assert_eq!(view.series[0].name, "BEL Discounted");
        assert_eq!(view.records.len(), 4);
        assert_eq!(view.message(), None);
        assert_eq!(view.value_range(), Some((-5.0, 120.0)));
        assert_eq!(view.values_at(1), vec![("BEL Discounted", None), ("BEL IR UP", Some(120.0))]);
    }

    #[test]
    fn test_empty_selection_shows_message() {
        let view = ChartView::build("BEL", &table(), &[], &PeriodRange::All).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.message(), Some(NO_DATA_MESSAGE));
        assert!(view.records.is_empty());
        assert_eq!(view.value_range(), None);
    }

    #[test]
    fn test_empty_period_range_shows_message() {
        let range = PeriodRange::Dates {
            start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        };
        let view = ChartView::build("BEL", &table(), &["BEL IR UP".to_string()], &range).unwrap();
        assert_eq!(view.message(), Some(NO_DATA_MESSAGE));
    }

    #[test]
    fn test_all_missing_values_have_no_range() {
        let mut t = table();
        t.cells = vec![vec![None, None], vec![None, None]];
        let view = ChartView::from_table("BEL", &t);
        assert!(!view.is_empty());
        assert_eq!(view.value_range(), None);
    }
}
