// Optimal asset duration and the ALM table operations the dashboard needs.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::models::{AlmField, AlmRow, AlmTable, PeriodLabel, RangeStrategy, Table};

/// Asset duration that immunizes the surplus: `D_L * (1 - surplus %)`.
pub fn optimal_asset_duration(duration_liabilities: f64, surplus_asset_pct: f64) -> f64 {
    duration_liabilities * (1.0 - surplus_asset_pct)
}

/// Which ALM row the optimal duration is computed from. Always chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceRow {
    /// Most recent row of the table it is applied to.
    Last,
    Index(usize),
    Date(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationTarget {
    pub date: NaiveDate,
    pub duration_asset: Option<f64>,
    pub duration_liabilities: f64,
    pub surplus_asset_pct: f64,
    pub optimal_asset_duration: f64,
}

impl DurationTarget {
    /// Current asset duration minus the optimal one, when the asset duration is known.
    pub fn gap(&self) -> Option<f64> {
        self.duration_asset.map(|d| d - self.optimal_asset_duration)
    }
}

pub trait AlmRowExt {
    fn optimal_asset_duration(&self) -> Option<f64>;
    fn duration_target(&self) -> Option<DurationTarget>;
}

impl AlmRowExt for AlmRow {
    fn optimal_asset_duration(&self) -> Option<f64> {
        Some(optimal_asset_duration(self.duration_liabilities?, self.surplus_asset_pct?))
    }

    fn duration_target(&self) -> Option<DurationTarget> {
        let duration_liabilities = self.duration_liabilities?;
        let surplus_asset_pct = self.surplus_asset_pct?;
        Some(DurationTarget {
            date: self.date,
            duration_asset: self.duration_asset,
            duration_liabilities,
            surplus_asset_pct,
            optimal_asset_duration: optimal_asset_duration(duration_liabilities, surplus_asset_pct),
        })
    }
}

pub trait AlmTableExt {
    fn reference_row(&self, reference: ReferenceRow) -> Option<&AlmRow>;
    fn filter_dates(&self, start: NaiveDate, end: NaiveDate) -> AlmTable;
    fn to_table(&self, name: &str) -> Table;
}

impl AlmTableExt for AlmTable {
    fn reference_row(&self, reference: ReferenceRow) -> Option<&AlmRow> {
        match reference {
            ReferenceRow::Last => self.rows.last(),
            ReferenceRow::Index(i) => self.rows.get(i),
            ReferenceRow::Date(d) => self.rows.iter().find(|r| r.date == d),
        }
    }

    /// Rows dated within the inclusive interval; reversed endpoints are swapped.
    fn filter_dates(&self, start: NaiveDate, end: NaiveDate) -> AlmTable {
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        AlmTable {
            rows: self.rows.iter().filter(|r| r.date >= lo && r.date <= hi).cloned().collect(),
            field_names: self.field_names.clone(),
        }
    }

    /// Fields as rows and reporting dates as columns, ready for the chart pipeline.
    fn to_table(&self, name: &str) -> Table {
        Table {
            name: name.to_string(),
            row_labels: AlmField::ALL.iter().map(|f| self.field_name(*f)).collect(),
            columns: self
                .rows
                .iter()
                .map(|r| PeriodLabel::new(r.date.format("%Y-%m-%d").to_string(), Some(r.date)))
                .collect(),
            cells: AlmField::ALL
                .iter()
                .map(|f| self.rows.iter().map(|r| r.field(*f)).collect())
                .collect(),
            strategy: RangeStrategy::Dates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(date: NaiveDate, dl: Option<f64>, surplus: Option<f64>) -> AlmRow {
        AlmRow {
            date,
            duration_asset: Some(7.0),
            duration_liabilities: dl,
            duration_mismatch: dl.map(|d| 7.0 - d),
            surplus_asset_pct: surplus,
        }
    }

    fn sample() -> AlmTable {
        AlmTable {
            rows: vec![
                row(ymd(2024, 12, 31), Some(9.0), Some(0.1)),
                row(ymd(2025, 3, 31), Some(10.0), Some(0.2)),
                row(ymd(2025, 6, 30), Some(12.0), None),
            ],
            field_names: Vec::new(),
        }
    }

    #[test]
    fn test_optimal_asset_duration() {
        assert!((optimal_asset_duration(10.0, 0.2) - 8.0).abs() < 1e-12);
        assert_eq!(optimal_asset_duration(5.0, 0.0), 5.0);
    }

    #[test]
    fn test_row_optimal_duration_needs_both_inputs() {
        let table = sample();
        assert!((table.rows[1].optimal_asset_duration().unwrap() - 8.0).abs() < 1e-12);
        assert_eq!(table.rows[2].optimal_asset_duration(), None);
        assert!(table.rows[2].duration_target().is_none());
    }

    #[test]
    fn test_duration_target_gap() {
        let target = sample().rows[1].duration_target().unwrap();
        assert_eq!(target.date, ymd(2025, 3, 31));
        assert!((target.gap().unwrap() - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_reference_row_selection() {
        let table = sample();
        assert_eq!(table.reference_row(ReferenceRow::Last).unwrap().date, ymd(2025, 6, 30));
        assert_eq!(table.reference_row(ReferenceRow::Index(0)).unwrap().date, ymd(2024, 12, 31));
        assert_eq!(
            table.reference_row(ReferenceRow::Date(ymd(2025, 3, 31))).unwrap().duration_liabilities,
            Some(10.0)
        );
        assert!(table.reference_row(ReferenceRow::Index(9)).is_none());
        assert!(AlmTable::default().reference_row(ReferenceRow::Last).is_none());
    }

    #[test]
    fn test_last_row_of_filtered_range() {
        let filtered = sample().filter_dates(ymd(2025, 3, 31), ymd(2024, 12, 1));
        assert_eq!(filtered.len(), 2);
        let reference = filtered.reference_row(ReferenceRow::Last).unwrap();
        assert!((reference.optimal_asset_duration().unwrap() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_to_table() {
        let table = sample().to_table("Duration Trend");
        assert_eq!(table.shape(), (4, 3));
        assert_eq!(table.strategy, RangeStrategy::Dates);
        assert_eq!(table.value("Duration Liabilities", "2025-03-31"), Some(10.0));
        assert_eq!(table.value("Surplus Asset %", "2025-06-30"), None);
    }
}
