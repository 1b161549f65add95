// Dashboard selections: form input values turned into ranges, metric sets and reference rows.
use chrono::NaiveDate;
use shared::models::{AlmTable, Table};

use crate::alm::ReferenceRow;
use crate::data::filter::PeriodRange;

/// Format of date inputs and of the ALM reference options.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_input_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn date_input_value(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

/// Period range from two inputs. Unparseable or blank inputs fall back to the table bounds.
pub fn range_from_inputs(table: &Table, start: &str, end: &str) -> PeriodRange {
    match PeriodRange::full(table) {
        PeriodRange::Dates { start: first, end: last } => PeriodRange::Dates {
            start: parse_input_date(start).unwrap_or(first),
            end: parse_input_date(end).unwrap_or(last),
        },
        PeriodRange::Labels { start: first, end: last } => PeriodRange::Labels {
            start: if table.column_index(start).is_some() { start.to_string() } else { first },
            end: if table.column_index(end).is_some() { end.to_string() } else { last },
        },
        PeriodRange::All => PeriodRange::All,
    }
}

/// Initial input values: the table's full extent.
pub fn initial_bounds(table: &Table) -> (String, String) {
    match PeriodRange::full(table) {
        PeriodRange::Dates { start, end } => (date_input_value(Some(start)), date_input_value(Some(end))),
        PeriodRange::Labels { start, end } => (start, end),
        PeriodRange::All => (String::new(), String::new()),
    }
}

/// Toggles `label` in `selected`, keeping the table's row order.
pub fn toggle_metric(table: &Table, selected: &[String], label: &str) -> Vec<String> {
    let on = !selected.iter().any(|s| s == label);
    table
        .row_labels
        .iter()
        .filter(|r| if r.as_str() == label { on } else { selected.contains(r) })
        .cloned()
        .collect()
}

/// Row the optimal duration is read from. The choice is a reporting date so it
/// survives changes to the date range; once it leaves the range the last row is used.
pub fn reference_for(filtered: &AlmTable, choice: Option<NaiveDate>) -> ReferenceRow {
    match choice {
        Some(date) if filtered.rows.iter().any(|r| r.date == date) => ReferenceRow::Date(date),
        _ => ReferenceRow::Last,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alm::AlmTableExt;
    use shared::models::{AlmRow, PeriodLabel, RangeStrategy};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(strategy: RangeStrategy) -> Table {
        let dated = strategy == RangeStrategy::Dates;
        Table {
            name: "BEL".into(),
            row_labels: vec!["A".into(), "B".into(), "C".into()],
            columns: vec![
                PeriodLabel::new("Jan '25", dated.then(|| ymd(2025, 1, 31))),
                PeriodLabel::new("Feb '25", dated.then(|| ymd(2025, 2, 28))),
            ],
            cells: vec![vec![Some(1.0), Some(2.0)]; 3],
            strategy,
        }
    }

    fn alm() -> AlmTable {
        let row = |d: NaiveDate, dl: f64| AlmRow {
            date: d,
            duration_asset: None,
            duration_liabilities: Some(dl),
            duration_mismatch: None,
            surplus_asset_pct: Some(0.2),
        };
        AlmTable {
            rows: vec![
                row(ymd(2024, 12, 31), 9.0),
                row(ymd(2025, 3, 31), 10.0),
                row(ymd(2025, 6, 30), 11.0),
            ],
            field_names: Vec::new(),
        }
    }

    #[test]
    fn test_toggle_metric_keeps_table_order() {
        let t = table(RangeStrategy::Dates);
        assert_eq!(toggle_metric(&t, &["C".to_string()], "A"), vec!["A", "C"]);
        assert_eq!(toggle_metric(&t, &["A".to_string(), "C".to_string()], "A"), vec!["C"]);
    }

    #[test]
    fn test_range_from_date_inputs() {
        let t = table(RangeStrategy::Dates);
        let range = range_from_inputs(&t, "2025-02-01", "");
        assert_eq!(range, PeriodRange::Dates { start: ymd(2025, 2, 1), end: ymd(2025, 2, 28) });
    }

    #[test]
    fn test_range_from_label_inputs() {
        let t = table(RangeStrategy::Positions);
        let range = range_from_inputs(&t, "Feb '25", "nope");
        assert_eq!(range, PeriodRange::Labels { start: "Feb '25".into(), end: "Feb '25".into() });
        assert_eq!(initial_bounds(&t), ("Jan '25".to_string(), "Feb '25".to_string()));
    }

    #[test]
    fn test_reference_defaults_to_last_row() {
        assert_eq!(reference_for(&alm(), None), ReferenceRow::Last);
        let last = alm().reference_row(reference_for(&alm(), None)).map(|r| r.date);
        assert_eq!(last, Some(ymd(2025, 6, 30)));
    }

    #[test]
    fn test_chosen_reference_keeps_its_date_when_range_narrows() {
        let full = alm();
        let chosen = ymd(2025, 3, 31);
        assert_eq!(full.reference_row(reference_for(&full, Some(chosen))).map(|r| r.date), Some(chosen));

        // The chosen row moves from position 1 to position 0 but stays the same date.
        let narrowed = full.filter_dates(ymd(2025, 1, 1), ymd(2025, 12, 31));
        let row = narrowed.reference_row(reference_for(&narrowed, Some(chosen))).unwrap();
        assert_eq!(row.date, chosen);
        assert_eq!(row.duration_liabilities, Some(10.0));
    }

    #[test]
    fn test_chosen_reference_outside_range_falls_back_to_last() {
        let narrowed = alm().filter_dates(ymd(2025, 1, 1), ymd(2025, 12, 31));
        let reference = reference_for(&narrowed, Some(ymd(2024, 12, 31)));
        assert_eq!(reference, ReferenceRow::Last);
        assert_eq!(narrowed.reference_row(reference).map(|r| r.date), Some(ymd(2025, 6, 30)));
    }

    #[test]
    fn test_date_input_round_trip() {
        assert_eq!(parse_input_date(" 2025-03-31 "), Some(ymd(2025, 3, 31)));
        assert_eq!(parse_input_date("31/03/2025"), None);
        assert_eq!(date_input_value(None), "");
    }
}
