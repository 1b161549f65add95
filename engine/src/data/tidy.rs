// Unpivot of a metrics-by-periods table into (period, metric, value) records.
use shared::models::{TidyRecord, Table};

/// One record per cell, period-major: every metric of the first period, then the next.
pub fn melt(table: &Table) -> Vec<TidyRecord> {
    let mut records = Vec::with_capacity(table.row_labels.len() * table.columns.len());
    for (c, period) in table.columns.iter().enumerate() {
        for (r, metric) in table.row_labels.iter().enumerate() {
            records.push(TidyRecord {
                period: period.text.clone(),
                period_date: period.date,
                metric: metric.clone(),
                value: table.cells[r][c],
            });
        }
    }
    records
}
