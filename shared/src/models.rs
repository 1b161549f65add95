use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One spreadsheet cell as read from the workbook, before any coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Bool(bool),
}

impl CellValue {
    /// Empty cells and whitespace-only text count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text used when the cell acts as a row or column label.
    pub fn label_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

/// Rectangular grid of cells cut from one worksheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawBlock {
    pub rows: Vec<Vec<CellValue>>,
}

impl RawBlock {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_blank_row(&self, index: usize) -> bool {
        self.rows
            .get(index)
            .map_or(true, |row| row.iter().all(CellValue::is_blank))
    }

    /// Cell at (row, col); positions past a short row read as `Empty`.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(&EMPTY)
    }
}

/// How a table's period axis is sliced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeStrategy {
    /// Every column resolved to a calendar date; filter by date interval.
    Dates,
    /// At least one column is an opaque token; filter by position between two labels.
    Positions,
}

/// Column label of a table, resolved once at load time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodLabel {
    pub text: String,
    pub date: Option<NaiveDate>,
}

impl PeriodLabel {
    pub fn new(text: impl Into<String>, date: Option<NaiveDate>) -> Self {
        Self { text: text.into(), date }
    }
}

/// Metrics (rows) by periods (columns). `None` marks a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub row_labels: Vec<String>,
    pub columns: Vec<PeriodLabel>,
    pub cells: Vec<Vec<Option<f64>>>,
    pub strategy: RangeStrategy,
}

impl Table {
    pub fn empty(name: impl Into<String>, strategy: RangeStrategy) -> Self {
        Self {
            name: name.into(),
            row_labels: Vec::new(),
            columns: Vec::new(),
            cells: Vec::new(),
            strategy,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.row_labels.len(), self.columns.len())
    }

    /// True when there is nothing to plot: no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty() || self.columns.is_empty()
    }

    pub fn row_index(&self, label: &str) -> Option<usize> {
        self.row_labels.iter().position(|l| l == label)
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.text == label)
    }

    pub fn value(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.row_index(row)?;
        let c = self.column_index(column)?;
        self.cells.get(r).and_then(|cells| cells.get(c)).copied().flatten()
    }

    pub fn row_values(&self, row: &str) -> Option<&[Option<f64>]> {
        self.row_index(row).map(|r| self.cells[r].as_slice())
    }

    pub fn column_texts(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.text.clone()).collect()
    }

    /// Earliest and latest resolved dates on the period axis.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.columns.iter().filter_map(|c| c.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}

/// One (period, metric, value) observation of an unpivoted table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidyRecord {
    pub period: String,
    pub period_date: Option<NaiveDate>,
    pub metric: String,
    pub value: Option<f64>,
}

/// The four numeric fields of the ALM sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlmField {
    DurationAsset,
    DurationLiabilities,
    DurationMismatch,
    SurplusAssetPct,
}

impl AlmField {
    pub const ALL: [AlmField; 4] = [
        AlmField::DurationAsset,
        AlmField::DurationLiabilities,
        AlmField::DurationMismatch,
        AlmField::SurplusAssetPct,
    ];

    /// Column header used by the reporting workbook.
    pub fn default_column(self) -> &'static str {
        match self {
            AlmField::DurationAsset => "Duration Asset",
            AlmField::DurationLiabilities => "Duration Liabilities",
            AlmField::DurationMismatch => "Duration Mismatch",
            AlmField::SurplusAssetPct => "Surplus Asset %",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlmRow {
    pub date: NaiveDate,
    pub duration_asset: Option<f64>,
    pub duration_liabilities: Option<f64>,
    pub duration_mismatch: Option<f64>,
    pub surplus_asset_pct: Option<f64>,
}

impl AlmRow {
    pub fn field(&self, field: AlmField) -> Option<f64> {
        match field {
            AlmField::DurationAsset => self.duration_asset,
            AlmField::DurationLiabilities => self.duration_liabilities,
            AlmField::DurationMismatch => self.duration_mismatch,
            AlmField::SurplusAssetPct => self.surplus_asset_pct,
        }
    }

    pub fn is_blank(&self) -> bool {
        AlmField::ALL.iter().all(|f| self.field(*f).is_none())
    }
}

/// ALM metrics indexed by reporting date, in sheet order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlmTable {
    pub rows: Vec<AlmRow>,
    /// Sheet column name per field, in `AlmField::ALL` order.
    pub field_names: Vec<String>,
}

impl AlmTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn field_name(&self, field: AlmField) -> String {
        AlmField::ALL
            .iter()
            .position(|f| *f == field)
            .and_then(|i| self.field_names.get(i).cloned())
            .unwrap_or_else(|| field.default_column().to_string())
    }
}
