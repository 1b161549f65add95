// Engine settings, loaded from the embedded default JSON or a user-supplied file
use serde::{Deserialize, Serialize};
use shared::models::AlmField;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

/// Number of stacked tables on the BEL sheet.
pub const BEL_TABLE_COUNT: usize = 3;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EngineSettings {
    pub version: String,
    pub workbook_path: PathBuf,
    pub bel: BelSettings,
    pub alm: AlmSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BelSettings {
    pub layout: SheetLayout,
    /// BEL levels, monetary trend and percentage trend, in sheet order.
    pub tables: Vec<TableSettings>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TableSettings {
    pub title: String,
    #[serde(default)]
    pub default_rows: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AlmSettings {
    pub layout: SheetLayout,
    pub title: String,
    pub fields: AlmFields,
}

/// Sheet column names of the ALM fields.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AlmFields {
    pub duration_asset: String,
    pub duration_liabilities: String,
    pub duration_mismatch: String,
    pub surplus_asset_pct: String,
}

impl AlmFields {
    pub fn column(&self, field: AlmField) -> &str {
        match field {
            AlmField::DurationAsset => &self.duration_asset,
            AlmField::DurationLiabilities => &self.duration_liabilities,
            AlmField::DurationMismatch => &self.duration_mismatch,
            AlmField::SurplusAssetPct => &self.surplus_asset_pct,
        }
    }

    /// Column names in `AlmField::ALL` order.
    pub fn names(&self) -> Vec<String> {
        AlmField::ALL.iter().map(|f| self.column(*f).to_string()).collect()
    }
}

impl Default for AlmFields {
    fn default() -> Self {
        Self {
            duration_asset: AlmField::DurationAsset.default_column().to_string(),
            duration_liabilities: AlmField::DurationLiabilities.default_column().to_string(),
            duration_mismatch: AlmField::DurationMismatch.default_column().to_string(),
            surplus_asset_pct: AlmField::SurplusAssetPct.default_column().to_string(),
        }
    }
}

/// Where a table lives on its worksheet.
///
/// Offsets are relative to the first row of each stacked block: with the defaults the
/// block starts with a title row, the header follows at offset 1 and data at offset 2.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SheetLayout {
    pub sheet_name: String,
    pub column_range: ColumnRange,
    pub header_row_offset: usize,
    pub first_data_row_offset: usize,
}

impl SheetLayout {
    pub fn validate(&self) -> Result<()> {
        if self.first_data_row_offset <= self.header_row_offset {
            return Err(EngineError::ConfigError(format!(
                "sheet '{}': first data row offset ({}) must come after the header row offset ({})",
                self.sheet_name, self.first_data_row_offset, self.header_row_offset
            )));
        }
        Ok(())
    }
}

/// Inclusive, zero-based column span written in spreadsheet letters ("B:N").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnRange {
    pub first: usize,
    pub last: usize,
}

impl ColumnRange {
    pub fn parse(text: &str) -> Result<Self> {
        let (a, b) = match text.split_once(':') {
            Some((a, b)) => (a, b),
            None => (text, text),
        };
        let first = column_index(a)
            .ok_or_else(|| EngineError::ConfigError(format!("invalid column range '{}'", text)))?;
        let last = column_index(b)
            .ok_or_else(|| EngineError::ConfigError(format!("invalid column range '{}'", text)))?;
        if last < first {
            return Err(EngineError::ConfigError(format!(
                "column range '{}' ends before it starts",
                text
            )));
        }
        Ok(Self { first, last })
    }

    pub fn width(&self) -> usize {
        self.last - self.first + 1
    }
}

impl TryFrom<String> for ColumnRange {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        ColumnRange::parse(&value)
    }
}

impl From<ColumnRange> for String {
    fn from(range: ColumnRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", column_letters(self.first), column_letters(self.last))
    }
}

/// "A" -> 0, "Z" -> 25, "AA" -> 26.
pub fn column_index(letters: &str) -> Option<usize> {
    let letters = letters.trim();
    if letters.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        index = index
            .checked_mul(26)?
            .checked_add((ch.to_ascii_uppercase() as u8 - b'A') as usize + 1)?;
    }
    Some(index - 1)
}

pub fn column_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    out.iter().rev().collect()
}

impl EngineSettings {
    pub fn load_default() -> Result<Self> {
        let config_str = include_str!("../../assets/config/default.json");
        Self::from_json(config_str)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_json(&config_str)
    }

    pub fn from_json(config_str: &str) -> Result<Self> {
        let settings: EngineSettings = serde_json::from_str(config_str)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.bel.layout.validate()?;
        self.alm.layout.validate()?;
        if self.bel.tables.len() != BEL_TABLE_COUNT {
            return Err(EngineError::ConfigError(format!(
                "expected {} BEL table entries, found {}",
                BEL_TABLE_COUNT,
                self.bel.tables.len()
            )));
        }
        Ok(())
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        let layout = |sheet: &str, range: (usize, usize), header: usize, data: usize| SheetLayout {
            sheet_name: sheet.to_string(),
            column_range: ColumnRange { first: range.0, last: range.1 },
            header_row_offset: header,
            first_data_row_offset: data,
        };
        let var_rows: Vec<String> = ["Var. BEL Undiscounted", "Var. BEL Discounted", "Var. BEL IR DOWN", "Var. BEL IR UP"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        EngineSettings {
            version: "1.0.0".to_string(),
            workbook_path: PathBuf::from("summary.xlsx"),
            bel: BelSettings {
                layout: layout("Analisi BEL Aggregate", (1, 13), 1, 2),
                tables: vec![
                    TableSettings {
                        title: "BEL".to_string(),
                        default_rows: ["BEL Undiscounted", "BEL Discounted", "BEL IR DOWN", "BEL IR UP"]
                            .iter()
                            .map(|s| s.to_string())
                            .collect(),
                    },
                    TableSettings { title: "Monetary Trend BEL".to_string(), default_rows: var_rows.clone() },
                    TableSettings { title: "% Trend BEL".to_string(), default_rows: var_rows },
                ],
            },
            alm: AlmSettings {
                layout: layout("Analisi ALM", (0, 4), 0, 1),
                title: "Duration Trend".to_string(),
                fields: AlmFields::default(),
            },
        }
    }
}
