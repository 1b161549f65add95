use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Workbook error: {source}")]
    WorkbookError {
        #[from]
        source: calamine::Error,
    },

    #[error("Worksheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("Column '{column}' not found in worksheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    #[error("Expected {expected} stacked tables in worksheet '{sheet}', found {found}")]
    TableCountMismatch {
        sheet: String,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate {axis} label '{label}' in table '{table}'")]
    DuplicateLabel {
        table: String,
        axis: &'static str,
        label: String,
    },

    #[error("Layout error: {0}")]
    LayoutError(String),

    #[error("Range error: {0}")]
    RangeError(String),

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("CSV output error: {source}")]
    CsvError {
        #[from]
        source: csv::Error,
    },
}

impl EngineError {
    /// Errors caused by a workbook whose layout does not match the configured one.
    /// These abort the whole load; nothing partial is rendered.
    pub fn is_malformed_layout(&self) -> bool {
        matches!(
            self,
            EngineError::SheetNotFound(_)
                | EngineError::MissingColumn { .. }
                | EngineError::TableCountMismatch { .. }
                | EngineError::DuplicateLabel { .. }
                | EngineError::LayoutError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
