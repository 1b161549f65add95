// Engine configuration: sheet layouts, table titles and metric presets.
pub mod settings;

pub use settings::{AlmFields, AlmSettings, BelSettings, ColumnRange, EngineSettings, SheetLayout, TableSettings};
