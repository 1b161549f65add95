// Workbook reading and table shaping.
pub mod cache;
pub mod extractor;
pub mod filter;
pub mod periods;
pub mod tidy;
pub mod workbook;

pub use extractor::{extract_tables, prepare_table, split_blocks};
pub use filter::{filter_table, PeriodRange};
pub use tidy::melt;
