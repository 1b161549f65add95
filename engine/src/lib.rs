// Engine library root: workbook extraction, period filtering and ALM metrics.

pub mod alm;
pub mod config;
pub mod data;
pub mod error;
pub mod services;

pub use error::{EngineError, Result};
