// Asset-liability management: sheet loading and the duration optimizer.
pub mod duration;
pub mod loader;

pub use duration::{optimal_asset_duration, AlmRowExt, AlmTableExt, DurationTarget, ReferenceRow};
pub use loader::load_alm_table;
