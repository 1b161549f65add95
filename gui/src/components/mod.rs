// GUI components module
pub mod chart;
pub mod panels;
pub mod toolbar;

pub use panels::{AlmPanel, TablePanel};
pub use toolbar::Toolbar;
