// Dashboard loading, chart views and form selections consumed by the CLI and the GUI.
pub mod chart_view;
pub mod dashboard;
pub mod selection;

pub use chart_view::{ChartView, Series, NO_DATA_MESSAGE};
pub use dashboard::{load_dashboard, Dashboard, DashboardService, TableKind};
