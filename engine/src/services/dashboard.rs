// Loads every table the dashboard shows and serves chart views from the cache.
use serde::Serialize;
use shared::models::{AlmTable, Table};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::alm::{load_alm_table, AlmTableExt};
use crate::config::settings::{EngineSettings, BEL_TABLE_COUNT};
use crate::data::cache::SourceCache;
use crate::data::extractor::extract_tables;
use crate::data::filter::PeriodRange;
use crate::data::workbook::WorkbookSource;
use crate::error::{EngineError, Result};
use crate::services::chart_view::ChartView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
pub enum TableKind {
    /// BEL levels
    Bel,
    /// Monetary trend of the BEL variations
    Monetary,
    /// Percentage trend of the BEL variations
    Percentage,
    /// ALM duration metrics
    Alm,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [TableKind::Bel, TableKind::Monetary, TableKind::Percentage, TableKind::Alm];
}

/// Everything derived from one workbook load. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub bel: Table,
    pub monetary_trend: Table,
    pub percentage_trend: Table,
    pub alm: AlmTable,
    pub alm_title: String,
}

impl Dashboard {
    pub fn table(&self, kind: TableKind) -> Table {
        match kind {
            TableKind::Bel => self.bel.clone(),
            TableKind::Monetary => self.monetary_trend.clone(),
            TableKind::Percentage => self.percentage_trend.clone(),
            TableKind::Alm => self.alm.to_table(&self.alm_title),
        }
    }

    pub fn title(&self, kind: TableKind) -> &str {
        match kind {
            TableKind::Bel => &self.bel.name,
            TableKind::Monetary => &self.monetary_trend.name,
            TableKind::Percentage => &self.percentage_trend.name,
            TableKind::Alm => &self.alm_title,
        }
    }
}

/// Reads the BEL and ALM sheets of `path` into a dashboard.
pub fn load_dashboard(path: &Path, settings: &EngineSettings) -> Result<Dashboard> {
    let names = table_names(settings)?;
    // One open handle serves both sheets.
    let mut source = WorkbookSource::open(path)?;

    let bel_raw = source.read_block(&settings.bel.layout)?;
    let (bel, monetary_trend, percentage_trend) = extract_tables(&bel_raw, &settings.bel.layout, names)?;

    let alm_raw = source.read_block(&settings.alm.layout)?;
    let alm = load_alm_table(&alm_raw, &settings.alm.layout, &settings.alm.fields)?;

    info!(
        path = %path.display(),
        bel_rows = bel.row_labels.len(),
        periods = bel.columns.len(),
        alm_rows = alm.len(),
        "Loaded dashboard tables"
    );
    Ok(Dashboard {
        bel,
        monetary_trend,
        percentage_trend,
        alm,
        alm_title: settings.alm.title.clone(),
    })
}

fn table_names(settings: &EngineSettings) -> Result<[&str; BEL_TABLE_COUNT]> {
    let title = |i: usize| {
        settings
            .bel
            .tables
            .get(i)
            .map(|t| t.title.as_str())
            .ok_or_else(|| EngineError::ConfigError(format!("missing BEL table entry {}", i + 1)))
    };
    Ok([title(0)?, title(1)?, title(2)?])
}

/// Entry point used by the CLI and the GUI: settings plus the file-keyed cache.
pub struct DashboardService {
    settings: EngineSettings,
    cache: SourceCache<Dashboard>,
}

impl DashboardService {
    pub fn new(settings: EngineSettings) -> Self {
        DashboardService {
            settings,
            cache: SourceCache::new(),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn dashboard(&mut self, path: &Path) -> Result<Arc<Dashboard>> {
        let settings = &self.settings;
        self.cache.get_or_load(path, |p| load_dashboard(p, settings))
    }

    /// Drops the cached load for `path` and reads the workbook again.
    pub fn reload(&mut self, path: &Path) -> Result<Arc<Dashboard>> {
        // A reload also switches workbooks in the GUI; earlier sources are not coming back.
        self.cache.retain_only(path);
        self.cache.invalidate(path);
        self.dashboard(path)
    }

    pub fn cached_sources(&self) -> usize {
        self.cache.len()
    }

    /// Metric presets configured for a table, limited to the labels it actually has.
    pub fn default_rows(&self, kind: TableKind, table: &Table) -> Vec<String> {
        let preset: Vec<String> = match kind {
            TableKind::Bel => self.settings.bel.tables.first().map(|t| t.default_rows.clone()),
            TableKind::Monetary => self.settings.bel.tables.get(1).map(|t| t.default_rows.clone()),
            TableKind::Percentage => self.settings.bel.tables.get(2).map(|t| t.default_rows.clone()),
            TableKind::Alm => None,
        }
        .unwrap_or_default();

        if preset.is_empty() {
            return table.row_labels.clone();
        }
        preset.into_iter().filter(|r| table.row_index(r).is_some()).collect()
    }

    pub fn chart(&mut self, path: &Path, kind: TableKind, rows: &[String], range: &PeriodRange) -> Result<ChartView> {
        // Served from the cache unless the workbook changed on disk.
        let dashboard = self.dashboard(path)?;
        let table = dashboard.table(kind);
        ChartView::build(dashboard.title(kind), &table, rows, range)
    }
}
