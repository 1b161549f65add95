#![allow(non_snake_case)]
use dioxus::prelude::*;
use engine::services::{Dashboard, DashboardService, TableKind};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use crate::components::{AlmPanel, TablePanel, Toolbar};
use crate::state::app_state::AppState;

const BEL_PANELS: [TableKind; 3] = [TableKind::Bel, TableKind::Monetary, TableKind::Percentage];

/// Loads (or, with `fresh`, re-reads) the workbook. Errors become banner text.
fn load(service: &RefCell<DashboardService>, path: &Path, fresh: bool) -> Result<Arc<Dashboard>, String> {
    let mut service = service.borrow_mut();
    let result = if fresh { service.reload(path) } else { service.dashboard(path) };
    result.map_err(|e| {
        tracing::error!(path = %path.display(), malformed = e.is_malformed_layout(), "Failed to load workbook: {}", e);
        format!("Could not load '{}': {}", path.display(), e)
    })
}

#[component]
pub fn App() -> Element {
    let state = use_context::<AppState>();
    let service = use_hook(|| Rc::new(RefCell::new(DashboardService::new(state.engine_settings.clone()))));
    let mut workbook = use_signal(|| state.workbook.clone());
    let mut generation = use_signal(|| 0u32);
    let mut dashboard = use_signal({
        let service = service.clone();
        let path = state.workbook.clone();
        move || load(&service, &path, false)
    });

    // Reload always re-reads the file, even when the cache thinks it is unchanged.
    let on_reload = {
        let service = service.clone();
        move |path: String| {
            let path = PathBuf::from(path.trim());
            tracing::info!(path = %path.display(), "Reloading workbook");
            dashboard.set(load(&service, &path, true));
            workbook.set(path);
            generation.with_mut(|g| *g += 1);
        }
    };

    let palette = state.palette.clone();
    // Panels keep their picks in local signals; a new key per reload remounts them
    // so presets and ranges are recomputed from the fresh tables.
    let round = generation();
    let workbook_text = workbook.read().display().to_string();
    let loaded = dashboard.read().clone();

    rsx! {
        div { style: "background: {palette.background}; min-height: 100vh; padding: 12px 20px; font-family: sans-serif;",
            h1 { style: "color: {palette.foreground}; margin: 0 0 4px 0;", "{state.config.app.title}" }
            Toolbar { key: "{round}", workbook: workbook_text, on_reload }
            {match loaded {
                Err(message) => rsx! {
                    div { class: "error-banner",
                        style: "background: {palette.error}; color: white; padding: 10px; border-radius: 4px;",
                        "{message}"
                    }
                },
                Ok(data) => {
                    let panels: Vec<_> = BEL_PANELS
                        .iter()
                        .map(|kind| {
                            let table = data.table(*kind);
                            let defaults = service.borrow().default_rows(*kind, &table);
                            let title = data.title(*kind).to_string();
                            (format!("{}-{}", round, title), *kind, title, table, defaults)
                        })
                        .collect();
                    rsx! {
                        for (panel_key, kind, title, table, defaults) in panels {
                            TablePanel { key: "{panel_key}", kind, title, table, defaults }
                        }
                        AlmPanel { key: "{round}-alm", title: data.alm_title.clone(), alm: data.alm.clone() }
                    }
                }
            }}
        }
    }
}
