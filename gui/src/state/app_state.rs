// Application state handed to the component tree at launch.
use engine::config::EngineSettings;
use std::path::PathBuf;

use crate::config::theme::ThemePalette;
use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub workbook: PathBuf,
    pub engine_settings: EngineSettings,
    pub config: AppConfig,
    pub palette: ThemePalette,
}

impl AppState {
    pub fn new(workbook: PathBuf, engine_settings: EngineSettings, config: AppConfig) -> Self {
        let palette = ThemePalette::for_name(&config.app.theme);
        Self {
            workbook,
            engine_settings,
            config,
            palette,
        }
    }
}
