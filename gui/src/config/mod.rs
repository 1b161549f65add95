// GUI configuration module
pub mod theme;

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Mirrors assets/config/default.json.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub version: String,
    pub app: AppSettings,
    pub chart: ChartConfig,
    pub series_colors: Vec<String>,
    #[serde(default)]
    pub alm_styles: HashMap<String, LineStyle>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppSettings {
    pub title: String,
    pub theme: String, // "dark" or "light"
    pub window_width: u32,
    pub window_height: u32,
    pub decimals: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub line_width: f64,
    pub point_radius: f64,
    pub y_ticks: usize,
    pub grid: GridStyle,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GridStyle {
    pub color: String,
    pub enabled: bool,
    pub style: String, // "dashed", "solid"
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LineStyle {
    /// SVG dash pattern; `None` draws a solid line.
    pub dash: Option<String>,
    pub width: f64,
}

impl AppConfig {
    pub fn load_default() -> Result<Self, anyhow::Error> {
        let config_str = include_str!("../../assets/config/default.json");
        let config: AppConfig = serde_json::from_str(config_str)?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, anyhow::Error> {
        let config_str = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Color of the n-th series, cycling through the palette.
    pub fn series_color(&self, index: usize) -> String {
        if self.series_colors.is_empty() {
            return "#1f77b4".to_string();
        }
        self.series_colors[index % self.series_colors.len()].clone()
    }
}
