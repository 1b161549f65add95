// Theme colors for page chrome and chart axes
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemePalette {
    pub background: String,
    pub panel: String,
    pub foreground: String,
    pub muted: String,
    pub axis: String,
    pub accent: String,
    pub error: String,
}

impl ThemePalette {
    pub fn default_dark() -> Self {
        Self {
            background: "#1e1e1e".to_string(),
            panel: "#252526".to_string(),
            foreground: "#d1d4dc".to_string(),
            muted: "#8a8f98".to_string(),
            axis: "#565656".to_string(),
            accent: "#26a69a".to_string(),
            error: "#ef5350".to_string(),
        }
    }

    pub fn default_light() -> Self {
        Self {
            background: "#f5f6f8".to_string(),
            panel: "#ffffff".to_string(),
            foreground: "#1f2328".to_string(),
            muted: "#6e7781".to_string(),
            axis: "#9aa0a6".to_string(),
            accent: "#007acc".to_string(),
            error: "#d32f2f".to_string(),
        }
    }

    /// Palette for the configured theme name; anything but "dark" is light.
    pub fn for_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("dark") {
            Self::default_dark()
        } else {
            Self::default_light()
        }
    }
}
