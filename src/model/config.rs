use serde::{Deserialize, Serialize};

use super::chapter::DEFAULT_PLOT;

/// Configuration from `plotline.toml` in the chapter directory.
/// Every section is optional; a missing file means all defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub timeline: LayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// File extension of chapter files, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            extension: default_extension(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Plot used for chapters without an `@plot:` value.
    #[serde(default = "default_plot")]
    pub default_plot: String,
    /// Give each comma-separated thread its own lane.
    #[serde(default)]
    pub split_threads: bool,
    /// Width of the bar area in `pl timeline`, in cells.
    #[serde(default = "default_width")]
    pub width: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            default_plot: default_plot(),
            split_threads: false,
            width: default_width(),
        }
    }
}

fn default_extension() -> String {
    "nwd".to_string()
}

fn default_plot() -> String {
    DEFAULT_PLOT.to_string()
}

fn default_width() -> usize {
    60
}
