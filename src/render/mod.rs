/// Rendering layer: a backend-independent chart description, its
/// `plotters` rendition, and the file naming/export around it.
pub mod chart;
pub mod export;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use chart::{render_chart, Annotation, ChartSpec, Series, SeriesKind};
pub use export::{export_figure, figure_path, write_series_csv};

/// Image format written by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            other => Err(format!("unsupported output format '{other}' (svg, png)")),
        }
    }
}

/// Canvas and text settings shared by every figure.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub font_family: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        // 30 cm × 10 cm at 100 px per inch
        Self {
            format: OutputFormat::Svg,
            width: 1181,
            height: 394,
            font_family: "sans-serif".to_string(),
        }
    }
}
