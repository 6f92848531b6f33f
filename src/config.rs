use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FigureError, Result};
use crate::fuel::{EstimatorSettings, FUEL_DENSITY_KG_PER_L};
use crate::render::{OutputFormat, RenderSettings};

/// Top-level configuration, read from a JSON file.
/// Every field is optional; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Root directory for figure output; each figure gets a subdirectory.
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Canvas size in pixels.
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    /// Fuel density for volume reporting [kg/l].
    pub fuel_density_kg_per_l: f64,
    pub estimator: EstimatorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Relative-change stopping threshold; `null` runs `max_iterations` steps.
    pub tolerance: Option<f64>,
    pub max_iterations: usize,
}

impl Default for FigureConfig {
    fn default() -> Self {
        let render = RenderSettings::default();
        Self {
            output_dir: PathBuf::from("figures"),
            format: render.format,
            width: render.width,
            height: render.height,
            font_family: render.font_family,
            fuel_density_kg_per_l: FUEL_DENSITY_KG_PER_L,
            estimator: EstimatorConfig::default(),
        }
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        let settings = EstimatorSettings::default();
        Self {
            tolerance: settings.tolerance,
            max_iterations: settings.max_iterations,
        }
    }
}

impl FigureConfig {
    /// Read a config file; `None` yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let text = std::fs::read_to_string(p).map_err(|source| FigureError::ConfigRead {
                    path: p.to_path_buf(),
                    source,
                })?;
                let config: FigureConfig = serde_json::from_str(&text).map_err(|source| FigureError::ConfigParse {
                    path: p.to_path_buf(),
                    source,
                })?;
                log::info!("loaded config from {}", p.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            format: self.format,
            width: self.width,
            height: self.height,
            font_family: self.font_family.clone(),
        }
    }

    pub fn estimator_settings(&self) -> EstimatorSettings {
        EstimatorSettings {
            tolerance: self.estimator.tolerance,
            max_iterations: self.estimator.max_iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg: FigureConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, FigureConfig::default());
        assert_eq!(cfg.estimator.max_iterations, 50);
    }

    #[test]
    fn partial_override() {
        let cfg: FigureConfig = serde_json::from_str(
            r#"{ "format": "png", "estimator": { "tolerance": null, "max_iterations": 10 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.format, OutputFormat::Png);
        assert_eq!(cfg.estimator_settings(), EstimatorSettings::fixed(10));
        assert_eq!(cfg.width, RenderSettings::default().width);
    }

    #[test]
    fn round_trips_through_json() {
        let cfg = FigureConfig::default();
        let text = serde_json::to_string(&cfg).unwrap();
        let back: FigureConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(FigureConfig::load(None).unwrap(), FigureConfig::default());
    }

    #[test]
    fn bad_file_names_the_path_once() {
        let path = std::env::temp_dir().join(format!("aviation_figures_bad_config_{}.json", std::process::id()));
        std::fs::write(&path, "{ \"width\": \"wide\" }").unwrap();

        let err = FigureConfig::load(Some(&path)).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, FigureError::ConfigParse { .. }));
        let top = err.to_string();
        assert!(top.contains(&path.display().to_string()), "{top}");
        let cause = std::error::Error::source(&err).unwrap().to_string();
        assert!(cause.contains("invalid type"), "{cause}");
        assert!(!top.contains(&cause));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = std::path::Path::new("no/such/config.json");
        let err = FigureConfig::load(Some(path)).unwrap_err();
        assert!(matches!(err, FigureError::ConfigRead { .. }));
        assert!(err.to_string().contains("config.json"));
    }
}
