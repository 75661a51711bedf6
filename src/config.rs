use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::clean::YearRange;
use crate::render::RenderConfig;

/// Run settings. Every key is optional in the JSON file; missing keys keep the defaults.
///
/// ```json
/// {
///   "input": "data/crashes.csv",
///   "output": "overview.svg",
///   "year_min": 2018,
///   "year_max": 2023
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub year_min: i32,
    pub year_max: i32,
    pub panel_width: u32,
    pub panel_height: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let years = YearRange::default();
        let render = RenderConfig::default();
        Self {
            input: PathBuf::from("EM622_FinalsDataSet_ZengK.csv"),
            output: PathBuf::from("accident_overview.png"),
            year_min: years.min,
            year_max: years.max,
            panel_width: render.panel_width,
            panel_height: render.panel_height,
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.year_min <= self.year_max,
            "year_min {} is after year_max {}",
            self.year_min,
            self.year_max
        );
        ensure!(
            self.panel_width > 0 && self.panel_height > 0,
            "panel size must be non-zero"
        );
        Ok(())
    }

    pub fn years(&self) -> YearRange {
        YearRange {
            min: self.year_min,
            max: self.year_max,
        }
    }

    pub fn render(&self) -> RenderConfig {
        RenderConfig {
            panel_width: self.panel_width,
            panel_height: self.panel_height,
            ..RenderConfig::default()
        }
    }
}
