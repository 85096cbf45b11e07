use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File, FileFormat};
use gridway_planner::{CommandFormat, CostModel, Heading, HeadingCorrection};
use serde::Deserialize;
use tracing::{error, info};

use crate::course::Course;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub course: CourseSettings,
    #[serde(default)]
    pub costs: CostModel,
    #[serde(default)]
    pub planner: PlannerSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseSettings {
    pub side: Course,
    #[serde(default = "default_size")]
    pub size: usize,
    /// Block cells reported by the camera, `[row, col]`.
    #[serde(default)]
    pub blocks: Vec<[usize; 2]>,
    pub start: Option<PoseSetting>,
    pub end: Option<PoseSetting>,
}

fn default_size() -> usize {
    4
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PoseSetting {
    pub row: usize,
    pub col: usize,
    pub heading: Heading,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    pub parallel: bool,
    pub deadline_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub path: PathBuf,
    #[serde(default)]
    pub in_cross_straight: bool,
    #[serde(default)]
    pub mark_waypoints: bool,
    #[serde(default)]
    pub heading_correction: Option<HeadingCorrection>,
}

impl OutputSettings {
    pub fn format(&self) -> CommandFormat {
        CommandFormat {
            in_cross_straight: self.in_cross_straight,
            mark_waypoints: self.mark_waypoints,
            heading_correction: self.heading_correction,
        }
    }
}

/// Loads `config/default.toml`, then the optional override file, then
/// `GRIDWAY__SECTION__KEY` environment variables.
pub fn load_settings(override_path: Option<&str>) -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

    let mut builder = Config::builder()
        .add_source(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(true));
    if let Some(path) = override_path {
        info!("Layering configuration override from {}", path);
        builder = builder.add_source(File::new(path, FileFormat::Toml).required(true));
    }
    builder = builder.add_source(
        Environment::with_prefix("GRIDWAY")
            .separator("__")
            .try_parsing(true),
    );

    match builder.build().and_then(|c| c.try_deserialize::<Settings>()) {
        Ok(settings) => {
            info!("Successfully loaded configuration: {:?}", settings);
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

/// Parses settings from TOML text, without the default file or environment.
pub fn settings_from_str(toml: &str) -> Result<Settings, ConfigError> {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize()
}
