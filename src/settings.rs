//! Run configuration.
//!
//! Settings are read from a TOML file and can be overridden with environment variables prefixed
//! with `PAPERBOT`, using `__` between section and key, e.g. `PAPERBOT_SIMULATION__DT=0.0001`.

use std::path::PathBuf;

use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{Angle, DomainError, Environment, Position, RobotConfig, RobotState};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const ENV_PREFIX: &str = "PAPERBOT";

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Settings {
    pub environment: EnvironmentSettings,
    pub robot: RobotSettings,
    pub simulation: SimulationSettings,
    pub files: FileSettings,
    /// Print terminal charts of the trajectories.
    #[serde(default)]
    pub plot: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct EnvironmentSettings {
    pub length: f64,
    pub width: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RobotSettings {
    pub track_width: f64,
    pub wheel_diameter: f64,
    pub x0: f64,
    pub y0: f64,
    /// Initial heading in radians.
    pub theta0: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SimulationSettings {
    /// Integration time step in seconds.
    pub dt: f64,
    /// Time between two command keyframes in seconds.
    pub keyframe_interval: f64,
    pub sample_every: usize,
    /// Raw keyframe values are divided by this to obtain duty values.
    pub pwm_scale: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct FileSettings {
    pub commands: PathBuf,
    /// Where to write the simulated trajectory.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Recorded trajectory to compare against.
    #[serde(default)]
    pub ground_truth: Option<PathBuf>,
}

impl Settings {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        Self::load_with_overrides(path, environment_overrides())
    }

    fn load_with_overrides(
        path: &str,
        overrides: config::Environment,
    ) -> Result<Self, ConfigError> {
        info!("Attempting to load configuration from {}", path);

        let settings = Config::builder()
            .add_source(File::new(path, FileFormat::Toml).required(true))
            .add_source(overrides)
            .build()
            .and_then(|config| config.try_deserialize::<Settings>());

        match settings {
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

    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn environment(&self) -> Result<Environment, DomainError> {
        Environment::new(self.environment.length, self.environment.width)
    }

    pub fn robot(&self) -> Result<RobotState, DomainError> {
        RobotState::new(
            self.environment()?,
            RobotConfig::new(self.robot.track_width, self.robot.wheel_diameter),
            Position::new(self.robot.x0, self.robot.y0),
            Angle::new(self.robot.theta0),
        )
    }
}

/// `PAPERBOT_<SECTION>__<KEY>` variables.
fn environment_overrides() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
