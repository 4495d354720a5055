//! Simulation configuration resource.
//!
//! Settings for the headless loop and the default agent limits, loaded
//! from an INI file with safe defaults for every key. Missing files or
//! keys fall back to defaults so a bare checkout runs without any
//! configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [sim]
//! tick_dt = 0.016666
//! time_scale = 1.0
//!
//! [agents]
//! mass = 1.0
//! max_force = 400.0
//! max_speed = 150.0
//! max_turn_rate = 3.14159
//! ```

use bevy_ecs::prelude::Resource;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::components::motion::MotionBody;

/// Default safe values for startup
const DEFAULT_TICK_DT: f32 = 1.0 / 60.0;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_MASS: f32 = 1.0;
const DEFAULT_MAX_FORCE: f32 = 400.0;
const DEFAULT_MAX_SPEED: f32 = 150.0;
const DEFAULT_MAX_TURN_RATE: f32 = std::f32::consts::PI;
const DEFAULT_CONFIG_PATH: &str = "./steerling.ini";

/// Simulation configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct SimConfig {
    /// Fixed timestep of one simulation tick in seconds.
    pub tick_dt: f32,
    /// Initial time scale applied to frame deltas.
    pub time_scale: f32,
    /// Default mass for new agents.
    pub agent_mass: f32,
    /// Default maximum steering force for new agents.
    pub agent_max_force: f32,
    /// Default maximum speed for new agents.
    pub agent_max_speed: f32,
    /// Default maximum turn rate (radians per second) for new agents.
    pub agent_max_turn_rate: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    /// Create a configuration with safe default values.
    pub fn new() -> Self {
        Self {
            tick_dt: DEFAULT_TICK_DT,
            time_scale: DEFAULT_TIME_SCALE,
            agent_mass: DEFAULT_MASS,
            agent_max_force: DEFAULT_MAX_FORCE,
            agent_max_speed: DEFAULT_MAX_SPEED,
            agent_max_turn_rate: DEFAULT_MAX_TURN_RATE,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [sim] section
        if let Some(dt) = config.getfloat("sim", "tick_dt").ok().flatten() {
            self.tick_dt = dt as f32;
        }
        if let Some(scale) = config.getfloat("sim", "time_scale").ok().flatten() {
            self.time_scale = scale as f32;
        }

        // [agents] section
        if let Some(mass) = config.getfloat("agents", "mass").ok().flatten() {
            self.agent_mass = mass as f32;
        }
        if let Some(force) = config.getfloat("agents", "max_force").ok().flatten() {
            self.agent_max_force = force as f32;
        }
        if let Some(speed) = config.getfloat("agents", "max_speed").ok().flatten() {
            self.agent_max_speed = speed as f32;
        }
        if let Some(turn) = config.getfloat("agents", "max_turn_rate").ok().flatten() {
            self.agent_max_turn_rate = turn as f32;
        }

        info!(
            "Loaded config: tick_dt={}, time_scale={}, agent mass={}, max_force={}, max_speed={}, max_turn_rate={}",
            self.tick_dt,
            self.time_scale,
            self.agent_mass,
            self.agent_max_force,
            self.agent_max_speed,
            self.agent_max_turn_rate
        );

        Ok(())
    }

    /// Default motion bundle for agents spawned with the configured limits.
    pub fn default_body(&self) -> MotionBody {
        MotionBody::new(
            self.agent_mass,
            self.agent_max_force,
            self.agent_max_speed,
            self.agent_max_turn_rate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = SimConfig::new();
        assert!(config.tick_dt > 0.0);
        assert!((config.time_scale - 1.0).abs() < 1e-6);
        assert!(config.agent_max_speed > 0.0);
    }

    #[test]
    fn test_default_body_uses_configured_limits() {
        let mut config = SimConfig::new();
        config.agent_mass = 2.0;
        config.agent_max_speed = 75.0;
        let body = config.default_body();
        assert!((body.mass - 2.0).abs() < 1e-6);
        assert!((body.max_speed - 75.0).abs() < 1e-6);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let mut config = SimConfig::with_path("/nonexistent/steerling.ini");
        assert!(config.load_from_file().is_err());
        // Defaults survive the failed load.
        assert!((config.tick_dt - DEFAULT_TICK_DT).abs() < 1e-6);
    }
}
