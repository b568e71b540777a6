//! Configuration for the swing-up environment
//!
//! Every physical and normalization constant of the task lives here. The
//! defaults describe an 800x800 world measured in pixels: an 800 wide track at
//! height 400, an 80x40 cart and a 160 long pole, under a downward gravity of
//! 1000 px/s².

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use swingup_rl_core::{EnvironmentConfig, RLError, Result};

/// Parameters of one swing-up environment, fixed for its lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingUpConfig {
    /// Open the frame presenter on construction
    pub render_enabled: bool,
    /// Episode length cap
    pub max_steps: usize,
    /// Seed for the environment's generator; entropy when absent
    pub seed: Option<u64>,
    /// Newtons per unit of action
    pub force_scale: f64,
    /// Downward gravity magnitude
    pub gravity: f64,
    /// Fixed simulation increment
    pub dt: f64,
    /// Track spans `0..track_length` horizontally
    pub track_length: f64,
    /// Height of the track line
    pub track_y: f64,
    /// Cart width
    pub cart_width: f64,
    /// Cart height
    pub cart_height: f64,
    /// Cart mass
    pub cart_mass: f64,
    /// Pole mass
    pub pole_mass: f64,
    /// Pole length, pivot to tip
    pub pole_length: f64,
    /// Pole thickness
    pub pole_thickness: f64,
    /// Cart centre at the start of every episode
    pub initial_cart: [f64; 2],
    /// Target position is drawn uniformly from this range
    pub target_range: [f64; 2],
    /// Initial pole direction (radians, pivot to tip) is drawn uniformly from this range
    pub tilt_range: [f64; 2],
    /// Fraction of cart linear velocity kept per step
    pub cart_damping: f64,
    /// Fraction of pole angular velocity kept per step
    pub pole_damping: f64,
    /// Cart velocity that maps to a normalized value of 1
    pub velocity_scale: f64,
    /// Pole angular velocity that maps to a normalized value of 1
    pub angular_velocity_scale: f64,
    /// Output directory of the frame presenter
    pub frame_dir: PathBuf,
    /// Presented frames per second; 0 disables pacing
    pub frame_rate: u32,
}

impl Default for SwingUpConfig {
    fn default() -> Self {
        Self {
            render_enabled: false,
            max_steps: 1000,
            seed: None,
            force_scale: 1200.0,
            gravity: 1000.0,
            dt: 1.0 / 60.0,
            track_length: 800.0,
            track_y: 400.0,
            cart_width: 80.0,
            cart_height: 40.0,
            cart_mass: 1.0,
            pole_mass: 1.0,
            pole_length: 160.0,
            pole_thickness: 15.0,
            initial_cart: [400.0, 400.0],
            target_range: [150.0, 650.0],
            tilt_range: [PI * 25.0 / 18.0, PI * 29.0 / 18.0],
            cart_damping: 0.9999,
            pole_damping: 0.999,
            velocity_scale: 850.0,
            angular_velocity_scale: 15.0,
            frame_dir: PathBuf::from("frames"),
            frame_rate: 60,
        }
    }
}

impl SwingUpConfig {
    /// Load and validate a JSON configuration file; missing keys take defaults
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Build from the generic environment configuration.
    ///
    /// `params` are read as `SwingUpConfig` keys, then `seed`, `max_steps`
    /// and `render_mode` override them. Render modes `"human"` and
    /// `"frames"` enable the presenter, `"none"` disables it.
    pub fn from_env_config(env: &EnvironmentConfig) -> Result<Self> {
        let mut config: Self = serde_json::from_value(serde_json::Value::Object(env.params.clone()))?;
        if let Some(seed) = env.seed {
            config.seed = Some(seed);
        }
        if let Some(max_steps) = env.max_steps {
            config.max_steps = max_steps;
        }
        if let Some(mode) = env.render_mode.as_deref() {
            config.render_enabled = match mode {
                "human" | "frames" => true,
                "none" => false,
                other => {
                    return Err(RLError::InvalidConfig(format!("unknown render mode '{other}'")));
                }
            };
        }
        config.validate()?;
        Ok(config)
    }

    /// Cart position at which the distance term reaches -1
    #[must_use]
    pub fn left_bound(&self) -> f64 {
        self.cart_width / 2.0
    }

    /// Cart position at which the distance term reaches +1
    #[must_use]
    pub fn right_bound(&self) -> f64 {
        self.track_length - self.cart_width / 2.0
    }

    /// Travel limits of the cart centre on its slider
    #[must_use]
    pub fn slider_limits(&self) -> [f64; 2] {
        let margin = self.cart_width / 4.0;
        [margin, self.track_length - margin]
    }

    /// Reject configurations the environment cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(invalid("max_steps must be at least 1"));
        }
        positive("force_scale", self.force_scale)?;
        positive("gravity", self.gravity)?;
        positive("dt", self.dt)?;
        positive("track_length", self.track_length)?;
        positive("cart_width", self.cart_width)?;
        positive("cart_height", self.cart_height)?;
        positive("cart_mass", self.cart_mass)?;
        positive("pole_mass", self.pole_mass)?;
        positive("pole_length", self.pole_length)?;
        positive("pole_thickness", self.pole_thickness)?;
        positive("velocity_scale", self.velocity_scale)?;
        positive("angular_velocity_scale", self.angular_velocity_scale)?;
        fraction("cart_damping", self.cart_damping)?;
        fraction("pole_damping", self.pole_damping)?;

        if self.left_bound() >= self.right_bound() {
            return Err(invalid("track_length must exceed cart_width"));
        }

        let [low, high] = self.target_range;
        if !(low <= high) {
            return Err(invalid(format!("target_range [{low}, {high}] is empty")));
        }
        // Either distance denominator would vanish at the bounds.
        if low <= self.left_bound() || high >= self.right_bound() {
            return Err(invalid(format!(
                "target_range [{low}, {high}] must lie strictly inside ({}, {})",
                self.left_bound(),
                self.right_bound()
            )));
        }

        let [tilt_low, tilt_high] = self.tilt_range;
        if !(tilt_low <= tilt_high) || !tilt_low.is_finite() || !tilt_high.is_finite() {
            return Err(invalid(format!("tilt_range [{tilt_low}, {tilt_high}] is empty")));
        }

        let [x, y] = self.initial_cart;
        let [min_x, max_x] = self.slider_limits();
        if !(min_x..=max_x).contains(&x) || !y.is_finite() {
            return Err(invalid(format!("initial cart x {x} is off the track [{min_x}, {max_x}]")));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> RLError {
    RLError::InvalidConfig(message.into())
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be positive, got {value}")))
    }
}

fn fraction(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be in (0, 1], got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_are_valid() {
        let config = SwingUpConfig::default();
        config.validate().unwrap();
        assert_eq!(config.left_bound(), 40.0);
        assert_eq!(config.right_bound(), 760.0);
        assert_eq!(config.slider_limits(), [20.0, 780.0]);
    }

    #[test]
    fn test_rejects_zero_max_steps() {
        let config = SwingUpConfig { max_steps: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(RLError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_target_touching_bound() {
        let config = SwingUpConfig { target_range: [40.0, 650.0], ..Default::default() };
        assert!(config.validate().is_err());

        let config = SwingUpConfig { target_range: [150.0, 760.0], ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_damping() {
        let config = SwingUpConfig { pole_damping: 1.5, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_env_config_overrides() {
        let mut env = EnvironmentConfig {
            seed: Some(3),
            max_steps: Some(50),
            render_mode: Some("none".to_string()),
            ..Default::default()
        };
        env.params.insert("force_scale".to_string(), json!(600.0));
        env.params.insert("max_steps".to_string(), json!(10));

        let config = SwingUpConfig::from_env_config(&env).unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.max_steps, 50);
        assert_eq!(config.force_scale, 600.0);
        assert!(!config.render_enabled);
    }

    #[test]
    fn test_from_env_config_unknown_render_mode() {
        let env = EnvironmentConfig {
            render_mode: Some("vr".to_string()),
            ..Default::default()
        };
        assert!(SwingUpConfig::from_env_config(&env).is_err());
    }

    #[test]
    fn test_from_path_fills_defaults() {
        let path = std::env::temp_dir().join(format!("swingup-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"max_steps": 200, "seed": 11}"#).unwrap();

        let config = SwingUpConfig::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.max_steps, 200);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.force_scale, 1200.0);
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = SwingUpConfig::from_path("/nonexistent/swingup.json");
        assert!(matches!(result, Err(RLError::Io(_))));
    }
}
