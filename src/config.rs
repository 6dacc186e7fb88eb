//! Configuration loader: reads the lamp parameters from `lamp.toml`.
//!
//! Every key is optional; anything missing falls back to the values the
//! reference lamp was printed with.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{positive, ConfigError, GeometryError};

/// Environment variable naming an alternative parameter file.
pub const CONFIG_ENV: &str = "ICOLAMP_CONFIG";

/// File name looked up when no path is given.
pub const CONFIG_FILE: &str = "lamp.toml";

/// All parameters from the `[default]` section of `lamp.toml`.
///
/// Lengths are millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Height of the lens wall between the outer face and the cavity plane.
    pub lens_depth: f64,
    /// Distance from the lamp center to the cavity plane where lids sit.
    pub cavity_depth: f64,
    pub wall_width: f64,
    /// Bore in the lid for the LED.
    pub led_hole_size: f64,
    /// Floor thickness of each lens (the light-diffusing face).
    pub lens_thickness: f64,
    /// Clearance added to snap-fit lips.
    pub tolerance: f64,
    pub lid_lip_size: f64,
    /// Vertical skirt below the base's outer face.
    pub base_additional_height: f64,
    /// How far the power-jack standoff protrudes from the back wall.
    pub base_square_height: f64,
    /// Overrides the derived jack standoff width when set.
    #[serde(rename = "power_outer_diameter", skip_serializing_if = "Option::is_none")]
    pub power_outer_diameter_override: Option<f64>,
    pub power_horiz_diameter: f64,
    pub power_vert_diameter: f64,
    /// Jack axis height above the bottom of the base skirt.
    pub power_height_from_base: f64,
    pub switch_diameter: f64,
    /// Also place lenses on the quadrant jig, not only lids.
    pub quadrant_lenses: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lens_depth: 30.0,
            cavity_depth: 40.0,
            wall_width: 1.0,
            led_hole_size: 10.0,
            lens_thickness: 1.5,
            tolerance: 0.3,
            lid_lip_size: 2.0,
            base_additional_height: 30.0,
            base_square_height: 15.0,
            power_outer_diameter_override: None,
            power_horiz_diameter: 7.5,
            power_vert_diameter: 9.0,
            power_height_from_base: 8.0,
            switch_diameter: 7.0,
            quadrant_lenses: false,
        }
    }
}

impl Config {
    /// Distance from the lamp center to the outer (visible) face.
    pub fn outer_depth(&self) -> f64 {
        self.lens_depth + self.cavity_depth
    }

    /// Width of the power-jack standoff: the 13 mm jack body plus two walls.
    pub fn power_outer_diameter(&self) -> f64 {
        self.power_outer_diameter_override
            .unwrap_or(13.0 + 2.0 * self.wall_width)
    }

    /// Checks every scalar before any geometry is derived from it.
    pub fn validate(&self) -> Result<(), GeometryError> {
        positive("lens_depth", self.lens_depth)?;
        positive("cavity_depth", self.cavity_depth)?;
        positive("wall_width", self.wall_width)?;
        positive("led_hole_size", self.led_hole_size)?;
        positive("lens_thickness", self.lens_thickness)?;
        positive("lid_lip_size", self.lid_lip_size)?;
        positive("base_additional_height", self.base_additional_height)?;
        positive("base_square_height", self.base_square_height)?;
        positive("power_outer_diameter", self.power_outer_diameter())?;
        positive("power_horiz_diameter", self.power_horiz_diameter)?;
        positive("power_vert_diameter", self.power_vert_diameter)?;
        positive("power_height_from_base", self.power_height_from_base)?;
        positive("switch_diameter", self.switch_diameter)?;
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(GeometryError::InvalidParameter {
                parameter: "tolerance",
                value: self.tolerance,
                invariant: "must be finite and not negative",
            });
        }
        if self.lens_thickness >= self.lens_depth {
            return Err(GeometryError::InvalidParameter {
                parameter: "lens_thickness",
                value: self.lens_thickness,
                invariant: "must be thinner than lens_depth",
            });
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    default: Config,
}

/// Parses the contents of a parameter file and validates it.
pub fn from_toml_str(content: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    file.default.validate()?;
    Ok(file.default)
}

/// Resolve the path to the parameter file.
///
/// Tries in order:
/// 1. the explicit path (from `--config`)
/// 2. `ICOLAMP_CONFIG` environment variable
/// 3. `lamp.toml` next to the crate manifest (compile-time)
/// 4. `lamp.toml` in the current directory
fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }

    if let Ok(p) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(p));
    }

    let manifest_relative = Path::new(env!("CARGO_MANIFEST_DIR")).join(CONFIG_FILE);
    if manifest_relative.exists() {
        return Some(manifest_relative);
    }

    let cwd = PathBuf::from(CONFIG_FILE);
    cwd.exists().then_some(cwd)
}

/// Load and validate the lamp configuration, falling back to defaults when no
/// file is found.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(path) = resolve_config_path(explicit) else {
        debug!("no {CONFIG_FILE} found, using built-in defaults");
        let cfg = Config::default();
        cfg.validate()?;
        return Ok(cfg);
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let cfg = from_toml_str(&content, &path)?;
    info!(path = %path.display(), outer_depth = cfg.outer_depth(), "loaded lamp configuration");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(src: &str) -> Result<Config, ConfigError> {
        from_toml_str(src, Path::new("test.toml"))
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        cfg.validate().unwrap();
        assert_relative_eq!(cfg.outer_depth(), 70.0);
        assert_relative_eq!(cfg.power_outer_diameter(), 15.0);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let cfg = parse("[default]\nwall_width = 1.5\n").unwrap();
        assert_relative_eq!(cfg.wall_width, 1.5);
        assert_relative_eq!(cfg.lens_depth, 30.0);
        assert_relative_eq!(cfg.power_outer_diameter(), 16.0);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(parse("").unwrap(), Config::default());
    }

    #[test]
    fn explicit_power_outer_diameter_wins() {
        let cfg = parse("[default]\npower_outer_diameter = 18.0\n").unwrap();
        assert_relative_eq!(cfg.power_outer_diameter(), 18.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = parse("[default]\nwall_width = -1.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(GeometryError::InvalidParameter { parameter: "wall_width", .. })
        ));

        let err = parse("[default]\nlens_thickness = 40.0\n").unwrap_err();
        assert!(err.to_string().contains("lens_thickness"));
    }

    #[test]
    fn unknown_keys_and_bad_toml_fail_to_parse() {
        assert!(matches!(parse("[default]\nlens_dpeth = 3.0\n"), Err(ConfigError::Parse { .. })));
        assert!(matches!(parse("[default\n"), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let cfg = Config {
            quadrant_lenses: true,
            ..Config::default()
        };
        let text = toml::to_string(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn explicit_missing_file_reports_path() {
        let err = load_config(Some(Path::new("/nonexistent/lamp.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/lamp.toml"));
    }
}
