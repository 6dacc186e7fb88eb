use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while deriving or composing lamp geometry.
///
/// Every builder validates its inputs up front, so a malformed part is
/// reported here instead of surfacing later as a self-intersecting mesh.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A supplied scalar violates a precondition of the builder.
    #[error("invalid parameter {parameter} = {value}: {invariant}")]
    InvalidParameter {
        parameter: &'static str,
        value: f64,
        invariant: &'static str,
    },

    /// A quantity derived from valid inputs collapsed (zero or negative size).
    #[error("degenerate geometry: {quantity} = {value}: {invariant}")]
    DegenerateGeometry {
        quantity: &'static str,
        value: f64,
        invariant: &'static str,
    },
}

/// Errors loading the parameter file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Invalid(#[from] GeometryError),
}

/// Errors writing an evaluated part.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("part {0} evaluated to an empty mesh")]
    EmptyGeometry(String),

    #[error("unknown export format {0:?} (expected stl, stl-ascii or scad)")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, GeometryError>;

/// Checks that a user-supplied length is finite and strictly positive.
pub(crate) fn positive(parameter: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::InvalidParameter {
            parameter,
            value,
            invariant: "must be finite and greater than zero",
        })
    }
}

/// Checks that a derived length stayed strictly positive.
pub(crate) fn derived_positive(quantity: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::DegenerateGeometry {
            quantity,
            value,
            invariant: "derived size must stay greater than zero",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_negative_and_nan() {
        assert!(positive("wall_width", 1.0).is_ok());
        for bad in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let err = positive("wall_width", bad).unwrap_err();
            assert!(matches!(
                err,
                GeometryError::InvalidParameter { parameter: "wall_width", .. }
            ));
        }
    }

    #[test]
    fn derived_positive_reports_degenerate() {
        let err = derived_positive("inset radius", -0.5).unwrap_err();
        assert!(err.to_string().contains("inset radius"));
        assert!(matches!(err, GeometryError::DegenerateGeometry { .. }));
    }
}
