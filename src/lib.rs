//! Parametric generator for the printable parts of an icosahedral lamp.
//!
//! Every part is derived from a few depths measured from the icosahedron's
//! center to its faces. Builders return a lazily evaluated [`Solid`]; call
//! [`Solid::evaluate`] for a triangle mesh or [`export::write_part`] to write
//! it out.

pub mod base;
pub mod base_lid;
pub mod config;
pub mod csg;
pub mod error;
pub mod export;
pub mod geometry;
pub mod mesh;
pub mod plan;
pub mod power;
pub mod primitives;
pub mod quadrant;
pub mod scad;
pub mod shapes;

pub use config::Config;
pub use csg::Solid;
pub use error::{ConfigError, ExportError, GeometryError};
pub use mesh::Mesh;
pub use plan::{BuildPlan, Part, NUM_LEDS};
