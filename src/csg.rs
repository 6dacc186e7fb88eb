//! Lazily evaluated CSG trees.
//!
//! A [`Solid`] records how a part is built: primitive leaves combined by
//! union, difference and rigid transforms. Nothing is meshed until
//! [`Solid::to_csg`] walks the tree and runs the csgrs booleans.
//!
//! ```
//! use icolamp::primitives::{centered_cuboid, centered_cylinder};
//!
//! let block = centered_cuboid(20.0, 10.0, 5.0).unwrap();
//! let hole = centered_cylinder(3.0, 10.0, 32).unwrap();
//! let part = block - hole;
//! assert!(part.volume() < 1000.0);
//! ```

use std::ops::{Add, Sub};

use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};
use tracing::trace;

use crate::mesh::Mesh;
use crate::primitives::Polyhedron;

/// csgrs solid without per-polygon metadata.
pub type Csg = csgrs::csg::CSG<()>;

/// An immutable solid described by its construction tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Solid {
    /// A primitive polyhedron.
    Leaf { name: String, polyhedron: Polyhedron },
    /// Everything inside any child. An empty union is the empty solid.
    Union(Vec<Solid>),
    /// `base` with every cutter removed.
    Difference { base: Box<Solid>, cutters: Vec<Solid> },
    /// A child moved by a rigid transform.
    Transform {
        child: Box<Solid>,
        transform: Isometry3<f64>,
    },
}

impl Solid {
    pub fn leaf(name: impl Into<String>, polyhedron: Polyhedron) -> Self {
        Self::Leaf {
            name: name.into(),
            polyhedron,
        }
    }

    pub fn empty() -> Self {
        Self::Union(Vec::new())
    }

    /// Unions any number of solids into one node.
    pub fn union_all(parts: impl IntoIterator<Item = Solid>) -> Self {
        parts
            .into_iter()
            .fold(Self::empty(), |acc, part| acc.union(&part))
    }

    /// Boolean union (self + other).
    pub fn union(&self, other: &Solid) -> Self {
        let mut children = match self {
            Self::Union(children) => children.clone(),
            _ => vec![self.clone()],
        };
        match other {
            Self::Union(more) => children.extend(more.iter().cloned()),
            _ => children.push(other.clone()),
        }
        Self::Union(children)
    }

    /// Boolean difference (self - other).
    pub fn difference(&self, other: &Solid) -> Self {
        match self {
            Self::Difference { base, cutters } => {
                let mut cutters = cutters.clone();
                cutters.push(other.clone());
                Self::Difference {
                    base: base.clone(),
                    cutters,
                }
            }
            _ => Self::Difference {
                base: Box::new(self.clone()),
                cutters: vec![other.clone()],
            },
        }
    }

    /// Applies `transform` after any transform already on this node.
    pub fn transform(&self, transform: &Isometry3<f64>) -> Self {
        match self {
            Self::Transform {
                child,
                transform: inner,
            } => Self::Transform {
                child: child.clone(),
                transform: transform * inner,
            },
            _ => Self::Transform {
                child: Box::new(self.clone()),
                transform: *transform,
            },
        }
    }

    pub fn translate(&self, x: f64, y: f64, z: f64) -> Self {
        self.transform(&Isometry3::from_parts(
            Translation3::new(x, y, z),
            UnitQuaternion::identity(),
        ))
    }

    /// Rotates by angles in degrees about X, then Y, then Z.
    pub fn rotate(&self, x_deg: f64, y_deg: f64, z_deg: f64) -> Self {
        let rotation = UnitQuaternion::from_euler_angles(
            x_deg.to_radians(),
            y_deg.to_radians(),
            z_deg.to_radians(),
        );
        self.transform(&Isometry3::from_parts(Translation3::identity(), rotation))
    }

    /// Rotates by `angle_deg` about `axis` through the origin.
    pub fn rotate_axis(&self, axis: Vector3<f64>, angle_deg: f64) -> Self {
        let rotation = UnitQuaternion::from_axis_angle(&Unit::new_normalize(axis), angle_deg.to_radians());
        self.transform(&Isometry3::from_parts(Translation3::identity(), rotation))
    }

    /// Number of primitive leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Union(children) => children.iter().map(Solid::leaf_count).sum(),
            Self::Difference { base, cutters } => {
                base.leaf_count() + cutters.iter().map(Solid::leaf_count).sum::<usize>()
            }
            Self::Transform { child, .. } => child.leaf_count(),
        }
    }

    /// Runs the booleans and returns the resulting csgrs solid.
    pub fn to_csg(&self) -> Csg {
        match self {
            Self::Leaf { polyhedron, .. } => polyhedron.to_csg(),
            Self::Union(children) => children
                .iter()
                .map(Solid::to_csg)
                .reduce(|acc, child| acc.union(&child))
                .unwrap_or_else(Csg::new),
            Self::Difference { base, cutters } => cutters
                .iter()
                .fold(base.to_csg(), |acc, cutter| acc.difference(&cutter.to_csg())),
            Self::Transform { child, transform } => child.to_csg().transform(&transform.to_homogeneous()),
        }
    }

    /// Evaluates the tree into a welded, crack-free triangle mesh.
    pub fn evaluate(&self) -> Mesh {
        let csg = self.to_csg();
        trace!(polygons = csg.polygons.len(), leaves = self.leaf_count(), "evaluated solid");
        Mesh::from_csg(&csg)
    }

    pub fn volume(&self) -> f64 {
        self.evaluate().volume()
    }
}

impl Add for &Solid {
    type Output = Solid;

    fn add(self, other: &Solid) -> Solid {
        self.union(other)
    }
}

impl Add for Solid {
    type Output = Solid;

    fn add(self, other: Solid) -> Solid {
        self.union(&other)
    }
}

impl Sub for &Solid {
    type Output = Solid;

    fn sub(self, other: &Solid) -> Solid {
        self.difference(other)
    }
}

impl Sub for Solid {
    type Output = Solid;

    fn sub(self, other: Solid) -> Solid {
        self.difference(&other)
    }
}
