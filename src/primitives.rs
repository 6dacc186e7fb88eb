//! Primitive solids defined by explicit vertex and face lists.
//!
//! Faces wind counter-clockwise seen from outside, so every primitive has
//! outward normals and composes cleanly under the booleans.

use std::f64::consts::TAU;

use nalgebra::{Point2, Point3};

use crate::csg::{Csg, Solid};
use crate::error::{positive, GeometryError, Result};
use crate::geometry::triangle_corners;

/// Facets used for round bores and the stadium cutter.
pub const CIRCLE_SEGMENTS: u32 = 48;

/// A closed polyhedron: points plus faces given as cyclic index lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyhedron {
    vertices: Vec<Point3<f64>>,
    faces: Vec<Vec<usize>>,
}

impl Polyhedron {
    /// Checks the index lists; geometry itself is trusted to be planar and convex per face.
    pub fn new(vertices: Vec<Point3<f64>>, faces: Vec<Vec<usize>>) -> Result<Self> {
        if vertices.len() < 4 {
            return Err(GeometryError::InvalidParameter {
                parameter: "vertices",
                value: vertices.len() as f64,
                invariant: "a polyhedron needs at least four vertices",
            });
        }
        if faces.len() < 4 {
            return Err(GeometryError::InvalidParameter {
                parameter: "faces",
                value: faces.len() as f64,
                invariant: "a polyhedron needs at least four faces",
            });
        }
        for (i, face) in faces.iter().enumerate() {
            if face.len() < 3 || face.iter().any(|&v| v >= vertices.len()) {
                return Err(GeometryError::InvalidParameter {
                    parameter: "faces",
                    value: i as f64,
                    invariant: "each face must reference at least three existing vertices",
                });
            }
        }
        Ok(Self { vertices, faces })
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// Exact enclosed volume.
    pub fn volume(&self) -> f64 {
        let mut six_v = 0.0;
        for face in &self.faces {
            let a = self.vertices[face[0]].coords;
            for pair in face[1..].windows(2) {
                let b = self.vertices[pair[0]].coords;
                let c = self.vertices[pair[1]].coords;
                six_v += a.dot(&b.cross(&c));
            }
        }
        six_v / 6.0
    }

    pub(crate) fn to_csg(&self) -> Csg {
        let points: Vec<[f64; 3]> = self.vertices.iter().map(|p| [p.x, p.y, p.z]).collect();
        Csg::polyhedron(&points, &self.faces, None)
    }
}

/// Triangular pyramid: base triangle of circumradius `r` on z = 0, apex at `(0, 0, h)`.
pub fn pyramid(r: f64, h: f64) -> Result<Solid> {
    positive("pyramid radius", r)?;
    positive("pyramid height", h)?;

    let mut vertices: Vec<Point3<f64>> = triangle_corners(r)
        .iter()
        .map(|p| Point3::new(p.x, p.y, 0.0))
        .collect();
    vertices.push(Point3::new(0.0, 0.0, h));

    let faces = vec![vec![0, 2, 1], vec![0, 1, 3], vec![1, 2, 3], vec![2, 0, 3]];
    Ok(Solid::leaf("pyramid", Polyhedron::new(vertices, faces)?))
}

/// Triangular prism of circumradius `r`. A negative `depth` extrudes below z = 0.
pub fn extruded_triangle(r: f64, depth: f64) -> Result<Solid> {
    positive("prism radius", r)?;
    positive("prism depth", depth.abs())?;
    Ok(Solid::leaf("extruded_triangle", prism(&triangle_corners(r), depth)?))
}

/// Cylinder along Z from z = 0 to `height`, approximated by `segments` facets.
pub fn cylinder(radius: f64, height: f64, segments: u32) -> Result<Solid> {
    positive("cylinder radius", radius)?;
    positive("cylinder height", height)?;
    Ok(Solid::leaf("cylinder", prism(&circle(radius, segments)?, height)?))
}

/// Cylinder along Z, centered at the origin.
pub fn centered_cylinder(radius: f64, height: f64, segments: u32) -> Result<Solid> {
    Ok(cylinder(radius, height, segments)?.translate(0.0, 0.0, -height / 2.0))
}

/// Box with one corner at the origin.
pub fn cuboid(x: f64, y: f64, z: f64) -> Result<Solid> {
    positive("box width", x)?;
    positive("box length", y)?;
    positive("box height", z)?;
    let rect = [
        Point2::new(0.0, 0.0),
        Point2::new(x, 0.0),
        Point2::new(x, y),
        Point2::new(0.0, y),
    ];
    Ok(Solid::leaf("cuboid", prism(&rect, z)?))
}

/// Box centered at the origin.
pub fn centered_cuboid(x: f64, y: f64, z: f64) -> Result<Solid> {
    Ok(cuboid(x, y, z)?.translate(-x / 2.0, -y / 2.0, -z / 2.0))
}

/// Regular polygon inscribed in a circle, counter-clockwise.
pub fn circle(radius: f64, segments: u32) -> Result<Vec<Point2<f64>>> {
    if segments < 3 {
        return Err(GeometryError::InvalidParameter {
            parameter: "segments",
            value: f64::from(segments),
            invariant: "a circle needs at least three segments",
        });
    }
    Ok((0..segments)
        .map(|k| {
            let a = TAU * f64::from(k) / f64::from(segments);
            Point2::new(radius * a.cos(), radius * a.sin())
        })
        .collect())
}

/// Area of the polygon [`circle`] produces.
pub fn circle_area(radius: f64, segments: u32) -> f64 {
    let n = f64::from(segments);
    n / 2.0 * radius * radius * (TAU / n).sin()
}

/// Circumradius of a `segments`-gon whose area equals a circle of `radius`.
pub fn equal_area_radius(radius: f64, segments: u32) -> f64 {
    let n = f64::from(segments);
    radius * (TAU / (n * (TAU / n).sin())).sqrt()
}

/// Extrudes a convex counter-clockwise profile between z = 0 and z = `depth`.
pub(crate) fn prism(profile: &[Point2<f64>], depth: f64) -> Result<Polyhedron> {
    let (lo, hi) = if depth < 0.0 { (depth, 0.0) } else { (0.0, depth) };
    let n = profile.len();

    let vertices: Vec<Point3<f64>> = [lo, hi]
        .iter()
        .flat_map(|&z| profile.iter().map(move |p| Point3::new(p.x, p.y, z)))
        .collect();

    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(n + 2);
    faces.push((0..n).rev().collect());
    faces.push((n..2 * n).collect());
    for i in 0..n {
        let j = (i + 1) % n;
        faces.push(vec![i, j, n + j, n + i]);
    }
    Polyhedron::new(vertices, faces)
}
