//! Closed-form icosahedron relations.
//!
//! Every face of the lamp is described by a single number: the perpendicular
//! distance from the icosahedron's center to the face plane. The functions here
//! turn that distance into the dimensions of the equilateral face.

use nalgebra::Point2;

/// Edge length of the equilateral face lying `radius` away from the center.
pub fn edge_length_from_radius(radius: f64) -> f64 {
    radius * 12.0 / (3f64.sqrt() * (3.0 + 5f64.sqrt()))
}

/// Radius of the circle through the three corners of that face.
pub fn face_circumradius_from_radius(radius: f64) -> f64 {
    edge_length_from_radius(radius) / 3f64.sqrt()
}

/// Shrinks a face circumradius so its edges move inward by `wall_width`.
///
/// Exact for a flat triangle (the inradius is half the circumradius) and only
/// approximate on the sloped pyramid walls. Downstream fits were tuned against
/// this formula, so it must stay linear.
pub fn inset_circumradius(radius: f64, wall_width: f64) -> f64 {
    radius - 2.0 * wall_width
}

/// Angle in degrees between a face normal and the axis through one of its
/// vertices. Independent of scale.
pub fn dihedral_tilt_deg(radius: f64) -> f64 {
    (face_circumradius_from_radius(radius) / radius)
        .atan()
        .to_degrees()
}

/// Distance from the center to a vertex of the face `radius` away.
pub fn vertex_distance(radius: f64) -> f64 {
    radius.hypot(face_circumradius_from_radius(radius))
}

/// Area of an equilateral triangle with the given circumradius.
pub fn triangle_area(circumradius: f64) -> f64 {
    3.0 * 3f64.sqrt() / 4.0 * circumradius * circumradius
}

/// Corners of the face triangle, counter-clockwise, first corner on +X.
pub fn triangle_corners(circumradius: f64) -> [Point2<f64>; 3] {
    [0.0_f64, 120.0, 240.0].map(|deg| {
        let a = deg.to_radians();
        Point2::new(circumradius * a.cos(), circumradius * a.sin())
    })
}
