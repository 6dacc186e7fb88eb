//! Base cap: a flat plate closing the bottom of the base skirt, with a lip
//! that locates it inside the skirt walls.

use tracing::debug;

use crate::csg::Solid;
use crate::error::{positive, Result};
use crate::geometry::face_circumradius_from_radius;
use crate::primitives::extruded_triangle;
use crate::shapes::snap_lip;

pub fn base_lid(outer_depth: f64, wall_width: f64, lip_size: f64, tolerance: f64) -> Result<Solid> {
    positive("outer_depth", outer_depth)?;
    positive("wall_width", wall_width)?;
    let radius = face_circumradius_from_radius(outer_depth);
    debug!(radius, lip_size, "base cap");

    let plate = extruded_triangle(radius, wall_width)?;
    let lip = snap_lip(radius, wall_width, tolerance, lip_size)?.translate(0.0, 0.0, wall_width);
    Ok(plate + lip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use crate::geometry::triangle_area;
    use approx::assert_relative_eq;

    #[test]
    fn cap_is_plate_plus_lip() {
        let (outer, w, lip, tol) = (70.0, 1.0, 2.0, 0.3);
        let r = face_circumradius_from_radius(outer);
        let plate = triangle_area(r) * w;
        let ring = (triangle_area(r - 2.0 * (w + tol)) - triangle_area(r - 2.0 * (2.0 * w + tol))) * lip;

        let cap = base_lid(outer, w, lip, tol).unwrap();
        assert_relative_eq!(cap.volume(), plate + ring, max_relative = 1e-6);

        let (lo, hi) = cap.evaluate().bounding_box().unwrap();
        assert_relative_eq!(lo.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(hi.z, w + lip, epsilon = 1e-9);
        assert_relative_eq!(hi.x, r, epsilon = 1e-9);
    }

    #[test]
    fn lip_clears_skirt_interior() {
        // The skirt interior uses a single wall inset; the lip adds the tolerance.
        let r = face_circumradius_from_radius(70.0);
        let cap = base_lid(70.0, 1.0, 2.0, 0.3).unwrap();
        let lip_top = cap
            .evaluate()
            .positions()
            .iter()
            .filter(|p| p.z > 1.5)
            .map(|p| p.x)
            .fold(f64::MIN, f64::max);
        assert!(lip_top < crate::geometry::inset_circumradius(r, 1.0));
    }

    #[test]
    fn rejects_wall_too_thick_for_lip() {
        assert!(matches!(
            base_lid(1.0, 1.0, 2.0, 0.3),
            Err(GeometryError::DegenerateGeometry { .. })
        ));
    }
}
