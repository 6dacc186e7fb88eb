//! Composite shapes cut from nested pyramids: the face section, the lens and
//! the lid.
//!
//! Each shape is built face-down: the outer face of the icosahedron lies on
//! z = 0 and the icosahedron's center sits on the +Z axis at the outer depth.

use tracing::debug;

use crate::csg::Solid;
use crate::error::{derived_positive, positive, GeometryError, Result};
use crate::geometry::{face_circumradius_from_radius, inset_circumradius};
use crate::primitives::{centered_cylinder, equal_area_radius, extruded_triangle, pyramid, CIRCLE_SEGMENTS};

/// Extra length given to cutters so they never end flush with the face they cut.
pub(crate) const OVERLAP: f64 = 0.01;

/// Frustum of the face pyramid between `inner_depth` and `outer_depth`.
///
/// The outer face lies on z = 0 and the cut face at z = `outer_depth - inner_depth`.
pub fn ico_section(inner_depth: f64, outer_depth: f64) -> Result<Solid> {
    positive("inner_depth", inner_depth)?;
    positive("outer_depth", outer_depth)?;
    if inner_depth >= outer_depth {
        return Err(GeometryError::InvalidParameter {
            parameter: "inner_depth",
            value: inner_depth,
            invariant: "must be smaller than outer_depth",
        });
    }

    let outer_r = face_circumradius_from_radius(outer_depth);
    let inner_r = face_circumradius_from_radius(inner_depth);
    debug!(inner_depth, outer_depth, outer_r, inner_r, "ico section");

    // Both pyramids share the apex, so the cut is parallel to the face.
    let outer = pyramid(outer_r, outer_depth)?;
    let tip = pyramid(inner_r, inner_depth)?.translate(0.0, 0.0, outer_depth - inner_depth);
    Ok(outer - tip)
}

/// Hollow lens: a section with a floor `lens_width` thick and walls of about
/// `wall_width`.
pub fn ico_lens(inner_depth: f64, outer_depth: f64, wall_width: f64, lens_width: f64) -> Result<Solid> {
    positive("wall_width", wall_width)?;
    positive("lens_width", lens_width)?;
    if lens_width >= outer_depth - inner_depth {
        return Err(GeometryError::InvalidParameter {
            parameter: "lens_width",
            value: lens_width,
            invariant: "must be smaller than outer_depth - inner_depth",
        });
    }

    let section = ico_section(inner_depth, outer_depth)?;

    let cavity_depth = outer_depth - lens_width;
    let cavity_r = derived_positive(
        "lens cavity radius",
        inset_circumradius(face_circumradius_from_radius(cavity_depth), wall_width),
    )?;
    debug!(cavity_depth, cavity_r, "lens cavity");

    let cavity = pyramid(cavity_r, cavity_depth)?.translate(0.0, 0.0, lens_width);
    Ok(section - cavity)
}

/// Triangular ring that snaps into a wall of thickness `wall_width` around a
/// face of circumradius `radius`. Spans z = 0 to `height`.
///
/// `height` may exceed `wall_width`; the ring stands on its own.
pub fn snap_lip(radius: f64, wall_width: f64, tolerance: f64, height: f64) -> Result<Solid> {
    positive("lip height", height)?;
    let outer_r = derived_positive("lip outer radius", inset_circumradius(radius, wall_width + tolerance))?;
    let inner_r = derived_positive(
        "lip inner radius",
        inset_circumradius(radius, 2.0 * wall_width + tolerance),
    )?;

    let ring = extruded_triangle(outer_r, height)?;
    let opening = extruded_triangle(inner_r, height + 2.0 * OVERLAP)?.translate(0.0, 0.0, -OVERLAP);
    Ok(ring - opening)
}

/// Lid cap with its lip, before the LED bore.
pub fn lid_body(inner_depth: f64, wall_width: f64, lip_size: f64, tolerance: f64) -> Result<Solid> {
    positive("wall_width", wall_width)?;
    if inner_depth <= wall_width {
        return Err(GeometryError::InvalidParameter {
            parameter: "inner_depth",
            value: inner_depth,
            invariant: "must be larger than wall_width",
        });
    }

    let cap = ico_section(inner_depth - wall_width, inner_depth)?;
    let lip = snap_lip(face_circumradius_from_radius(inner_depth), wall_width, tolerance, lip_size)?
        .translate(0.0, 0.0, -lip_size);
    Ok(cap + lip)
}

/// Lid closing the cavity plane, bored through for the LED.
pub fn ico_lid(
    led_hole_diameter: f64,
    inner_depth: f64,
    wall_width: f64,
    lip_size: f64,
    tolerance: f64,
) -> Result<Solid> {
    positive("led_hole_diameter", led_hole_diameter)?;
    let body = lid_body(inner_depth, wall_width, lip_size, tolerance)?;

    // The faceted bore has the area of the true circle and stays inside the lip opening.
    let bore_r = equal_area_radius(led_hole_diameter / 2.0, CIRCLE_SEGMENTS);
    let opening_inradius = inset_circumradius(face_circumradius_from_radius(inner_depth), 2.0 * wall_width + tolerance) / 2.0;
    if bore_r >= opening_inradius {
        return Err(GeometryError::DegenerateGeometry {
            quantity: "led bore radius",
            value: bore_r,
            invariant: "must be smaller than the inradius of the lid opening",
        });
    }

    let bore = centered_cylinder(bore_r, 2.0 * (wall_width.max(lip_size) + 1.0), CIRCLE_SEGMENTS)?;
    Ok(body - bore)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    use crate::geometry::triangle_area;
    use approx::assert_relative_eq;

    fn section_volume(inner: f64, outer: f64) -> f64 {
        let a_outer = triangle_area(face_circumradius_from_radius(outer));
        let a_inner = triangle_area(face_circumradius_from_radius(inner));
        (a_outer * outer - a_inner * inner) / 3.0
    }

    #[test]
    fn section_volume_matches_frustum() {
        let section = ico_section(40.0, 70.0).unwrap();
        assert_relative_eq!(section.volume(), section_volume(40.0, 70.0), max_relative = 1e-6);

        let (lo, hi) = section.evaluate().bounding_box().unwrap();
        assert_relative_eq!(lo.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(hi.z, 30.0, epsilon = 1e-6);
    }

    #[test]
    fn section_volume_vanishes_as_inner_approaches_outer() {
        let thick = ico_section(40.0, 70.0).unwrap().volume();
        let thin = ico_section(69.0, 70.0).unwrap().volume();
        let sliver = ico_section(69.9, 70.0).unwrap().volume();
        assert!(thick > thin && thin > sliver && sliver > 0.0);
        assert!(sliver < thick * 1e-2);
    }

    #[test]
    fn section_rejects_inverted_depths() {
        for (inner, outer) in [(70.0, 70.0), (80.0, 70.0), (0.0, 70.0), (-1.0, 70.0)] {
            assert!(matches!(
                ico_section(inner, outer),
                Err(GeometryError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn lens_hollows_the_section() {
        let (inner, outer, wall, lens) = (40.0, 70.0, 1.0, 1.5);
        let lens_volume = ico_lens(inner, outer, wall, lens).unwrap().volume();
        let section = section_volume(inner, outer);
        assert!(lens_volume > 0.0 && lens_volume < section);

        // Cavity pyramid clipped by the cut face at z = outer - inner.
        let h = outer - lens;
        let cavity_r = inset_circumradius(face_circumradius_from_radius(h), wall);
        let cavity = triangle_area(cavity_r) * h / 3.0 * (1.0 - (inner / h).powi(3));
        assert_relative_eq!(lens_volume, section - cavity, max_relative = 1e-6);
    }

    #[test]
    fn thinner_lens_floor_grows_cavity() {
        let section = section_volume(40.0, 70.0);
        let thick = section - ico_lens(40.0, 70.0, 1.0, 3.0).unwrap().volume();
        let thin = section - ico_lens(40.0, 70.0, 1.0, 1.0).unwrap().volume();
        assert!(thin > thick);
    }

    #[test]
    fn lens_validates_floor_and_inset() {
        assert!(ico_lens(40.0, 70.0, 1.0, 30.0).is_err());
        assert!(matches!(
            ico_lens(40.0, 70.0, 30.0, 1.5),
            Err(GeometryError::DegenerateGeometry { .. })
        ));
    }

    #[test]
    fn snap_lip_is_a_triangular_ring() {
        let c = 30.0;
        let lip = snap_lip(c, 1.0, 0.3, 2.0).unwrap();
        let expected = (triangle_area(c - 2.6) - triangle_area(c - 4.6)) * 2.0;
        assert_relative_eq!(lip.volume(), expected, max_relative = 1e-6);
    }

    #[test]
    fn lid_bore_removes_cylinder_through_cap() {
        let (d, inner, wall, lip, tol) = (10.0, 40.0, 1.0, 2.0, 0.3);
        let body = lid_body(inner, wall, lip, tol).unwrap().volume();
        let lid = ico_lid(d, inner, wall, lip, tol).unwrap().volume();
        assert_relative_eq!(body - lid, PI * (d / 2.0).powi(2) * wall, max_relative = 1e-5);
    }

    #[test]
    fn lid_body_is_cap_plus_lip() {
        let body = lid_body(40.0, 1.0, 2.0, 0.3).unwrap();
        let lip = snap_lip(face_circumradius_from_radius(40.0), 1.0, 0.3, 2.0).unwrap();
        assert_relative_eq!(
            body.volume(),
            section_volume(39.0, 40.0) + lip.volume(),
            max_relative = 1e-6
        );
        let (lo, hi) = body.evaluate().bounding_box().unwrap();
        assert_relative_eq!(lo.z, -2.0, epsilon = 1e-9);
        assert_relative_eq!(hi.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn lid_rejects_oversized_bore_and_thin_depth() {
        assert!(matches!(
            ico_lid(40.0, 40.0, 1.0, 2.0, 0.3),
            Err(GeometryError::DegenerateGeometry { quantity: "led bore radius", .. })
        ));
        assert!(matches!(
            ico_lid(10.0, 1.0, 1.0, 2.0, 0.3),
            Err(GeometryError::InvalidParameter { parameter: "inner_depth", .. })
        ));
    }

    #[test]
    fn builders_are_deterministic() {
        let a = ico_lid(10.0, 40.0, 1.0, 2.0, 0.3).unwrap();
        let b = ico_lid(10.0, 40.0, 1.0, 2.0, 0.3).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.evaluate(), b.evaluate());
    }

    #[test]
    fn lip_taller_than_wall_is_allowed() {
        let lip = snap_lip(30.0, 1.0, 0.3, 5.0).unwrap();
        let expected = (triangle_area(30.0 - 2.6) - triangle_area(30.0 - 4.6)) * 5.0;
        assert_relative_eq!(lip.volume(), expected, max_relative = 1e-6);
    }
}
