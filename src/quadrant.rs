//! Gluing jig: several lids (and optionally lenses) fanned around one
//! icosahedron vertex at their true dihedral angles.

use tracing::debug;

use crate::config::Config;
use crate::csg::Solid;
use crate::error::{GeometryError, Result};
use crate::geometry::{dihedral_tilt_deg, face_circumradius_from_radius, vertex_distance};
use crate::shapes::{ico_lens, ico_lid};

/// Where one face of the jig goes around the shared vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Rotation about the vertex axis.
    pub yaw_deg: f64,
    /// Angle between the face normal and the vertex axis.
    pub tilt_deg: f64,
}

/// Evenly spaced placements, `360 / sections` degrees apart.
pub fn placements(sections: u32) -> Result<Vec<Placement>> {
    if sections < 1 {
        return Err(GeometryError::InvalidParameter {
            parameter: "sections",
            value: f64::from(sections),
            invariant: "at least one section is required",
        });
    }
    let step = 360.0 / f64::from(sections);
    // The tilt does not depend on scale.
    let tilt_deg = dihedral_tilt_deg(1.0);
    Ok((0..sections)
        .map(|i| Placement {
            yaw_deg: step * f64::from(i),
            tilt_deg,
        })
        .collect())
}

/// Moves a face-down part whose face lies `depth` from the center so the
/// icosahedron center lands on the origin and the hinge vertex on -Z.
fn hinge(part: &Solid, depth: f64, placement: &Placement) -> Solid {
    part.rotate(0.0, 0.0, 60.0)
        .translate(face_circumradius_from_radius(depth), 0.0, 0.0)
        .rotate(0.0, -placement.tilt_deg, 0.0)
        .translate(0.0, 0.0, -vertex_distance(depth))
        .rotate(0.0, 0.0, placement.yaw_deg)
}

/// Flips hinged parts so the shared vertex points up and sits on the origin.
/// The icosahedron center of `depth` ends up at z = -vertex_distance(depth).
fn vertex_up(parts: Solid, depth: f64) -> Solid {
    parts.rotate(180.0, 0.0, 0.0).translate(0.0, 0.0, -vertex_distance(depth))
}

/// Parameters of the jig; everything but the section count comes from the
/// lamp configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrant {
    pub outer_depth: f64,
    pub cavity_depth: f64,
    pub wall_width: f64,
    pub led_hole_size: f64,
    pub lip_size: f64,
    pub tolerance: f64,
    pub lens_thickness: f64,
    pub sections: u32,
    pub include_lenses: bool,
}

impl Quadrant {
    pub fn from_config(cfg: &Config, sections: u32) -> Self {
        Self {
            outer_depth: cfg.outer_depth(),
            cavity_depth: cfg.cavity_depth,
            wall_width: cfg.wall_width,
            led_hole_size: cfg.led_hole_size,
            lip_size: cfg.lid_lip_size,
            tolerance: cfg.tolerance,
            lens_thickness: cfg.lens_thickness,
            sections,
            include_lenses: cfg.quadrant_lenses,
        }
    }

    /// Dome-up jig with the shared vertex at the origin.
    pub fn build(&self) -> Result<Solid> {
        let placements = placements(self.sections)?;
        let lid = ico_lid(
            self.led_hole_size,
            self.cavity_depth,
            self.wall_width,
            self.lip_size,
            self.tolerance,
        )?;
        let lens = if self.include_lenses {
            Some(ico_lens(self.cavity_depth, self.outer_depth, self.wall_width, self.lens_thickness)?)
        } else {
            None
        };
        debug!(sections = self.sections, lenses = self.include_lenses, "quadrant jig");

        let mut faces = Vec::with_capacity(placements.len() * 2);
        for placement in &placements {
            faces.push(hinge(&lid, self.cavity_depth, placement));
            if let Some(lens) = &lens {
                faces.push(hinge(lens, self.outer_depth, placement));
            }
        }

        // Lids hang their lips past the face plane, so the datum is the
        // outermost face's vertex rather than the top of the bounding box.
        let top = if self.include_lenses { self.outer_depth } else { self.cavity_depth };
        Ok(vertex_up(Solid::union_all(faces), top))
    }
}

/// Jig of `sections` lids around a common vertex, with lenses when asked.
pub fn icosahedron_quadrant(
    outer_depth: f64,
    cavity_depth: f64,
    wall_width: f64,
    led_hole_size: f64,
    sections: u32,
    include_lenses: bool,
) -> Result<Solid> {
    let defaults = Config::default();
    Quadrant {
        outer_depth,
        cavity_depth,
        wall_width,
        led_hole_size,
        lip_size: defaults.lid_lip_size,
        tolerance: defaults.tolerance,
        lens_thickness: defaults.lens_thickness,
        sections,
        include_lenses,
    }
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::triangle_area;
    use crate::primitives::pyramid;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::{Point3, Rotation3, Vector3};

    #[test]
    fn placements_are_evenly_spaced() {
        for sections in [3, 5] {
            let p = placements(sections).unwrap();
            assert_eq!(p.len(), sections as usize);
            for pair in p.windows(2) {
                assert_relative_eq!(pair[1].yaw_deg - pair[0].yaw_deg, 360.0 / f64::from(sections));
            }
            assert_relative_eq!(p[0].yaw_deg, 0.0);
        }
        assert_relative_eq!(placements(5).unwrap()[1].yaw_deg, 72.0);
        assert_relative_eq!(placements(3).unwrap()[1].yaw_deg, 120.0);
    }

    #[test]
    fn zero_sections_is_an_error() {
        assert!(matches!(
            placements(0),
            Err(GeometryError::InvalidParameter { parameter: "sections", .. })
        ));
    }

    #[test]
    fn hinge_sends_face_center_to_origin() {
        // Icosahedron center of a face-down part sits at (0, 0, depth).
        let depth = 40.0;
        let placement = Placement {
            yaw_deg: 0.0,
            tilt_deg: dihedral_tilt_deg(depth),
        };
        let c = face_circumradius_from_radius(depth);
        let after_shift = Point3::new(c, 0.0, depth);
        let tilted = Rotation3::from_axis_angle(&Vector3::y_axis(), -placement.tilt_deg.to_radians()) * after_shift;
        assert_abs_diff_eq!(tilted.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(tilted.z, vertex_distance(depth), max_relative = 1e-12);
    }

    #[test]
    fn jig_volume_is_sum_of_lids() {
        let cfg = Config::default();
        let lid = ico_lid(cfg.led_hole_size, cfg.cavity_depth, cfg.wall_width, cfg.lid_lip_size, cfg.tolerance)
            .unwrap()
            .volume();
        let jig = Quadrant::from_config(&cfg, 3).build().unwrap();
        assert_relative_eq!(jig.volume(), 3.0 * lid, max_relative = 1e-4);
    }

    #[test]
    fn hinged_faces_close_around_the_vertex() {
        // Center-to-face pyramids: apex at the icosahedron center, base on the face.
        let depth = 40.0;
        let c = face_circumradius_from_radius(depth);
        let cone = pyramid(c, depth).unwrap();
        let fan = Solid::union_all(
            placements(5)
                .unwrap()
                .iter()
                .map(|p| hinge(&cone, depth, p)),
        );
        let mesh = vertex_up(fan, depth).evaluate();

        let near = |target: Point3<f64>| mesh.positions().iter().any(|p| (p - target).norm() < 1e-6);
        assert!(near(Point3::origin()));
        assert!(near(Point3::new(0.0, 0.0, -vertex_distance(depth))));

        let (_, hi) = mesh.bounding_box().unwrap();
        assert_abs_diff_eq!(hi.z, 0.0, epsilon = 1e-6);

        // Neighbouring faces share an edge without overlapping.
        assert_relative_eq!(mesh.volume(), 5.0 * triangle_area(c) * depth / 3.0, max_relative = 1e-6);
        assert!(mesh.is_closed());
    }

    #[test]
    fn jig_lips_stay_near_the_vertex_plane() {
        let cfg = Config::default();
        let jig = icosahedron_quadrant(70.0, 40.0, 1.0, 10.0, 5, false).unwrap();
        let (lo, hi) = jig.evaluate().bounding_box().unwrap();
        assert!(hi.z >= -1e-6 && hi.z < cfg.lid_lip_size);
        assert!(lo.z < -10.0);
    }

    #[test]
    fn lenses_toggle_adds_faces() {
        let without = icosahedron_quadrant(70.0, 40.0, 1.0, 10.0, 3, false).unwrap();
        let with = icosahedron_quadrant(70.0, 40.0, 1.0, 10.0, 3, true).unwrap();
        let lens_leaves = ico_lens(40.0, 70.0, 1.0, 1.5).unwrap().leaf_count();
        assert_eq!(with.leaf_count(), without.leaf_count() + 3 * lens_leaves);
    }
}
