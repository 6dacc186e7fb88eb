//! Base: the bottom face of the lamp, extended downward into a hollow skirt
//! that houses the power jack and carries the switch.
//!
//! Coordinates follow the other face-down parts: the outer face lies on z = 0
//! with its first corner on +X, so the back edge (through the corners at 120°
//! and 240°) runs parallel to Y at x = -R/2. The skirt hangs below z = 0.

use tracing::debug;

use crate::config::Config;
use crate::csg::Solid;
use crate::error::{derived_positive, positive, GeometryError, Result};
use crate::geometry::{edge_length_from_radius, face_circumradius_from_radius, inset_circumradius};
use crate::power::power_section;
use crate::primitives::{centered_cylinder, cuboid, extruded_triangle, pyramid, CIRCLE_SEGMENTS};
use crate::shapes::{ico_section, OVERLAP};

/// Dimensions of the base derived from the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseLayout {
    pub inner_depth: f64,
    pub outer_depth: f64,
    pub wall_width: f64,
    /// Height of the vertical skirt below the face.
    pub additional_height: f64,
    /// How far the jack standoff protrudes behind the back edge.
    pub square_height: f64,
    pub power_outer_diameter: f64,
    pub power_horiz_diameter: f64,
    pub power_vert_diameter: f64,
    pub power_height_from_base: f64,
    pub switch_diameter: f64,
}

impl BaseLayout {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            inner_depth: cfg.cavity_depth,
            outer_depth: cfg.outer_depth(),
            wall_width: cfg.wall_width,
            additional_height: cfg.base_additional_height,
            square_height: cfg.base_square_height,
            power_outer_diameter: cfg.power_outer_diameter(),
            power_horiz_diameter: cfg.power_horiz_diameter,
            power_vert_diameter: cfg.power_vert_diameter,
            power_height_from_base: cfg.power_height_from_base,
            switch_diameter: cfg.switch_diameter,
        }
    }

    /// Circumradius of the base face.
    pub fn radius(&self) -> f64 {
        face_circumradius_from_radius(self.outer_depth)
    }

    /// Distance from the face center back to the back edge: `-R cos 120°`.
    pub fn standoff_base_start(&self) -> f64 {
        -self.radius() * 120f64.to_radians().cos()
    }

    /// Slope of the back face against the horizontal, in degrees.
    pub fn face_angle_deg(&self) -> f64 {
        (self.outer_depth / self.standoff_base_start()).atan().to_degrees()
    }

    /// Distance from the back edge to the switch center, along the back face.
    pub fn switch_offset(&self) -> f64 {
        self.switch_diameter + self.wall_width
    }

    /// Center of the switch bore on the back face.
    pub fn switch_center(&self) -> [f64; 3] {
        let theta = self.face_angle_deg().to_radians();
        let u = self.switch_offset();
        [-self.standoff_base_start() + u * theta.cos(), 0.0, u * theta.sin()]
    }

    /// Top of the standoff box above the skirt bottom.
    fn standoff_top(&self) -> f64 {
        self.power_height_from_base + self.power_outer_diameter / 2.0
    }

    pub fn validate(&self) -> Result<()> {
        positive("wall_width", self.wall_width)?;
        positive("base_additional_height", self.additional_height)?;
        positive("base_square_height", self.square_height)?;
        positive("power_outer_diameter", self.power_outer_diameter)?;
        positive("power_height_from_base", self.power_height_from_base)?;
        positive("switch_diameter", self.switch_diameter)?;
        if self.inner_depth >= self.outer_depth {
            return Err(GeometryError::InvalidParameter {
                parameter: "inner_depth",
                value: self.inner_depth,
                invariant: "must be smaller than outer_depth",
            });
        }

        let edge = edge_length_from_radius(self.outer_depth);
        if self.power_outer_diameter >= edge {
            return Err(GeometryError::InvalidParameter {
                parameter: "power_outer_diameter",
                value: self.power_outer_diameter,
                invariant: "standoff must be narrower than the back edge",
            });
        }
        if self.standoff_top() > self.additional_height {
            return Err(GeometryError::InvalidParameter {
                parameter: "power_height_from_base",
                value: self.power_height_from_base,
                invariant: "standoff must fit below the face",
            });
        }
        let opening = self.power_outer_diameter - 2.0 * self.wall_width;
        for (parameter, value) in [
            ("power_horiz_diameter", self.power_horiz_diameter),
            ("power_vert_diameter", self.power_vert_diameter),
        ] {
            positive(parameter, value)?;
            if value > opening {
                return Err(GeometryError::InvalidParameter {
                    parameter,
                    value,
                    invariant: "jack opening must fit inside the standoff walls",
                });
            }
        }
        if self.power_height_from_base <= self.power_vert_diameter / 2.0 {
            return Err(GeometryError::InvalidParameter {
                parameter: "power_height_from_base",
                value: self.power_height_from_base,
                invariant: "jack opening must clear the skirt bottom",
            });
        }

        let slant = (self.outer_depth - self.inner_depth) / self.face_angle_deg().to_radians().sin();
        if self.switch_offset() + self.switch_diameter / 2.0 >= slant {
            return Err(GeometryError::InvalidParameter {
                parameter: "switch_diameter",
                value: self.switch_diameter,
                invariant: "switch bore must fit on the back face",
            });
        }
        Ok(())
    }

    /// Builds the base.
    pub fn build(&self) -> Result<Solid> {
        self.validate()?;

        let r = self.radius();
        let s = self.standoff_base_start();
        let w = self.wall_width;
        let add = self.additional_height;
        let sq = self.square_height;
        let pod = self.power_outer_diameter;
        let inner_r = derived_positive("base interior radius", inset_circumradius(r, w))?;
        debug!(radius = r, standoff_base_start = s, face_angle = self.face_angle_deg(), "base layout");

        // Shell
        let extension = extruded_triangle(r, -add)?;
        let section = ico_section(self.inner_depth, self.outer_depth)?;
        let standoff = cuboid(sq + w / 2.0, pod, self.standoff_top())?.translate(-s - sq, -pod / 2.0, -add);

        // Standoff interior, open at the bottom and into the skirt
        let standoff_interior = cuboid(sq + OVERLAP, pod - 2.0 * w, self.standoff_top() - w + OVERLAP)?
            .translate(-s - sq + w, -(pod / 2.0 - w), -add - OVERLAP);

        // Switch bore, normal to the back face
        let [sx, sy, sz] = self.switch_center();
        let switch = centered_cylinder(self.switch_diameter / 2.0, 6.0 * w, CIRCLE_SEGMENTS)?
            .rotate(0.0, -self.face_angle_deg(), 0.0)
            .translate(sx, sy, sz);

        // Hollow interiors
        let pyramid_interior = pyramid(inner_r, self.outer_depth)?;
        let extension_interior =
            extruded_triangle(inner_r, add + 2.0 * OVERLAP)?.translate(0.0, 0.0, -add - OVERLAP);

        // Jack opening through the standoff's back wall
        let jack = power_section(self.power_horiz_diameter, self.power_vert_diameter, 4.0 * w)?
            .rotate(90.0, 0.0, 90.0)
            .translate(-s - sq - 2.0 * w, 0.0, -add + self.power_height_from_base);

        Ok(extension + section + standoff
            - standoff_interior
            - switch
            - pyramid_interior
            - extension_interior
            - jack)
    }
}

/// Base with the jack standoff and switch bore, from the lamp configuration.
pub fn base(cfg: &Config) -> Result<Solid> {
    BaseLayout::from_config(cfg).build()
}
