//! Stadium-shaped cutter for the barrel power jack.

use std::f64::consts::PI;

use nalgebra::Point2;
use tracing::debug;

use crate::csg::Solid;
use crate::error::{positive, Result};
use crate::primitives::{circle_area, cylinder, prism, CIRCLE_SEGMENTS};

/// Two circles of diameter `width` whose centers sit on the Y axis, joined by
/// the rectangle between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StadiumProfile {
    pub width: f64,
    pub height: f64,
}

impl StadiumProfile {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        positive("power width", width)?;
        positive("power height", height)?;
        Ok(Self { width, height })
    }

    pub fn radius(&self) -> f64 {
        self.width / 2.0
    }

    /// Distance between the two circle centers.
    pub fn center_spacing(&self) -> f64 {
        (self.height - self.width).abs()
    }

    pub fn centers(&self) -> [Point2<f64>; 2] {
        let half = self.center_spacing() / 2.0;
        [Point2::new(0.0, half), Point2::new(0.0, -half)]
    }

    /// Whether a straight mid-section exists between the end circles.
    pub fn has_mid_section(&self) -> bool {
        self.height > self.width
    }

    /// Cross-section area of the faceted cutter [`extrude`](Self::extrude) builds.
    pub fn area(&self) -> f64 {
        let r = self.radius();
        if self.has_mid_section() {
            circle_area(r, CIRCLE_SEGMENTS) + self.width * self.center_spacing()
        } else {
            // Overlapping discs: lens-shaped intersection counted once.
            let d = self.center_spacing();
            let lens = 2.0 * r * r * (d / (2.0 * r)).acos() - d / 2.0 * (4.0 * r * r - d * d).sqrt();
            2.0 * PI * r * r - lens
        }
    }

    /// Convex outline: the upper half circle around the top center, then the
    /// lower half around the bottom one, counter-clockwise.
    fn outline(&self) -> Vec<Point2<f64>> {
        let r = self.radius();
        let [top, bottom] = self.centers();
        let half = CIRCLE_SEGMENTS / 2;
        let arc = |center: Point2<f64>, from: u32| {
            (from..=from + half).map(move |k| {
                let a = PI * f64::from(k) / f64::from(half);
                Point2::new(center.x + r * a.cos(), center.y + r * a.sin())
            })
        };
        arc(top, 0).chain(arc(bottom, half)).collect()
    }

    /// Extrudes the profile along Z from 0 to `depth`.
    pub fn extrude(&self, depth: f64) -> Result<Solid> {
        positive("power depth", depth)?;
        if self.has_mid_section() {
            return Ok(Solid::leaf("stadium", prism(&self.outline(), depth)?));
        }

        // Degenerate mid-section: union the end circles only.
        let r = self.radius();
        let [top, bottom] = self.centers();
        let disc = cylinder(r, depth, CIRCLE_SEGMENTS)?;
        Ok(disc.translate(top.x, top.y, 0.0) + disc.translate(bottom.x, bottom.y, 0.0))
    }
}

/// Power jack cutter: a stadium `width` across and `height` tall, `depth` deep.
pub fn power_section(width: f64, height: f64, depth: f64) -> Result<Solid> {
    let profile = StadiumProfile::new(width, height)?;
    debug!(
        width,
        height,
        spacing = profile.center_spacing(),
        radius = profile.radius(),
        "power section"
    );
    profile.extrude(depth)
}
