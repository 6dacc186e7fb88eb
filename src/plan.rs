//! The printable parts and how many of each one lamp needs.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::base::base;
use crate::base_lid::base_lid;
use crate::config::Config;
use crate::csg::Solid;
use crate::error::Result;
use crate::quadrant::Quadrant;
use crate::shapes::{ico_lens, ico_lid};

/// One LED sits behind each lens-bearing face.
pub const NUM_LEDS: usize = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Part {
    Lens,
    Lid,
    Base,
    BaseCap,
    /// Gluing jig with five faces around a vertex.
    Quadrant5,
    /// Gluing jig with three faces.
    Quadrant3,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown part {0:?} (expected one of: lens, lid, base, base_cap, quadrant5, quadrant3)")]
pub struct UnknownPart(pub String);

impl Part {
    pub const ALL: [Part; 6] = [
        Part::Lid,
        Part::Quadrant5,
        Part::Quadrant3,
        Part::Lens,
        Part::Base,
        Part::BaseCap,
    ];

    /// File stem used on export.
    pub fn name(self) -> &'static str {
        match self {
            Part::Lens => "lens",
            Part::Lid => "lid",
            Part::Base => "base",
            Part::BaseCap => "base_cap",
            Part::Quadrant5 => "quadrant5",
            Part::Quadrant3 => "quadrant3",
        }
    }

    pub fn build(self, cfg: &Config) -> Result<Solid> {
        match self {
            Part::Lens => ico_lens(cfg.cavity_depth, cfg.outer_depth(), cfg.wall_width, cfg.lens_thickness),
            Part::Lid => ico_lid(
                cfg.led_hole_size,
                cfg.cavity_depth,
                cfg.wall_width,
                cfg.lid_lip_size,
                cfg.tolerance,
            ),
            Part::Base => base(cfg),
            Part::BaseCap => base_lid(cfg.outer_depth(), cfg.wall_width, cfg.lid_lip_size, cfg.tolerance),
            Part::Quadrant5 => Quadrant::from_config(cfg, 5).build(),
            Part::Quadrant3 => Quadrant::from_config(cfg, 3).build(),
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Part {
    type Err = UnknownPart;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Part::ALL
            .into_iter()
            .find(|part| part.name() == s.replace('-', "_"))
            .ok_or_else(|| UnknownPart(s.to_string()))
    }
}

/// Parts with the quantity printed for one lamp, in print order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    entries: Vec<(Part, usize)>,
}

impl BuildPlan {
    /// The full lamp: one lens per LED.
    pub fn lamp() -> Self {
        Self {
            entries: vec![
                (Part::Lid, 1),
                (Part::Quadrant5, 3),
                (Part::Quadrant3, 1),
                (Part::Lens, NUM_LEDS),
                (Part::Base, 1),
                (Part::BaseCap, 1),
            ],
        }
    }

    pub fn entries(&self) -> &[(Part, usize)] {
        &self.entries
    }

    pub fn quantity(&self, part: Part) -> usize {
        self.entries
            .iter()
            .filter(|(p, _)| *p == part)
            .map(|(_, n)| n)
            .sum()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lamp_plan_quantities() {
        let plan = BuildPlan::lamp();
        assert_eq!(plan.quantity(Part::Lid), 1);
        assert_eq!(plan.quantity(Part::Quadrant5), 3);
        assert_eq!(plan.quantity(Part::Quadrant3), 1);
        assert_eq!(plan.quantity(Part::Lens), NUM_LEDS);
        assert_eq!(plan.quantity(Part::Base), 1);
        assert_eq!(plan.quantity(Part::BaseCap), 1);
        assert_eq!(plan.total(), 26);
        assert_eq!(plan.entries().len(), Part::ALL.len());
    }

    #[test]
    fn part_names_round_trip() {
        for part in Part::ALL {
            assert_eq!(part.name().parse::<Part>().unwrap(), part);
        }
        assert_eq!("base-cap".parse::<Part>().unwrap(), Part::BaseCap);
        assert_eq!(Part::Quadrant5.to_string(), "quadrant5");
    }

    #[test]
    fn unknown_part_is_reported() {
        let err = "lampshade".parse::<Part>().unwrap_err();
        assert_eq!(err, UnknownPart("lampshade".into()));
        assert!(err.to_string().contains("lampshade"));
    }

    #[test]
    fn lens_and_lid_build_from_defaults() {
        let cfg = Config::default();
        assert!(Part::Lens.build(&cfg).unwrap().volume() > 0.0);
        assert!(Part::Lid.build(&cfg).unwrap().volume() > 0.0);
        assert!(Part::BaseCap.build(&cfg).unwrap().volume() > 0.0);
    }

    #[test]
    fn invalid_config_fails_to_build() {
        let cfg = Config {
            lens_thickness: 35.0,
            ..Config::default()
        };
        assert!(Part::Lens.build(&cfg).is_err());
    }
}
