//! Writing parts to disk: binary or ASCII STL of the evaluated mesh through
//! csgrs's writers, or an OpenSCAD script of the construction tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};

use crate::csg::Solid;
use crate::error::ExportError;
use crate::scad;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    BinaryStl,
    AsciiStl,
    Scad,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::BinaryStl | ExportFormat::AsciiStl => "stl",
            ExportFormat::Scad => "scad",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stl" => Ok(ExportFormat::BinaryStl),
            "stl-ascii" | "ascii" => Ok(ExportFormat::AsciiStl),
            "scad" => Ok(ExportFormat::Scad),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Writes `solid` to `dir/name.<ext>` and returns the path.
pub fn write_part(solid: &Solid, dir: &Path, name: &str, format: ExportFormat) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{name}.{}", format.extension()));

    match format {
        ExportFormat::Scad => {
            fs::write(&path, scad::render(solid))?;
            info!(part = name, path = %path.display(), leaves = solid.leaf_count(), "wrote OpenSCAD script");
        }
        ExportFormat::BinaryStl | ExportFormat::AsciiStl => {
            let mesh = solid.evaluate();
            if mesh.is_empty() {
                return Err(ExportError::EmptyGeometry(name.to_string()));
            }
            let open_edges = mesh.open_edge_count();
            if open_edges > 0 {
                warn!(part = name, open_edges, "mesh is not closed");
            }

            let csg = mesh.to_csg();
            match format {
                ExportFormat::AsciiStl => fs::write(&path, csg.to_stl_ascii(name))?,
                _ => fs::write(&path, csg.to_stl_binary(name)?)?,
            }
            info!(
                part = name,
                path = %path.display(),
                triangles = mesh.triangle_count(),
                volume = mesh.volume(),
                area = mesh.surface_area(),
                "wrote STL"
            );
        }
    }
    Ok(path)
}
