//! OpenSCAD rendering of an unevaluated [`Solid`] tree.
//!
//! Lets a part be re-rendered, inspected or edited in OpenSCAD without
//! running the booleans here.

use std::fmt::Write as _;

use crate::csg::Solid;
use crate::primitives::Polyhedron;

/// Renders `solid` as a self-contained OpenSCAD script.
pub fn render(solid: &Solid) -> String {
    let mut out = String::from("// generated by icolamp\n");
    write_node(&mut out, solid, 0);
    out
}

fn write_node(out: &mut String, solid: &Solid, depth: usize) {
    let pad = "  ".repeat(depth);
    match solid {
        Solid::Leaf { name, polyhedron } => {
            let _ = writeln!(out, "{pad}// {name}");
            write_polyhedron(out, polyhedron, &pad);
        }
        Solid::Union(children) => {
            let _ = writeln!(out, "{pad}union() {{");
            for child in children {
                write_node(out, child, depth + 1);
            }
            let _ = writeln!(out, "{pad}}}");
        }
        Solid::Difference { base, cutters } => {
            let _ = writeln!(out, "{pad}difference() {{");
            write_node(out, base, depth + 1);
            for cutter in cutters {
                write_node(out, cutter, depth + 1);
            }
            let _ = writeln!(out, "{pad}}}");
        }
        Solid::Transform { child, transform } => {
            let m = transform.to_homogeneous();
            let rows: Vec<String> = (0..4)
                .map(|r| format!("[{}, {}, {}, {}]", m[(r, 0)], m[(r, 1)], m[(r, 2)], m[(r, 3)]))
                .collect();
            let _ = writeln!(out, "{pad}multmatrix([{}]) {{", rows.join(", "));
            write_node(out, child, depth + 1);
            let _ = writeln!(out, "{pad}}}");
        }
    }
}

fn write_polyhedron(out: &mut String, polyhedron: &Polyhedron, pad: &str) {
    let points: Vec<String> = polyhedron
        .vertices()
        .iter()
        .map(|p| format!("[{}, {}, {}]", p.x, p.y, p.z))
        .collect();
    // OpenSCAD expects faces clockwise seen from outside.
    let faces: Vec<String> = polyhedron
        .faces()
        .iter()
        .map(|f| {
            let ids: Vec<String> = f.iter().rev().map(usize::to_string).collect();
            format!("[{}]", ids.join(", "))
        })
        .collect();
    let _ = writeln!(
        out,
        "{pad}polyhedron(points = [{}], faces = [{}]);",
        points.join(", "),
        faces.join(", ")
    );
}
