//! Indexed triangle mesh produced by evaluating a [`Solid`](crate::csg::Solid).
//!
//! The BSP booleans leave T-junctions wherever one side of a seam was split
//! and the other was not. [`Mesh::from_csg`] welds the polygons and splits
//! those edges again, so the exported shell is closed.

use std::collections::HashMap;

use nalgebra::Point3;
use tracing::debug;

use crate::csg::Csg;

/// Vertices closer than this are welded into one.
const WELD_TOLERANCE: f64 = 1e-7;

/// A vertex this close to an edge lies on it.
const EDGE_TOLERANCE: f64 = 1e-6;

/// A triangle mesh with shared vertices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Point3<f64>>,
    triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fan-triangulates the convex csgrs polygons, welds coincident
    /// vertices and repairs T-junctions.
    pub fn from_csg(csg: &Csg) -> Self {
        Self::from_loops(
            csg.polygons
                .iter()
                .map(|polygon| polygon.vertices.iter().map(|v| v.pos).collect()),
        )
    }

    fn from_loops(loops: impl IntoIterator<Item = Vec<Point3<f64>>>) -> Self {
        let mut mesh = Self::new();
        let mut index: HashMap<[i64; 3], u32> = HashMap::new();
        let mut vertex_id = |mesh: &mut Mesh, p: &Point3<f64>| -> u32 {
            let key = p.coords.map(|c| (c / WELD_TOLERANCE).round() as i64);
            *index.entry([key.x, key.y, key.z]).or_insert_with(|| {
                mesh.positions.push(*p);
                (mesh.positions.len() - 1) as u32
            })
        };

        for points in loops {
            let ids: Vec<u32> = points.iter().map(|p| vertex_id(&mut mesh, p)).collect();
            for i in 1..ids.len().saturating_sub(1) {
                mesh.triangles.push([ids[0], ids[i], ids[i + 1]]);
            }
        }

        mesh.drop_slivers();
        mesh.split_t_junctions();
        mesh
    }

    /// Removes triangles whose corners are collinear. Their long edge is
    /// restored by splitting the neighbour across it.
    fn drop_slivers(&mut self) {
        let before = self.triangles.len();
        let positions = &self.positions;
        self.triangles.retain(|&[a, b, c]| {
            if a == b || b == c || a == c {
                return false;
            }
            let [pa, pb, pc] = [a, b, c].map(|v| positions[v as usize]);
            let longest = (pb - pa).norm().max((pc - pb).norm()).max((pa - pc).norm());
            (pb - pa).cross(&(pc - pa)).norm() / longest >= EDGE_TOLERANCE
        });
        if self.triangles.len() != before {
            debug!(dropped = before - self.triangles.len(), "dropped sliver triangles");
        }
    }

    /// Re-triangulates every triangle with a vertex lying inside one of its
    /// edges as a fan around its centroid.
    fn split_t_junctions(&mut self) {
        let mut by_x: Vec<u32> = (0..self.positions.len() as u32).collect();
        by_x.sort_by(|&a, &b| self.positions[a as usize].x.total_cmp(&self.positions[b as usize].x));
        let xs: Vec<f64> = by_x.iter().map(|&v| self.positions[v as usize].x).collect();

        let mut split = 0;
        let mut triangles = Vec::with_capacity(self.triangles.len());
        for tri in std::mem::take(&mut self.triangles) {
            let mut ring = Vec::with_capacity(3);
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                ring.push(a);
                ring.extend(self.vertices_inside_edge(a, b, &by_x, &xs));
            }
            if ring.len() == 3 {
                triangles.push(tri);
                continue;
            }

            split += 1;
            let [pa, pb, pc] = tri.map(|v| self.positions[v as usize]);
            self.positions
                .push(Point3::from((pa.coords + pb.coords + pc.coords) / 3.0));
            let center = (self.positions.len() - 1) as u32;
            for k in 0..ring.len() {
                triangles.push([center, ring[k], ring[(k + 1) % ring.len()]]);
            }
        }
        self.triangles = triangles;

        if split > 0 {
            debug!(split, "repaired t-junctions");
        }
    }

    /// Vertices strictly between `a` and `b` on the segment, ordered from `a`.
    fn vertices_inside_edge(&self, a: u32, b: u32, by_x: &[u32], xs: &[f64]) -> Vec<u32> {
        let pa = self.positions[a as usize];
        let pb = self.positions[b as usize];
        let d = pb - pa;
        let len2 = d.norm_squared();

        let lo = xs.partition_point(|&x| x < pa.x.min(pb.x) - EDGE_TOLERANCE);
        let hi = xs.partition_point(|&x| x <= pa.x.max(pb.x) + EDGE_TOLERANCE);

        let mut inside: Vec<(f64, u32)> = by_x[lo..hi]
            .iter()
            .filter(|&&v| v != a && v != b)
            .filter_map(|&v| {
                let p = self.positions[v as usize];
                let t = (p - pa).dot(&d) / len2;
                let off_line = (p - (pa + d * t)).norm();
                (t > 0.0 && t < 1.0 && off_line < EDGE_TOLERANCE).then_some((t, v))
            })
            .collect();
        inside.sort_by(|x, y| x.0.total_cmp(&y.0));
        inside.into_iter().map(|(_, v)| v).collect()
    }

    /// Directed edges with no opposite twin. Zero for a closed shell.
    pub fn open_edge_count(&self) -> usize {
        let mut balance: HashMap<(u32, u32), i64> = HashMap::new();
        for &[a, b, c] in &self.triangles {
            for (from, to) in [(a, b), (b, c), (c, a)] {
                if from < to {
                    *balance.entry((from, to)).or_default() += 1;
                } else {
                    *balance.entry((to, from)).or_default() -= 1;
                }
            }
        }
        balance.values().map(|n| n.unsigned_abs() as usize).sum()
    }

    pub fn is_closed(&self) -> bool {
        self.open_edge_count() == 0
    }

    /// Rebuilds a csgrs solid from the repaired triangles, for its STL writers.
    pub fn to_csg(&self) -> Csg {
        let points: Vec<[f64; 3]> = self.positions.iter().map(|p| [p.x, p.y, p.z]).collect();
        let faces: Vec<Vec<usize>> = self
            .triangles
            .iter()
            .map(|t| t.iter().map(|&v| v as usize).collect())
            .collect();
        Csg::polyhedron(&points, &faces, None)
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Corner points of one triangle.
    pub fn triangle(&self, i: usize) -> [Point3<f64>; 3] {
        self.triangles[i].map(|v| self.positions[v as usize])
    }

    /// Enclosed volume via the divergence theorem. Positive for outward winding.
    pub fn volume(&self) -> f64 {
        (0..self.triangles.len())
            .map(|i| {
                let [a, b, c] = self.triangle(i);
                a.coords.dot(&b.coords.cross(&c.coords))
            })
            .sum::<f64>()
            / 6.0
    }

    pub fn surface_area(&self) -> f64 {
        (0..self.triangles.len())
            .map(|i| {
                let [a, b, c] = self.triangle(i);
                (b - a).cross(&(c - a)).norm() / 2.0
            })
            .sum()
    }

    /// Axis-aligned bounds as `(min, max)`, `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }
}
