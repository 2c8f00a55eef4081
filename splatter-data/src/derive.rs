//! Geometry derived from an indexed mesh: normals, splat sizes, bounds and
//! normalization.
//!
//! All passes take the position stream and the face index stream produced by
//! [`RawMesh::flatten`](crate::RawMesh::flatten). Indices are assumed to be in
//! range, which `flatten` guarantees.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Multiplier applied to every edge contribution.
pub const SPLAT_SCALE: f32 = 15.0;
/// Edge lengths are raised to this power before scaling.
pub const SPLAT_ROOT: f32 = 1.0 / 3.0;

/// How the z extent enters the characteristic length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZSpan {
    /// `close.z - far.z`.
    #[default]
    Corrected,
    /// `far.z - close.y`, the historical cross-axis formula.
    Legacy,
}

/// Which positions splat sizes are measured on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplatSpace {
    /// File coordinates, before normalization. Sizes are absolute.
    #[default]
    Source,
    /// Unit-volume coordinates, after normalization.
    Normalized,
}

/// Tunables for the derivation passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriveOptions {
    pub splat_scale: f32,
    pub splat_root: f32,
    pub splat_space: SplatSpace,
    pub z_span: ZSpan,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self {
            splat_scale: SPLAT_SCALE,
            splat_root: SPLAT_ROOT,
            splat_space: SplatSpace::Source,
            z_span: ZSpan::Corrected,
        }
    }
}

/// Accumulate un-normalized face normals into every corner of each face.
///
/// Each face adds `(b - a) × (c - a)` to its three vertices, so the result
/// weights faces by area and by how many faces share a vertex.
pub fn synthesize_normals(positions: &[Vec4], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for face in indices.chunks_exact(3) {
        let [a, b, c] = [face[0] as usize, face[1] as usize, face[2] as usize];
        let pa = positions[a].truncate();
        let normal = (positions[b].truncate() - pa).cross(positions[c].truncate() - pa);
        normals[a] += normal;
        normals[b] += normal;
        normals[c] += normal;
    }

    normals
}

/// Per-vertex splat size: the largest `scale * edge.powf(root)` over every
/// triangle edge touching the vertex.
pub fn splat_sizes(positions: &[Vec4], indices: &[u32], scale: f32, root: f32) -> Vec<f32> {
    let mut sizes = vec![0.0f32; positions.len()];

    for face in indices.chunks_exact(3) {
        let corners = [face[0] as usize, face[1] as usize, face[2] as usize];
        for k in 0..3 {
            let vertex = corners[k];
            let p = positions[vertex].truncate();
            for other in [corners[(k + 1) % 3], corners[(k + 2) % 3]] {
                let edge = p.distance(positions[other].truncate());
                sizes[vertex] = sizes[vertex].max(scale * edge.powf(root));
            }
        }
    }

    sizes
}

/// Extremal vertices along each axis plus the largest absolute coordinate.
///
/// Each extremum is a whole vertex, chosen by comparing a single axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrema {
    /// Smallest x.
    pub left: Vec4,
    /// Largest x.
    pub right: Vec4,
    /// Smallest y.
    pub bottom: Vec4,
    /// Largest y.
    pub top: Vec4,
    /// Smallest z.
    pub far: Vec4,
    /// Largest z.
    pub close: Vec4,
    /// Largest `|x|`, `|y|` or `|z|` over all vertices.
    pub largest_abs: f32,
}

impl Extrema {
    /// Scan all positions, seeding every extremum with the first vertex.
    ///
    /// Returns `None` for an empty slice.
    pub fn scan(positions: &[Vec4]) -> Option<Self> {
        let first = *positions.first()?;
        let mut extrema = Self {
            left: first,
            right: first,
            bottom: first,
            top: first,
            far: first,
            close: first,
            largest_abs: 0.0,
        };

        for &p in positions {
            if p.x < extrema.left.x {
                extrema.left = p;
            }
            if p.x > extrema.right.x {
                extrema.right = p;
            }
            if p.y > extrema.top.y {
                extrema.top = p;
            }
            if p.y < extrema.bottom.y {
                extrema.bottom = p;
            }
            if p.z > extrema.close.z {
                extrema.close = p;
            }
            if p.z < extrema.far.z {
                extrema.far = p;
            }
            extrema.largest_abs = extrema.largest_abs.max(p.truncate().abs().max_element());
        }

        Some(extrema)
    }

    /// Centre of the axis extrema.
    pub fn midpoint(&self) -> Vec3 {
        Vec3::new(
            (self.left.x + self.right.x) / 2.0,
            (self.bottom.y + self.top.y) / 2.0,
            (self.close.z + self.far.z) / 2.0,
        )
    }

    /// Extent along each axis.
    pub fn spans(&self, z_span: ZSpan) -> Vec3 {
        let z = match z_span {
            ZSpan::Corrected => self.close.z - self.far.z,
            ZSpan::Legacy => self.far.z - self.close.y,
        };
        Vec3::new(self.right.x - self.left.x, self.top.y - self.bottom.y, z)
    }

    /// Characteristic length: the largest axis span.
    pub fn length(&self, z_span: ZSpan) -> f32 {
        self.spans(z_span).max_element()
    }
}

/// Divide x, y and z of every position by `divisor`. `w` stays 1.
pub fn normalize(positions: &mut [Vec4], divisor: f32) {
    for p in positions.iter_mut() {
        *p = (p.truncate() / divisor).extend(p.w);
    }
}
