//! The loaded, derived splat model.

use crate::derive::{
    DeriveOptions, Extrema, SplatSpace, normalize, splat_sizes, synthesize_normals,
};
use crate::error::ObjError;
use crate::obj::{IndexedMesh, ParseReport, ParsedObj, parse_obj, parse_obj_reader};
use glam::{Vec2, Vec3, Vec4};
use serde::Serialize;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info, warn};

/// A mesh ready for splat rendering.
///
/// Positions lie in `[-1, 1]` on every axis and `length` is 1. Everything is
/// read-only after construction except [`Model::set_scale`].
#[derive(Debug, Clone)]
pub struct Model {
    vertices: Vec<Vec4>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    splat_sizes: Vec<f32>,
    indices: Vec<u32>,
    flattened: bool,
    normals_synthesized: bool,
    midpoint: Vec3,
    length: f32,
    raw_length: f32,
    scale: f32,
    largest_abs_coordinate: f32,
    extrema: Extrema,
    report: ParseReport,
}

/// Serializable snapshot of a model's headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub vertices: usize,
    pub faces: usize,
    pub flattened: bool,
    pub has_uvs: bool,
    pub normals_synthesized: bool,
    pub midpoint: [f32; 3],
    pub length: f32,
    pub raw_length: f32,
    pub scale: f32,
    pub largest_abs_coordinate: f32,
    pub min_splat_size: f32,
    pub max_splat_size: f32,
    pub skipped_lines: usize,
    pub ignored_lines: usize,
}

impl Model {
    /// Load an OBJ file with default options.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ObjError> {
        Self::load_with_options(path, &DeriveOptions::default())
    }

    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_with_options(
        path: impl AsRef<Path>,
        options: &DeriveOptions,
    ) -> Result<Self, ObjError> {
        Self::from_parsed(parse_obj(path)?, options)
    }

    /// Build a model from OBJ text in any buffered reader.
    pub fn from_reader(reader: impl BufRead, options: &DeriveOptions) -> Result<Self, ObjError> {
        Self::from_parsed(parse_obj_reader(reader)?, options)
    }

    /// Run the derivation passes over an already parsed mesh.
    pub fn from_parsed(parsed: ParsedObj, options: &DeriveOptions) -> Result<Self, ObjError> {
        let ParsedObj { mesh, report } = parsed;
        let IndexedMesh {
            positions: mut vertices,
            normals,
            uvs,
            indices,
            flattened,
        } = mesh;

        if vertices.is_empty() {
            return Err(ObjError::EmptyMesh);
        }

        let normals_synthesized = normals.is_empty();
        let normals = if normals_synthesized {
            debug!("Synthesizing normals for {} vertices", vertices.len());
            synthesize_normals(&vertices, &indices)
        } else {
            normals
        };

        let measure_sizes = |positions: &[Vec4]| {
            splat_sizes(positions, &indices, options.splat_scale, options.splat_root)
        };
        let mut sizes = match options.splat_space {
            SplatSpace::Source => measure_sizes(&vertices),
            SplatSpace::Normalized => Vec::new(),
        };

        let extrema = Extrema::scan(&vertices).ok_or(ObjError::EmptyMesh)?;
        let raw_length = extrema.length(options.z_span);

        let divisor = if extrema.largest_abs > 0.0 {
            extrema.largest_abs
        } else {
            warn!("All vertices sit at the origin; skipping normalization");
            1.0
        };
        normalize(&mut vertices, divisor);
        let midpoint = extrema.midpoint() / divisor;

        if options.splat_space == SplatSpace::Normalized {
            sizes = measure_sizes(&vertices);
        }

        info!(
            "Model ready: {} vertices, {} faces, largest coordinate {}, length {}",
            vertices.len(),
            indices.len() / 3,
            extrema.largest_abs,
            raw_length
        );

        Ok(Self {
            vertices,
            normals,
            uvs,
            splat_sizes: sizes,
            indices,
            flattened,
            normals_synthesized,
            midpoint,
            length: 1.0,
            raw_length,
            scale: 1.0,
            largest_abs_coordinate: extrema.largest_abs,
            extrema,
            report,
        })
    }

    pub fn vertices(&self) -> &[Vec4] {
        &self.vertices
    }

    /// Per-vertex normals. Synthesized normals are not unit length.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Texture coordinates; empty when the file had none.
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub fn splat_sizes(&self) -> &[f32] {
        &self.splat_sizes
    }

    /// Face corner indices into [`Model::vertices`].
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn midpoint(&self) -> Vec3 {
        self.midpoint
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    /// Characteristic length in file units, before normalization.
    pub fn raw_length(&self) -> f32 {
        self.raw_length
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn largest_abs_coordinate(&self) -> f32 {
        self.largest_abs_coordinate
    }

    /// Axis extrema in file units.
    pub fn extrema(&self) -> &Extrema {
        &self.extrema
    }

    pub fn report(&self) -> &ParseReport {
        &self.report
    }

    pub fn is_flattened(&self) -> bool {
        self.flattened
    }

    pub fn normals_synthesized(&self) -> bool {
        self.normals_synthesized
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn summary(&self) -> ModelSummary {
        let (min_splat_size, max_splat_size) = self
            .splat_sizes
            .iter()
            .fold((f32::MAX, 0.0f32), |(lo, hi), &s| (lo.min(s), hi.max(s)));

        ModelSummary {
            vertices: self.vertex_count(),
            faces: self.face_count(),
            flattened: self.flattened,
            has_uvs: !self.uvs.is_empty(),
            normals_synthesized: self.normals_synthesized,
            midpoint: self.midpoint.to_array(),
            length: self.length,
            raw_length: self.raw_length,
            scale: self.scale,
            largest_abs_coordinate: self.largest_abs_coordinate,
            min_splat_size: min_splat_size.min(max_splat_size),
            max_splat_size,
            skipped_lines: self.report.skipped_count(),
            ignored_lines: self.report.ignored_lines,
        }
    }
}
