//! Interleaved vertex layout for uploading a model to a GPU buffer.

use glam::{Vec2, Vec3};
use splatter_data::Model;

/// One splat as the point shader consumes it.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct SplatVertex {
    /// Normalized xyz position and splat size packed into w.
    pub position_size: [f32; 4],
    /// Normal in xyz, w unused.
    pub normal: [f32; 4],
    pub uv: [f32; 2],
    pub _padding: [f32; 2],
}

/// Per-model shader constants.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct ModelUniforms {
    /// Midpoint in xyz, w unused.
    pub midpoint: [f32; 4],
    pub length: f32,
    pub scale: f32,
    pub _padding: [f32; 2],
}

impl ModelUniforms {
    pub fn from_model(model: &Model) -> Self {
        Self {
            midpoint: model.midpoint().extend(0.0).to_array(),
            length: model.length(),
            scale: model.scale(),
            _padding: [0.0; 2],
        }
    }
}

/// Interleave the model's parallel streams.
///
/// Streams the model does not carry (uvs for most meshes) are zero-filled.
pub fn pack(model: &Model) -> Vec<SplatVertex> {
    let normals = model.normals();
    let uvs = model.uvs();
    let sizes = model.splat_sizes();

    model
        .vertices()
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let normal = normals.get(i).copied().unwrap_or(Vec3::ZERO);
            let uv = uvs.get(i).copied().unwrap_or(Vec2::ZERO);
            let size = sizes.get(i).copied().unwrap_or(0.0);
            SplatVertex {
                position_size: v.truncate().extend(size).to_array(),
                normal: normal.extend(0.0).to_array(),
                uv: uv.to_array(),
                _padding: [0.0; 2],
            }
        })
        .collect()
}

/// View packed vertices as raw bytes for upload.
pub fn as_bytes(vertices: &[SplatVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}
