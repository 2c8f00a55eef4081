//! Raw attribute streams and the flatten step.

use super::{Corner, Record};
use crate::error::{ObjError, Stream};
use glam::{Vec2, Vec3, Vec4};
use tracing::debug;

/// Attribute and index streams exactly as they appear in the file.
///
/// Each stream keeps its own indexing; [`RawMesh::flatten`] reconciles them.
#[derive(Debug, Clone, Default)]
pub struct RawMesh {
    pub positions: Vec<Vec4>,
    pub normals: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
    /// One entry per face corner, 0-based. Always a multiple of 3 long.
    pub position_indices: Vec<u32>,
    /// Empty unless faces name normals.
    pub normal_indices: Vec<u32>,
    /// Empty unless faces name texture coordinates.
    pub tex_indices: Vec<u32>,
}

/// Vertex streams addressed by a single index stream.
///
/// When `flattened` is set every stream holds one entry per face corner and
/// `indices` is `0..n`. Otherwise `positions` are the raw file positions,
/// `indices` the raw position indices, and `normals`/`uvs` are empty.
#[derive(Debug, Clone, Default)]
pub struct IndexedMesh {
    pub positions: Vec<Vec4>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub flattened: bool,
}

impl RawMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        match record {
            Record::Position(p) => self.positions.push(p),
            Record::Normal(n) => self.normals.push(n),
            Record::TexCoord(t) => self.texcoords.push(t),
            Record::Face(corners) => self.push_face(&corners),
        }
    }

    pub fn push_face(&mut self, corners: &[Corner; 3]) {
        for corner in corners {
            self.position_indices.push(corner.position);
            if let Some(t) = corner.texcoord {
                self.tex_indices.push(t);
            }
            if let Some(n) = corner.normal {
                self.normal_indices.push(n);
            }
        }
    }

    pub fn face_count(&self) -> usize {
        self.position_indices.len() / 3
    }

    /// Whether flattening will rewrite the streams.
    pub fn needs_flatten(&self) -> bool {
        !self.normals.is_empty() || !self.texcoords.is_empty()
    }

    /// Rewrite the streams into one entry per face corner.
    ///
    /// Only happens when the file had normals or texture coordinates; a
    /// positions-only mesh keeps its shared vertices and index stream.
    pub fn flatten(self) -> Result<IndexedMesh, ObjError> {
        check_range(Stream::Position, &self.position_indices, self.positions.len())?;

        if !self.needs_flatten() {
            debug!(
                "No normals or texture coordinates; keeping {} shared vertices",
                self.positions.len()
            );
            return Ok(IndexedMesh {
                positions: self.positions,
                normals: Vec::new(),
                uvs: Vec::new(),
                indices: self.position_indices,
                flattened: false,
            });
        }

        let corners = self.position_indices.len();
        check_aligned(Stream::Normal, &self.normal_indices, corners)?;
        check_aligned(Stream::TexCoord, &self.tex_indices, corners)?;
        check_range(Stream::Normal, &self.normal_indices, self.normals.len())?;
        check_range(Stream::TexCoord, &self.tex_indices, self.texcoords.len())?;

        let positions: Vec<Vec4> = self
            .position_indices
            .iter()
            .map(|&i| self.positions[i as usize])
            .collect();
        let normals: Vec<Vec3> = self
            .normal_indices
            .iter()
            .map(|&i| self.normals[i as usize])
            .collect();
        let uvs: Vec<Vec2> = self
            .tex_indices
            .iter()
            .map(|&i| self.texcoords[i as usize])
            .collect();

        debug!(
            "Flattened {} positions, {} normals, {} texcoords into {} corners",
            self.positions.len(),
            self.normals.len(),
            self.texcoords.len(),
            corners
        );

        Ok(IndexedMesh {
            positions,
            normals,
            uvs,
            indices: (0..corners as u32).collect(),
            flattened: true,
        })
    }
}

impl IndexedMesh {
    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn check_range(stream: Stream, indices: &[u32], len: usize) -> Result<(), ObjError> {
    match indices.iter().find(|&&i| i as usize >= len) {
        Some(&index) => Err(ObjError::IndexOutOfRange { stream, index, len }),
        None => Ok(()),
    }
}

// A partially indexed stream cannot be lined up with the position corners.
fn check_aligned(stream: Stream, indices: &[u32], expected: usize) -> Result<(), ObjError> {
    if indices.is_empty() || indices.len() == expected {
        Ok(())
    } else {
        Err(ObjError::MisalignedIndices {
            stream,
            expected,
            found: indices.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(position: u32, texcoord: Option<u32>, normal: Option<u32>) -> Corner {
        Corner {
            position,
            texcoord,
            normal,
        }
    }

    fn quad_positions() -> Vec<Vec4> {
        vec![
            Vec4::new(0.0, 0.0, 0.0, 1.0),
            Vec4::new(1.0, 0.0, 0.0, 1.0),
            Vec4::new(1.0, 1.0, 0.0, 1.0),
            Vec4::new(0.0, 1.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn test_positions_only_stays_shared() {
        let mut raw = RawMesh::new();
        raw.positions = quad_positions();
        raw.push_face(&[corner(0, None, None), corner(1, None, None), corner(2, None, None)]);
        raw.push_face(&[corner(0, None, None), corner(2, None, None), corner(3, None, None)]);

        let mesh = raw.flatten().unwrap();
        assert!(!mesh.flattened);
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(mesh.normals.is_empty());
    }

    #[test]
    fn test_flatten_aligns_corners() {
        let mut raw = RawMesh::new();
        raw.positions = quad_positions();
        raw.normals = vec![Vec3::Z, Vec3::NEG_Z];
        raw.push_face(&[corner(0, None, Some(0)), corner(1, None, Some(0)), corner(2, None, Some(0))]);
        raw.push_face(&[corner(0, None, Some(1)), corner(2, None, Some(1)), corner(3, None, Some(1))]);

        let mesh = raw.flatten().unwrap();
        assert!(mesh.flattened);
        assert_eq!(mesh.positions.len(), 6);
        assert_eq!(mesh.normals.len(), 6);
        assert!(mesh.uvs.is_empty());
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.positions[4], Vec4::new(1.0, 1.0, 0.0, 1.0));
        assert_eq!(mesh.normals[2], Vec3::Z);
        assert_eq!(mesh.normals[3], Vec3::NEG_Z);
    }

    #[test]
    fn test_texcoords_alone_trigger_flatten() {
        let mut raw = RawMesh::new();
        raw.positions = quad_positions();
        raw.texcoords = vec![Vec2::ZERO, Vec2::X, Vec2::ONE];
        raw.push_face(&[corner(3, Some(0), None), corner(1, Some(1), None), corner(2, Some(2), None)]);

        let mesh = raw.flatten().unwrap();
        assert!(mesh.flattened);
        assert_eq!(mesh.positions[0], Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(mesh.uvs, vec![Vec2::ZERO, Vec2::X, Vec2::ONE]);
        assert!(mesh.normals.is_empty());
    }

    #[test]
    fn test_unreferenced_normals_are_dropped() {
        let mut raw = RawMesh::new();
        raw.positions = quad_positions();
        raw.normals = vec![Vec3::Z];
        raw.push_face(&[corner(0, None, None), corner(1, None, None), corner(2, None, None)]);

        let mesh = raw.flatten().unwrap();
        assert!(mesh.flattened);
        assert_eq!(mesh.positions.len(), 3);
        assert!(mesh.normals.is_empty());
    }

    #[test]
    fn test_out_of_range_position() {
        let mut raw = RawMesh::new();
        raw.positions = quad_positions();
        raw.push_face(&[corner(0, None, None), corner(1, None, None), corner(9, None, None)]);

        match raw.flatten() {
            Err(ObjError::IndexOutOfRange { stream, index, len }) => {
                assert_eq!(stream, Stream::Position);
                assert_eq!(index, 9);
                assert_eq!(len, 4);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_partial_normal_indices_are_misaligned() {
        let mut raw = RawMesh::new();
        raw.positions = quad_positions();
        raw.normals = vec![Vec3::Z];
        raw.push_face(&[corner(0, None, Some(0)), corner(1, None, Some(0)), corner(2, None, Some(0))]);
        raw.push_face(&[corner(0, None, None), corner(2, None, None), corner(3, None, None)]);

        assert!(matches!(
            raw.flatten(),
            Err(ObjError::MisalignedIndices {
                stream: Stream::Normal,
                expected: 6,
                found: 3
            })
        ));
    }
}
