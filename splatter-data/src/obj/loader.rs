//! OBJ file loading functions

use super::{IndexedMesh, ParseReport, RawMesh, RecordKind, parse_line};
use crate::error::ObjError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Flattened mesh plus the per-line outcome of the parse.
#[derive(Debug, Clone)]
pub struct ParsedObj {
    pub mesh: IndexedMesh,
    pub report: ParseReport,
}

/// Load and flatten an OBJ file.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn parse_obj(path: impl AsRef<Path>) -> Result<ParsedObj, ObjError> {
    let path = path.as_ref();
    debug!("Loading OBJ from: {}", path.display());
    let file = File::open(path).map_err(|source| {
        warn!("Failed to open OBJ file: {}", source);
        ObjError::Open {
            path: path.to_path_buf(),
            source,
        }
    })?;
    parse_obj_reader(BufReader::new(file))
}

/// Parse OBJ text from any buffered reader.
///
/// Malformed `v`/`vn`/`vt`/`f` lines are dropped and recorded in the report;
/// only I/O failures and inconsistent index streams are errors.
pub fn parse_obj_reader(reader: impl BufRead) -> Result<ParsedObj, ObjError> {
    let mut raw = RawMesh::new();
    let mut report = ParseReport::default();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        report.lines_read += 1;

        let Some(kind) = RecordKind::from_keyword(keyword) else {
            report.ignored_lines += 1;
            continue;
        };

        match parse_line(kind, tokens) {
            Ok(record) => raw.push(record),
            Err(reason) => {
                debug!("Skipping line {} ({}): {}", number + 1, kind, reason);
                report.skip(number + 1, kind, reason);
            }
        }
    }

    if !report.is_clean() {
        warn!("Skipped {} malformed OBJ lines", report.skipped_count());
    }

    info!(
        "OBJ parsed: {} positions, {} normals, {} texcoords, {} faces",
        raw.positions.len(),
        raw.normals.len(),
        raw.texcoords.len(),
        raw.face_count()
    );

    let mesh = raw.flatten()?;
    Ok(ParsedObj { mesh, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3, Vec4};

    fn parse(text: &str) -> ParsedObj {
        parse_obj_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_counts_without_normals() {
        let parsed = parse(
            "v 0 0 0\n\
             v 1 0 0\n\
             v 1 1 0\n\
             v 0 1 0\n\
             v 0 0 1\n\
             f 1 2 3\n\
             f 1 3 4\n",
        );
        assert!(!parsed.mesh.flattened);
        assert_eq!(parsed.mesh.positions.len(), 5);
        assert_eq!(parsed.mesh.indices.len(), 6);
        assert_eq!(parsed.mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(parsed.report.is_clean());
    }

    #[test]
    fn test_flatten_with_normals_and_texcoords() {
        let parsed = parse(
            "v 0 0 0\n\
             v 2 0 0\n\
             v 2 2 0\n\
             v 0 2 0\n\
             vt 0 0\n\
             vt 1 0\n\
             vt 1 1\n\
             vt 0 1\n\
             vn 0 0 1\n\
             f 1/1/1 2/2/1 3/3/1\n\
             f 1/1/1 3/3/1 4/4/1\n",
        );
        let mesh = &parsed.mesh;
        assert!(mesh.flattened);
        assert_eq!(mesh.positions.len(), 6);
        assert_eq!(mesh.normals.len(), 6);
        assert_eq!(mesh.uvs.len(), 6);
        assert_eq!(mesh.positions[5], Vec4::new(0.0, 2.0, 0.0, 1.0));
        assert_eq!(mesh.uvs[5], Vec2::new(0.0, 1.0));
        assert!(mesh.normals.iter().all(|n| *n == Vec3::Z));
    }

    #[test]
    fn test_empty_texture_slot() {
        let parsed = parse(
            "v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             vn 0 0 -1\n\
             f 1//1 2//1 3//1\n",
        );
        assert!(parsed.mesh.flattened);
        assert!(parsed.mesh.uvs.is_empty());
        assert_eq!(parsed.mesh.normals, vec![Vec3::NEG_Z; 3]);
    }

    #[test]
    fn test_short_vertex_line_is_skipped() {
        let parsed = parse(
            "v 1.0 2.0\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             f 1 2 3\n",
        );
        assert_eq!(parsed.mesh.positions.len(), 3);
        assert_eq!(parsed.mesh.positions[0], Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(parsed.report.skipped_count(), 1);
        assert_eq!(parsed.report.skipped[0].line, 1);
        assert_eq!(parsed.report.skipped[0].kind, RecordKind::Position);
    }

    #[test]
    fn test_non_finite_vertex_is_skipped() {
        for bad in ["v inf 0 0", "v nan 0 0", "v 1e39 0 0"] {
            let text = format!("{bad}\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
            let parsed = parse(&text);
            assert_eq!(parsed.report.skipped_count(), 1, "{bad}");
            assert_eq!(parsed.mesh.positions.len(), 3);
            assert!(parsed.mesh.positions.iter().all(|p| p.is_finite()));
        }
    }

    #[test]
    fn test_unknown_lines_are_ignored() {
        let parsed = parse(
            "# a comment\n\
             o thing\n\
             \n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             s off\n\
             f 1 2 3\n",
        );
        assert_eq!(parsed.report.lines_read, 7);
        assert_eq!(parsed.report.ignored_lines, 3);
        assert!(parsed.report.is_clean());
        assert_eq!(parsed.mesh.face_count(), 1);
    }

    #[test]
    fn test_bad_face_keeps_streams_aligned() {
        let parsed = parse(
            "v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             f 1 2 x\n\
             f 1 2\n\
             f 1 2 3\n",
        );
        assert_eq!(parsed.mesh.indices, vec![0, 1, 2]);
        assert_eq!(parsed.report.skipped_of(RecordKind::Face), 2);
    }

    #[test]
    fn test_out_of_range_face_is_an_error() {
        let result = parse_obj_reader("v 0 0 0\nv 1 0 0\nf 1 2 3\n".as_bytes());
        assert!(matches!(result, Err(ObjError::IndexOutOfRange { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = parse_obj("/definitely/not/here.obj");
        assert!(matches!(result, Err(ObjError::Open { .. })));
    }
}
