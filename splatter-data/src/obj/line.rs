//! Per-line record handlers.
//!
//! Each handler consumes the tokens after the record keyword and either
//! yields a value or a [`LineError`] describing why the line was dropped.

use crate::error::LineError;
use glam::{Vec2, Vec3, Vec4};
use std::fmt;

/// Record keywords the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// `v x y z`
    Position,
    /// `vn x y z`
    Normal,
    /// `vt u v`
    TexCoord,
    /// `f a/b/c a/b/c a/b/c`
    Face,
}

impl RecordKind {
    /// Map the first token of a line to a record kind.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "v" => Some(RecordKind::Position),
            "vn" => Some(RecordKind::Normal),
            "vt" => Some(RecordKind::TexCoord),
            "f" => Some(RecordKind::Face),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            RecordKind::Position => "v",
            RecordKind::Normal => "vn",
            RecordKind::TexCoord => "vt",
            RecordKind::Face => "f",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One parsed record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Record {
    Position(Vec4),
    Normal(Vec3),
    TexCoord(Vec2),
    Face([Corner; 3]),
}

/// A single face corner with 0-based indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Corner {
    pub position: u32,
    pub texcoord: Option<u32>,
    pub normal: Option<u32>,
}

impl Corner {
    /// Parse `a`, `a/b`, `a//c` or `a/b/c`.
    ///
    /// Empty texture or normal slots are skipped; the position slot is mandatory.
    pub fn parse(token: &str) -> Result<Self, LineError> {
        let mut slots = token.split('/');
        let position = parse_index(slots.next().unwrap_or_default())?;
        let texcoord = parse_optional_index(slots.next())?;
        let normal = parse_optional_index(slots.next())?;
        Ok(Self {
            position,
            texcoord,
            normal,
        })
    }
}

/// Parse a line's record given its kind and the tokens following the keyword.
pub fn parse_line<'a>(
    kind: RecordKind,
    mut tokens: impl Iterator<Item = &'a str>,
) -> Result<Record, LineError> {
    match kind {
        RecordKind::Position => {
            let [x, y, z] = read_floats::<3>(&mut tokens)?;
            Ok(Record::Position(Vec4::new(x, y, z, 1.0)))
        }
        RecordKind::Normal => {
            read_floats::<3>(&mut tokens).map(|v| Record::Normal(Vec3::from_array(v)))
        }
        RecordKind::TexCoord => {
            read_floats::<2>(&mut tokens).map(|v| Record::TexCoord(Vec2::from_array(v)))
        }
        RecordKind::Face => read_face(&mut tokens).map(Record::Face),
    }
}

/// Read exactly `N` floats; anything after them is ignored.
fn read_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Result<[f32; N], LineError> {
    let mut values = [0.0; N];
    for (found, slot) in values.iter_mut().enumerate() {
        let token = tokens.next().ok_or(LineError::MissingValue { expected: N, found })?;
        let value: f32 = token
            .parse()
            .map_err(|_| LineError::InvalidNumber(token.to_string()))?;
        // `inf`, `nan` and overflowing literals like `1e39` parse fine but
        // would poison the bounds scan.
        if !value.is_finite() {
            return Err(LineError::NonFinite(token.to_string()));
        }
        *slot = value;
    }
    Ok(values)
}

// Triangles only: corners past the third are not read.
fn read_face<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<[Corner; 3], LineError> {
    let mut corners = [Corner::default(); 3];
    for (found, corner) in corners.iter_mut().enumerate() {
        let token = tokens.next().ok_or(LineError::MissingCorner { found })?;
        *corner = Corner::parse(token)?;
    }
    Ok(corners)
}

/// 1-based OBJ index to 0-based.
fn parse_index(token: &str) -> Result<u32, LineError> {
    match token.parse::<u32>() {
        Ok(index) if index > 0 => Ok(index - 1),
        _ => Err(LineError::InvalidIndex(token.to_string())),
    }
}

fn parse_optional_index(slot: Option<&str>) -> Result<Option<u32>, LineError> {
    match slot {
        None | Some("") => Ok(None),
        Some(token) => parse_index(token).map(Some),
    }
}
