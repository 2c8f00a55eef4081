//! Error types for OBJ loading and geometry derivation.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Attribute stream an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Position,
    Normal,
    TexCoord,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Position => write!(f, "position"),
            Stream::Normal => write!(f, "normal"),
            Stream::TexCoord => write!(f, "texture coordinate"),
        }
    }
}

/// Errors that stop a model from loading.
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read OBJ data: {0}")]
    Read(#[from] std::io::Error),

    #[error("{stream} index {index} is out of range ({len} entries)")]
    IndexOutOfRange {
        stream: Stream,
        index: u32,
        len: usize,
    },

    #[error("{stream} index stream has {found} entries, expected {expected}")]
    MisalignedIndices {
        stream: Stream,
        expected: usize,
        found: usize,
    },

    #[error("mesh has no vertices")]
    EmptyMesh,
}

/// Why a single `v`/`vn`/`vt`/`f` line was dropped.
///
/// These never abort a parse; they end up in the [`ParseReport`](crate::ParseReport).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineError {
    #[error("expected {expected} values, found {found}")]
    MissingValue { expected: usize, found: usize },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("non-finite number '{0}'")]
    NonFinite(String),

    #[error("invalid index '{0}'")]
    InvalidIndex(String),

    #[error("face needs 3 corners, found {found}")]
    MissingCorner { found: usize },
}
