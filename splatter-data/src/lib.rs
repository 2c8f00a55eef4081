//! Splatter Data Crate
//!
//! OBJ mesh ingestion and the geometry behind point-splat rendering.
//! This crate is GPU-agnostic: it parses a triangulated mesh, flattens its
//! attribute streams, and derives normals, splat sizes and unit-volume
//! positions.

pub mod derive;
pub mod error;
pub mod model;
pub mod obj;

pub use derive::{DeriveOptions, Extrema, SplatSpace, ZSpan};
pub use error::{LineError, ObjError, Stream};
pub use model::{Model, ModelSummary};
pub use obj::{IndexedMesh, ParseReport, ParsedObj, RawMesh, parse_obj, parse_obj_reader};
