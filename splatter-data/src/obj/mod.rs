//! OBJ file loading and flattening

mod line;
mod loader;
mod raw;
mod report;

pub use line::{Corner, Record, RecordKind, parse_line};
pub use loader::{ParsedObj, parse_obj, parse_obj_reader};
pub use raw::{IndexedMesh, RawMesh};
pub use report::{ParseReport, SkippedLine};
