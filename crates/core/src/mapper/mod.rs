//! Mapping of source paths onto destination trees.
//!
//! A source file at `<source_root>/<rel_dir>/<name>` maps to
//! `<destination_root>/<rel_dir>/<name'>`, where the destination root is
//! expanded (`~`, relative paths) and lexically normalized. `name'` never
//! starts with a dot. Transcoded files additionally have their audio suffix
//! replaced by the output extension.
//!
//! Everything here is pure: no filesystem access happens while mapping.

mod error;
mod path_mapper;

pub use error::MappingError;
pub use path_mapper::{
    converted_file_name, expand_root, map_destination, normalize_lexically, PathMapper,
    PathMapping,
};
