//! Frontmatter parsing and template schema extraction for vault documents
//!
//! Pure functions with no I/O - actual filesystem operations live in the
//! validator crate's storage layer.

mod frontmatter;
mod paths;
mod schema;

pub use frontmatter::{
    build_document, parse_metadata, serialize_metadata, split_frontmatter, FrontmatterError,
    Metadata,
};
pub use paths::{validate_relative_path, PathError};
pub use schema::{extract_schema, Schema};
