//! YAML frontmatter parsing for vault documents
//!
//! Splits the frontmatter block at the start of markdown files and parses
//! it into an order-preserving mapping:
//! ```markdown
//! ---
//! title: My Note
//! status: draft
//! ---
//!
//! Document body here...
//! ```

use serde_yaml::{Mapping, Value};

/// Frontmatter as an ordered mapping of keys to YAML values.
///
/// Key order in a frontmatter block is significant for reconciliation, so
/// the mapping type must preserve insertion order (`serde_yaml::Mapping`
/// does).
pub type Metadata = Mapping;

/// Error type for frontmatter operations.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("frontmatter is not a key-value mapping")]
    NotAMapping,
    #[error("failed to parse frontmatter: {0}")]
    Parse(#[source] serde_yaml::Error),
    #[error("failed to serialize frontmatter: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// Split a document into frontmatter YAML string and body, without parsing
/// the YAML.
///
/// Returns (frontmatter_yaml, body) where frontmatter_yaml is None if no
/// valid frontmatter block was found.
pub fn split_frontmatter(raw: &str) -> (Option<&str>, &str) {
    // Frontmatter must start at the very beginning with ---
    if !raw.starts_with("---") {
        return (None, raw);
    }

    let after_opening = &raw[3..];

    // Skip the newline after the opening ---
    let block_start = if let Some(rest) = after_opening.strip_prefix("\r\n") {
        rest
    } else if let Some(rest) = after_opening.strip_prefix('\n') {
        rest
    } else {
        // No newline after opening --- means invalid frontmatter
        return (None, raw);
    };

    // Find closing --- (must be a line on its own)
    if let Some(close_pos) = find_closing_delimiter(block_start) {
        let yaml = &block_start[..close_pos];
        let after_close = &block_start[close_pos + 3..];

        // Skip newline after closing ---
        let body = if let Some(rest) = after_close.strip_prefix("\r\n") {
            rest
        } else if let Some(rest) = after_close.strip_prefix('\n') {
            rest
        } else {
            after_close
        };

        (Some(yaml), body)
    } else {
        (None, raw)
    }
}

/// Find the position of the closing --- delimiter (must be a full line).
fn find_closing_delimiter(s: &str) -> Option<usize> {
    let mut pos = 0;
    for line in s.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return Some(pos);
        }
        pos += line.len();
    }
    None
}

/// Parse a document's frontmatter into an ordered mapping.
///
/// Returns `Ok(None)` when the document has no frontmatter block, and an
/// error when the block exists but is not parseable as a key-value mapping.
pub fn parse_metadata(raw: &str) -> Result<Option<Metadata>, FrontmatterError> {
    let (yaml, _body) = split_frontmatter(raw);

    let Some(yaml) = yaml else {
        return Ok(None);
    };

    let value: Value = serde_yaml::from_str(yaml).map_err(FrontmatterError::Parse)?;
    match value {
        // An empty block between the markers parses as null
        Value::Null => Ok(Some(Metadata::new())),
        Value::Mapping(map) => Ok(Some(map)),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

/// Serialize a metadata mapping to YAML, preserving insertion order.
///
/// Returns the YAML content without the surrounding `---` delimiters.
pub fn serialize_metadata(metadata: &Metadata) -> Result<String, FrontmatterError> {
    if metadata.is_empty() {
        return Ok(String::new());
    }
    serde_yaml::to_string(metadata).map_err(FrontmatterError::Serialize)
}

/// Build a complete document from a metadata mapping and a body.
///
/// If the mapping is empty, returns just the body without a frontmatter
/// block.
pub fn build_document(metadata: &Metadata, body: &str) -> Result<String, FrontmatterError> {
    if metadata.is_empty() {
        return Ok(body.to_string());
    }

    let yaml = serialize_metadata(metadata)?;
    Ok(format!("---\n{}---\n{}", yaml, body))
}
