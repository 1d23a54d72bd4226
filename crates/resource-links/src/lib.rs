//! Parser and formatter for wiki-style resource link tokens
//!
//! A wrapper document stores its cross-reference as a bracket-wrapped
//! path token inside a frontmatter field:
//! - Plain: `[[resources/paper.pdf]]`
//! - Quoted: `"[[resources/paper.pdf]]"`
//!
//! Aliases, headers, and embeds have no meaning for cross-references and
//! are not supported here.

use serde::{Deserialize, Serialize};

/// A parsed resource link pointing at exactly one file in the vault.
///
/// Field naming follows Rust's `std::path::Path` conventions where
/// applicable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    /// The file stem without path or extension: "paper" (like `Path::file_stem()`)
    pub name: String,
    /// The parent directory path: "resources/papers" or None for root (like `Path::parent()`)
    pub parent: Option<String>,
    /// File extension without the dot: "pdf" or None (like `Path::extension()`)
    pub extension: Option<String>,
}

impl ResourceLink {
    /// Returns the file name with extension if present: "paper.pdf" or "paper"
    pub fn file_name(&self) -> String {
        match &self.extension {
            Some(ext) => format!("{}.{}", self.name, ext),
            None => self.name.clone(),
        }
    }

    /// Returns the full path: "resources/paper.pdf"
    pub fn path(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{}/{}", parent, self.file_name()),
            None => self.file_name(),
        }
    }

    /// Returns the path with the file stem replaced, keeping parent and
    /// extension: `with_stem("Foo")` on "resources/old.pdf" gives
    /// "resources/Foo.pdf".
    pub fn with_stem(&self, stem: &str) -> ResourceLink {
        ResourceLink {
            name: stem.to_string(),
            parent: self.parent.clone(),
            extension: self.extension.clone(),
        }
    }

    /// Renders the link back into token form: `[[resources/paper.pdf]]`
    pub fn to_token(&self) -> String {
        format_link(&self.path())
    }
}

/// Wrap a path in link-token form.
pub fn format_link(path: &str) -> String {
    format!("[[{}]]", path)
}

/// Parse the first resource link token out of a field value.
///
/// Tolerates surrounding text and quoting; returns None when no
/// well-formed non-empty `[[...]]` token is present.
pub fn parse_link(value: &str) -> Option<ResourceLink> {
    let open = value.find("[[")?;
    let rest = &value[open + 2..];
    let close = rest.find("]]")?;

    let target = rest[..close].trim();
    if target.is_empty() {
        return None;
    }

    let (parent, name, extension) = parse_path(target);
    Some(ResourceLink {
        name,
        parent,
        extension,
    })
}

/// Parse a path string into parent, name, and extension.
fn parse_path(path: &str) -> (Option<String>, String, Option<String>) {
    // Split into parent and file name at the last slash
    let (parent, file_name) = match path.rfind('/') {
        Some(slash_pos) => (Some(path[..slash_pos].to_string()), &path[slash_pos + 1..]),
        None => (None, path),
    };

    // Split the file name into stem and extension at the last dot
    let (name, extension) = match file_name.rfind('.') {
        Some(dot_pos) if dot_pos > 0 => (
            file_name[..dot_pos].to_string(),
            Some(file_name[dot_pos + 1..].to_string()),
        ),
        _ => (file_name.to_string(), None),
    };

    (parent, name, extension)
}
