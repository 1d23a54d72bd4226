//! Transactional frontmatter access on top of the storage layer.
//!
//! The mutate step hands the caller a mutable view of a document's
//! ordered metadata mapping and persists exactly once on return - and
//! only when the mapping actually changed, so documents that already
//! match are never rewritten.

use vault_fs::{build_document, parse_metadata, split_frontmatter, FrontmatterError, Metadata};

use crate::storage::{DocumentRef, Storage, StorageError};

/// Errors from metadata-block operations.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("failed to parse frontmatter in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: FrontmatterError,
    },
    #[error("failed to rebuild frontmatter in {path}: {source}")]
    Rebuild {
        path: String,
        #[source]
        source: FrontmatterError,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Read a document's frontmatter as an ordered mapping.
///
/// Returns `None` when the document has no frontmatter block.
pub async fn get_metadata<S: Storage>(
    storage: &S,
    doc: &DocumentRef,
) -> Result<Option<Metadata>, MetadataError> {
    let content = storage.read(doc).await?;
    parse_metadata(&content).map_err(|source| MetadataError::Parse {
        path: doc.path.clone(),
        source,
    })
}

/// Apply a mutation to a document's frontmatter and persist it.
///
/// A document without a frontmatter block is handed an empty mapping;
/// inserting into it materializes a new block above the unchanged body.
/// The write is atomic per file and only happens when the mapping's keys,
/// order, or values changed. Returns whether the document was rewritten.
pub async fn process_frontmatter<S, F>(
    storage: &S,
    doc: &DocumentRef,
    mutate: F,
) -> Result<bool, MetadataError>
where
    S: Storage,
    F: FnOnce(&mut Metadata),
{
    let content = storage.read(doc).await?;

    let mut mapping = parse_metadata(&content)
        .map_err(|source| MetadataError::Parse {
            path: doc.path.clone(),
            source,
        })?
        .unwrap_or_default();
    let snapshot = mapping.clone();

    mutate(&mut mapping);

    if !differs(&mapping, &snapshot) {
        return Ok(false);
    }

    let (_, body) = split_frontmatter(&content);
    let rebuilt = build_document(&mapping, body).map_err(|source| MetadataError::Rebuild {
        path: doc.path.clone(),
        source,
    })?;

    storage.write(doc, &rebuilt).await?;
    Ok(true)
}

/// Order-sensitive mapping comparison.
///
/// `Mapping` equality ignores key order, but a reordered block must count
/// as a change here.
fn differs(a: &Metadata, b: &Metadata) -> bool {
    a.len() != b.len() || a.iter().ne(b.iter())
}
