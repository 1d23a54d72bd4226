//! Storage trait definition, reference types, and error types.

use std::path::PathBuf;

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    /// The requested file was not found
    #[error("file not found: {path}")]
    NotFound { path: String },
    /// The file already exists (for create and rename operations)
    #[error("file already exists: {path}")]
    AlreadyExists { path: String },
    /// Path validation failed (e.g., directory traversal attempt)
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
    /// Parent directory doesn't exist
    #[error("parent directory doesn't exist for '{path}': {parent}")]
    ParentNotFound { path: String, parent: PathBuf },
    /// I/O error during storage operation
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io {
            message: e.to_string(),
        }
    }
}

/// A handle to a file in the vault, identified by its vault-relative path.
///
/// The path always uses `/` separators and keeps its extension, since the
/// store holds both markdown documents and binary attachments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub path: String,
}

impl DocumentRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// File name with extension: "Foo.pdf"
    pub fn file_name(&self) -> &str {
        match self.path.rfind('/') {
            Some(pos) => &self.path[pos + 1..],
            None => &self.path,
        }
    }

    /// File name without extension: "Foo" (like `Path::file_stem()`)
    pub fn basename(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(pos) if pos > 0 => &name[..pos],
            _ => name,
        }
    }

    /// Extension without the dot: "pdf" or None
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(pos) if pos > 0 => Some(&name[pos + 1..]),
            _ => None,
        }
    }

    /// Parent folder path, or None at the vault root
    pub fn folder(&self) -> Option<&str> {
        self.path.rfind('/').map(|pos| &self.path[..pos])
    }
}

/// A handle to a folder in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRef {
    pub path: String,
}

/// A resolved vault path, discriminated by kind.
///
/// Callers access the concrete handle through the capability accessors
/// instead of testing paths against the filesystem themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEntry {
    Document(DocumentRef),
    Folder(FolderRef),
}

impl VaultEntry {
    pub fn as_document(&self) -> Option<&DocumentRef> {
        match self {
            VaultEntry::Document(doc) => Some(doc),
            VaultEntry::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&FolderRef> {
        match self {
            VaultEntry::Folder(folder) => Some(folder),
            VaultEntry::Document(_) => None,
        }
    }

    pub fn into_document(self) -> Option<DocumentRef> {
        match self {
            VaultEntry::Document(doc) => Some(doc),
            VaultEntry::Folder(_) => None,
        }
    }
}

/// Abstract storage backend for vault file access.
///
/// Implementations provide filesystem primitives over vault-relative
/// paths. Reconciliation issues one operation at a time and awaits its
/// completion, so implementations need no internal locking against this
/// crate's callers.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// List files under a folder (recursively) whose extension matches.
    ///
    /// A missing folder yields an empty list. Results are sorted by path
    /// so processing order is deterministic.
    async fn list(&self, folder: &str, extension: &str) -> Result<Vec<DocumentRef>, StorageError>;

    /// Read a document's text content.
    async fn read(&self, doc: &DocumentRef) -> Result<String, StorageError>;

    /// Create a new document. Fails with `AlreadyExists` if the path is
    /// taken and `ParentNotFound` if its folder is missing.
    async fn create(&self, path: &str, content: &str) -> Result<DocumentRef, StorageError>;

    /// Overwrite a document's content atomically (temp file + rename).
    async fn write(&self, doc: &DocumentRef, content: &str) -> Result<(), StorageError>;

    /// Rename/move a file. Fails with `NotFound` if the source is gone,
    /// `AlreadyExists` if the target is taken, and `ParentNotFound` if
    /// the target folder is missing.
    async fn rename(&self, doc: &DocumentRef, new_path: &str) -> Result<(), StorageError>;

    /// Delete a file. Fails with `NotFound` if it is already gone.
    async fn delete(&self, doc: &DocumentRef) -> Result<(), StorageError>;

    /// Check whether a file or folder exists at the given path.
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Resolve a path to a discriminated handle, or None if nothing is
    /// there.
    async fn lookup(&self, path: &str) -> Result<Option<VaultEntry>, StorageError>;
}
