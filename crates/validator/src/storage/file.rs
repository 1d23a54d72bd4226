//! Filesystem storage implementation.

use std::path::{Path, PathBuf};

use rand::Rng;
use tokio::fs;
use vault_fs::validate_relative_path;

use super::traits::{DocumentRef, FolderRef, Storage, StorageError, VaultEntry};

/// Filesystem storage backend rooted at a vault directory.
pub struct FileStorage {
    vault_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage for the given vault root.
    pub fn new(vault_path: PathBuf) -> Self {
        Self { vault_path }
    }

    /// Resolve a vault-relative path to a filesystem path.
    ///
    /// Validates the path to prevent directory traversal out of the
    /// vault. Returns the normalized relative path alongside the full
    /// one.
    fn resolve(&self, path: &str) -> Result<(String, PathBuf), StorageError> {
        let clean = validate_relative_path(path).map_err(|e| StorageError::InvalidPath {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let full = self.vault_path.join(&clean);
        Ok((clean, full))
    }

    /// Convert a filesystem path back to a vault-relative path.
    fn to_relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.vault_path).ok()?;
        let parts: Vec<&str> = rel
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .collect();
        Some(parts.join("/"))
    }

    /// Generate a random hex string for temp file names.
    fn random_hex() -> String {
        let bytes: [u8; 16] = rand::rng().random();
        hex::encode(bytes)
    }

    /// Atomic write using temp file + rename.
    ///
    /// Either the whole new content lands at the target path or the file
    /// is left unmodified.
    async fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
        let temp_path = path.with_extension(format!("{}.tmp", Self::random_hex()));

        if let Err(e) = fs::write(&temp_path, content).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        Ok(())
    }

    /// Recursively collect files with a matching extension.
    async fn list_recursive(
        &self,
        dir: &Path,
        extension: &str,
        found: &mut Vec<DocumentRef>,
    ) -> Result<(), StorageError> {
        let mut entries = fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_name = entry.file_name();
            let file_name_str = file_name.to_string_lossy();

            // Skip hidden files and directories
            if file_name_str.starts_with('.') {
                continue;
            }

            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                Box::pin(self.list_recursive(&path, extension, found)).await?;
            } else if file_type.is_file()
                && file_name_str.ends_with(&format!(".{}", extension))
            {
                if let Some(rel) = self.to_relative(&path) {
                    found.push(DocumentRef::new(rel));
                }
            }
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for FileStorage {
    async fn list(&self, folder: &str, extension: &str) -> Result<Vec<DocumentRef>, StorageError> {
        let (_, search_dir) = self.resolve(folder)?;

        if !search_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        self.list_recursive(&search_dir, extension, &mut found).await?;
        found.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(found)
    }

    async fn read(&self, doc: &DocumentRef) -> Result<String, StorageError> {
        let (_, full) = self.resolve(&doc.path)?;

        fs::read_to_string(&full).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound {
                    path: doc.path.clone(),
                }
            } else {
                StorageError::from(e)
            }
        })
    }

    async fn create(&self, path: &str, content: &str) -> Result<DocumentRef, StorageError> {
        let (clean, full) = self.resolve(path)?;

        if full.exists() {
            return Err(StorageError::AlreadyExists { path: clean });
        }

        if let Some(parent) = full.parent() {
            if !parent.exists() {
                return Err(StorageError::ParentNotFound {
                    path: clean,
                    parent: parent.to_path_buf(),
                });
            }
        }

        Self::atomic_write(&full, content).await?;
        Ok(DocumentRef::new(clean))
    }

    async fn write(&self, doc: &DocumentRef, content: &str) -> Result<(), StorageError> {
        let (_, full) = self.resolve(&doc.path)?;

        if !full.exists() {
            return Err(StorageError::NotFound {
                path: doc.path.clone(),
            });
        }

        Self::atomic_write(&full, content).await?;
        Ok(())
    }

    async fn rename(&self, doc: &DocumentRef, new_path: &str) -> Result<(), StorageError> {
        let (_, from_full) = self.resolve(&doc.path)?;
        let (to_clean, to_full) = self.resolve(new_path)?;

        if !from_full.exists() {
            return Err(StorageError::NotFound {
                path: doc.path.clone(),
            });
        }

        if to_full.exists() {
            return Err(StorageError::AlreadyExists { path: to_clean });
        }

        if let Some(parent) = to_full.parent() {
            if !parent.exists() {
                return Err(StorageError::ParentNotFound {
                    path: to_clean,
                    parent: parent.to_path_buf(),
                });
            }
        }

        fs::rename(&from_full, &to_full).await?;
        Ok(())
    }

    async fn delete(&self, doc: &DocumentRef) -> Result<(), StorageError> {
        let (_, full) = self.resolve(&doc.path)?;

        fs::remove_file(&full).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound {
                    path: doc.path.clone(),
                }
            } else {
                StorageError::from(e)
            }
        })
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let (_, full) = self.resolve(path)?;
        Ok(full.exists())
    }

    async fn lookup(&self, path: &str) -> Result<Option<VaultEntry>, StorageError> {
        let (clean, full) = self.resolve(path)?;

        match fs::metadata(&full).await {
            Ok(meta) if meta.is_dir() => Ok(Some(VaultEntry::Folder(FolderRef { path: clean }))),
            Ok(_) => Ok(Some(VaultEntry::Document(DocumentRef::new(clean)))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::from(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_storage() -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().to_path_buf());
        (temp_dir, storage)
    }

    #[tokio::test]
    async fn create_and_read() {
        let (temp, storage) = create_test_storage().await;

        let doc = storage.create("note.md", "Hello").await.unwrap();
        assert_eq!(doc.path, "note.md");
        assert!(temp.path().join("note.md").exists());

        let content = storage.read(&doc).await.unwrap();
        assert_eq!(content, "Hello");
    }

    #[tokio::test]
    async fn create_existing_fails() {
        let (_temp, storage) = create_test_storage().await;

        storage.create("note.md", "one").await.unwrap();
        let result = storage.create("note.md", "two").await;
        assert!(matches!(result, Err(StorageError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn create_in_missing_folder_fails() {
        let (_temp, storage) = create_test_storage().await;

        let result = storage.create("missing/note.md", "content").await;
        assert!(matches!(result, Err(StorageError::ParentNotFound { .. })));
    }

    #[tokio::test]
    async fn read_nonexistent_returns_not_found() {
        let (_temp, storage) = create_test_storage().await;

        let result = storage.read(&DocumentRef::new("nope.md")).await;
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[tokio::test]
    async fn write_overwrites_atomically() {
        let (temp, storage) = create_test_storage().await;

        let doc = storage.create("note.md", "one").await.unwrap();
        storage.write(&doc, "two").await.unwrap();

        let content = storage.read(&doc).await.unwrap();
        assert_eq!(content, "two");

        // No temp files left behind
        let leftovers: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn list_filters_by_extension() {
        let (temp, storage) = create_test_storage().await;

        std::fs::create_dir(temp.path().join("resources")).unwrap();
        storage.create("resources/a.pdf", "").await.unwrap();
        storage.create("resources/b.md", "").await.unwrap();
        storage.create("resources/c.pdf", "").await.unwrap();

        let pdfs = storage.list("resources", "pdf").await.unwrap();
        let paths: Vec<&str> = pdfs.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["resources/a.pdf", "resources/c.pdf"]);
    }

    #[tokio::test]
    async fn list_recurses_into_subfolders() {
        let (temp, storage) = create_test_storage().await;

        std::fs::create_dir_all(temp.path().join("notes/sub")).unwrap();
        storage.create("notes/a.md", "").await.unwrap();
        storage.create("notes/sub/b.md", "").await.unwrap();

        let docs = storage.list("notes", "md").await.unwrap();
        let paths: Vec<&str> = docs.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["notes/a.md", "notes/sub/b.md"]);
    }

    #[tokio::test]
    async fn list_missing_folder_is_empty() {
        let (_temp, storage) = create_test_storage().await;
        assert!(storage.list("missing", "md").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_skips_hidden_files() {
        let (temp, storage) = create_test_storage().await;

        std::fs::create_dir(temp.path().join("notes")).unwrap();
        std::fs::write(temp.path().join("notes/.hidden.md"), "").unwrap();
        storage.create("notes/visible.md", "").await.unwrap();

        let docs = storage.list("notes", "md").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].path, "notes/visible.md");
    }

    #[tokio::test]
    async fn rename_moves_the_file() {
        let (temp, storage) = create_test_storage().await;

        let doc = storage.create("old.pdf", "data").await.unwrap();
        storage.rename(&doc, "new.pdf").await.unwrap();

        assert!(!temp.path().join("old.pdf").exists());
        assert!(temp.path().join("new.pdf").exists());
    }

    #[tokio::test]
    async fn rename_to_existing_fails() {
        let (_temp, storage) = create_test_storage().await;

        let doc = storage.create("a.md", "a").await.unwrap();
        storage.create("b.md", "b").await.unwrap();

        let result = storage.rename(&doc, "b.md").await;
        assert!(matches!(result, Err(StorageError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn rename_missing_source_fails() {
        let (_temp, storage) = create_test_storage().await;

        let result = storage.rename(&DocumentRef::new("gone.md"), "new.md").await;
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[tokio::test]
    async fn delete_removes_the_file() {
        let (_temp, storage) = create_test_storage().await;

        let doc = storage.create("note.md", "content").await.unwrap();
        storage.delete(&doc).await.unwrap();
        assert!(!storage.exists("note.md").await.unwrap());

        let result = storage.delete(&doc).await;
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[tokio::test]
    async fn lookup_discriminates_documents_and_folders() {
        let (temp, storage) = create_test_storage().await;

        std::fs::create_dir(temp.path().join("notes")).unwrap();
        storage.create("notes/a.md", "").await.unwrap();

        let entry = storage.lookup("notes").await.unwrap().unwrap();
        assert!(entry.as_folder().is_some());

        let entry = storage.lookup("notes/a.md").await.unwrap().unwrap();
        assert_eq!(entry.as_document().unwrap().path, "notes/a.md");

        assert!(storage.lookup("nothing-here").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_directory_traversal() {
        let (_temp, storage) = create_test_storage().await;

        let result = storage.read(&DocumentRef::new("../etc/passwd")).await;
        assert!(matches!(result, Err(StorageError::InvalidPath { .. })));

        let result = storage.create("../../evil.md", "content").await;
        assert!(matches!(result, Err(StorageError::InvalidPath { .. })));
    }
}
