//! Document store abstraction and its filesystem backend.

mod file;
mod traits;

pub use file::FileStorage;
pub use traits::{DocumentRef, FolderRef, Storage, StorageError, VaultEntry};
