//! Create a new document from a configured template pair.

use crate::config::TemplateConfig;
use crate::notify::Notifier;
use crate::storage::{DocumentRef, Storage, StorageError, VaultEntry};

#[derive(Debug, thiserror::Error)]
pub enum CreateObjectError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),
    #[error("'{title}' already exists in {folder}")]
    AlreadyExists { title: String, folder: String },
    #[error("title must not be empty")]
    EmptyTitle,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Create `<target folder>/<title>.md` with the template's raw content.
pub async fn create_object<S: Storage>(
    storage: &S,
    notifier: &dyn Notifier,
    template: &TemplateConfig,
    title: &str,
) -> Result<DocumentRef, CreateObjectError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CreateObjectError::EmptyTitle);
    }

    let template_doc = storage
        .lookup(&template.template_path)
        .await?
        .and_then(VaultEntry::into_document)
        .ok_or_else(|| CreateObjectError::TemplateNotFound(template.template_path.clone()))?;

    let content = storage.read(&template_doc).await?;
    let target = format!("{}/{}.md", template.target_folder, title);

    match storage.create(&target, &content).await {
        Ok(created) => {
            notifier.notify(&format!("Created: {}", title));
            Ok(created)
        }
        Err(StorageError::AlreadyExists { .. }) => Err(CreateObjectError::AlreadyExists {
            title: title.to_string(),
            folder: template.target_folder.clone(),
        }),
        Err(e) => Err(e.into()),
    }
}
