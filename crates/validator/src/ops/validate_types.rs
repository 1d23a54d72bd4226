//! Reconcile document frontmatter against template schemas.
//!
//! For each configured template/folder pair, every markdown document in
//! the target folder is rewritten until its frontmatter keys match the
//! template's key set and key order. Existing values survive, gaps are
//! filled from template defaults, extraneous keys are dropped.

use serde_yaml::Value;
use vault_fs::{extract_schema, Metadata, Schema};

use crate::config::TemplateConfig;
use crate::metadata::process_frontmatter;
use crate::notify::Notifier;
use crate::storage::{Storage, StorageError, VaultEntry};

/// Run metadata reconciliation across all configured template pairs.
///
/// Returns the total number of modified documents. Pairs run in
/// configuration order; a failing pair is logged and skipped, the rest
/// proceed.
pub async fn validate_types<S: Storage>(
    storage: &S,
    notifier: &dyn Notifier,
    templates: &[TemplateConfig],
) -> usize {
    let mut total = 0;

    for template in templates {
        if !template.is_configured() {
            tracing::warn!("Skipping incomplete template pair: {}", template.name);
            continue;
        }

        match validate_template(storage, notifier, template).await {
            Ok(count) => total += count,
            Err(e) => {
                tracing::error!("Error validating template {}: {}", template.name, e);
            }
        }
    }

    notifier.notify(&format!("Validation complete. Reviewed {} files.", total));
    total
}

#[derive(Debug, thiserror::Error)]
enum TemplateError {
    #[error("template file not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Reconcile one target folder against one template document.
async fn validate_template<S: Storage>(
    storage: &S,
    notifier: &dyn Notifier,
    template: &TemplateConfig,
) -> Result<usize, TemplateError> {
    let template_doc = storage
        .lookup(&template.template_path)
        .await?
        .and_then(VaultEntry::into_document)
        .ok_or_else(|| TemplateError::NotFound(template.template_path.clone()))?;

    let template_text = storage.read(&template_doc).await?;
    let schema = extract_schema(&template_text);

    if schema.is_empty() {
        tracing::warn!("No keys found in template: {}", template.template_path);
        return Ok(0);
    }

    let files = storage.list(&template.target_folder, "md").await?;
    let mut count = 0;

    for file in files {
        let result = process_frontmatter(storage, &file, |metadata| {
            reconcile_mapping(&schema, metadata);
        })
        .await;

        match result {
            Ok(true) => count += 1,
            Ok(false) => {}
            Err(e) => tracing::warn!("Skipping {}: {}", file.path, e),
        }
    }

    notifier.notify(&format!(
        "Validated {} files for folder: {}",
        count, template.target_folder
    ));
    Ok(count)
}

/// Rewrite a metadata mapping to match the schema's key set and order.
///
/// The diff against the schema is positional, not a set difference: the
/// stored keys are walked in order against `ordered_keys`, and the
/// template cursor advances only on a match. A key the cursor never
/// catches up with is evicted even when it belongs to the schema - the
/// rebuild step restores it from the snapshot.
///
/// Returns whether the mapping needed a rewrite.
pub fn reconcile_mapping(schema: &Schema, metadata: &mut Metadata) -> bool {
    let original = metadata.clone();
    let mut needs_rewrite = metadata.len() != schema.ordered_keys.len();
    needs_rewrite |= apply_positional_diff(schema, metadata);

    if !needs_rewrite {
        return false;
    }

    // Rebuild in schema order: original value if the document had one,
    // template default otherwise. A key with neither is omitted entirely
    // rather than materialized with a null value.
    metadata.clear();
    for key in &schema.ordered_keys {
        if let Some(value) = original.get(key.as_str()) {
            metadata.insert(Value::from(key.as_str()), value.clone());
        } else if let Some(default) = schema.defaults.get(key) {
            metadata.insert(Value::from(key.as_str()), default.clone());
        }
    }

    true
}

/// The positional walk itself: delete every stored key that is not the
/// schema key expected at the cursor, advancing the cursor only on a
/// match. Returns whether anything was deleted.
fn apply_positional_diff(schema: &Schema, metadata: &mut Metadata) -> bool {
    let current_keys: Vec<Value> = metadata.keys().cloned().collect();
    let mut position = 0;
    let mut deleted = false;

    for key in current_keys {
        let matches = match (key.as_str(), schema.ordered_keys.get(position)) {
            (Some(current), Some(expected)) => current == expected,
            _ => false,
        };

        if matches {
            position += 1;
        } else {
            // shift_remove keeps the surviving keys in order; plain
            // remove is a swap-remove and would scramble them.
            metadata.shift_remove(&key);
            deleted = true;
        }
    }

    deleted
}
