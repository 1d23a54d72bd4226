//! Two-phase synchronization between attachment files and their wrapper
//! documents.
//!
//! Phase 1 reconciles existing wrappers: an attachment is renamed to
//! track its wrapper's basename, and a wrapper whose attachment is gone
//! for good is removed. Phase 2 creates wrappers for attachments that
//! have none. Phase 1 must fully settle before phase 2 runs, since the
//! "does a wrapper already exist" check depends on its renames and
//! removals.

use anyhow::Context;
use resource_links::{format_link, parse_link};
use serde_yaml::Value;

use crate::config::AttachmentSettings;
use crate::metadata::{get_metadata, process_frontmatter};
use crate::notify::Notifier;
use crate::storage::{DocumentRef, Storage, VaultEntry};

/// Frontmatter field holding the cross-reference to the attachment.
pub const RESOURCE_LINK_FIELD: &str = "resource-link";
/// Frontmatter field tagging the attachment kind in new wrappers.
pub const RESOURCE_TYPE_FIELD: &str = "resource-type";
/// Wrapper documents are always markdown.
const WRAPPER_EXTENSION: &str = "md";

/// Aggregate counts from one synchronization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Attachments renamed to match their wrapper's basename
    pub renamed: usize,
    /// Wrappers created for previously un-wrapped attachments
    pub created: usize,
    /// Orphaned wrappers removed
    pub removed: usize,
}

/// Run both synchronization phases and report aggregate counts.
///
/// Per-item failures are logged and skipped; only missing configuration
/// or a missing wrapper template aborts a phase, and then only that
/// phase.
pub async fn validate_attachments<S: Storage>(
    storage: &S,
    notifier: &dyn Notifier,
    settings: &AttachmentSettings,
) -> SyncReport {
    let mut report = SyncReport::default();

    if !settings.is_configured() {
        notifier.notify("Attachment settings are not configured");
        return report;
    }

    reconcile_wrappers(storage, notifier, settings, &mut report).await;
    notifier.notify(&format!("Renamed {} attachment(s)", report.renamed));

    create_missing_wrappers(storage, notifier, settings, &mut report).await;
    notifier.notify(&format!("Created {} wrapper note(s)", report.created));

    report
}

/// Phase 1: bring every existing wrapper and its attachment into
/// agreement.
async fn reconcile_wrappers<S: Storage>(
    storage: &S,
    notifier: &dyn Notifier,
    settings: &AttachmentSettings,
    report: &mut SyncReport,
) {
    let wrappers = match storage.list(&settings.dest_folder, WRAPPER_EXTENSION).await {
        Ok(wrappers) => wrappers,
        Err(e) => {
            tracing::error!("Failed to list wrappers in {}: {}", settings.dest_folder, e);
            return;
        }
    };

    for wrapper in wrappers {
        if let Err(e) = reconcile_wrapper(storage, notifier, &wrapper, report).await {
            tracing::error!("Error reconciling wrapper {}: {:#}", wrapper.path, e);
        }
    }
}

async fn reconcile_wrapper<S: Storage>(
    storage: &S,
    notifier: &dyn Notifier,
    wrapper: &DocumentRef,
    report: &mut SyncReport,
) -> anyhow::Result<()> {
    let name = wrapper.basename();

    let metadata = get_metadata(storage, wrapper).await?.unwrap_or_default();
    let Some(value) = metadata.get(RESOURCE_LINK_FIELD).and_then(Value::as_str) else {
        tracing::warn!("{} not found in {}", RESOURCE_LINK_FIELD, name);
        return Ok(());
    };

    let Some(link) = parse_link(value) else {
        tracing::warn!("Invalid {} format in {}", RESOURCE_LINK_FIELD, name);
        return Ok(());
    };

    // Without an extension on the wrapped path there is no attachment
    // file name to reconstruct.
    if link.extension.is_none() {
        tracing::warn!("{} in {} has no file extension", RESOURCE_LINK_FIELD, name);
        return Ok(());
    }

    let current_path = link.path();
    let expected = link.with_stem(name);
    let expected_path = expected.path();

    if expected_path == current_path {
        // Already consistent. An absent attachment means the wrapper is
        // orphaned, not merely out of sync.
        let attachment_exists = storage
            .exists(&current_path)
            .await
            .context("checking attachment")?;

        if !attachment_exists {
            storage.delete(wrapper).await.context("removing wrapper")?;
            notifier.notify(&format!("Removed orphaned wrapper: {}", name));
            report.removed += 1;
        }
        return Ok(());
    }

    // Out of sync: rename the attachment to follow the wrapper. If the
    // attachment is missing we can only attempt consistency, never
    // assume orphanhood - so skip without deleting.
    let attachment = storage
        .lookup(&current_path)
        .await
        .context("locating attachment")?
        .and_then(VaultEntry::into_document);

    let Some(attachment) = attachment else {
        tracing::warn!("Attachment not found for {}", name);
        return Ok(());
    };

    storage
        .rename(&attachment, &expected_path)
        .await
        .context("renaming attachment")?;

    process_frontmatter(storage, wrapper, |metadata| {
        metadata.insert(
            Value::from(RESOURCE_LINK_FIELD),
            Value::from(expected.to_token()),
        );
    })
    .await
    .context("updating cross-reference")?;

    report.renamed += 1;
    Ok(())
}

/// Phase 2: create a wrapper for every attachment that lacks one.
async fn create_missing_wrappers<S: Storage>(
    storage: &S,
    notifier: &dyn Notifier,
    settings: &AttachmentSettings,
    report: &mut SyncReport,
) {
    let template = match storage.lookup(&settings.template_path).await {
        Ok(entry) => entry.and_then(VaultEntry::into_document),
        Err(e) => {
            tracing::error!("Failed to resolve template {}: {}", settings.template_path, e);
            return;
        }
    };

    let Some(template) = template else {
        notifier.notify(&format!("Template not found: {}", settings.template_path));
        return;
    };

    let skeleton = match storage.read(&template).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Failed to read template {}: {}", settings.template_path, e);
            return;
        }
    };

    let attachments = match storage
        .list(&settings.source_folder, &settings.extension)
        .await
    {
        Ok(attachments) => attachments,
        Err(e) => {
            tracing::error!(
                "Failed to list attachments in {}: {}",
                settings.source_folder,
                e
            );
            return;
        }
    };

    for attachment in attachments {
        let target = format!(
            "{}/{}.{}",
            settings.dest_folder,
            attachment.basename(),
            WRAPPER_EXTENSION
        );

        match storage.exists(&target).await {
            Ok(true) => continue,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Skipping {}: {}", attachment.path, e);
                continue;
            }
        }

        let content = materialize_wrapper(&skeleton, &attachment.path, &settings.extension);

        match storage.create(&target, &content).await {
            Ok(_) => {
                notifier.notify(&format!("Created wrapper note: {}", attachment.basename()));
                report.created += 1;
            }
            Err(e) => {
                tracing::error!("Error creating wrapper for {}: {}", attachment.basename(), e);
            }
        }
    }
}

/// Fill the template skeleton's cross-reference and type-tag fields.
///
/// This is verbatim token replacement, not structured rewriting: the
/// field names must appear in the skeleton text exactly as anchors.
fn materialize_wrapper(skeleton: &str, attachment_path: &str, kind: &str) -> String {
    skeleton
        .replace(
            &format!("{}:", RESOURCE_LINK_FIELD),
            &format!(
                "{}: \"{}\"",
                RESOURCE_LINK_FIELD,
                format_link(attachment_path)
            ),
        )
        .replace(
            &format!("{}:", RESOURCE_TYPE_FIELD),
            &format!("{}: {}", RESOURCE_TYPE_FIELD, kind),
        )
}
