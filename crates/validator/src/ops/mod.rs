//! Reconciliation operations and the orchestrator that runs them.

pub mod create_object;
pub mod validate_attachments;
pub mod validate_types;

pub use create_object::{create_object, CreateObjectError};
pub use validate_attachments::{validate_attachments, SyncReport};
pub use validate_types::validate_types;

use crate::config::Settings;
use crate::notify::Notifier;
use crate::storage::Storage;

/// Aggregate outcome of a full reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    /// Documents modified by metadata reconciliation
    pub reviewed: usize,
    /// Attachment synchronization counts
    pub sync: SyncReport,
}

/// Run attachment synchronization, then metadata reconciliation across
/// all configured template pairs.
///
/// Pairs run in configuration order and share no state; when two pairs
/// point at overlapping target folders, the later pair's schema wins.
pub async fn validate_everything<S: Storage>(
    storage: &S,
    notifier: &dyn Notifier,
    settings: &Settings,
) -> ValidationSummary {
    let sync = validate_attachments(storage, notifier, &settings.attachments).await;
    let reviewed = validate_types(storage, notifier, &settings.templates).await;

    ValidationSummary { reviewed, sync }
}
