use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod metadata;
mod notify;
mod ops;
mod storage;

use config::{Settings, DEFAULT_SETTINGS_FILE};
use notify::LogNotifier;
use storage::FileStorage;

/// CLI arguments for the vault validator.
#[derive(Parser)]
#[command(name = "vault-validator")]
#[command(about = "Reconciles vault documents against template schemas and keeps attachment wrappers in sync")]
struct Cli {
    /// Path to the vault root (falls back to the VAULT_PATH environment variable)
    #[arg(long)]
    vault: Option<String>,

    /// Path to the settings file (defaults to .vault-validator.json in the vault)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Synchronize attachments, then reconcile metadata for every template pair
    All,
    /// Reconcile document metadata against template schemas
    Types,
    /// Synchronize attachment files with their wrapper documents
    Attachments,
    /// Create a new document from a configured template
    Create {
        /// Name of the template pair to use
        #[arg(long)]
        template: String,
        /// Title of the new document
        #[arg(long)]
        title: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let vault_path = config::resolve_vault_path(cli.vault.as_deref())?;
    tracing::info!("Vault path: {}", vault_path.display());

    let settings_path = cli
        .config
        .unwrap_or_else(|| vault_path.join(DEFAULT_SETTINGS_FILE));
    let settings = Settings::load(&settings_path)
        .with_context(|| format!("loading settings from {}", settings_path.display()))?;

    let storage = FileStorage::new(vault_path);
    let notifier = LogNotifier;

    match cli.command {
        Command::All => {
            let summary = ops::validate_everything(&storage, &notifier, &settings).await;
            tracing::info!(
                reviewed = summary.reviewed,
                renamed = summary.sync.renamed,
                created = summary.sync.created,
                removed = summary.sync.removed,
                "Validation finished"
            );
        }
        Command::Types => {
            let reviewed = ops::validate_types(&storage, &notifier, &settings.templates).await;
            tracing::info!(reviewed, "Metadata reconciliation finished");
        }
        Command::Attachments => {
            let report = ops::validate_attachments(&storage, &notifier, &settings.attachments).await;
            tracing::info!(
                renamed = report.renamed,
                created = report.created,
                removed = report.removed,
                "Attachment sync finished"
            );
        }
        Command::Create { template, title } => {
            let pair = settings
                .templates
                .iter()
                .find(|t| t.name == template)
                .with_context(|| format!("no template named '{}' in settings", template))?;
            ops::create_object(&storage, &notifier, pair, &title).await?;
        }
    }

    Ok(())
}
