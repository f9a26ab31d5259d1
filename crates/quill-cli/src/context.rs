//! Wires configuration, adapters and the controller for one command.

use crate::console::ConsoleSink;
use anyhow::{Context as _, Result};
use quill_application::{SessionController, TemplatePromptBuilder};
use quill_core::config::QuillConfig;
use quill_core::entry::EntryStore;
use quill_infrastructure::{ConfigService, HttpEntryStore, MemoryEntryStore};
use quill_interaction::GeminiStreamChannel;
use std::path::PathBuf;
use std::sync::Arc;

pub struct Options {
    pub offline: bool,
    pub config_dir: Option<PathBuf>,
}

pub struct AppContext {
    pub config: QuillConfig,
    pub controller: SessionController,
}

/// Builds the controller.
///
/// Only `submit` opens the generation channel, so the API key is only
/// required when `needs_generation` is set.
pub fn build(options: &Options, needs_generation: bool, streaming: bool) -> Result<AppContext> {
    let config_service = ConfigService::new(options.config_dir.as_deref());
    let config = config_service
        .get_config()
        .context("Failed to load configuration")?;

    let api_key = if needs_generation {
        config_service.gemini_api_key()?
    } else {
        config_service.gemini_api_key().unwrap_or_default()
    };

    let store: Arc<dyn EntryStore> = if options.offline {
        tracing::info!("[quill] Offline mode, entries are kept in memory");
        Arc::new(MemoryEntryStore::new())
    } else {
        Arc::new(HttpEntryStore::from_config(&config.store)?)
    };

    let channel = Arc::new(GeminiStreamChannel::from_config(&config.generation, api_key));
    let prompts = Arc::new(TemplatePromptBuilder::from_config(&config.generation)?);
    let sink = Arc::new(ConsoleSink::new(streaming));

    let controller = SessionController::new(store, channel, prompts, sink).with_config(&config);

    Ok(AppContext { config, controller })
}
