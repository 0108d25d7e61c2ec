//! A single-block workbench: one file-backed store, one recording runtime,
//! one learner.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;

use submit_compare_core::block::{fields, AuthorEdit, BlockServices, SubmitAndCompareBlock};
use submit_compare_core::model::{Scope, ScopeIds, DEFAULT_QUESTION_XML};
use submit_compare_core::traits::{FieldKey, FieldStore, ViewRenderer};

use crate::config::WorkbenchConfig;
use crate::file_store::JsonFileStore;
use crate::i18n::EnglishLocalizer;
use crate::runtime::RecordingRuntime;

/// Host services built from a [`WorkbenchConfig`].
pub struct Workbench {
    config: WorkbenchConfig,
    store: Arc<JsonFileStore>,
    runtime: Arc<RecordingRuntime>,
}

impl Workbench {
    /// Open the state file and set up the runtime.
    pub fn open(config: WorkbenchConfig) -> Result<Self> {
        let store = Arc::new(JsonFileStore::open(&config.state_file)?);
        let mut runtime = RecordingRuntime::new(&config.static_base_url, &config.handler_base_url);
        if let Some(log) = &config.event_log {
            runtime = runtime.with_event_log(log.clone());
        }
        Ok(Self {
            config,
            store,
            runtime: Arc::new(runtime),
        })
    }

    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    pub fn runtime(&self) -> &RecordingRuntime {
        &self.runtime
    }

    /// The block as seen by the configured learner.
    pub fn block(&self, renderer: Arc<dyn ViewRenderer>) -> SubmitAndCompareBlock {
        self.block_for(&self.config.user_id, renderer)
    }

    /// The block as seen by another learner.
    pub fn block_for(&self, user_id: &str, renderer: Arc<dyn ViewRenderer>) -> SubmitAndCompareBlock {
        let services = BlockServices {
            store: self.store.clone(),
            runtime: self.runtime.clone(),
            localizer: Arc::new(EnglishLocalizer),
            renderer,
        };
        SubmitAndCompareBlock::new(
            ScopeIds {
                user_id: user_id.to_string(),
                usage_id: self.config.usage_id.clone(),
            },
            services,
        )
    }

    /// Whether an author edit was ever saved for this usage.
    pub fn is_seeded(&self, block: &SubmitAndCompareBlock) -> Result<bool> {
        let key = FieldKey::new(
            Scope::Content,
            block.component_id(),
            &block.scope_ids().user_id,
            fields::QUESTION_STRING,
        );
        Ok(self.store.get(&key)?.is_some())
    }

    /// Apply the configured `[block]` defaults unless the block was already
    /// authored. Returns `true` when defaults were written.
    pub fn ensure_seeded(&self, block: &SubmitAndCompareBlock) -> Result<bool> {
        if self.is_seeded(block)? {
            return Ok(false);
        }

        let defaults = &self.config.block;
        let data = match &defaults.question_file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read question file: {}", path.display()))?,
            None => DEFAULT_QUESTION_XML.to_string(),
        };

        let edit = AuthorEdit {
            display_name: defaults.display_name.clone(),
            weight: json!(defaults.weight),
            max_attempts: json!(defaults.max_attempts),
            your_answer_label: defaults.your_answer_label.clone(),
            our_answer_label: defaults.our_answer_label.clone(),
            submit_button_label: defaults.submit_button_label.clone(),
            data,
        };
        block
            .author_submit(&edit)
            .context("configured block defaults were rejected")?;
        tracing::info!(component_id = block.component_id(), "seeded block from config");
        Ok(true)
    }
}
