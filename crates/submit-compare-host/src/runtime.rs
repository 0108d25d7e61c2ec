//! Workbench runtime: records published events and builds URLs.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use submit_compare_core::traits::Runtime;

/// An event the block published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedEvent {
    pub event_type: String,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

/// A [`Runtime`] that keeps every published event and optionally appends
/// them to a JSON-lines log.
#[derive(Debug)]
pub struct RecordingRuntime {
    static_base_url: String,
    handler_base_url: String,
    event_log: Option<PathBuf>,
    events: Mutex<Vec<PublishedEvent>>,
}

impl RecordingRuntime {
    pub fn new(static_base_url: &str, handler_base_url: &str) -> Self {
        Self {
            static_base_url: static_base_url.trim_end_matches('/').to_string(),
            handler_base_url: handler_base_url.trim_end_matches('/').to_string(),
            event_log: None,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Also append events to `path`, one JSON object per line.
    pub fn with_event_log(mut self, path: PathBuf) -> Self {
        self.event_log = Some(path);
        self
    }

    /// Events published so far, oldest first.
    pub fn events(&self) -> Vec<PublishedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn append_to_log(&self, event: &PublishedEvent) -> std::io::Result<()> {
        let Some(path) = &self.event_log else {
            return Ok(());
        };
        let line = serde_json::to_string(event)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{line}")
    }
}

impl Default for RecordingRuntime {
    fn default() -> Self {
        Self::new("/static", "/handler")
    }
}

impl Runtime for RecordingRuntime {
    fn publish(&self, event_type: &str, payload: Value) {
        let event = PublishedEvent {
            event_type: event_type.to_string(),
            payload,
            timestamp: Utc::now(),
        };

        if let Err(e) = self.append_to_log(&event) {
            tracing::warn!("failed to append {event_type} event to log: {e}");
        }

        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn local_resource_url(&self, path: &str) -> String {
        format!("{}/{}", self.static_base_url, path.trim_start_matches('/'))
    }

    fn handler_url(&self, handler: &str) -> String {
        format!("{}/{}", self.handler_base_url, handler)
    }
}
