//! submit-compare-host: Workbench implementations of the block's host ports.
//!
//! Provides in-memory and JSON-file field stores, a runtime that records
//! published events, an English pluralizer, and the TOML workbench
//! configuration used by the CLI.

pub mod config;
pub mod file_store;
pub mod i18n;
pub mod memory;
pub mod runtime;
pub mod workbench;

pub use config::{load_config, load_config_from, BlockDefaults, WorkbenchConfig};
pub use file_store::JsonFileStore;
pub use i18n::EnglishLocalizer;
pub use memory::MemoryFieldStore;
pub use runtime::{PublishedEvent, RecordingRuntime};
pub use workbench::Workbench;
