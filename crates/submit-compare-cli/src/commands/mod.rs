pub mod author;
pub mod event;
pub mod hints;
pub mod init;
pub mod state;
pub mod submit;
pub mod validate;
pub mod view;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use submit_compare_core::handlers;
use submit_compare_core::SubmitAndCompareBlock;
use submit_compare_host::{load_config_from, Workbench};
use submit_compare_render::HtmlRenderer;

/// Open the configured workbench and its block, seeding it on first use.
pub fn open_block(config: Option<&Path>) -> Result<(Workbench, SubmitAndCompareBlock)> {
    let config = load_config_from(config)?;
    let workbench = Workbench::open(config)?;
    let block = workbench.block(Arc::new(HtmlRenderer));
    workbench.ensure_seeded(&block)?;
    Ok((workbench, block))
}

/// Call a handler and print its response as pretty JSON.
pub fn call_handler(block: &SubmitAndCompareBlock, handler: &str, body: Value) -> Result<Value> {
    let response = handlers::dispatch(block, handler, body)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(response)
}
