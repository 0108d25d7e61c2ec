//! The `submit-compare event` command.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use submit_compare_core::handlers::PUBLISH_EVENT;

pub fn execute(config: Option<&Path>, payload: String) -> Result<()> {
    let data: Value = serde_json::from_str(&payload).context("event payload is not valid JSON")?;

    let (_workbench, block) = super::open_block(config)?;
    let response = super::call_handler(&block, PUBLISH_EVENT, data)?;
    if response["result"] != "success" {
        anyhow::bail!("event was not published");
    }
    Ok(())
}
