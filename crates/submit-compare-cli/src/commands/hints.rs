//! The `submit-compare hints` command.

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use submit_compare_core::handlers::SEND_HINTS;

pub fn execute(config: Option<&Path>) -> Result<()> {
    let (_workbench, block) = super::open_block(config)?;
    super::call_handler(&block, SEND_HINTS, json!({}))?;
    Ok(())
}
