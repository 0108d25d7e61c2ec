//! The `submit-compare submit` command.

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use submit_compare_core::handlers::STUDENT_SUBMIT;

pub fn execute(config: Option<&Path>, answer: String, action: String) -> Result<()> {
    let (_workbench, block) = super::open_block(config)?;
    super::call_handler(
        &block,
        STUDENT_SUBMIT,
        json!({ "answer": answer, "action": action }),
    )?;
    Ok(())
}
