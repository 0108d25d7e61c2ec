//! The `submit-compare author` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;

use submit_compare_core::handlers::STUDIO_SUBMIT;

/// Author overrides; `None` keeps the stored value.
pub struct AuthorArgs {
    pub display_name: Option<String>,
    pub weight: Option<String>,
    pub max_attempts: Option<String>,
    pub your_answer_label: Option<String>,
    pub our_answer_label: Option<String>,
    pub submit_button_label: Option<String>,
    pub question: Option<PathBuf>,
}

pub fn execute(config: Option<&Path>, args: AuthorArgs) -> Result<()> {
    let (_workbench, block) = super::open_block(config)?;
    let current = block.settings()?;

    let data = match &args.question {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read question: {}", path.display()))?,
        None => block.question_string()?,
    };

    let body = json!({
        "display_name": args.display_name.unwrap_or(current.display_name),
        "weight": args.weight.unwrap_or_else(|| current.weight.to_string()),
        "max_attempts": args.max_attempts.unwrap_or_else(|| current.max_attempts.to_string()),
        "your_answer_label": args.your_answer_label.unwrap_or(current.your_answer_label),
        "our_answer_label": args.our_answer_label.unwrap_or(current.our_answer_label),
        "submit_button_label": args.submit_button_label.unwrap_or(current.submit_button_label),
        "data": data
    });

    let response = super::call_handler(&block, STUDIO_SUBMIT, body)?;
    if response["result"] != "success" {
        anyhow::bail!("author edit was rejected");
    }
    Ok(())
}
