//! The `submit-compare validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use submit_compare_core::parser;

pub fn execute(question_path: PathBuf) -> Result<()> {
    let xml = std::fs::read_to_string(&question_path)
        .with_context(|| format!("failed to read question: {}", question_path.display()))?;
    parser::check_well_formed(&xml)?;

    println!("Question: {}", question_path.display());

    let warnings = parser::validate_question(&xml);
    if !warnings.is_empty() {
        for w in &warnings {
            let prefix = w
                .section
                .as_ref()
                .map(|s| format!("  [{s}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        println!("\n{} warning(s) found.", warnings.len());
        return Ok(());
    }

    let question = parser::parse_question(&xml)?;
    println!("  body: {} bytes", question.body.len());
    println!("  explanation: {} bytes", question.explanation.len());
    println!("  hints: {}", question.hints.len());
    println!("Question valid.");

    Ok(())
}
