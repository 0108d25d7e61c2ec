//! The `submit-compare init` command.

use std::path::Path;

use anyhow::Result;

use submit_compare_core::model::DEFAULT_QUESTION_XML;

pub fn execute() -> Result<()> {
    let config_path = Path::new("submit-compare.toml");
    if config_path.exists() {
        println!("submit-compare.toml already exists, skipping.");
    } else {
        let usage_id = format!("submit-and-compare-{}", uuid::Uuid::new_v4().simple());
        std::fs::write(config_path, sample_config(&usage_id))?;
        println!("Created submit-compare.toml");
    }

    let question_path = Path::new("question.xml");
    if question_path.exists() {
        println!("question.xml already exists, skipping.");
    } else {
        std::fs::write(question_path, DEFAULT_QUESTION_XML)?;
        println!("Created question.xml");
    }

    println!("\nNext steps:");
    println!("  1. Edit question.xml");
    println!("  2. Run: submit-compare validate --question question.xml");
    println!("  3. Run: submit-compare view --output view.html");

    Ok(())
}

fn sample_config(usage_id: &str) -> String {
    format!(
        r#"# submit-compare workbench configuration

state_file = "submit-compare-state.json"
event_log = "submit-compare-events.jsonl"
user_id = "student"
usage_id = "{usage_id}"

[block]
display_name = "Submit and Compare"
weight = 1
max_attempts = 0
question_file = "question.xml"
"#
    )
}
