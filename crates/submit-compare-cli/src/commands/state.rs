//! The `submit-compare state` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use submit_compare_core::progress::format_general;

pub fn execute(config: Option<&Path>) -> Result<()> {
    let (workbench, block) = super::open_block(config)?;
    let settings = block.settings()?;
    let state = block.attempt_state()?;
    let presentation = block.current_presentation()?;
    let phase = state.phase(settings.max_attempts);

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);

    let max_attempts = if settings.max_attempts == 0 {
        "unlimited".to_string()
    } else {
        settings.max_attempts.to_string()
    };
    let rows = [
        ("user_id", block.scope_ids().user_id.clone()),
        ("component_id", block.component_id().to_string()),
        ("display_name", settings.display_name),
        ("weight", settings.weight.to_string()),
        ("max_attempts", max_attempts),
        ("phase", format!("{phase:?}")),
        ("count_attempts", state.count_attempts.to_string()),
        ("score", format_general(state.score)),
        ("student_answer", state.student_answer),
        ("problem_progress", presentation.problem_progress),
        ("used_attempts_feedback", presentation.used_attempts_feedback),
        ("state_file", workbench.config().state_file.display().to_string()),
    ];
    for (field, value) in rows {
        table.add_row(vec![Cell::new(field), Cell::new(value)]);
    }

    println!("{table}");
    Ok(())
}
