//! The `submit-compare view` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use submit_compare_render::render_page;

pub fn execute(config: Option<&Path>, studio: bool, output: Option<PathBuf>) -> Result<()> {
    let (_workbench, block) = super::open_block(config)?;

    let fragment = if studio {
        block.studio_view()?
    } else {
        block.student_view()?
    };
    let title = block.settings()?.display_name;
    let page = render_page(&title, &fragment);

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, page)
                .with_context(|| format!("failed to write view: {}", path.display()))?;
            eprintln!("View written to {}", path.display());
        }
        None => print!("{page}"),
    }

    Ok(())
}
