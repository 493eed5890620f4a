//! Build artifact cleanup.
//!
//! `funicular clean` removes the compiled artifact and any marker unit left
//! behind by a `FUNICULAR_KEEP_TEMP` build. The output directory itself is
//! left in place since other assets usually live there.

use super::core::marker_path;
use crate::config::FunicularConfig;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;

pub fn clean(project_root: &Path, config: &FunicularConfig) -> Result<bool> {
    let output = project_root.join(&config.app.output);
    let mut cleaned = false;

    for path in [marker_path(&output), output] {
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            println!("{} Removed {}", "🗑️".red(), path.display());
            cleaned = true;
        }
    }

    if cleaned {
        println!("{} Clean complete.", "✓".green());
    } else {
        println!("{} Nothing to clean", "!".yellow());
    }
    Ok(cleaned)
}
