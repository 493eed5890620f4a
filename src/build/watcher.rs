use super::coordinator::{RebuildCoordinator, RebuildOutcome};
use super::core::ArtifactBuilder;
use crate::config::FunicularConfig;
use anyhow::{Result, bail};
use colored::*;
use notify::{Config, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

pub fn watch(project_root: &Path, config: &FunicularConfig) -> Result<()> {
    let source_dir = project_root.join(&config.app.source_dir);
    let output = project_root.join(&config.app.output);
    if !source_dir.is_dir() {
        bail!("Source directory {} does not exist", source_dir.display());
    }

    println!(
        "{} Watching for changes in {}...",
        "👀".cyan(),
        source_dir.display()
    );

    let coordinator = RebuildCoordinator::new(ArtifactBuilder::from_config(project_root, config));

    let (tx, rx) = channel();
    let config_notify = Config::default().with_poll_interval(Duration::from_secs(1));
    let mut watcher = notify::RecommendedWatcher::new(tx, config_notify)?;
    watcher.watch(&source_dir, RecursiveMode::Recursive)?;

    // First run
    report(coordinator.maybe_rebuild(&source_dir, &output));

    while rx.recv().is_ok() {
        // Debounce simple
        std::thread::sleep(Duration::from_millis(100));
        while rx.try_recv().is_ok() {}
        report(coordinator.maybe_rebuild(&source_dir, &output));
    }
    Ok(())
}

fn report(outcome: RebuildOutcome) {
    match outcome {
        RebuildOutcome::Rebuilt(result) => {
            for warning in &result.diagnostics {
                println!("   {} {}", "⚠".yellow(), warning);
            }
            println!(
                "{} Rebuilt {}",
                "✓".green(),
                result.output_path.display()
            );
        }
        RebuildOutcome::Failed(msg) => println!("{} Build failed: {}", "x".red(), msg),
        RebuildOutcome::Fresh | RebuildOutcome::InFlight => {}
    }
}
