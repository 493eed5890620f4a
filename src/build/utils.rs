use crate::config::{CONFIG_FILE, FunicularConfig};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Set to keep the synthesized marker unit next to the artifact after a build.
pub const KEEP_TEMP_VAR: &str = "FUNICULAR_KEEP_TEMP";

/// Environment variables consulted, in order, for the deployment environment name.
const ENVIRONMENT_VARS: &[&str] = &["FUNICULAR_ENV", "RAILS_ENV", "RACK_ENV"];

const DEFAULT_ENVIRONMENT: &str = "development";

// --- Helper: Load Config (defaults when funicular.toml is absent) ---
pub fn load_config(project_root: &Path) -> Result<FunicularConfig> {
    let path = project_root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(FunicularConfig::default());
    }
    let config_str = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {} - check file permissions", path.display()))?;
    toml::from_str(&config_str).with_context(|| {
        format!(
            "Failed to parse {} - check for syntax errors or unknown keys",
            path.display()
        )
    })
}

/// Deployment environment written into the marker unit.
pub fn deployment_environment(config: &FunicularConfig) -> String {
    if let Some(env) = &config.app.environment {
        return env.clone();
    }
    ENVIRONMENT_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}

pub fn keep_temp_requested() -> bool {
    std::env::var_os(KEEP_TEMP_VAR).is_some()
}
