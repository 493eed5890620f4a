use serde::Deserialize;
use std::path::PathBuf;

/// Name of the optional project configuration file.
pub const CONFIG_FILE: &str = "funicular.toml";

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FunicularConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Overrides the deployment environment written into the marker unit.
    pub environment: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
    #[serde(default = "default_program")]
    pub program: String,
    /// Project-relative location of the pinned compiler.
    #[serde(default = "default_toolchain_path")]
    pub path: PathBuf,
    /// Version the project is pinned to.
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output: default_output(),
            environment: None,
        }
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            path: default_toolchain_path(),
            version: default_version(),
        }
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("app/funicular")
}

fn default_output() -> PathBuf {
    PathBuf::from("app/assets/builds/app.mrb")
}

fn default_program() -> String {
    "picorbc".to_string()
}

fn default_toolchain_path() -> PathBuf {
    PathBuf::from("bin/picorbc")
}

fn default_version() -> String {
    "3.0.0".to_string()
}
