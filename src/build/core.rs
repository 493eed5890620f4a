use super::utils::{deployment_environment, keep_temp_requested};
use crate::config::{FunicularConfig, ToolchainConfig};
use crate::error::{Error, Result};
use crate::sources;
use crate::toolchain::{ToolchainResolver, Warning};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;
use tracing::{debug, info, warn};

/// One build: where the sources are, where the artifact goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub source_dir: PathBuf,
    pub output_path: PathBuf,
    pub debug_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub output_path: PathBuf,
    pub success: bool,
    pub diagnostics: Vec<Warning>,
}

/// Anything that can turn a [`BuildRequest`] into an artifact.
pub trait Compile: Send + Sync {
    fn compile(&self, request: &BuildRequest) -> Result<BuildResult>;
}

/// Drives `picorbc` over the ordered source list.
#[derive(Debug, Clone)]
pub struct ArtifactBuilder {
    project_root: PathBuf,
    toolchain: ToolchainConfig,
    environment: String,
    keep_temp: bool,
    search_path: Option<OsString>,
}

impl ArtifactBuilder {
    pub fn new(
        project_root: impl Into<PathBuf>,
        toolchain: ToolchainConfig,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            toolchain,
            environment: environment.into(),
            keep_temp: false,
            search_path: None,
        }
    }

    /// Builder for a project, honouring the environment overrides.
    pub fn from_config(project_root: impl Into<PathBuf>, config: &FunicularConfig) -> Self {
        Self::new(
            project_root,
            config.toolchain.clone(),
            deployment_environment(config),
        )
        .keep_temp(keep_temp_requested())
    }

    /// Retain the marker unit after the build for inspection.
    pub fn keep_temp(mut self, keep: bool) -> Self {
        self.keep_temp = keep;
        self
    }

    /// Search these directories for a global toolchain instead of `PATH`.
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    fn resolver(&self) -> ToolchainResolver {
        let resolver = ToolchainResolver::new(&self.project_root, &self.toolchain);
        match &self.search_path {
            Some(path) => resolver.with_search_path(path.clone()),
            None => resolver,
        }
    }

    fn write_marker(&self, output_path: &Path) -> Result<TransientFile> {
        let path = marker_path(output_path);
        fs::write(&path, marker_source(&self.environment)).map_err(Error::io(&path))?;
        Ok(TransientFile {
            path,
            keep: self.keep_temp,
        })
    }
}

impl Compile for ArtifactBuilder {
    fn compile(&self, request: &BuildRequest) -> Result<BuildResult> {
        let start_time = Instant::now();

        // 1. Toolchain
        let mut diagnostics = Vec::new();
        let resolver = self.resolver();
        let mut binary = resolver.resolve(&mut diagnostics)?;
        diagnostics.extend(resolver.check_version(&mut binary));
        for warning in &diagnostics {
            warn!("{}", warning);
        }

        // 2. Sources
        let files = sources::gather(&request.source_dir)?;

        // 3. Output directory and marker unit
        if let Some(dir) = request.output_path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(Error::io(dir))?;
        }
        let marker = self.write_marker(&request.output_path)?;

        // 4. Invoke
        let mut cmd = Command::new(&binary.invocation_path);
        if request.debug_mode {
            cmd.arg("-g");
        }
        cmd.arg("-o").arg(&request.output_path);
        cmd.args(files.iter().map(|f| &f.path));
        cmd.arg(&marker.path);
        let command_line = describe(&cmd);

        info!(
            source = %request.source_dir.display(),
            output = %request.output_path.display(),
            debug = request.debug_mode,
            files = files.len(),
            "Compiling Funicular application"
        );
        for file in &files {
            debug!(path = %file.path.display(), tier = ?file.tier, "input");
        }
        debug!(path = %marker.path.display(), environment = %self.environment, "marker unit");

        let output = cmd.output().map_err(|source| Error::Spawn {
            command: command_line.clone(),
            source,
        })?;
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(Error::Build {
                command: command_line,
                status: output.status.to_string(),
                stderr,
            });
        }
        if !stderr.trim().is_empty() {
            warn!(stderr = %stderr.trim(), "picorbc reported diagnostics");
        }

        info!(
            output = %request.output_path.display(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Successfully compiled"
        );
        Ok(BuildResult {
            output_path: request.output_path.clone(),
            success: true,
            diagnostics,
        })
    }
}

/// Location of the synthesized environment marker for an artifact.
pub fn marker_path(output_path: &Path) -> PathBuf {
    let mut name = output_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".env.rb");
    output_path.with_file_name(name)
}

fn marker_source(environment: &str) -> String {
    let escaped = environment.replace('\\', "\\\\").replace('\'', "\\'");
    format!("ENV['FUNICULAR_ENV'] = '{}'\n", escaped)
}

fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deleted on drop unless `keep` is set.
struct TransientFile {
    path: PathBuf,
    keep: bool,
}

impl Drop for TransientFile {
    fn drop(&mut self) {
        if self.keep {
            info!(path = %self.path.display(), "keeping marker unit");
            return;
        }
        if let Err(e) = fs::remove_file(&self.path)
            && e.kind() != ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %e, "failed to remove marker unit");
        }
    }
}
