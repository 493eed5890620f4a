//! Toolchain discovery and version checking
//!
//! The pinned, project-local `picorbc` always wins. A compiler found on `PATH`
//! is accepted with a warning, since its version is not under the project's
//! control.

pub mod types;

pub use types::{Origin, ToolchainBinary, Warning};

use crate::config::ToolchainConfig;
use crate::error::{Error, Result};
use regex::Regex;
use std::cell::OnceCell;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;
use tracing::debug;

static VERSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+").expect("valid version regex"));

/// Locates the compiler for one build attempt.
///
/// The lookup is memoized for the lifetime of the resolver; build a new one
/// per attempt so changes to the environment are picked up.
#[derive(Debug)]
pub struct ToolchainResolver {
    project_root: PathBuf,
    program: String,
    local_path: PathBuf,
    expected_version: String,
    search_path: Option<OsString>,
    resolved: OnceCell<ToolchainBinary>,
}

impl ToolchainResolver {
    pub fn new(project_root: impl Into<PathBuf>, config: &ToolchainConfig) -> Self {
        Self {
            project_root: project_root.into(),
            program: config.program.clone(),
            local_path: config.path.clone(),
            expected_version: config.version.clone(),
            search_path: None,
            resolved: OnceCell::new(),
        }
    }

    /// Search these directories instead of the process `PATH`.
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    pub fn expected_version(&self) -> &str {
        &self.expected_version
    }

    /// Find the compiler, pushing a warning when it came from `PATH`.
    ///
    /// The warning is pushed on every call, memoized or not.
    pub fn resolve(&self, warnings: &mut Vec<Warning>) -> Result<ToolchainBinary> {
        let binary = match self.resolved.get() {
            Some(binary) => binary.clone(),
            None => {
                let binary = self.locate()?;
                debug!(
                    path = %binary.invocation_path.display(),
                    origin = %binary.origin,
                    "resolved toolchain"
                );
                self.resolved.get_or_init(|| binary).clone()
            }
        };

        if binary.origin == Origin::Global {
            warnings.push(Warning::GlobalToolchain {
                path: binary.invocation_path.clone(),
                pinned: self.local_path.clone(),
            });
        }
        Ok(binary)
    }

    fn locate(&self) -> Result<ToolchainBinary> {
        let local = self.project_root.join(&self.local_path);
        if is_executable(&local) {
            Ok(ToolchainBinary::new(local, Origin::ProjectLocal))
        } else if let Some(global) = self.find_on_path() {
            Ok(ToolchainBinary::new(global, Origin::Global))
        } else {
            Err(Error::ToolchainNotFound {
                program: self.program.clone(),
                local,
            })
        }
    }

    /// Query `--version` and compare it with the pinned version.
    ///
    /// Records the detected version on `binary`. Never fails.
    pub fn check_version(&self, binary: &mut ToolchainBinary) -> Vec<Warning> {
        let output = Command::new(&binary.invocation_path)
            .arg("--version")
            .output();

        let detected = output.ok().and_then(|o| {
            let mut text = String::from_utf8_lossy(&o.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&o.stderr));
            extract_version(&text)
        });

        binary.detected_version = detected.clone();
        match detected {
            None => vec![Warning::VersionUndetected {
                binary: binary.invocation_path.clone(),
            }],
            Some(found) if found != self.expected_version => vec![Warning::VersionMismatch {
                expected: self.expected_version.clone(),
                found,
            }],
            Some(_) => Vec::new(),
        }
    }

    fn find_on_path(&self) -> Option<PathBuf> {
        let search = match &self.search_path {
            Some(p) => p.clone(),
            None => std::env::var_os("PATH")?,
        };

        let mut names = vec![PathBuf::from(&self.program)];
        if cfg!(windows) {
            names.push(PathBuf::from(format!("{}.exe", self.program)));
        }

        std::env::split_paths(&search)
            .filter(|dir| !dir.as_os_str().is_empty())
            .flat_map(|dir| names.iter().map(move |n| dir.join(n)))
            .find(|candidate| is_executable(candidate))
    }
}

/// First `major.minor.patch` token in `text`.
pub fn extract_version(text: &str) -> Option<String> {
    VERSION_TOKEN.find(text).map(|m| m.as_str().to_string())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
