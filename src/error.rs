//! Error taxonomy for building Funicular artifacts.
//!
//! Only fatal conditions live here. Advisory problems (toolchain found on
//! `PATH`, version drift) are [`Warning`](crate::toolchain::Warning)s and travel
//! inside a successful [`BuildResult`](crate::build::BuildResult).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither the pinned project binary nor a `PATH` entry could be found.
    #[error(
        "{program} not found (looked for {} and on PATH).\n\
         Install the pinned toolchain into the project, or add {program} to your PATH.",
        .local.display()
    )]
    ToolchainNotFound { program: String, local: PathBuf },

    /// The source tree contained nothing to compile.
    #[error("No Ruby files found in {}", .0.display())]
    EmptySource(PathBuf),

    /// The toolchain ran and exited unsuccessfully.
    #[error("Failed to compile with picorbc ({status}). Command: {command}{}", fmt_stderr(.stderr))]
    Build {
        command: String,
        status: String,
        stderr: String,
    },

    /// The toolchain could not be started at all.
    #[error("Failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A file or directory the build needed could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}

fn fmt_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{}", trimmed)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
