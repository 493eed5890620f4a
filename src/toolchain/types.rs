use std::fmt;
use std::path::PathBuf;

/// Where a toolchain binary was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Installed into the project by its dependency manager (preferred)
    ProjectLocal,
    /// Discovered on the system `PATH`
    Global,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::ProjectLocal => write!(f, "project-local"),
            Origin::Global => write!(f, "global"),
        }
    }
}

/// A resolved `picorbc` binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainBinary {
    /// Path handed to the subprocess
    pub invocation_path: PathBuf,

    pub origin: Origin,

    /// Dotted-triple version, once `--version` has been queried
    pub detected_version: Option<String>,
}

impl ToolchainBinary {
    pub fn new(invocation_path: PathBuf, origin: Origin) -> Self {
        Self {
            invocation_path,
            origin,
            detected_version: None,
        }
    }
}

/// Advisory diagnostics. None of these stop a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The compiler came from `PATH` rather than the pinned project install.
    GlobalToolchain { path: PathBuf, pinned: PathBuf },
    /// `--version` produced no dotted-triple token.
    VersionUndetected { binary: PathBuf },
    /// Detected version differs from the pinned one.
    VersionMismatch { expected: String, found: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::GlobalToolchain { path, pinned } => write!(
                f,
                "Using picorbc from PATH ({}). Install the pinned version at {} for reproducible builds.",
                path.display(),
                pinned.display()
            ),
            Warning::VersionUndetected { binary } => write!(
                f,
                "Could not detect the picorbc version reported by {}",
                binary.display()
            ),
            Warning::VersionMismatch { expected, found } => {
                let relation = match (
                    semver::Version::parse(found),
                    semver::Version::parse(expected),
                ) {
                    (Ok(have), Ok(want)) if have > want => "newer than",
                    (Ok(have), Ok(want)) if have < want => "older than",
                    _ => "different from",
                };
                write!(
                    f,
                    "picorbc {} is {} the pinned version {}",
                    found, relation, expected
                )
            }
        }
    }
}
