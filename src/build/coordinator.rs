//! Single-flight rebuilds.
//!
//! Many triggers (one per request, one per file event) can call
//! [`RebuildCoordinator::maybe_rebuild`] at once. A cheap unguarded check
//! turns most of them away; the rest race for the guard and re-check before
//! one of them commits to building. The guard is released before the build
//! starts, so late arrivals see the in-progress flag and return at once.

use super::core::{ArtifactBuilder, BuildRequest, BuildResult, Compile};
use crate::sources;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info};

/// `last_build` value before the first successful build.
const NEVER_BUILT: u64 = 0;

/// What a call to [`RebuildCoordinator::maybe_rebuild`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// Sources are not newer than the last successful build.
    Fresh,
    /// Another caller is building right now.
    InFlight,
    Rebuilt(BuildResult),
    /// The build ran and failed; the error has been logged.
    Failed(String),
}

pub struct RebuildCoordinator<C: Compile = ArtifactBuilder> {
    compiler: C,
    guard: Mutex<()>,
    in_progress: AtomicBool,
    /// Stamp of the source mtime at the last successful build.
    last_build: AtomicU64,
}

impl<C: Compile> RebuildCoordinator<C> {
    pub fn new(compiler: C) -> Self {
        Self {
            compiler,
            guard: Mutex::new(()),
            in_progress: AtomicBool::new(false),
            last_build: AtomicU64::new(NEVER_BUILT),
        }
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    pub fn is_building(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    /// Rebuild in debug mode if any file under `source_dir` changed since the
    /// last successful build. Never fails; build errors are logged.
    pub fn maybe_rebuild(&self, source_dir: &Path, output_path: &Path) -> RebuildOutcome {
        // An empty tree is never stale.
        let Some(current) = sources::latest_mtime(source_dir).map(stamp) else {
            return RebuildOutcome::Fresh;
        };

        if let Some(outcome) = self.skip(current) {
            return outcome;
        }

        {
            let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(outcome) = self.skip(current) {
                return outcome;
            }
            self.in_progress.store(true, Ordering::SeqCst);
        }
        let _flight = InFlight(&self.in_progress);

        info!(source = %source_dir.display(), "Source files changed, recompiling");
        let request = BuildRequest {
            source_dir: source_dir.to_path_buf(),
            output_path: output_path.to_path_buf(),
            debug_mode: true,
        };

        match self.compiler.compile(&request) {
            Ok(result) => {
                self.last_build.store(current, Ordering::SeqCst);
                RebuildOutcome::Rebuilt(result)
            }
            Err(e) => {
                error!(error = %e, "Funicular compilation failed");
                RebuildOutcome::Failed(e.to_string())
            }
        }
    }

    fn skip(&self, current: u64) -> Option<RebuildOutcome> {
        if self.in_progress.load(Ordering::SeqCst) {
            debug!("build already in progress");
            return Some(RebuildOutcome::InFlight);
        }
        let last = self.last_build.load(Ordering::SeqCst);
        if last != NEVER_BUILT && current <= last {
            return Some(RebuildOutcome::Fresh);
        }
        None
    }
}

/// Clears the in-progress flag when the build ends, panics included.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Nanoseconds since the epoch, shifted by one so `0` can mean "never".
fn stamp(time: SystemTime) -> u64 {
    let nanos = time
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX - 1))
        .unwrap_or(0);
    nanos.saturating_add(1)
}
