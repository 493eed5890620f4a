mod clean;
mod coordinator;
mod core;
mod utils;
mod watcher;

pub use clean::clean;
pub use coordinator::{RebuildCoordinator, RebuildOutcome};
pub use self::core::{ArtifactBuilder, BuildRequest, BuildResult, Compile, marker_path};
pub use utils::{KEEP_TEMP_VAR, deployment_environment, keep_temp_requested, load_config};
pub use watcher::watch;
