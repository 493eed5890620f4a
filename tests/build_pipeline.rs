//! End-to-end tests for `ArtifactBuilder`
//!
//! A shell script stands in for `picorbc`: it records its arguments, copies
//! the marker unit aside and writes a dummy artifact.
#![cfg(unix)]

use funicular::Error;
use funicular::build::{ArtifactBuilder, BuildRequest, Compile, marker_path};
use funicular::config::ToolchainConfig;
use funicular::toolchain::Warning;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tempfile::TempDir;

/// Writing a script while another test forks can fail the exec with ETXTBSY.
static EXEC_LOCK: Mutex<()> = Mutex::new(());

struct Project {
    _exec: MutexGuard<'static, ()>,
    dir: TempDir,
    /// Empty directory used as PATH so a system picorbc is never picked up.
    no_path: TempDir,
}

impl Project {
    fn new() -> Self {
        Self {
            _exec: EXEC_LOCK.lock().unwrap_or_else(PoisonError::into_inner),
            dir: tempfile::tempdir().unwrap(),
            no_path: tempfile::tempdir().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn source_dir(&self) -> PathBuf {
        self.root().join("app/funicular")
    }

    fn output(&self) -> PathBuf {
        self.root().join("app/assets/builds/app.mrb")
    }

    fn write_source(&self, rel: &str) {
        let path = self.source_dir().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# source\n").unwrap();
    }

    fn install_toolchain(&self, version: &str, exit_code: i32) {
        let bin = self.root().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let script = format!(
            r#"#!/bin/sh
dir=$(dirname "$0")
if [ "$1" = "--version" ]; then
  echo "picorbc {version} (mruby compiler)"
  exit 0
fi
printf '%s\n' "$@" > "$dir/args.log"
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  case "$arg" in *.env.rb) cp "$arg" "$dir/marker.snapshot" ;; esac
  prev="$arg"
done
if [ {exit_code} -eq 0 ]; then printf 'RITE' > "$out"; else echo "syntax error" >&2; fi
exit {exit_code}
"#
        );
        let path = bin.join("picorbc");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn builder(&self, pinned: &str) -> ArtifactBuilder {
        let toolchain = ToolchainConfig {
            version: pinned.to_string(),
            ..ToolchainConfig::default()
        };
        ArtifactBuilder::new(self.root(), toolchain, "test").with_search_path(self.no_path.path())
    }

    fn request(&self, debug_mode: bool) -> BuildRequest {
        BuildRequest {
            source_dir: self.source_dir(),
            output_path: self.output(),
            debug_mode,
        }
    }

    fn recorded_args(&self) -> Option<Vec<String>> {
        fs::read_to_string(self.root().join("bin/args.log"))
            .ok()
            .map(|s| s.lines().map(String::from).collect())
    }

    fn rel(&self, path: &str) -> String {
        self.root().join(path).to_string_lossy().to_string()
    }
}

#[test]
fn test_build_passes_ordered_sources_then_marker() {
    let project = Project::new();
    project.install_toolchain("3.0.0", 0);
    for rel in [
        "initializer.rb",
        "router_initializer.rb",
        "components/todo_list.rb",
        "components/app.rb",
        "models/todo.rb",
    ] {
        project.write_source(rel);
    }

    let result = project.builder("3.0.0").compile(&project.request(true)).unwrap();

    assert!(result.success);
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.output_path, project.output());
    assert_eq!(fs::read(project.output()).unwrap(), b"RITE");

    let marker = marker_path(&project.output());
    assert_eq!(
        project.recorded_args().unwrap(),
        vec![
            "-g".to_string(),
            "-o".to_string(),
            project.output().to_string_lossy().to_string(),
            project.rel("app/funicular/models/todo.rb"),
            project.rel("app/funicular/components/app.rb"),
            project.rel("app/funicular/components/todo_list.rb"),
            project.rel("app/funicular/router_initializer.rb"),
            project.rel("app/funicular/initializer.rb"),
            marker.to_string_lossy().to_string(),
        ]
    );

    let snapshot = fs::read_to_string(project.root().join("bin/marker.snapshot")).unwrap();
    assert_eq!(snapshot, "ENV['FUNICULAR_ENV'] = 'test'\n");
    assert!(!marker.exists(), "marker unit should be removed after a build");
}

#[test]
fn test_release_build_omits_debug_flag() {
    let project = Project::new();
    project.install_toolchain("3.0.0", 0);
    project.write_source("models/user.rb");

    project.builder("3.0.0").compile(&project.request(false)).unwrap();

    let args = project.recorded_args().unwrap();
    assert_eq!(args[0], "-o");
    assert!(!args.contains(&"-g".to_string()));
}

#[test]
fn test_version_mismatch_is_only_a_warning() {
    let project = Project::new();
    project.install_toolchain("2.3.1", 0);
    project.write_source("components/app.rb");

    let result = project.builder("2.3.0").compile(&project.request(true)).unwrap();

    assert!(result.success);
    assert_eq!(
        result.diagnostics,
        vec![Warning::VersionMismatch {
            expected: "2.3.0".into(),
            found: "2.3.1".into(),
        }]
    );
}

#[test]
fn test_empty_source_fails_without_invoking_toolchain() {
    let project = Project::new();
    project.install_toolchain("3.0.0", 0);
    fs::create_dir_all(project.source_dir().join("models")).unwrap();

    let err = project
        .builder("3.0.0")
        .compile(&project.request(true))
        .unwrap_err();

    assert!(matches!(err, Error::EmptySource(_)));
    assert!(project.recorded_args().is_none());
    assert!(!project.output().exists());
}

#[test]
fn test_toolchain_failure_reports_command_and_cleans_up() {
    let project = Project::new();
    project.install_toolchain("3.0.0", 1);
    project.write_source("models/user.rb");

    let err = project
        .builder("3.0.0")
        .compile(&project.request(true))
        .unwrap_err();

    match &err {
        Error::Build {
            command, stderr, ..
        } => {
            assert!(command.contains("bin/picorbc -g -o"));
            assert!(command.contains("models/user.rb"));
            assert!(stderr.contains("syntax error"));
        }
        other => panic!("expected build error, got {other:?}"),
    }
    assert!(!marker_path(&project.output()).exists());
}

#[test]
fn test_keep_temp_retains_marker() {
    let project = Project::new();
    project.install_toolchain("3.0.0", 0);
    project.write_source("initializer.rb");

    project
        .builder("3.0.0")
        .keep_temp(true)
        .compile(&project.request(true))
        .unwrap();

    let marker = marker_path(&project.output());
    assert_eq!(
        fs::read_to_string(marker).unwrap(),
        "ENV['FUNICULAR_ENV'] = 'test'\n"
    );
}

#[test]
fn test_missing_toolchain_is_fatal() {
    let project = Project::new();
    project.write_source("models/user.rb");

    let err = project
        .builder("3.0.0")
        .compile(&project.request(true))
        .unwrap_err();

    assert!(matches!(err, Error::ToolchainNotFound { .. }));
    assert!(!project.output().exists());
}

#[test]
fn test_unwritable_output_dir_names_the_path() {
    let project = Project::new();
    project.install_toolchain("3.0.0", 0);
    project.write_source("models/user.rb");
    let assets = project.root().join("app/assets");
    fs::create_dir_all(assets.parent().unwrap()).unwrap();
    fs::write(&assets, "not a directory").unwrap();

    let err = project
        .builder("3.0.0")
        .compile(&project.request(true))
        .unwrap_err();

    match &err {
        Error::Io { path, .. } => assert_eq!(path, &project.root().join("app/assets/builds")),
        other => panic!("expected io error, got {other:?}"),
    }
    assert!(err.to_string().contains("app/assets/builds"));
    assert!(project.recorded_args().is_none());
}
