//! Source discovery and ordering.
//!
//! The compiled artifact is the concatenation of every source unit, so the
//! order returned by [`gather`] is part of the program: models first, then
//! components, then the named `*_initializer.rb` files, and finally the
//! canonical `initializer.rb`.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// Extension of Funicular source files.
pub const SOURCE_EXT: &str = "rb";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Model,
    Component,
    Initializer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub tier: Tier,
}

/// Collect and order every source file under `source_dir`.
///
/// Fails with [`Error::EmptySource`] when nothing matches.
pub fn gather(source_dir: &Path) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();

    for (subdir, tier) in [("models", Tier::Model), ("components", Tier::Component)] {
        let mut paths = walk_sources(&source_dir.join(subdir));
        sort_lexically(&mut paths);
        files.extend(paths.into_iter().map(|path| SourceFile { path, tier }));
    }

    let mut named = top_level_sources(source_dir)
        .into_iter()
        .filter(|p| is_named_initializer(p))
        .collect::<Vec<_>>();
    sort_lexically(&mut named);
    files.extend(named.into_iter().map(|path| SourceFile {
        path,
        tier: Tier::Initializer,
    }));

    let canonical = source_dir.join(format!("initializer.{}", SOURCE_EXT));
    if canonical.is_file() {
        files.push(SourceFile {
            path: canonical,
            tier: Tier::Initializer,
        });
    }

    if files.is_empty() {
        return Err(Error::EmptySource(source_dir.to_path_buf()));
    }
    Ok(files)
}

/// Newest modification time of any file under `dir`, recursively.
///
/// `None` when the tree is missing or holds no files.
pub fn latest_mtime(dir: &Path) -> Option<SystemTime> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok()?.modified().ok())
        .max()
}

/// Byte-wise order of the whole path string, so `todo.rb` precedes `todo/item.rb`.
fn sort_lexically(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| {
        a.as_os_str()
            .as_encoded_bytes()
            .cmp(b.as_os_str().as_encoded_bytes())
    });
}

fn walk_sources(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && has_source_ext(e.path()))
        .map(|e| e.into_path())
        .collect()
}

fn top_level_sources(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && has_source_ext(e.path()))
        .map(|e| e.into_path())
        .collect()
}

/// Dotfiles and dot-directories (editor backups, `.git`).
fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

fn has_source_ext(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXT)
}

fn is_named_initializer(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with("_initializer"))
}
