//! Read-only queries against the host.
//!
//! The engine touches the host in exactly two places: enumerating the files
//! of an external framework resources directory, and asking for a library's
//! link flags for the final link. Both sit behind a trait so generation can
//! run against fixed answers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{GenerateError, Result};

/// Enumerates the regular files below a directory.
pub trait TreeWalker: Sync {
  /// Paths relative to `root`, sorted, directories and symlinks excluded.
  fn regular_files(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// [`TreeWalker`] over the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsTree;

impl TreeWalker for FsTree {
  fn regular_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
      let entry = entry.map_err(|e| GenerateError::Walk {
        path: root.to_path_buf(),
        message: e.to_string(),
      })?;

      if !entry.file_type().is_file() {
        continue;
      }

      let relative = entry.path().strip_prefix(root).map_err(|e| GenerateError::Walk {
        path: entry.path().to_path_buf(),
        message: e.to_string(),
      })?;
      files.push(relative.to_path_buf());
    }

    debug!(root = ?root, count = files.len(), "walked directory");
    Ok(files)
  }
}

/// [`TreeWalker`] with canned directory listings; unknown roots fail like a
/// missing directory would.
#[derive(Debug, Clone, Default)]
pub struct FixedTree(BTreeMap<PathBuf, Vec<PathBuf>>);

impl FixedTree {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, root: impl Into<PathBuf>, files: &[&str]) -> Self {
    let mut files: Vec<PathBuf> = files.iter().map(PathBuf::from).collect();
    files.sort();
    self.0.insert(root.into(), files);
    self
  }
}

impl TreeWalker for FixedTree {
  fn regular_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
    self.0.get(root).cloned().ok_or_else(|| GenerateError::Walk {
      path: root.to_path_buf(),
      message: "no such directory".to_string(),
    })
  }
}

/// Looks up the link flags for a library by name.
pub trait FlagQuery: Sync {
  fn library_flags(&self, library: &str) -> Result<String>;
}

/// [`FlagQuery`] backed by `pkg-config --libs`.
///
/// The program can be swapped through `$PKG_CONFIG`, as pkg-config's own
/// tooling does.
#[derive(Debug, Clone)]
pub struct PkgConfig {
  program: String,
}

impl PkgConfig {
  pub fn new(program: &str) -> Self {
    Self {
      program: program.to_string(),
    }
  }

  pub fn from_env() -> Self {
    let program = std::env::var("PKG_CONFIG")
      .ok()
      .filter(|p| !p.is_empty())
      .unwrap_or_else(|| "pkg-config".to_string());
    Self::new(&program)
  }
}

impl Default for PkgConfig {
  fn default() -> Self {
    Self::from_env()
  }
}

impl FlagQuery for PkgConfig {
  fn library_flags(&self, library: &str) -> Result<String> {
    debug!(program = %self.program, library = %library, "querying library flags");

    let output = Command::new(&self.program)
      .arg("--libs")
      .arg(library)
      .output()
      .map_err(|e| GenerateError::FlagQuery {
        library: library.to_string(),
        message: format!("failed to run {}: {e}", self.program),
      })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(GenerateError::FlagQuery {
        library: library.to_string(),
        message: format!("exit code {:?}: {}", output.status.code(), stderr.trim()),
      });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

/// [`FlagQuery`] with canned answers; unknown libraries fail.
#[derive(Debug, Clone, Default)]
pub struct FixedFlags(BTreeMap<String, String>);

impl FixedFlags {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, library: &str, flags: &str) -> Self {
    self.0.insert(library.to_string(), flags.to_string());
    self
  }
}

impl FlagQuery for FixedFlags {
  fn library_flags(&self, library: &str) -> Result<String> {
    self.0.get(library).cloned().ok_or_else(|| GenerateError::FlagQuery {
      library: library.to_string(),
      message: "no flags known".to_string(),
    })
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use serial_test::serial;

  use super::*;

  #[test]
  fn walks_regular_files_sorted_and_relative() {
    let temp = tempfile::TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("b/nested")).unwrap();
    fs::create_dir_all(root.join("empty")).unwrap();
    fs::write(root.join("z.txt"), "z").unwrap();
    fs::write(root.join("b/nested/x.png"), "x").unwrap();
    fs::write(root.join("a.plist"), "a").unwrap();

    let files = FsTree.regular_files(root).unwrap();
    assert_eq!(
      files,
      vec![
        PathBuf::from("a.plist"),
        PathBuf::from("b/nested/x.png"),
        PathBuf::from("z.txt"),
      ]
    );
  }

  #[test]
  fn walking_a_missing_directory_fails() {
    let temp = tempfile::TempDir::new().unwrap();
    let err = FsTree.regular_files(&temp.path().join("missing")).unwrap_err();
    assert!(matches!(err, GenerateError::Walk { .. }));
  }

  #[test]
  fn fixed_flags_answer_known_libraries_only() {
    let flags = FixedFlags::new().with("sdl2", "-lSDL2");
    assert_eq!(flags.library_flags("sdl2").unwrap(), "-lSDL2");
    assert!(matches!(
      flags.library_flags("gl"),
      Err(GenerateError::FlagQuery { ref library, .. }) if library == "gl"
    ));
  }

  #[test]
  fn missing_pkg_config_program_is_a_flag_query_error() {
    let query = PkgConfig::new("/nonexistent/pkg-config-for-tests");
    assert!(matches!(
      query.library_flags("zlib"),
      Err(GenerateError::FlagQuery { .. })
    ));
  }

  #[test]
  #[serial]
  fn pkg_config_program_comes_from_environment() {
    temp_env::with_var("PKG_CONFIG", Some("/nonexistent/custom-pkg-config"), || {
      let err = PkgConfig::from_env().library_flags("zlib").unwrap_err();
      assert!(err.to_string().contains("/nonexistent/custom-pkg-config"));
    });
  }

  #[test]
  fn fixed_tree_lists_known_roots_only() {
    let tree = FixedTree::new().with("/vendor/Kit.bundle", &["b.png", "a.plist"]);
    assert_eq!(
      tree.regular_files(Path::new("/vendor/Kit.bundle")).unwrap(),
      vec![PathBuf::from("a.plist"), PathBuf::from("b.png")]
    );
    assert!(matches!(
      tree.regular_files(Path::new("/vendor/Other.bundle")),
      Err(GenerateError::Walk { .. })
    ));
  }
}
