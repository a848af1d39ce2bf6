//! Project model, as handed over by the Project Model Provider.
//!
//! Parsing the native project file format is someone else's job: the provider
//! writes a JSON description (`project.json`) of the already-parsed object
//! graph, and this module loads it into read-only [`Project`] values.
//!
//! `PROJECT` may be the JSON file itself or an `.xcodeproj` bundle directory
//! holding `project.json`. The project directory (`$(PROJECT_DIR)`) is the
//! directory that contains either of them.

mod types;

pub use types::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::consts::PROJECT_MODEL_FILE;
use crate::error::{GenerateError, Result};

/// The whole project: every file reference it knows about and its targets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
  #[serde(default)]
  pub name: String,
  /// Every file reference in the project's group tree.
  #[serde(default)]
  pub files: Vec<FileReference>,
  #[serde(default)]
  pub targets: Vec<Target>,
  /// Directory the project's relative paths are anchored at.
  #[serde(skip)]
  pub dir: PathBuf,
}

impl Project {
  pub fn new(name: &str, dir: impl Into<PathBuf>) -> Self {
    Self {
      name: name.to_string(),
      files: Vec::new(),
      targets: Vec::new(),
      dir: dir.into(),
    }
  }

  pub fn with_file(mut self, file: FileReference) -> Self {
    self.files.push(file);
    self
  }

  pub fn with_target(mut self, target: Target) -> Self {
    self.targets.push(target);
    self
  }

  /// Load a project description from a JSON file or `.xcodeproj` directory.
  pub fn load(path: &Path) -> Result<Self> {
    let model_path = if path.is_dir() {
      path.join(PROJECT_MODEL_FILE)
    } else {
      path.to_path_buf()
    };
    let dir = path
      .parent()
      .map(Path::to_path_buf)
      .filter(|p| !p.as_os_str().is_empty())
      .unwrap_or_else(|| PathBuf::from("."));

    debug!(path = ?model_path, dir = ?dir, "loading project model");

    let content = fs::read_to_string(&model_path)?;
    let mut project = Self::from_json(&content, dir).map_err(|e| match e {
      GenerateError::ParseProject { source, .. } => GenerateError::ParseProject {
        path: model_path.clone(),
        source,
      },
      other => other,
    })?;

    if project.name.is_empty()
      && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
    {
      project.name = stem.to_string();
    }

    Ok(project)
  }

  /// Parse a project description anchored at `dir`.
  pub fn from_json(json: &str, dir: impl Into<PathBuf>) -> Result<Self> {
    let mut project: Project = serde_json::from_str(json).map_err(|source| GenerateError::ParseProject {
      path: PathBuf::new(),
      source,
    })?;
    project.dir = dir.into();
    Ok(project)
  }

  pub fn target(&self, name: &str) -> Option<&Target> {
    self.targets.iter().find(|t| t.name == name)
  }

  /// Absolute (or project-relative, for a relative `dir`) source path.
  pub fn source_path(&self, file: &FileReference) -> PathBuf {
    self.dir.join(file.logical_path())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::settings::RawValue;

  const PROJECT_JSON: &str = r#"{
    "name": "Demo",
    "files": [
      { "path": "AppDelegate.h", "parents": ["Demo"] },
      { "path": "main.m", "parents": ["Demo", ""] }
    ],
    "targets": [{
      "name": "Demo",
      "product_name": "DemoApp",
      "build_configurations": [
        { "name": "Debug", "build_settings": { "HEADER_SEARCH_PATHS": ["$(inherited)", "include"] } },
        { "name": "Release" }
      ],
      "build_phases": [
        {
          "isa": "PBXSourcesBuildPhase",
          "files": [
            { "isa": "PBXFileReference", "path": "main.m", "parents": ["Demo"],
              "settings": { "COMPILER_FLAGS": "-fno-objc-arc" } }
          ]
        },
        {
          "isa": "PBXResourcesBuildPhase",
          "files": [
            { "isa": "PBXVariantGroup", "name": "Main.storyboard",
              "children": [{ "path": "Base.lproj/Main.storyboard", "parents": ["Demo"] }] },
            { "isa": "XCVersionGroup", "name": "Model.xcdatamodeld" }
          ]
        },
        { "isa": "PBXCopyFilesBuildPhase" }
      ]
    }]
  }"#;

  #[test]
  fn parses_targets_phases_and_entries() {
    let project = Project::from_json(PROJECT_JSON, "/work").unwrap();
    assert_eq!(project.name, "Demo");
    assert_eq!(project.dir, PathBuf::from("/work"));
    assert_eq!(project.files.len(), 2);

    let target = project.target("Demo").unwrap();
    assert_eq!(target.product_name, "DemoApp");
    assert_eq!(target.build_configurations.len(), 2);
    assert_eq!(
      target.configuration("Debug").unwrap().build_settings.get("HEADER_SEARCH_PATHS"),
      Some(&RawValue::from(vec!["$(inherited)", "include"]))
    );
    assert!(target.configuration("Release").unwrap().build_settings.is_empty());

    let kinds: Vec<_> = target.build_phases.iter().map(|p| p.kind.clone()).collect();
    assert_eq!(
      kinds,
      vec![
        PhaseKind::Sources,
        PhaseKind::Resources,
        PhaseKind::Unknown("PBXCopyFilesBuildPhase".to_string())
      ]
    );

    let sources = &target.build_phases[0];
    assert_eq!(
      sources.files[0].settings.get("COMPILER_FLAGS"),
      Some(&RawValue::from("-fno-objc-arc"))
    );

    let resources = &target.build_phases[1];
    assert!(matches!(resources.files[0].entry, FileEntry::VariantGroup(ref g) if g.children.len() == 1));
    assert_eq!(
      resources.files[1].entry,
      FileEntry::Unsupported("XCVersionGroup".to_string())
    );
  }

  #[test]
  fn unsupported_entry_fails_when_resolved() {
    let entry = FileEntry::Unsupported("XCVersionGroup".to_string());
    assert!(matches!(entry.files(), Err(GenerateError::UnsupportedFileEntry(ref isa)) if isa == "XCVersionGroup"));
  }

  #[test]
  fn logical_path_skips_empty_groups() {
    let file = FileReference::new("main.m", &["Demo", "", "Classes"]);
    assert_eq!(file.logical_path(), PathBuf::from("Demo/Classes/main.m"));
    assert_eq!(file.extension(), Some("m"));
  }

  #[test]
  fn load_accepts_xcodeproj_directory() {
    let temp = tempfile::TempDir::new().unwrap();
    let bundle = temp.path().join("Demo.xcodeproj");
    fs::create_dir_all(&bundle).unwrap();
    fs::write(bundle.join(PROJECT_MODEL_FILE), r#"{ "targets": [] }"#).unwrap();

    let project = Project::load(&bundle).unwrap();
    assert_eq!(project.name, "Demo");
    assert_eq!(project.dir, temp.path());
  }

  #[test]
  fn load_reports_parse_errors_with_path() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("project.json");
    fs::write(&path, "{ not json").unwrap();

    match Project::load(&path) {
      Err(GenerateError::ParseProject { path: p, .. }) => assert_eq!(p, path),
      other => panic!("expected ParseProject, got {other:?}"),
    }
  }
}
