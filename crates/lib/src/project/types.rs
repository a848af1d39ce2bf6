use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GenerateError, Result};
use crate::settings::BuildSettings;

/// A buildable target: the unit whose configurations each produce one graph.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Target {
  pub name: String,
  pub product_name: String,
  #[serde(default)]
  pub build_configurations: Vec<BuildConfiguration>,
  #[serde(default)]
  pub build_phases: Vec<BuildPhase>,
}

impl Target {
  pub fn new(name: &str, product_name: &str) -> Self {
    Self {
      name: name.to_string(),
      product_name: product_name.to_string(),
      build_configurations: Vec::new(),
      build_phases: Vec::new(),
    }
  }

  pub fn with_configuration(mut self, configuration: BuildConfiguration) -> Self {
    self.build_configurations.push(configuration);
    self
  }

  pub fn with_phase(mut self, phase: BuildPhase) -> Self {
    self.build_phases.push(phase);
    self
  }

  pub fn configuration(&self, name: &str) -> Option<&BuildConfiguration> {
    self.build_configurations.iter().find(|c| c.name == name)
  }

  pub fn has_phase(&self, kind: &PhaseKind) -> bool {
    self.build_phases.iter().any(|p| &p.kind == kind)
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BuildConfiguration {
  pub name: String,
  #[serde(default)]
  pub build_settings: BuildSettings,
}

impl BuildConfiguration {
  pub fn new(name: &str) -> Self {
    Self {
      name: name.to_string(),
      build_settings: BuildSettings::new(),
    }
  }

  pub fn with_settings(mut self, settings: BuildSettings) -> Self {
    self.build_settings = settings;
    self
  }
}

/// The kind of a build phase, keyed by its `isa` in the project description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PhaseKind {
  Resources,
  Sources,
  Frameworks,
  ShellScript,
  /// Anything the provider could not classify.
  Unknown(String),
}

impl PhaseKind {
  pub fn isa(&self) -> &str {
    match self {
      PhaseKind::Resources => "PBXResourcesBuildPhase",
      PhaseKind::Sources => "PBXSourcesBuildPhase",
      PhaseKind::Frameworks => "PBXFrameworksBuildPhase",
      PhaseKind::ShellScript => "PBXShellScriptBuildPhase",
      PhaseKind::Unknown(isa) => isa,
    }
  }
}

impl From<String> for PhaseKind {
  fn from(isa: String) -> Self {
    match isa.as_str() {
      "PBXResourcesBuildPhase" => PhaseKind::Resources,
      "PBXSourcesBuildPhase" => PhaseKind::Sources,
      "PBXFrameworksBuildPhase" => PhaseKind::Frameworks,
      "PBXShellScriptBuildPhase" => PhaseKind::ShellScript,
      _ => PhaseKind::Unknown(isa),
    }
  }
}

impl From<PhaseKind> for String {
  fn from(kind: PhaseKind) -> Self {
    kind.isa().to_string()
  }
}

impl std::fmt::Display for PhaseKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.isa())
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BuildPhase {
  #[serde(rename = "isa")]
  pub kind: PhaseKind,
  #[serde(default)]
  pub files: Vec<BuildFile>,
}

impl BuildPhase {
  pub fn new(kind: PhaseKind) -> Self {
    Self { kind, files: Vec::new() }
  }

  pub fn with_file(mut self, file: BuildFile) -> Self {
    self.files.push(file);
    self
  }
}

/// A file reference: its own path plus the paths of the groups that own it,
/// outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileReference {
  pub path: String,
  #[serde(default)]
  pub parents: Vec<String>,
}

impl FileReference {
  pub fn new(path: &str, parents: &[&str]) -> Self {
    Self {
      path: path.to_string(),
      parents: parents.iter().map(|p| p.to_string()).collect(),
    }
  }

  /// Path relative to the project directory: the group chain, then the file.
  pub fn logical_path(&self) -> PathBuf {
    let mut path = PathBuf::new();
    for parent in self.parents.iter().filter(|p| !p.is_empty()) {
      path.push(parent);
    }
    path.push(&self.path);
    path
  }

  pub fn extension(&self) -> Option<&str> {
    Path::new(&self.path).extension().and_then(|e| e.to_str())
  }

  pub fn has_extension(&self, extensions: &[String]) -> bool {
    self.extension().is_some_and(|ext| extensions.iter().any(|e| e == ext))
  }
}

/// Locale variants of one logical resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantGroup {
  pub name: String,
  #[serde(default)]
  pub children: Vec<FileReference>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEntry {
  Reference(FileReference),
  VariantGroup(VariantGroup),
  /// An entry whose `isa` is neither of the above.
  Unsupported(String),
}

impl FileEntry {
  /// The concrete files behind this entry, in declaration order.
  pub fn files(&self) -> Result<Vec<&FileReference>> {
    match self {
      FileEntry::Reference(file) => Ok(vec![file]),
      FileEntry::VariantGroup(group) => Ok(group.children.iter().collect()),
      FileEntry::Unsupported(isa) => Err(GenerateError::UnsupportedFileEntry(isa.clone())),
    }
  }
}

/// One entry of a build phase together with its per-file settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBuildFile")]
pub struct BuildFile {
  pub entry: FileEntry,
  pub settings: BuildSettings,
}

impl BuildFile {
  pub fn reference(path: &str, parents: &[&str]) -> Self {
    Self {
      entry: FileEntry::Reference(FileReference::new(path, parents)),
      settings: BuildSettings::new(),
    }
  }

  pub fn variant_group(name: &str, children: Vec<FileReference>) -> Self {
    Self {
      entry: FileEntry::VariantGroup(VariantGroup {
        name: name.to_string(),
        children,
      }),
      settings: BuildSettings::new(),
    }
  }

  pub fn with_settings(mut self, settings: BuildSettings) -> Self {
    self.settings = settings;
    self
  }
}

/// Wire shape of a build file entry, discriminated by `isa`.
#[derive(Deserialize)]
struct RawBuildFile {
  isa: String,
  #[serde(default)]
  path: String,
  #[serde(default)]
  parents: Vec<String>,
  #[serde(default)]
  name: String,
  #[serde(default)]
  children: Vec<FileReference>,
  #[serde(default)]
  settings: BuildSettings,
}

impl From<RawBuildFile> for BuildFile {
  fn from(raw: RawBuildFile) -> Self {
    let entry = match raw.isa.as_str() {
      "PBXFileReference" => FileEntry::Reference(FileReference {
        path: raw.path,
        parents: raw.parents,
      }),
      "PBXVariantGroup" => FileEntry::VariantGroup(VariantGroup {
        name: raw.name,
        children: raw.children,
      }),
      _ => FileEntry::Unsupported(raw.isa),
    };

    Self {
      entry,
      settings: raw.settings,
    }
  }
}
