//! Generator configuration (`xcodeninja.toml`).
//!
//! Holds the project-specific constants a generated graph needs but the
//! project description does not carry: base flags, which resources are
//! compiled interface files, the final link's framework and library lists,
//! external framework resource directories and rule command overrides.
//!
//! Lookup order: an explicit path, then `$XCODENINJA_CONFIG`, then
//! `xcodeninja.toml` in the project directory, then built-in defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::Rule;
use crate::consts::{CONFIG_ENV_VAR, CONFIG_FILE_NAME};
use crate::error::{GenerateError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
  /// Flags every compile starts from.
  pub cflags: Vec<String>,
  /// Flags every link starts from.
  pub ldflags: Vec<String>,
  /// Interface file extension -> compiled extension (`storyboard` -> `storyboardc`).
  pub interface_extensions: BTreeMap<String, String>,
  /// Extensions recognized as headers when collecting search directories.
  pub header_extensions: Vec<String>,
  /// External directories copied file by file into the bundle's Frameworks.
  /// `$(NAME)` references are expanded; relative paths are project-relative.
  pub framework_resources: Vec<String>,
  /// Extension of the final distributable artifact.
  pub final_extension: String,
  pub final_link: FinalLinkConfig,
  /// Command template overrides, keyed by rule name.
  pub rules: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinalLinkConfig {
  pub enabled: bool,
  /// Frameworks passed as `-framework <name>`.
  pub frameworks: Vec<String>,
  /// Libraries whose link flags are looked up externally.
  pub libraries: Vec<String>,
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self {
      cflags: Vec::new(),
      ldflags: Vec::new(),
      interface_extensions: BTreeMap::from([
        ("storyboard".to_string(), "storyboardc".to_string()),
        ("xib".to_string(), "nib".to_string()),
      ]),
      header_extensions: vec!["h".to_string(), "hh".to_string(), "hpp".to_string()],
      framework_resources: Vec::new(),
      final_extension: "html".to_string(),
      final_link: FinalLinkConfig::default(),
      rules: BTreeMap::new(),
    }
  }
}

impl Default for FinalLinkConfig {
  fn default() -> Self {
    Self {
      enabled: false,
      frameworks: vec!["Foundation".to_string(), "UIKit".to_string()],
      libraries: Vec::new(),
    }
  }
}

impl GeneratorConfig {
  /// Parse and validate a TOML document.
  pub fn from_toml(content: &str) -> Result<Self> {
    let config: GeneratorConfig = toml::from_str(content).map_err(|e| GenerateError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    debug!(path = ?path, "loading generator config");
    let content = fs::read_to_string(path)?;
    Self::from_toml(&content).map_err(|e| match e {
      GenerateError::Config(message) => GenerateError::Config(format!("{}: {message}", path.display())),
      other => other,
    })
  }

  /// Find and load the config for a project in `project_dir`.
  pub fn discover(explicit: Option<&Path>, project_dir: &Path) -> Result<Self> {
    if let Some(path) = explicit {
      return Self::from_file(path);
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
      && !path.is_empty()
    {
      return Self::from_file(Path::new(&path));
    }

    let local = project_dir.join(CONFIG_FILE_NAME);
    if local.is_file() {
      return Self::from_file(&local);
    }

    debug!("no generator config found, using defaults");
    Ok(Self::default())
  }

  fn validate(&self) -> Result<()> {
    if let Some(name) = self.rules.keys().find(|name| Rule::from_name(name).is_none()) {
      return Err(GenerateError::Config(format!("unknown rule `{name}` in [rules]")));
    }
    if self.final_extension.is_empty() || self.final_extension.contains('/') {
      return Err(GenerateError::Config(format!(
        "invalid final_extension `{}`",
        self.final_extension
      )));
    }
    Ok(())
  }

  /// Compiled extension for an interface file extension, if it is one.
  pub fn compiled_extension(&self, extension: &str) -> Option<&str> {
    self.interface_extensions.get(extension).map(String::as_str)
  }
}
