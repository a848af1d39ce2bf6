//! Output locations for one (target, configuration) pair.
//!
//! Every path is a pure function of the target name, configuration name and
//! product name, relative to the output directory the ninja file lives in.
//! Two pairs never share a build root, so their outputs never collide.

use std::path::{Path, PathBuf};

use crate::consts::OBJECT_EXTENSION;
use crate::project::{BuildConfiguration, Target};

/// Canonical output paths of one (target, configuration) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
  /// `build/<target>/<configuration>`
  pub build_root: PathBuf,
  /// Intermediate artifacts that are not part of the bundle.
  pub temp_root: PathBuf,
  pub objects_root: PathBuf,
  /// `<build root>/<product>.app`
  pub bundle_root: PathBuf,
  pub resources_root: PathBuf,
  pub frameworks_root: PathBuf,
  /// Packaged resource archive.
  pub data_path: PathBuf,
  /// Loader script generated next to the archive.
  pub script_path: PathBuf,
  /// Linked executable inside the bundle.
  pub binary_path: PathBuf,
  /// Final distributable document.
  pub artifact_path: PathBuf,
  /// Name of the ninja file for this pair.
  pub ninja_file: String,
}

impl OutputLayout {
  pub fn new(target: &Target, configuration: &BuildConfiguration, final_extension: &str) -> Self {
    let target_dir = sanitize(&target.name);
    let config_dir = sanitize(&configuration.name);
    let product = sanitize(&target.product_name);

    let build_root = Path::new("build").join(&target_dir).join(&config_dir);
    let bundle_root = build_root.join(format!("{product}.app"));

    Self {
      temp_root: build_root.join("tmp"),
      objects_root: build_root.join("obj"),
      resources_root: bundle_root.clone(),
      frameworks_root: bundle_root.join("Frameworks"),
      data_path: build_root.join(format!("{product}.data")),
      script_path: build_root.join(format!("{product}.data.js")),
      binary_path: bundle_root.join(&product),
      artifact_path: build_root.join(format!("{product}.{final_extension}")),
      ninja_file: format!("{target_dir}-{config_dir}.ninja"),
      bundle_root,
      build_root,
    }
  }

  /// Object file for a source at `logical_path` (relative to the project).
  pub fn object_path(&self, logical_path: &Path) -> PathBuf {
    self.objects_root.join(logical_path).with_extension(OBJECT_EXTENSION)
  }

  /// Destination of a resource whose own path is `resource_path`.
  pub fn resource_path(&self, resource_path: &Path) -> PathBuf {
    self.resources_root.join(resource_path)
  }

  /// Intermediate location for the first stage of a two-stage resource.
  pub fn intermediate_path(&self, resource_path: &Path) -> PathBuf {
    self.temp_root.join(resource_path)
  }
}

/// Keep `[A-Za-z0-9._-]`, replace everything else with `_`.
fn sanitize(name: &str) -> String {
  name
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
        c
      } else {
        '_'
      }
    })
    .collect()
}
