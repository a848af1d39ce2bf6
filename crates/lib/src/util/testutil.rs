//! Test utilities for xcodeninja-lib.
//!
//! [`Fixture`] holds one (target, configuration) pair of a project rooted at
//! `/work` and hands translators a [`PhaseContext`] over it, with the host
//! replaced by canned answers.

use crate::config::GeneratorConfig;
use crate::generate::bindings_for;
use crate::host::{FixedFlags, FixedTree};
use crate::layout::OutputLayout;
use crate::phase::PhaseContext;
use crate::project::{BuildConfiguration, BuildPhase, FileReference, Project, Target};
use crate::settings::BuildSettings;

/// Project `Demo` at `/work`, target `Demo` (product `Demo`), configuration
/// `Debug`, default generator config.
pub struct Fixture {
  pub project: Project,
  pub target: Target,
  pub configuration: BuildConfiguration,
  pub config: GeneratorConfig,
  pub tree: FixedTree,
  pub flags: FixedFlags,
}

impl Fixture {
  pub fn new() -> Self {
    Self {
      project: Project::new("Demo", "/work"),
      target: Target::new("Demo", "Demo"),
      configuration: BuildConfiguration::new("Debug"),
      config: GeneratorConfig::default(),
      tree: FixedTree::new(),
      flags: FixedFlags::new(),
    }
  }

  pub fn with_settings(mut self, settings: BuildSettings) -> Self {
    self.configuration.build_settings = settings;
    self
  }

  pub fn with_config(mut self, config: GeneratorConfig) -> Self {
    self.config = config;
    self
  }

  pub fn with_tree(mut self, root: &str, files: &[&str]) -> Self {
    self.tree = self.tree.with(root, files);
    self
  }

  pub fn with_flags(mut self, flags: FixedFlags) -> Self {
    self.flags = flags;
    self
  }

  pub fn with_project_file(mut self, file: FileReference) -> Self {
    self.project.files.push(file);
    self
  }

  /// Add a phase to the target. Translators only look at the target's phases
  /// to decide on cross-phase inputs; the phase under test is passed directly.
  pub fn with_phase(mut self, phase: BuildPhase) -> Self {
    self.target.build_phases.push(phase);
    self
  }

  pub fn with_ctx<R>(&self, f: impl FnOnce(&PhaseContext<'_>) -> R) -> R {
    let layout = OutputLayout::new(&self.target, &self.configuration, &self.config.final_extension);
    let bindings = bindings_for(&self.project, &self.target, &self.configuration, &layout);
    let ctx = PhaseContext {
      project: &self.project,
      target: &self.target,
      configuration: &self.configuration,
      layout: &layout,
      bindings: &bindings,
      config: &self.config,
      walker: &self.tree,
      flags: &self.flags,
    };
    f(&ctx)
  }
}
