//! Generation driver.
//!
//! One (target, configuration) pair at a time: build the binding table and
//! output layout, run every phase through its translator, assemble, render.
//! Pairs share nothing mutable, so [`Generator::generate_all`] runs them in
//! parallel and stops at the first failure.

use std::collections::HashMap;
use std::path::PathBuf;

use rayon::prelude::*;
use tracing::info;

use crate::action::RuleSet;
use crate::config::GeneratorConfig;
use crate::consts::vars;
use crate::error::{GenerateError, Result};
use crate::graph::BuildGraph;
use crate::host::{FlagQuery, TreeWalker};
use crate::layout::OutputLayout;
use crate::ninja;
use crate::phase::{self, PhaseContext};
use crate::project::{BuildConfiguration, Project, Target};
use crate::settings::Bindings;

/// The binding table `$(NAME)` references resolve against for one pair.
pub fn bindings_for(
  project: &Project,
  target: &Target,
  configuration: &BuildConfiguration,
  layout: &OutputLayout,
) -> Bindings {
  let project_dir = project.dir.to_string_lossy().into_owned();

  Bindings::new()
    .with(vars::PROJECT_DIR, project_dir.clone())
    .with(vars::SRCROOT, project_dir)
    .with(vars::PROJECT_NAME, project.name.clone())
    .with(vars::TARGET_NAME, target.name.clone())
    .with(vars::PRODUCT_NAME, target.product_name.clone())
    .with(vars::CONFIGURATION, configuration.name.clone())
    .with(vars::BUILT_PRODUCTS_DIR, layout.build_root.to_string_lossy().into_owned())
    .with(vars::OBJROOT, layout.objects_root.to_string_lossy().into_owned())
}

/// A rendered build description, ready to be written.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
  pub graph: BuildGraph,
  pub contents: String,
}

impl GeneratedFile {
  pub fn file_name(&self) -> &str {
    &self.graph.file_name
  }
}

/// Drives generation for one project.
pub struct Generator<'a> {
  project: &'a Project,
  config: &'a GeneratorConfig,
  rules: RuleSet,
  walker: &'a dyn TreeWalker,
  flags: &'a dyn FlagQuery,
}

impl<'a> Generator<'a> {
  pub fn new(
    project: &'a Project,
    config: &'a GeneratorConfig,
    walker: &'a dyn TreeWalker,
    flags: &'a dyn FlagQuery,
  ) -> Self {
    Self {
      project,
      config,
      rules: RuleSet::new(config),
      walker,
      flags,
    }
  }

  /// Translate and assemble one (target, configuration) pair.
  pub fn generate_pair(&self, target: &Target, configuration: &BuildConfiguration) -> Result<BuildGraph> {
    let layout = OutputLayout::new(target, configuration, &self.config.final_extension);
    let bindings = bindings_for(self.project, target, configuration, &layout);
    let ctx = PhaseContext {
      project: self.project,
      target,
      configuration,
      layout: &layout,
      bindings: &bindings,
      config: self.config,
      walker: self.walker,
      flags: self.flags,
    };

    let phases = target
      .build_phases
      .iter()
      .map(|p| phase::translate(&ctx, p))
      .collect::<Result<Vec<_>>>()?;

    let graph = BuildGraph::assemble(&target.name, &configuration.name, &layout.ninja_file, phases)?;

    info!(
      target = %target.name,
      configuration = %configuration.name,
      actions = graph.len(),
      "generated build graph"
    );
    Ok(graph)
  }

  /// Generate and render one pair.
  pub fn render_pair(&self, target: &Target, configuration: &BuildConfiguration) -> Result<GeneratedFile> {
    let graph = self.generate_pair(target, configuration)?;
    let contents = ninja::render(&graph, &self.rules)?;
    Ok(GeneratedFile { graph, contents })
  }

  /// Resolve the (target, configuration) pairs selected by the filters.
  ///
  /// Empty filters select everything. A named target that does not exist is
  /// an error, as is a selected target left with no configuration, or two
  /// pairs whose sanitized names land on the same ninja file or build root.
  pub fn select(
    &self,
    targets: &[String],
    configurations: &[String],
  ) -> Result<Vec<(&'a Target, &'a BuildConfiguration)>> {
    let project = self.project;

    let selected: Vec<&Target> = if targets.is_empty() {
      project.targets.iter().collect()
    } else {
      targets
        .iter()
        .map(|name| project.target(name).ok_or_else(|| GenerateError::TargetNotFound(name.clone())))
        .collect::<Result<_>>()?
    };

    let mut pairs = Vec::new();
    for target in selected {
      let matching: Vec<&BuildConfiguration> = target
        .build_configurations
        .iter()
        .filter(|c| configurations.is_empty() || configurations.contains(&c.name))
        .collect();

      if matching.is_empty() {
        return Err(GenerateError::NoConfigurations(target.name.clone()));
      }
      pairs.extend(matching.into_iter().map(|c| (target, c)));
    }

    self.check_distinct_outputs(&pairs)?;
    Ok(pairs)
  }

  fn check_distinct_outputs(&self, pairs: &[(&Target, &BuildConfiguration)]) -> Result<()> {
    let mut claimed: HashMap<PathBuf, String> = HashMap::new();

    for (target, configuration) in pairs {
      let layout = OutputLayout::new(target, configuration, &self.config.final_extension);
      let pair = format!("{}/{}", target.name, configuration.name);

      for path in [PathBuf::from(&layout.ninja_file), layout.build_root] {
        if let Some(first) = claimed.insert(path.clone(), pair.clone()) {
          return Err(GenerateError::OutputCollision {
            path,
            first,
            second: pair,
          });
        }
      }
    }

    Ok(())
  }

  /// Render every selected pair, in parallel. Nothing is written here; the
  /// result holds either every file or the first error.
  pub fn generate_all(&self, targets: &[String], configurations: &[String]) -> Result<Vec<GeneratedFile>> {
    let pairs = self.select(targets, configurations)?;
    info!(pairs = pairs.len(), "generating build descriptions");

    pairs
      .par_iter()
      .map(|(target, configuration)| self.render_pair(target, configuration))
      .collect()
  }
}
