//! Implementation of the `xcodeninja` command.
//!
//! Loads the project description and generator config, renders one ninja file
//! per (target, configuration) pair, and only then writes them all.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use xcodeninja_lib::config::GeneratorConfig;
use xcodeninja_lib::error::GenerateError;
use xcodeninja_lib::generate::Generator;
use xcodeninja_lib::host::{FsTree, PkgConfig};
use xcodeninja_lib::ninja;
use xcodeninja_lib::project::Project;

use crate::output::{format_duration, print_stat, print_success};

pub struct GenerateArgs<'a> {
  pub project: Option<&'a Path>,
  pub output: &'a Path,
  pub config: Option<&'a Path>,
  pub targets: &'a [String],
  pub configurations: &'a [String],
}

/// Execute the generate command.
///
/// Nothing is written unless every selected pair generates cleanly; each
/// file is then replaced atomically.
pub fn cmd_generate(args: &GenerateArgs<'_>) -> Result<()> {
  let start = Instant::now();

  let project_path = args.project.ok_or(GenerateError::MissingProject)?;
  let project_path = dunce::canonicalize(project_path)
    .with_context(|| format!("Failed to resolve project path: {}", project_path.display()))?;

  let project =
    Project::load(&project_path).with_context(|| format!("Failed to load project: {}", project_path.display()))?;
  let config = GeneratorConfig::discover(args.config, &project.dir)?;
  debug!(project = %project.name, targets = project.targets.len(), "loaded project");

  let flags = PkgConfig::from_env();
  let generator = Generator::new(&project, &config, &FsTree, &flags);
  let files = generator.generate_all(args.targets, args.configurations)?;

  let mut actions = 0;
  for file in &files {
    let path = ninja::write_atomic(args.output, file.file_name(), &file.contents)
      .with_context(|| format!("Failed to write {}", args.output.join(file.file_name()).display()))?;
    actions += file.graph.len();
    print_success(&format!("wrote {} ({} actions)", path.display(), file.graph.len()));
  }

  println!();
  print_stat("Build files", &files.len().to_string());
  print_stat("Actions", &actions.to_string());
  print_stat("Duration", &format_duration(start.elapsed()));

  Ok(())
}
