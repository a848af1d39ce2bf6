//! Sources phase: compile every source file, link the objects, and
//! optionally produce the final distributable.
//!
//! Compile flags are composed once per configuration and then per file:
//!
//! ```text
//! <config cflags> <OTHER_CFLAGS> -D<defs> -I<header dirs> -F<framework dirs>
//!   -include <prefix header> <per-file COMPILER_FLAGS> [-fobjc-arc]
//! ```
//!
//! `-fobjc-arc` is appended unless the composed string already contains
//! `-fno-objc-arc`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::PhaseContext;
use crate::action::{BuildAction, Rule};
use crate::consts::{ARC_DISABLE_FLAG, ARC_ENABLE_FLAG, keys};
use crate::error::Result;
use crate::project::{BuildPhase, PhaseKind, Project};
use crate::settings::Expander;

pub fn translate(ctx: &PhaseContext<'_>, phase: &BuildPhase) -> Result<Vec<BuildAction>> {
  let settings = ctx.settings();
  let search = SearchPaths::collect(ctx, &settings)?;
  let prefix_header = settings.string(keys::PREFIX_HEADER)?.map(|p| ctx.project_path(&p));
  let base_flags = base_cflags(ctx, &settings, &search, prefix_header.as_deref())?;

  let mut actions = Vec::new();
  let mut objects = Vec::new();

  for build_file in &phase.files {
    let overrides = Expander::new(&build_file.settings, ctx.bindings).array(keys::COMPILER_FLAGS)?;

    for file in build_file.entry.files()? {
      let source = ctx.project.source_path(file);
      let object = ctx.layout.object_path(&file.logical_path());

      let mut compile = BuildAction::new(Rule::Compile).input(source.clone());
      if let Some(pch) = &prefix_header {
        compile = compile.input(pch.clone());
      }
      actions.push(
        compile
          .output(object.clone())
          .var("cflags", compose_flags(&base_flags, &overrides))
          .var("source", quote(&source.display().to_string())),
      );
      objects.push(object);
    }
  }

  debug!(target = %ctx.target.name, objects = objects.len(), "linking objects");
  actions.push(
    BuildAction::new(Rule::Link)
      .inputs(objects)
      .output(ctx.layout.binary_path.clone())
      .var("ldflags", ldflags(ctx, &settings, &search)?),
  );

  if ctx.config.final_link.enabled {
    actions.push(final_link(ctx)?);
  }

  Ok(actions)
}

/// Header, library and framework search directories for one configuration.
struct SearchPaths {
  headers: Vec<PathBuf>,
  libraries: Vec<PathBuf>,
  frameworks: Vec<PathBuf>,
}

impl SearchPaths {
  fn collect(ctx: &PhaseContext<'_>, settings: &Expander<'_>) -> Result<Self> {
    let mut headers = header_directories(ctx.project, &ctx.config.header_extensions);
    for dir in settings.array(keys::HEADER_SEARCH_PATHS)? {
      let dir = ctx.project_path(&dir);
      if !headers.contains(&dir) {
        headers.push(dir);
      }
    }

    let resolve = |dirs: Vec<String>| dirs.iter().map(|d| ctx.project_path(d)).collect::<Vec<_>>();

    Ok(Self {
      headers,
      libraries: resolve(settings.array(keys::LIBRARY_SEARCH_PATHS)?),
      frameworks: resolve(settings.array(keys::FRAMEWORK_SEARCH_PATHS)?),
    })
  }
}

/// Containing directory of every header in the project, first-seen order.
pub fn header_directories(project: &Project, header_extensions: &[String]) -> Vec<PathBuf> {
  let mut seen = HashSet::new();
  let mut dirs = Vec::new();

  for file in project.files.iter().filter(|f| f.has_extension(header_extensions)) {
    let path = project.source_path(file);
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    if seen.insert(dir.clone()) {
      dirs.push(dir);
    }
  }

  dirs
}

fn base_cflags(
  ctx: &PhaseContext<'_>,
  settings: &Expander<'_>,
  search: &SearchPaths,
  prefix_header: Option<&Path>,
) -> Result<String> {
  let mut flags: Vec<String> = ctx.config.cflags.clone();
  flags.extend(settings.array(keys::OTHER_CFLAGS)?);
  flags.extend(
    settings
      .array(keys::PREPROCESSOR_DEFINITIONS)?
      .iter()
      .map(|def| quote(&format!("-D{def}"))),
  );
  flags.extend(search.headers.iter().map(|dir| path_flag("-I", dir)));
  flags.extend(search.frameworks.iter().map(|dir| path_flag("-F", dir)));
  if let Some(pch) = prefix_header {
    flags.push("-include".to_string());
    flags.push(quote(&pch.display().to_string()));
  }

  Ok(join_flags(flags))
}

/// Fold per-file overrides into the base flags and apply the ARC policy.
pub fn compose_flags(base: &str, overrides: &[String]) -> String {
  let mut flags = base.to_string();
  for flag in overrides.iter().filter(|f| !f.is_empty()) {
    if !flags.is_empty() {
      flags.push(' ');
    }
    flags.push_str(flag);
  }

  if !flags.contains(ARC_DISABLE_FLAG) {
    if !flags.is_empty() {
      flags.push(' ');
    }
    flags.push_str(ARC_ENABLE_FLAG);
  }

  flags
}

fn ldflags(ctx: &PhaseContext<'_>, settings: &Expander<'_>, search: &SearchPaths) -> Result<String> {
  let mut flags: Vec<String> = ctx.config.ldflags.clone();
  flags.extend(search.libraries.iter().map(|dir| path_flag("-L", dir)));
  flags.extend(search.frameworks.iter().map(|dir| path_flag("-F", dir)));
  flags.extend(settings.array(keys::OTHER_LDFLAGS)?);
  Ok(join_flags(flags))
}

/// Linked binary plus packaged resources into the final artifact.
fn final_link(ctx: &PhaseContext<'_>) -> Result<BuildAction> {
  let layout = ctx.layout;
  let final_config = &ctx.config.final_link;

  let mut libs = Vec::new();
  for library in &final_config.libraries {
    libs.push(ctx.flags.library_flags(library)?);
  }

  let frameworks = final_config
    .frameworks
    .iter()
    .map(|name| format!("-framework {name}"))
    .collect::<Vec<_>>();

  let mut action = BuildAction::new(Rule::FinalLink).input(layout.binary_path.clone());
  let mut pre_js = String::new();
  if ctx.target.has_phase(&PhaseKind::Resources) {
    action = action.input(layout.script_path.clone());
    pre_js = format!("--pre-js {}", quote(&layout.script_path.display().to_string()));
  }

  Ok(
    action
      .output(layout.artifact_path.clone())
      .var("binary", quote(&layout.binary_path.display().to_string()))
      .var("pre_js", pre_js)
      .var("frameworks", join_flags(frameworks))
      .var("libs", join_flags(libs)),
  )
}

fn path_flag(flag: &str, dir: &Path) -> String {
  quote(&format!("{flag}{}", dir.display()))
}

fn join_flags(flags: Vec<String>) -> String {
  flags.into_iter().filter(|f| !f.is_empty()).collect::<Vec<_>>().join(" ")
}

/// Single-quote an argument for the shell when it needs it.
fn quote(arg: &str) -> String {
  let safe = !arg.is_empty()
    && arg
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '=' | ':' | ',' | '+' | '@' | '%'));
  if safe {
    arg.to_string()
  } else {
    format!("'{}'", arg.replace('\'', r"'\''"))
  }
}
