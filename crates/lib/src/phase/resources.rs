//! Resources phase: copy or compile every resource into the bundle, then
//! package the bundle into one data archive.
//!
//! # Actions, in order
//!
//! 1. Per file (variant groups expand to their members):
//!    - interface files (`.storyboard`, `.xib`, see `interface_extensions`)
//!      get two chained actions: `ibtool_compile` into the temporary root,
//!      then `ibtool_link` from there into the resources root under the
//!      compiled extension
//!    - everything else gets one `cp` into the resources root
//! 2. `cp` of `INFOPLIST_FILE` to `<bundle>/Info.plist`, when set
//! 3. One `cp` per regular file of each configured framework resources
//!    directory, into `<bundle>/Frameworks/<dir name>/...`
//! 4. `package`: every destination above in, data archive and loader script
//!    out

use std::path::{Path, PathBuf};

use tracing::debug;

use super::PhaseContext;
use crate::action::{BuildAction, Rule};
use crate::consts::keys;
use crate::error::Result;
use crate::project::{BuildPhase, FileReference};
use crate::settings::substitute;

pub fn translate(ctx: &PhaseContext<'_>, phase: &BuildPhase) -> Result<Vec<BuildAction>> {
  let mut actions = Vec::new();
  let mut products = Vec::new();

  for build_file in &phase.files {
    for file in build_file.entry.files()? {
      let (file_actions, destination) = translate_file(ctx, file);
      actions.extend(file_actions);
      products.push(destination);
    }
  }

  if let Some(action) = info_manifest(ctx)? {
    products.extend(action.outputs.iter().cloned());
    actions.push(action);
  }

  for action in framework_resources(ctx)? {
    products.extend(action.outputs.iter().cloned());
    actions.push(action);
  }

  actions.push(package(ctx, products));
  Ok(actions)
}

/// Actions for one resource file and the path it ends up at in the bundle.
fn translate_file(ctx: &PhaseContext<'_>, file: &FileReference) -> (Vec<BuildAction>, PathBuf) {
  let source = ctx.project.source_path(file);
  let resource = Path::new(&file.path);

  match file.extension().and_then(|ext| ctx.config.compiled_extension(ext)) {
    Some(compiled_extension) => {
      let compiled = resource.with_extension(compiled_extension);
      let intermediate = ctx.layout.intermediate_path(&compiled);
      let destination = ctx.layout.resource_path(&compiled);
      let dest_dir = destination
        .parent()
        .unwrap_or(ctx.layout.resources_root.as_path())
        .to_path_buf();

      let compile = BuildAction::new(Rule::IbtoolCompile)
        .input(source)
        .output(intermediate.clone());
      let link = BuildAction::new(Rule::IbtoolLink)
        .input(intermediate)
        .output(destination.clone())
        .var("dest", dest_dir.display().to_string());

      (vec![compile, link], destination)
    }
    None => {
      let destination = ctx.layout.resource_path(resource);
      let copy = BuildAction::new(Rule::Copy).input(source).output(destination.clone());
      (vec![copy], destination)
    }
  }
}

fn info_manifest(ctx: &PhaseContext<'_>) -> Result<Option<BuildAction>> {
  let Some(plist) = ctx.settings().string(keys::INFOPLIST_FILE)? else {
    debug!(target = %ctx.target.name, "no INFOPLIST_FILE, skipping info manifest");
    return Ok(None);
  };

  Ok(Some(
    BuildAction::new(Rule::Copy)
      .input(ctx.project_path(&plist))
      .output(ctx.layout.bundle_root.join("Info.plist")),
  ))
}

/// Expand each configured directory into one copy per regular file.
fn framework_resources(ctx: &PhaseContext<'_>) -> Result<Vec<BuildAction>> {
  let mut actions = Vec::new();

  for dir in &ctx.config.framework_resources {
    let root = ctx.project_path(&substitute(dir, ctx.bindings)?);
    let bundle_dir = match root.file_name() {
      Some(name) => ctx.layout.frameworks_root.join(name),
      None => ctx.layout.frameworks_root.clone(),
    };

    let files = ctx.walker.regular_files(&root)?;
    debug!(root = ?root, count = files.len(), "copying framework resources");

    for relative in files {
      actions.push(
        BuildAction::new(Rule::Copy)
          .input(root.join(&relative))
          .output(bundle_dir.join(&relative)),
      );
    }
  }

  Ok(actions)
}

fn package(ctx: &PhaseContext<'_>, products: Vec<PathBuf>) -> BuildAction {
  let layout = ctx.layout;
  BuildAction::new(Rule::Package)
    .inputs(products)
    .output(layout.data_path.clone())
    .output(layout.script_path.clone())
    .var("data", layout.data_path.display().to_string())
    .var("js", layout.script_path.display().to_string())
    .var("root", layout.resources_root.display().to_string())
}
