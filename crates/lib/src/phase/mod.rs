//! Build phase translators.
//!
//! Each build phase kind maps to one translator function that turns the
//! phase's file entries into build actions:
//!
//! - [`PhaseKind::Resources`] -> [`resources::translate`]
//! - [`PhaseKind::Sources`] -> [`sources::translate`]
//! - [`PhaseKind::Frameworks`] / [`PhaseKind::ShellScript`] -> [`extension`]
//!   (recognized, produce nothing yet)
//!
//! A phase the provider could not classify stops generation with
//! [`GenerateError::UnsupportedPhase`]: dropping it would leave the bundle
//! silently incomplete.
//!
//! Within one translator's output, an action that produces a path always
//! comes before the actions that consume it.

pub mod extension;
pub mod resources;
pub mod sources;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::action::BuildAction;
use crate::config::GeneratorConfig;
use crate::error::{GenerateError, Result};
use crate::host::{FlagQuery, TreeWalker};
use crate::layout::OutputLayout;
use crate::project::{BuildConfiguration, BuildPhase, PhaseKind, Project, Target};
use crate::settings::{Bindings, Expander};

/// Everything a translator may read while translating one phase.
///
/// All of it is shared and read-only; one context serves every phase of a
/// (target, configuration) pair.
#[derive(Clone, Copy)]
pub struct PhaseContext<'a> {
  pub project: &'a Project,
  pub target: &'a Target,
  pub configuration: &'a BuildConfiguration,
  pub layout: &'a OutputLayout,
  pub bindings: &'a Bindings,
  pub config: &'a GeneratorConfig,
  pub walker: &'a dyn TreeWalker,
  pub flags: &'a dyn FlagQuery,
}

impl<'a> PhaseContext<'a> {
  /// Typed view of the configuration's build settings.
  pub fn settings(&self) -> Expander<'a> {
    Expander::new(&self.configuration.build_settings, self.bindings)
  }

  /// Resolve a path from a setting: absolute stays, relative is anchored at
  /// the project directory.
  pub fn project_path(&self, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.project.dir.join(path)
    }
  }
}

/// Translate one build phase into build actions.
pub fn translate(ctx: &PhaseContext<'_>, phase: &BuildPhase) -> Result<Vec<BuildAction>> {
  debug!(
    target = %ctx.target.name,
    configuration = %ctx.configuration.name,
    phase = %phase.kind,
    files = phase.files.len(),
    "translating phase"
  );

  match &phase.kind {
    PhaseKind::Resources => resources::translate(ctx, phase),
    PhaseKind::Sources => sources::translate(ctx, phase),
    PhaseKind::Frameworks => extension::frameworks(ctx, phase),
    PhaseKind::ShellScript => extension::shell_script(ctx, phase),
    PhaseKind::Unknown(isa) => Err(GenerateError::UnsupportedPhase(isa.clone())),
  }
}
