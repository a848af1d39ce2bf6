//! Phases that are recognized but not translated yet.
//!
//! They return no actions instead of failing, so a target that links system
//! frameworks or runs scripts still gets a graph for everything else.

use tracing::debug;

use super::PhaseContext;
use crate::action::BuildAction;
use crate::error::Result;
use crate::project::BuildPhase;

pub fn frameworks(ctx: &PhaseContext<'_>, phase: &BuildPhase) -> Result<Vec<BuildAction>> {
  debug!(target = %ctx.target.name, files = phase.files.len(), "frameworks phase not translated");
  Ok(Vec::new())
}

pub fn shell_script(ctx: &PhaseContext<'_>, phase: &BuildPhase) -> Result<Vec<BuildAction>> {
  debug!(target = %ctx.target.name, files = phase.files.len(), "shell script phase not translated");
  Ok(Vec::new())
}
