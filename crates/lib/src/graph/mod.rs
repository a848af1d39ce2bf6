//! Graph assembly for one (target, configuration) pair.
//!
//! The assembler concatenates the translators' action lists in phase order
//! and checks that no path is produced twice. It never reorders: each
//! translator already lists producers before consumers, and real execution
//! order is the runner's business (see [`dag`] for an explicit view).

pub mod dag;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::action::{BuildAction, Rule};
use crate::error::{GenerateError, Result};

pub use dag::ActionDag;

/// The validated action list of one (target, configuration) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildGraph {
  pub target: String,
  pub configuration: String,
  /// File name the emitter writes this graph to.
  pub file_name: String,
  actions: Vec<BuildAction>,
}

impl BuildGraph {
  /// Concatenate per-phase action lists and validate output uniqueness.
  ///
  /// # Errors
  ///
  /// [`GenerateError::DuplicateOutput`] naming the path and both rules when
  /// two actions produce the same path.
  pub fn assemble(
    target: &str,
    configuration: &str,
    file_name: &str,
    phases: impl IntoIterator<Item = Vec<BuildAction>>,
  ) -> Result<Self> {
    let actions: Vec<BuildAction> = phases.into_iter().flatten().collect();
    check_unique_outputs(&actions)?;

    Ok(Self {
      target: target.to_string(),
      configuration: configuration.to_string(),
      file_name: file_name.to_string(),
      actions,
    })
  }

  pub fn actions(&self) -> &[BuildAction] {
    &self.actions
  }

  pub fn len(&self) -> usize {
    self.actions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.actions.is_empty()
  }

  /// Every output path, in action order.
  pub fn outputs(&self) -> impl Iterator<Item = &PathBuf> {
    self.actions.iter().flat_map(|a| a.outputs.iter())
  }

  /// Rules in order of first use.
  pub fn rules(&self) -> Vec<Rule> {
    let mut rules = Vec::new();
    for action in &self.actions {
      if !rules.contains(&action.rule) {
        rules.push(action.rule);
      }
    }
    rules
  }

  pub fn dag(&self) -> ActionDag {
    ActionDag::from_actions(&self.actions)
  }
}

fn check_unique_outputs(actions: &[BuildAction]) -> Result<()> {
  let mut producers: HashMap<&Path, Rule> = HashMap::new();

  for action in actions {
    for output in &action.outputs {
      if let Some(first) = producers.insert(output.as_path(), action.rule) {
        return Err(GenerateError::DuplicateOutput {
          path: output.clone(),
          first: first.name().to_string(),
          second: action.rule.name().to_string(),
        });
      }
    }
  }

  Ok(())
}
