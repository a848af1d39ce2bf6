//! Build actions and the rules they run through.
//!
//! A [`BuildAction`] is the engine's unit of output: outputs, a [`Rule`],
//! inputs and variables. Rules are command templates parameterized by
//! `${in}`, `${out}` and named variables; the translators only ever bind
//! variables and never build command lines themselves.
//!
//! # Rule variables
//!
//! - `cc`: `cflags`, `source`
//! - `link`: `ldflags`
//! - `ibtool_link`: `dest` (directory the linked file lands in)
//! - `package`: `data`, `js`, `root`
//! - `final_link`: `binary`, `pre_js`, `frameworks`, `libs`

mod types;

pub use types::*;

use std::collections::BTreeMap;

use crate::config::GeneratorConfig;

/// Command templates for every rule, with config overrides applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
  commands: BTreeMap<Rule, String>,
}

impl RuleSet {
  pub fn new(config: &GeneratorConfig) -> Self {
    let commands = Rule::ALL
      .into_iter()
      .map(|rule| {
        let command = config
          .rules
          .get(rule.name())
          .cloned()
          .unwrap_or_else(|| rule.default_command().to_string());
        (rule, command)
      })
      .collect();
    Self { commands }
  }

  pub fn template(&self, rule: Rule) -> RuleTemplate {
    RuleTemplate {
      name: rule.name(),
      command: self
        .commands
        .get(&rule)
        .cloned()
        .unwrap_or_else(|| rule.default_command().to_string()),
      description: rule.description(),
    }
  }
}

impl Default for RuleSet {
  fn default() -> Self {
    Self::new(&GeneratorConfig::default())
  }
}
