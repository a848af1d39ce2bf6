//! Emitter: one [`BuildGraph`] rendered as a ninja build file.
//!
//! Layout of a rendered file:
//!
//! ```text
//! # header comment
//! ninja_required_version = 1.3
//!
//! rule <name>            one block per rule in use, first-use order
//!   command = ...
//!   description = ...
//!
//! build <outs>: <rule> <ins>
//!   <key> = <value>      sorted by key
//! ```
//!
//! Actions are written in assembled order. The graph is checked for cycles
//! first; the runner works out the real execution order itself.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::action::{BuildAction, RuleSet};
use crate::consts::APP_NAME;
use crate::error::Result;
use crate::graph::BuildGraph;

const REQUIRED_VERSION: &str = "1.3";

/// Escape a path for a `build` line: `$`, space and `:` are significant.
pub fn escape_path(path: &Path) -> String {
  let raw = path.to_string_lossy();
  let mut escaped = String::with_capacity(raw.len());
  for c in raw.chars() {
    if matches!(c, '$' | ' ' | ':') {
      escaped.push('$');
    }
    escaped.push(c);
  }
  escaped
}

/// Escape a variable value: only `$` is significant.
pub fn escape_value(value: &str) -> String {
  value.replace('$', "$$")
}

/// Render a graph into ninja syntax.
///
/// # Errors
///
/// [`GenerateError::CycleDetected`](crate::error::GenerateError::CycleDetected)
/// when some action transitively consumes its own output.
pub fn render(graph: &BuildGraph, rules: &RuleSet) -> Result<String> {
  graph.dag().topological_order()?;

  let mut lines = vec![
    format!(
      "# Generated by {APP_NAME} for target `{}`, configuration `{}`. Do not edit.",
      graph.target, graph.configuration
    ),
    format!("ninja_required_version = {REQUIRED_VERSION}"),
  ];

  for rule in graph.rules() {
    let template = rules.template(rule);
    lines.push(String::new());
    lines.push(format!("rule {}", template.name));
    lines.push(format!("  command = {}", template.command));
    lines.push(format!("  description = {}", template.description));
  }

  for action in graph.actions() {
    lines.push(String::new());
    render_action(&mut lines, action);
  }

  let mut out = lines.join("\n");
  out.push('\n');
  Ok(out)
}

fn render_action(lines: &mut Vec<String>, action: &BuildAction) {
  let outputs = join_paths(&action.outputs);
  let inputs = join_paths(&action.inputs);

  if inputs.is_empty() {
    lines.push(format!("build {outputs}: {}", action.rule));
  } else {
    lines.push(format!("build {outputs}: {} {inputs}", action.rule));
  }

  for (key, value) in &action.variables {
    if value.is_empty() {
      lines.push(format!("  {key} ="));
    } else {
      lines.push(format!("  {key} = {}", escape_value(value)));
    }
  }
}

fn join_paths(paths: &[PathBuf]) -> String {
  paths.iter().map(|p| escape_path(p)).collect::<Vec<_>>().join(" ")
}

/// Write `contents` to `dir/file_name` atomically.
///
/// The file is staged next to its destination and renamed into place, so a
/// reader never sees a partial build file.
pub fn write_atomic(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
  fs::create_dir_all(dir)?;
  let destination = dir.join(file_name);

  let mut staged = NamedTempFile::new_in(dir)?;
  staged.write_all(contents.as_bytes())?;
  staged.flush()?;
  staged.persist(&destination).map_err(|e| e.error)?;

  debug!(path = ?destination, bytes = contents.len(), "wrote build file");
  Ok(destination)
}
