//! Build settings expansion.
//!
//! Raw settings values reference other values with `$(NAME)` and pull in an
//! outer scope's list with the inheritance marker `$(inherited)`. This module
//! turns them into concrete, typed values against an immutable [`Bindings`]
//! table built once per (target, configuration).
//!
//! # Rules
//!
//! Applied in this order:
//!
//! - a list drops every element equal to `$(inherited)` and expands the rest
//!   as scalars, keeping their order
//! - [`SettingType::Array`]: absent is `[]`, a scalar is a one-element list
//! - [`SettingType::Bool`]: true iff the value is exactly `YES`
//! - scalars substitute every `$(NAME)`; an unknown name is an error
//!
//! A lone `$`, or a `$(` that is not closed by `)` after a valid name, is
//! kept as literal text.
//!
//! # Example
//!
//! ```
//! use xcodeninja_lib::settings::{Bindings, Expanded, RawValue, SettingType, expand};
//!
//! let bindings = Bindings::new().with("PROJECT_DIR", "/src/demo");
//! let raw = RawValue::from(vec!["$(inherited)", "$(PROJECT_DIR)/include"]);
//! let value = expand(Some(&raw), SettingType::Array, &bindings).unwrap();
//! assert_eq!(value, Expanded::List(vec!["/src/demo/include".to_string()]));
//! ```

mod types;

pub use types::*;

use crate::consts::{INHERITED_MARKER, TRUTHY_TOKEN};
use crate::error::{GenerateError, Result};

/// A segment of a scalar settings value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Text copied through unchanged.
  Literal(String),
  /// A `$(NAME)` reference.
  Variable(String),
}

/// Split a scalar value into literal text and `$(NAME)` references.
pub fn parse(input: &str) -> Vec<Segment> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut rest = input;

  while let Some(start) = rest.find("$(") {
    literal.push_str(&rest[..start]);
    let after = &rest[start + 2..];

    match after.find(')') {
      Some(end) if is_variable_name(&after[..end]) => {
        if !literal.is_empty() {
          segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Variable(after[..end].to_string()));
        rest = &after[end + 1..];
      }
      _ => {
        literal.push_str("$(");
        rest = after;
      }
    }
  }

  literal.push_str(rest);
  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  segments
}

fn is_variable_name(name: &str) -> bool {
  !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Substitute every `$(NAME)` in a scalar value.
///
/// # Errors
///
/// Returns [`GenerateError::UnresolvedVariable`] naming the first reference
/// without a binding.
pub fn substitute(input: &str, bindings: &Bindings) -> Result<String> {
  let mut result = String::with_capacity(input.len());

  for segment in parse(input) {
    match segment {
      Segment::Literal(text) => result.push_str(&text),
      Segment::Variable(name) => match bindings.get(&name) {
        Some(value) => result.push_str(value),
        None => return Err(GenerateError::UnresolvedVariable(name)),
      },
    }
  }

  Ok(result)
}

/// Expand a raw settings value into the expected type.
pub fn expand(raw: Option<&RawValue>, expected: SettingType, bindings: &Bindings) -> Result<Expanded> {
  if let Some(RawValue::List(items)) = raw {
    return expand_list(items.iter().map(String::as_str), bindings).map(Expanded::List);
  }

  let scalar = match raw {
    Some(RawValue::Scalar(s)) => Some(s.as_str()),
    _ => None,
  };

  match expected {
    // A lone scalar follows the list rule, so a bare `$(inherited)` is empty.
    SettingType::Array => expand_list(scalar, bindings).map(Expanded::List),
    SettingType::Bool => Ok(Expanded::Bool(scalar == Some(TRUTHY_TOKEN))),
    SettingType::String => match scalar {
      Some(s) => substitute(s, bindings).map(Expanded::Scalar),
      None => Ok(Expanded::Absent),
    },
  }
}

fn expand_list<'a>(items: impl IntoIterator<Item = &'a str>, bindings: &Bindings) -> Result<Vec<String>> {
  items
    .into_iter()
    .filter(|item| *item != INHERITED_MARKER)
    .map(|item| substitute(item, bindings))
    .collect()
}

/// Typed access to one settings mapping under one binding table.
pub struct Expander<'a> {
  settings: &'a BuildSettings,
  bindings: &'a Bindings,
}

impl<'a> Expander<'a> {
  pub fn new(settings: &'a BuildSettings, bindings: &'a Bindings) -> Self {
    Self { settings, bindings }
  }

  pub fn bindings(&self) -> &'a Bindings {
    self.bindings
  }

  pub fn expand(&self, key: &str, expected: SettingType) -> Result<Expanded> {
    expand(self.settings.get(key), expected, self.bindings)
  }

  /// Expand a setting as a scalar, `None` when absent.
  pub fn string(&self, key: &str) -> Result<Option<String>> {
    self.expand(key, SettingType::String).map(Expanded::into_scalar)
  }

  pub fn array(&self, key: &str) -> Result<Vec<String>> {
    self.expand(key, SettingType::Array).map(Expanded::into_list)
  }

  pub fn bool(&self, key: &str) -> Result<bool> {
    self.expand(key, SettingType::Bool).map(|value| value.as_bool())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn bindings() -> Bindings {
    Bindings::new()
      .with("PROJECT_DIR", "/work/Demo")
      .with("TARGET_NAME", "Demo")
      .with("CONFIGURATION", "Debug")
  }

  fn scalar(s: &str) -> RawValue {
    RawValue::from(s)
  }

  #[test]
  fn inherited_marker_is_dropped_and_order_kept() {
    let raw = RawValue::from(vec!["a", "$(inherited)", "b"]);
    let value = expand(Some(&raw), SettingType::Array, &bindings()).unwrap();
    assert_eq!(value, Expanded::List(vec!["a".to_string(), "b".to_string()]));
  }

  #[test]
  fn list_rule_applies_regardless_of_expected_type() {
    let raw = RawValue::from(vec!["$(inherited)", "$(TARGET_NAME)"]);
    let value = expand(Some(&raw), SettingType::String, &bindings()).unwrap();
    assert_eq!(value, Expanded::List(vec!["Demo".to_string()]));
  }

  #[test]
  fn array_of_absent_is_empty() {
    let value = expand(None, SettingType::Array, &bindings()).unwrap();
    assert_eq!(value, Expanded::List(vec![]));
  }

  #[test]
  fn array_of_scalar_is_single_element() {
    let raw = scalar("$(PROJECT_DIR)/Vendor");
    let value = expand(Some(&raw), SettingType::Array, &bindings()).unwrap();
    assert_eq!(value, Expanded::List(vec!["/work/Demo/Vendor".to_string()]));
  }

  #[test]
  fn array_of_bare_inherited_scalar_is_empty() {
    let raw = scalar("$(inherited)");
    let value = expand(Some(&raw), SettingType::Array, &bindings()).unwrap();
    assert_eq!(value, Expanded::List(vec![]));
  }

  #[test]
  fn bool_is_true_only_for_yes() {
    let b = bindings();
    assert_eq!(expand(Some(&scalar("YES")), SettingType::Bool, &b).unwrap(), Expanded::Bool(true));
    assert_eq!(expand(Some(&scalar("yes")), SettingType::Bool, &b).unwrap(), Expanded::Bool(false));
    assert_eq!(expand(Some(&scalar("NO")), SettingType::Bool, &b).unwrap(), Expanded::Bool(false));
    assert_eq!(expand(None, SettingType::Bool, &b).unwrap(), Expanded::Bool(false));
  }

  #[test]
  fn absent_scalar_stays_absent() {
    assert_eq!(expand(None, SettingType::String, &bindings()).unwrap(), Expanded::Absent);
  }

  #[test]
  fn substitutes_every_reference() {
    let raw = scalar("$(PROJECT_DIR)/build/$(CONFIGURATION)/$(TARGET_NAME).app");
    let value = expand(Some(&raw), SettingType::String, &bindings()).unwrap();
    assert_eq!(value, Expanded::Scalar("/work/Demo/build/Debug/Demo.app".to_string()));
  }

  #[test]
  fn unknown_variable_fails_with_its_name() {
    let err = expand(Some(&scalar("$(NOPE)")), SettingType::String, &bindings()).unwrap_err();
    match err {
      GenerateError::UnresolvedVariable(name) => assert_eq!(name, "NOPE"),
      other => panic!("expected UnresolvedVariable, got {other:?}"),
    }
  }

  #[test]
  fn unknown_variable_inside_list_fails() {
    let raw = RawValue::from(vec!["ok", "$(MISSING)/lib"]);
    let err = expand(Some(&raw), SettingType::Array, &bindings()).unwrap_err();
    assert!(matches!(err, GenerateError::UnresolvedVariable(ref n) if n == "MISSING"));
  }

  #[test]
  fn expansion_is_idempotent_once_resolved() {
    let b = bindings();
    for input in ["$(PROJECT_DIR)/x", "plain", "$HOME/y", "a $( b", "$(TARGET_NAME)-$(CONFIGURATION)"] {
      let once = substitute(input, &b).unwrap();
      let twice = substitute(&once, &b).unwrap();
      assert_eq!(once, twice, "input {input}");
    }
  }

  #[test]
  fn shell_style_and_unclosed_references_pass_through() {
    let b = bindings();
    assert_eq!(substitute("$HOME/bin", &b).unwrap(), "$HOME/bin");
    assert_eq!(substitute("cost $5", &b).unwrap(), "cost $5");
    assert_eq!(substitute("$(unclosed", &b).unwrap(), "$(unclosed");
    assert_eq!(substitute("$(not a name)", &b).unwrap(), "$(not a name)");
    assert_eq!(substitute("${PROJECT_DIR}", &b).unwrap(), "${PROJECT_DIR}");
  }

  #[test]
  fn parse_splits_literals_and_variables() {
    assert_eq!(
      parse("-I$(PROJECT_DIR)/include -DX"),
      vec![
        Segment::Literal("-I".to_string()),
        Segment::Variable("PROJECT_DIR".to_string()),
        Segment::Literal("/include -DX".to_string()),
      ]
    );
    assert_eq!(parse(""), vec![]);
  }

  #[test]
  fn expander_reads_typed_settings() {
    let settings = BuildSettings::new()
      .with("HEADER_SEARCH_PATHS", vec!["$(inherited)", "$(PROJECT_DIR)/include"])
      .with("CLANG_ENABLE_OBJC_ARC", "YES")
      .with("GCC_PREFIX_HEADER", "Demo/Demo-Prefix.pch");
    let b = bindings();
    let expander = Expander::new(&settings, &b);

    assert_eq!(expander.array("HEADER_SEARCH_PATHS").unwrap(), vec!["/work/Demo/include"]);
    assert!(expander.bool("CLANG_ENABLE_OBJC_ARC").unwrap());
    assert_eq!(
      expander.string("GCC_PREFIX_HEADER").unwrap(),
      Some("Demo/Demo-Prefix.pch".to_string())
    );
    assert_eq!(expander.string("MISSING").unwrap(), None);
  }

  #[test]
  fn settings_deserialize_scalars_lists_and_nulls() {
    let settings: BuildSettings =
      serde_json::from_str(r#"{"A": "x", "B": ["y", "z"], "C": null}"#).unwrap();
    assert_eq!(settings.get("A"), Some(&scalar("x")));
    assert_eq!(settings.get("B"), Some(&RawValue::from(vec!["y", "z"])));
    assert_eq!(settings.get("C"), None);
    assert_eq!(settings.len(), 3);
  }
}
