use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A build setting as written in the project: a string, a list of strings,
/// or nothing at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
  Scalar(String),
  List(Vec<String>),
}

impl From<&str> for RawValue {
  fn from(value: &str) -> Self {
    RawValue::Scalar(value.to_string())
  }
}

impl From<Vec<&str>> for RawValue {
  fn from(values: Vec<&str>) -> Self {
    RawValue::List(values.into_iter().map(str::to_string).collect())
  }
}

/// Key to raw value mapping of one build configuration (or one build file).
///
/// `null` values deserialize to an absent entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildSettings(BTreeMap<String, Option<RawValue>>);

impl BuildSettings {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style insert, mostly for tests and fixtures.
  pub fn with(mut self, key: &str, value: impl Into<RawValue>) -> Self {
    self.insert(key, value);
    self
  }

  pub fn insert(&mut self, key: &str, value: impl Into<RawValue>) {
    self.0.insert(key.to_string(), Some(value.into()));
  }

  pub fn get(&self, key: &str) -> Option<&RawValue> {
    self.0.get(key).and_then(Option::as_ref)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

/// The type a caller expects a setting to expand to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettingType {
  #[default]
  String,
  Array,
  Bool,
}

/// The resolved form of a raw setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expanded {
  Absent,
  Scalar(String),
  List(Vec<String>),
  Bool(bool),
}

impl Expanded {
  /// Flatten to a list: absent is empty, a scalar is one element.
  pub fn into_list(self) -> Vec<String> {
    match self {
      Expanded::Absent => Vec::new(),
      Expanded::Scalar(s) => vec![s],
      Expanded::List(list) => list,
      Expanded::Bool(b) => vec![if b { "YES" } else { "NO" }.to_string()],
    }
  }

  pub fn into_scalar(self) -> Option<String> {
    match self {
      Expanded::Scalar(s) => Some(s),
      Expanded::List(list) => Some(list.join(" ")),
      Expanded::Absent | Expanded::Bool(_) => None,
    }
  }

  pub fn as_bool(&self) -> bool {
    matches!(self, Expanded::Bool(true))
  }
}

/// Immutable variable table for one expansion scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(BTreeMap<String, String>);

impl Bindings {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
    self.0.insert(name.to_string(), value.into());
    self
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.0.get(name).map(String::as_str)
  }
}
