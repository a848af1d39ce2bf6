use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The command template an action runs through.
///
/// The set is closed: each translator picks from it, and the emitter writes a
/// `rule` block for every variant that at least one action uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
  /// First stage of an interface file: compile into an intermediate.
  IbtoolCompile,
  /// Second stage: link the intermediate into the bundle.
  IbtoolLink,
  Copy,
  /// All resources into one data archive plus its loader script.
  Package,
  Compile,
  Link,
  /// Linked binary plus packaged resources into the distributable artifact.
  FinalLink,
}

impl Rule {
  pub const ALL: [Rule; 7] = [
    Rule::IbtoolCompile,
    Rule::IbtoolLink,
    Rule::Copy,
    Rule::Package,
    Rule::Compile,
    Rule::Link,
    Rule::FinalLink,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Rule::IbtoolCompile => "ibtool_compile",
      Rule::IbtoolLink => "ibtool_link",
      Rule::Copy => "cp",
      Rule::Package => "package",
      Rule::Compile => "cc",
      Rule::Link => "link",
      Rule::FinalLink => "final_link",
    }
  }

  pub fn from_name(name: &str) -> Option<Rule> {
    Rule::ALL.into_iter().find(|rule| rule.name() == name)
  }

  pub fn default_command(self) -> &'static str {
    match self {
      Rule::IbtoolCompile => {
        "ibtool --errors --warnings --notices --output-format human-readable-text --compile ${out} ${in}"
      }
      Rule::IbtoolLink => "ibtool --errors --warnings --notices --output-format human-readable-text --link ${dest} ${in}",
      Rule::Copy => "cp ${in} ${out}",
      Rule::Package => "file_packager ${data} --preload ${root}@/ --js-output=${js}",
      Rule::Compile => "clang ${cflags} -c ${source} -o ${out}",
      Rule::Link => "clang ${ldflags} ${in} -o ${out}",
      Rule::FinalLink => "clang ${binary} ${pre_js} ${frameworks} ${libs} -o ${out}",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Rule::IbtoolCompile => "IBTOOL ${out}",
      Rule::IbtoolLink => "IBLINK ${out}",
      Rule::Copy => "COPY ${out}",
      Rule::Package => "PACKAGE ${data}",
      Rule::Compile => "CC ${out}",
      Rule::Link => "LINK ${out}",
      Rule::FinalLink => "FINAL ${out}",
    }
  }
}

impl std::fmt::Display for Rule {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// A named, parameterized command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTemplate {
  pub name: &'static str,
  pub command: String,
  pub description: &'static str,
}

/// One unit of work: concrete inputs and outputs, a rule, bound variables.
///
/// `outputs` and `inputs` are ordered sets: adding a path twice keeps the
/// first position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildAction {
  pub outputs: Vec<PathBuf>,
  pub rule: Rule,
  pub inputs: Vec<PathBuf>,
  pub variables: BTreeMap<String, String>,
}

impl BuildAction {
  pub fn new(rule: Rule) -> Self {
    Self {
      outputs: Vec::new(),
      rule,
      inputs: Vec::new(),
      variables: BTreeMap::new(),
    }
  }

  pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
    push_unique(&mut self.outputs, path.into());
    self
  }

  pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
    push_unique(&mut self.inputs, path.into());
    self
  }

  pub fn inputs<P: Into<PathBuf>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
    for path in paths {
      push_unique(&mut self.inputs, path.into());
    }
    self
  }

  pub fn var(mut self, key: &str, value: impl Into<String>) -> Self {
    self.variables.insert(key.to_string(), value.into());
    self
  }

  pub fn variable(&self, key: &str) -> Option<&str> {
    self.variables.get(key).map(String::as_str)
  }

  pub fn produces(&self, path: &Path) -> bool {
    self.outputs.iter().any(|o| o == path)
  }
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
  if !paths.contains(&path) {
    paths.push(path);
  }
}
