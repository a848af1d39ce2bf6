//! Error taxonomy for build graph generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while generating a build graph.
///
/// Every variant is fatal for the (target, configuration) pair it occurs in.
/// The first five are the user-facing failures the engine itself detects; the
/// rest wrap I/O and external collaborators.
#[derive(Debug, Error)]
pub enum GenerateError {
  /// No project path was supplied.
  #[error("Please specify Xcode project.")]
  MissingProject,

  /// A build phase outside the recognized set.
  #[error("unsupported build phase: {0}")]
  UnsupportedPhase(String),

  /// A file entry that is neither a file reference nor a variant group.
  #[error("unsupported file entry: {0}")]
  UnsupportedFileEntry(String),

  /// A `$(NAME)` reference with no binding.
  #[error("unresolved variable: $({0})")]
  UnresolvedVariable(String),

  /// Two actions in one graph produce the same path.
  #[error("duplicate output {path}: produced by both `{first}` and `{second}`")]
  DuplicateOutput {
    path: PathBuf,
    first: String,
    second: String,
  },

  /// The action graph contains a dependency cycle.
  #[error("dependency cycle detected at {0}")]
  CycleDetected(PathBuf),

  /// Two selected pairs map to the same ninja file or build root.
  #[error("{first} and {second} would both write {path}; rename one of them")]
  OutputCollision {
    path: PathBuf,
    first: String,
    second: String,
  },

  /// A target filter matched nothing.
  #[error("target not found: {0}")]
  TargetNotFound(String),

  /// A target has no configuration to generate.
  #[error("target {0} has no build configurations to generate")]
  NoConfigurations(String),

  /// Invalid generator configuration.
  #[error("invalid configuration: {0}")]
  Config(String),

  /// The project description could not be parsed.
  #[error("failed to parse project {path}: {source}")]
  ParseProject {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// Walking a framework resources directory failed.
  #[error("failed to walk {path}: {message}")]
  Walk { path: PathBuf, message: String },

  /// The external library flag lookup failed.
  #[error("flag lookup for `{library}` failed: {message}")]
  FlagQuery { library: String, message: String },

  /// I/O error.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl GenerateError {
  /// Whether the error describes a problem with the user's input rather than
  /// an unexpected fault. Cycles can only come from a translator bug.
  pub fn is_informative(&self) -> bool {
    !matches!(self, GenerateError::Io(_) | GenerateError::CycleDetected(_))
  }
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerateError>;
