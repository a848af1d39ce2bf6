//! Fixed tokens and naming conventions shared across the engine.

/// Application name, used for the config file and environment variables.
pub const APP_NAME: &str = "xcodeninja";

/// Settings value that means "merge the outer-scope list here".
pub const INHERITED_MARKER: &str = "$(inherited)";

/// The only value a `bool` setting treats as true.
pub const TRUTHY_TOKEN: &str = "YES";

/// File the Project Model Provider writes inside an `.xcodeproj` bundle.
pub const PROJECT_MODEL_FILE: &str = "project.json";

/// Default generator config file name, looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "xcodeninja.toml";

/// Environment variable naming an explicit generator config file.
pub const CONFIG_ENV_VAR: &str = "XCODENINJA_CONFIG";

/// Extension given to object files in the objects root.
pub const OBJECT_EXTENSION: &str = "o";

/// Compiler flag that turns on automatic reference counting.
pub const ARC_ENABLE_FLAG: &str = "-fobjc-arc";

/// Compiler flag that turns it off; it always wins over the default.
pub const ARC_DISABLE_FLAG: &str = "-fno-objc-arc";

/// Well-known build settings keys.
pub mod keys {
  pub const HEADER_SEARCH_PATHS: &str = "HEADER_SEARCH_PATHS";
  pub const LIBRARY_SEARCH_PATHS: &str = "LIBRARY_SEARCH_PATHS";
  pub const FRAMEWORK_SEARCH_PATHS: &str = "FRAMEWORK_SEARCH_PATHS";
  pub const OTHER_CFLAGS: &str = "OTHER_CFLAGS";
  pub const OTHER_LDFLAGS: &str = "OTHER_LDFLAGS";
  pub const PREPROCESSOR_DEFINITIONS: &str = "GCC_PREPROCESSOR_DEFINITIONS";
  pub const PREFIX_HEADER: &str = "GCC_PREFIX_HEADER";
  pub const INFOPLIST_FILE: &str = "INFOPLIST_FILE";
  pub const COMPILER_FLAGS: &str = "COMPILER_FLAGS";
}

/// Names bound in every expansion scope.
pub mod vars {
  pub const PROJECT_DIR: &str = "PROJECT_DIR";
  pub const SRCROOT: &str = "SRCROOT";
  pub const PROJECT_NAME: &str = "PROJECT_NAME";
  pub const TARGET_NAME: &str = "TARGET_NAME";
  pub const PRODUCT_NAME: &str = "PRODUCT_NAME";
  pub const CONFIGURATION: &str = "CONFIGURATION";
  pub const BUILT_PRODUCTS_DIR: &str = "BUILT_PRODUCTS_DIR";
  pub const OBJROOT: &str = "OBJROOT";
}
