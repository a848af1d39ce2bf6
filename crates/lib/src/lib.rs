//! xcodeninja-lib: build graph generation for Xcode-style projects.
//!
//! Turns a project model (targets, build configurations, build phases) into
//! one ninja build description per (target, configuration) pair:
//! - `settings`: `$(NAME)` expansion of build settings
//! - `layout`: where every product of a pair lands
//! - `phase`: per-phase translators producing `BuildAction`s
//! - `graph`: assembly and validation of one pair's actions
//! - `ninja`: rendering and writing the build file
//! - `generate`: the driver tying them together

pub mod action;
pub mod config;
pub mod consts;
pub mod error;
pub mod generate;
pub mod graph;
pub mod host;
pub mod layout;
pub mod ninja;
pub mod phase;
pub mod project;
pub mod settings;
#[cfg(test)]
mod util;
