//! rulegen - Converts resolved Soong modules into Bazel target rules
//!
//! This crate provides the core library functionality for rulegen:
//! the module and file-tree model, package boundary indexing, header
//! resolution, per-axis attribute merging and Starlark emission.

pub mod convert;
pub mod core;
pub mod util;

/// Test fixtures for rulegen unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests.
#[cfg(test)]
pub mod test_support;

pub use convert::{ConvertError, ConvertOptions, Converter, ModuleOutcome, PackageIndex, PackageOutput};
pub use core::{EmittedRule, FileTree, Module, ModuleGraph};
pub use util::config::Config;
