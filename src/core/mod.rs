//! Core data structures for rulegen.
//!
//! This module contains the foundational types the converter reads and
//! produces:
//! - Resolved modules and the module graph (input)
//! - The file-tree snapshot and workspace-relative paths
//! - Configuration axes
//! - Emitted rules and attribute values (output)

pub mod axis;
pub mod module;
pub mod path;
pub mod rule;
pub mod tree;

pub use axis::Axis;
pub use module::{AxisOverride, Module, ModuleGraph, ModuleKind, PropertyBag, PropertyValue};
pub use rule::{AttrValue, ConditionalBlock, ConfigurableList, EmittedRule, RuleClass};
pub use tree::FileTree;
