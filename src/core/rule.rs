//! Emitted rules - the converter's output.
//!
//! An `EmittedRule` is a rule kind, a name and an ordered attribute list.
//! Attribute values are tagged variants: scalars, plain lists, or
//! configurable lists made of a common part plus per-axis conditional blocks.

use serde::{Deserialize, Serialize};

use crate::core::axis::Axis;

/// A target rule kind and where it is loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleClass {
    /// Rule name as written in build files
    pub kind: &'static str,
    /// `.bzl` file defining the rule; `None` for native rules
    pub load_from: Option<&'static str>,
    /// Whether the rule carries the `linkstatic = True` marker
    pub link_static: bool,
}

impl RuleClass {
    pub const CC_LIBRARY_STATIC: RuleClass = RuleClass {
        kind: "cc_library_static",
        load_from: None,
        link_static: true,
    };

    pub const CC_LIBRARY_HEADERS: RuleClass = RuleClass {
        kind: "cc_library_headers",
        load_from: Some("//build/bazel/rules:cc_library_headers.bzl"),
        link_static: false,
    };
}

/// The branches of one axis: axis value to the entries added for it.
///
/// Branches are kept sorted by axis value. The default branch is implicit
/// and always empty, since overrides only ever add to the common part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalBlock {
    pub axis: Axis,
    pub branches: Vec<(String, Vec<String>)>,
}

impl ConditionalBlock {
    /// Entries selected for `value`, or the empty default.
    pub fn select(&self, value: &str) -> &[String] {
        self.branches
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, entries)| entries.as_slice())
            .unwrap_or(&[])
    }

    /// The default branch.
    pub fn default_branch(&self) -> &[String] {
        &[]
    }
}

/// A list whose value may depend on configuration.
///
/// The effective value is `common ++ blocks[0] ++ blocks[1] ++ ...`, with
/// blocks in axis precedence order and at most one block per axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurableList {
    pub common: Vec<String>,
    pub blocks: Vec<ConditionalBlock>,
}

impl ConfigurableList {
    /// A list with no conditional part.
    pub fn plain(common: Vec<String>) -> Self {
        ConfigurableList {
            common,
            blocks: Vec::new(),
        }
    }

    /// True if there are no entries under any configuration.
    pub fn is_empty(&self) -> bool {
        self.common.is_empty() && self.blocks.is_empty()
    }

    /// True if the value does not depend on configuration.
    pub fn is_plain(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The block for `axis`, if any.
    pub fn block(&self, axis: Axis) -> Option<&ConditionalBlock> {
        self.blocks.iter().find(|b| b.axis == axis)
    }

    /// Effective entries for one concrete configuration.
    pub fn evaluate(&self, config: &[(Axis, &str)]) -> Vec<String> {
        let mut out = self.common.clone();
        for block in &self.blocks {
            let selected = config
                .iter()
                .find(|(axis, _)| *axis == block.axis)
                .map(|(_, value)| block.select(value))
                .unwrap_or_else(|| block.default_branch());
            out.extend(selected.iter().cloned());
        }
        out
    }
}

/// A rule attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttrValue {
    Bool(bool),
    Str(String),
    List(Vec<String>),
    Configurable(ConfigurableList),
}

impl From<ConfigurableList> for AttrValue {
    fn from(list: ConfigurableList) -> Self {
        if list.is_plain() {
            AttrValue::List(list.common)
        } else {
            AttrValue::Configurable(list)
        }
    }
}

/// One generated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedRule {
    /// Rule kind, e.g. `cc_library_static`
    pub kind: String,
    /// Load location for non-native rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_from: Option<String>,
    pub name: String,
    /// Attributes in emission order, `name` excluded
    pub attrs: Vec<(String, AttrValue)>,
}

impl EmittedRule {
    /// Look up an attribute by name.
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Attribute names in emission order.
    pub fn attr_names(&self) -> Vec<&str> {
        self.attrs.iter().map(|(k, _)| k.as_str()).collect()
    }
}
