//! Resolved modules - the converter's input.
//!
//! A `Module` is produced by the upstream dependency-resolution pass with all
//! defaults applied and all macros expanded. The converter reads it and never
//! mutates it.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::axis::Axis;
use crate::core::path;
use crate::core::rule::RuleClass;

/// The kind of a source module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    /// Static library (`cc_library_static`)
    #[serde(rename = "cc_library_static")]
    StaticLibrary,

    /// Header-only library (`cc_library_headers`)
    #[serde(rename = "cc_library_headers")]
    HeaderLibrary,

    /// Prebuilt toolchain library; has no target-rule equivalent
    #[serde(rename = "toolchain_library")]
    ToolchainLibrary,

    /// Property defaults holder; never produces a rule
    #[serde(rename = "cc_defaults")]
    Defaults,
}

impl ModuleKind {
    /// The rule class this kind converts to, if it has one.
    pub fn rule_class(&self) -> Option<RuleClass> {
        match self {
            ModuleKind::StaticLibrary => Some(RuleClass::CC_LIBRARY_STATIC),
            ModuleKind::HeaderLibrary => Some(RuleClass::CC_LIBRARY_HEADERS),
            ModuleKind::ToolchainLibrary | ModuleKind::Defaults => None,
        }
    }

    /// Name of the kind in module definitions.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::StaticLibrary => "cc_library_static",
            ModuleKind::HeaderLibrary => "cc_library_headers",
            ModuleKind::ToolchainLibrary => "toolchain_library",
            ModuleKind::Defaults => "cc_defaults",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Str(String),
    List(Vec<String>),
}

impl PropertyValue {
    /// Short name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Str(_) => "string",
            PropertyValue::List(_) => "list",
        }
    }
}

/// Property name to value. Ordered so that iteration is deterministic.
pub type PropertyBag = BTreeMap<String, PropertyValue>;

/// Properties that apply only for one value of one axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisOverride {
    pub axis: Axis,
    pub value: String,
    #[serde(default)]
    pub props: PropertyBag,
}

/// A resolved module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Module name, unique within its package
    pub name: String,

    pub kind: ModuleKind,

    /// Workspace-relative directory of the module definition file
    #[serde(default)]
    pub package: String,

    /// Set to false to exclude this module from conversion
    #[serde(default = "default_convertible")]
    pub convertible: bool,

    /// Base property values
    #[serde(default)]
    pub props: PropertyBag,

    /// Per-axis additions to the base values
    #[serde(default)]
    pub overrides: Vec<AxisOverride>,
}

fn default_convertible() -> bool {
    true
}

impl Module {
    /// Create a module in the root package with no properties.
    pub fn new(name: impl Into<String>, kind: ModuleKind) -> Self {
        Module {
            name: name.into(),
            kind,
            package: String::new(),
            convertible: true,
            props: PropertyBag::new(),
            overrides: Vec::new(),
        }
    }

    /// Create a static library module.
    pub fn static_lib(name: impl Into<String>) -> Self {
        Self::new(name, ModuleKind::StaticLibrary)
    }

    /// Create a header library module.
    pub fn header_lib(name: impl Into<String>) -> Self {
        Self::new(name, ModuleKind::HeaderLibrary)
    }

    /// Place the module in a package directory.
    pub fn in_package(mut self, package: impl AsRef<str>) -> Self {
        self.package = path::normalize(package.as_ref());
        self
    }

    /// Set a list property.
    pub fn with_list(
        mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.props.insert(
            key.into(),
            PropertyValue::List(values.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Set a boolean property.
    pub fn with_bool(mut self, key: impl Into<String>, value: bool) -> Self {
        self.props.insert(key.into(), PropertyValue::Bool(value));
        self
    }

    /// Add a list property override for one axis value.
    pub fn with_override(
        mut self,
        axis: Axis,
        value: impl Into<String>,
        key: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut props = PropertyBag::new();
        props.insert(
            key.into(),
            PropertyValue::List(values.into_iter().map(Into::into).collect()),
        );
        self.overrides.push(AxisOverride {
            axis,
            value: value.into(),
            props,
        });
        self
    }
}

/// Errors building a module graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("module `{name}` is defined more than once in package `{package}`")]
    DuplicateModule { name: String, package: String },
}

/// Why a dependency reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    NotFound,
    Ambiguous(Vec<String>),
}

/// All resolved modules of a workspace, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: Vec<Module>,
    by_name: HashMap<String, Vec<usize>>,
}

#[derive(Deserialize)]
struct GraphFile {
    #[serde(default, rename = "module")]
    modules: Vec<Module>,
}

impl ModuleGraph {
    /// Build a graph from modules in declaration order.
    pub fn new(modules: Vec<Module>) -> Result<Self, GraphError> {
        let mut graph = ModuleGraph::default();
        let mut seen = BTreeSet::new();

        for mut module in modules {
            module.package = path::normalize(&module.package);
            if !seen.insert((module.package.clone(), module.name.clone())) {
                return Err(GraphError::DuplicateModule {
                    name: module.name,
                    package: module.package,
                });
            }
            graph
                .by_name
                .entry(module.name.clone())
                .or_default()
                .push(graph.modules.len());
            graph.modules.push(module);
        }

        Ok(graph)
    }

    /// Parse a graph from its TOML serialization.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: GraphFile = toml::from_str(contents).context("failed to parse module graph")?;
        Ok(Self::new(file.modules)?)
    }

    /// All modules in declaration order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Modules declared in `package`, in declaration order.
    pub fn in_package<'a>(&'a self, package: &'a str) -> impl Iterator<Item = &'a Module> + 'a {
        self.modules.iter().filter(move |m| m.package == package)
    }

    /// Packages that declare at least one module, sorted.
    pub fn packages(&self) -> BTreeSet<&str> {
        self.modules.iter().map(|m| m.package.as_str()).collect()
    }

    /// Resolve a dependency reference written in `from_package`.
    ///
    /// Accepts `//pkg:name`, `:name` and bare `name`. A bare name prefers the
    /// consumer's own package and otherwise must match exactly one module.
    pub fn lookup(&self, reference: &str, from_package: &str) -> Result<&Module, LookupError> {
        let (package, name) = match reference.strip_prefix("//") {
            Some(qualified) => match qualified.split_once(':') {
                Some((pkg, name)) => (Some(path::normalize(pkg)), name),
                None => {
                    let pkg = path::normalize(qualified);
                    let name = path::file_name(&pkg).to_string();
                    return self.find_in(&pkg, &name).ok_or(LookupError::NotFound);
                }
            },
            None => match reference.strip_prefix(':') {
                Some(name) => (Some(from_package.to_string()), name),
                None => (None, reference),
            },
        };

        if let Some(pkg) = package {
            return self.find_in(&pkg, name).ok_or(LookupError::NotFound);
        }

        let candidates = self.by_name.get(name).ok_or(LookupError::NotFound)?;
        if let Some(local) = candidates
            .iter()
            .map(|&i| &self.modules[i])
            .find(|m| m.package == from_package)
        {
            return Ok(local);
        }
        match candidates.as_slice() {
            [only] => Ok(&self.modules[*only]),
            many => Err(LookupError::Ambiguous(
                many.iter()
                    .map(|&i| format!("//{}:{}", self.modules[i].package, name))
                    .collect(),
            )),
        }
    }

    fn find_in(&self, package: &str, name: &str) -> Option<&Module> {
        self.by_name
            .get(name)?
            .iter()
            .map(|&i| &self.modules[i])
            .find(|m| m.package == package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_graph() {
        let graph = ModuleGraph::from_toml_str(
            r#"
[[module]]
name = "foo_static"
kind = "cc_library_static"
package = "./lib"

[module.props]
cflags = ["-Dflag1"]
include_build_directory = false

[[module.overrides]]
axis = "arch"
value = "arm64"
props = { static_libs = ["baz"] }

[[module]]
name = "baz"
kind = "cc_library_static"
package = "lib"
"#,
        )
        .unwrap();

        let foo = &graph.modules()[0];
        assert_eq!(foo.package, "lib");
        assert!(foo.convertible);
        assert_eq!(
            foo.props.get("cflags"),
            Some(&PropertyValue::List(vec!["-Dflag1".to_string()]))
        );
        assert_eq!(
            foo.props.get("include_build_directory"),
            Some(&PropertyValue::Bool(false))
        );
        assert_eq!(foo.overrides[0].axis, Axis::Arch);
        assert_eq!(foo.overrides[0].value, "arm64");
    }

    #[test]
    fn test_duplicate_module_in_package() {
        let err = ModuleGraph::new(vec![Module::static_lib("a"), Module::static_lib("a")])
            .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateModule { .. }));

        // Same name in different packages is fine
        ModuleGraph::new(vec![
            Module::static_lib("a"),
            Module::static_lib("a").in_package("sub"),
        ])
        .unwrap();
    }

    #[test]
    fn test_lookup_prefers_local_package() {
        let graph = ModuleGraph::new(vec![
            Module::static_lib("util").in_package("a"),
            Module::static_lib("util").in_package("b"),
            Module::static_lib("only").in_package("c"),
        ])
        .unwrap();

        assert_eq!(graph.lookup("util", "b").unwrap().package, "b");
        assert_eq!(graph.lookup("only", "a").unwrap().package, "c");
        assert_eq!(graph.lookup("//a:util", "b").unwrap().package, "a");
        assert_eq!(graph.lookup(":util", "a").unwrap().package, "a");
        assert_eq!(graph.lookup("missing", "a"), Err(LookupError::NotFound));
        assert!(matches!(
            graph.lookup("util", "c"),
            Err(LookupError::Ambiguous(c)) if c.len() == 2
        ));
    }

    #[test]
    fn test_packages_and_in_package() {
        let graph = ModuleGraph::new(vec![
            Module::static_lib("x").in_package("p"),
            Module::static_lib("y"),
            Module::static_lib("z").in_package("p"),
        ])
        .unwrap();

        let names: Vec<_> = graph.in_package("p").map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["x", "z"]);
        assert_eq!(graph.packages().into_iter().collect::<Vec<_>>(), vec!["", "p"]);
    }
}
