//! Attribute assembly for one module.
//!
//! The assembler reads a module's typed properties, runs the axis merger and
//! path resolver over them, and produces the rule attributes in their fixed
//! emission order: `copts`, `deps`, `hdrs`, `includes`, `linkstatic`, `srcs`.
//! Empty attributes are omitted, except `copts` and `linkstatic`.

use crate::convert::axis_merger::{self, AxisEntries};
use crate::convert::error::ConvertError;
use crate::convert::path_resolver::{MissingPath, PathResolver};
use crate::core::path;
use crate::core::{AttrValue, ConfigurableList, FileTree, Module, ModuleGraph, PropertyBag, PropertyValue, RuleClass};

/// Ordered rule attributes, `name` excluded.
pub type Attributes = Vec<(String, AttrValue)>;

/// String-list properties the assembler understands.
const LIST_PROPERTIES: [&str; 9] = [
    "srcs",
    "cflags",
    "include_dirs",
    "local_include_dirs",
    "export_include_dirs",
    "export_system_include_dirs",
    "header_libs",
    "static_libs",
    "whole_static_libs",
];

/// Properties that may carry per-axis overrides.
const AXIS_PROPERTIES: [&str; 5] = ["srcs", "cflags", "header_libs", "static_libs", "whole_static_libs"];

/// Dependency groups, in the order they are concatenated into `deps`.
const DEP_GROUPS: [&str; 3] = ["header_libs", "static_libs", "whole_static_libs"];

/// Builds the attribute set of a module.
pub struct Assembler<'a> {
    graph: &'a ModuleGraph,
    tree: &'a FileTree,
    resolver: PathResolver<'a>,
}

impl<'a> Assembler<'a> {
    pub fn new(graph: &'a ModuleGraph, tree: &'a FileTree, resolver: PathResolver<'a>) -> Self {
        Assembler {
            graph,
            tree,
            resolver,
        }
    }

    /// Assemble the attributes of `module` for a rule of class `class`.
    pub fn assemble(&self, module: &Module, class: RuleClass) -> Result<Attributes, ConvertError> {
        let cx = ModuleCx { module };
        cx.validate_overrides()?;

        let package = module.package.as_str();
        let mut attrs = Attributes::new();

        // copts: own cflags, then include flags
        let cflags = cx.configurable("cflags")?;
        let mut include_flags = Vec::new();
        for dir in cx.list(&module.props, "include_dirs")? {
            include_flags.push(format!("-I{}", path::display_dir(&path::normalize(dir))));
        }
        for dir in cx.list(&module.props, "local_include_dirs")? {
            include_flags.push(format!("-I{}", path::display_dir(&path::join(package, dir))));
        }
        if cx.flag("include_build_directory", true)? {
            include_flags.push(format!("-I{}", path::display_dir(package)));
        }
        let copts = axis_merger::dedup(axis_merger::concat([
            cflags,
            ConfigurableList::plain(include_flags),
        ]));
        attrs.push(("copts".to_string(), copts.into()));

        // deps: header libs, static libs, whole static libs
        let mut groups = Vec::with_capacity(DEP_GROUPS.len());
        for group in DEP_GROUPS {
            let refs = cx.configurable(group)?;
            groups.push(self.dependency_labels(module, group, refs)?);
        }
        let deps = axis_merger::dedup(axis_merger::concat(groups));
        if !deps.is_empty() {
            attrs.push(("deps".to_string(), deps.into()));
        }

        // Exported headers feed both `hdrs` and `srcs`
        let export_dirs = cx.list(&module.props, "export_include_dirs")?;
        let export_system_dirs = cx.list(&module.props, "export_system_include_dirs")?;
        let exported = self.resolve_dirs(module, "export_include_dirs", export_dirs, true)?;
        let exported_system =
            self.resolve_dirs(module, "export_system_include_dirs", export_system_dirs, true)?;

        let mut hdrs: Vec<String> = exported.iter().chain(&exported_system).cloned().collect();
        hdrs.sort();
        hdrs.dedup();
        if !hdrs.is_empty() {
            attrs.push(("hdrs".to_string(), AttrValue::List(hdrs)));
        }

        let includes = axis_merger::dedup_first(
            export_dirs.iter().chain(export_system_dirs).cloned().collect(),
        );
        if !includes.is_empty() {
            attrs.push(("includes".to_string(), AttrValue::List(includes)));
        }

        if class.link_static {
            attrs.push(("linkstatic".to_string(), AttrValue::Bool(true)));
        }

        // srcs: explicit sources, implicit headers, then resolved include dirs
        let explicit = cx.configurable("srcs")?;
        self.check_sources(module, &explicit)?;

        let implicit = self
            .resolver
            .package_headers(package)
            .map_err(|MissingPath(p)| missing(module, "package", p))?;
        let include_dirs = cx.list(&module.props, "include_dirs")?;
        let local_dirs = cx.list(&module.props, "local_include_dirs")?;
        let included = self.resolve_dirs(module, "include_dirs", include_dirs, false)?;
        let local = self.resolve_dirs(module, "local_include_dirs", local_dirs, true)?;

        let mut collected = implicit;
        collected.extend(exported);
        collected.extend(exported_system);
        collected.extend(included);
        collected.extend(local);

        let srcs = axis_merger::dedup(axis_merger::concat([
            explicit,
            ConfigurableList::plain(collected),
        ]));
        if !srcs.is_empty() {
            attrs.push(("srcs".to_string(), srcs.into()));
        }

        Ok(attrs)
    }

    /// Resolve a list of include dirs to the concatenation of their headers.
    fn resolve_dirs(
        &self,
        module: &Module,
        attribute: &str,
        dirs: &[String],
        module_relative: bool,
    ) -> Result<Vec<String>, ConvertError> {
        let mut out = Vec::new();
        for dir in dirs {
            let dir = if module_relative {
                path::join(&module.package, dir)
            } else {
                path::normalize(dir)
            };
            let headers = self
                .resolver
                .resolve(&module.package, &dir)
                .map_err(|MissingPath(p)| missing(module, attribute, p))?;
            out.extend(headers.into_iter().map(|h| h.display));
        }
        Ok(out)
    }

    /// Every explicit source file must exist in the snapshot. Labels are
    /// references to other rules and are not checked.
    fn check_sources(&self, module: &Module, srcs: &ConfigurableList) -> Result<(), ConvertError> {
        let branch_entries = srcs
            .blocks
            .iter()
            .flat_map(|b| b.branches.iter())
            .flat_map(|(_, entries)| entries.iter());
        for src in srcs.common.iter().chain(branch_entries) {
            if is_label(src) {
                continue;
            }
            let file = path::join(&module.package, src);
            if !self.tree.is_file(&file) {
                return Err(missing(module, "srcs", file));
            }
        }
        Ok(())
    }

    /// Map dependency references to labels, validating each target.
    fn dependency_labels(
        &self,
        module: &Module,
        attribute: &str,
        refs: ConfigurableList,
    ) -> Result<ConfigurableList, ConvertError> {
        let map = |entries: Vec<String>| -> Result<Vec<String>, ConvertError> {
            entries
                .iter()
                .map(|r| self.dependency_label(module, attribute, r))
                .collect()
        };

        let mut out = ConfigurableList::plain(map(refs.common)?);
        for mut block in refs.blocks {
            for (_, entries) in &mut block.branches {
                *entries = map(std::mem::take(entries))?;
            }
            out.blocks.push(block);
        }
        Ok(out)
    }

    fn dependency_label(
        &self,
        module: &Module,
        attribute: &str,
        reference: &str,
    ) -> Result<String, ConvertError> {
        use crate::core::module::LookupError;

        let dep = self
            .graph
            .lookup(reference, &module.package)
            .map_err(|e| ConvertError::UnknownDependency {
                module: module.name.clone(),
                attribute: attribute.to_string(),
                dependency: reference.to_string(),
                candidates: match e {
                    LookupError::NotFound => Vec::new(),
                    LookupError::Ambiguous(candidates) => candidates,
                },
            })?;

        if dep.kind.rule_class().is_none() {
            return Err(ConvertError::UnsupportedDependencyKind {
                module: module.name.clone(),
                attribute: attribute.to_string(),
                dependency: reference.to_string(),
                kind: dep.kind.to_string(),
            });
        }

        Ok(if dep.package == module.package {
            format!(":{}", dep.name)
        } else {
            format!("//{}:{}", dep.package, dep.name)
        })
    }
}

/// Typed, validated access to one module's property bags.
struct ModuleCx<'m> {
    module: &'m Module,
}

impl<'m> ModuleCx<'m> {
    /// A string-list property of `bag`; absent means empty.
    fn list(&self, bag: &'m PropertyBag, key: &str) -> Result<&'m [String], ConvertError> {
        match bag.get(key) {
            None => Ok(&[]),
            Some(PropertyValue::List(values)) => Ok(values),
            Some(other) => Err(self.invalid(
                key,
                format!("expected a list of strings, found a {}", other.type_name()),
            )),
        }
    }

    /// A boolean property of the base bag.
    fn flag(&self, key: &str, default: bool) -> Result<bool, ConvertError> {
        match self.module.props.get(key) {
            None => Ok(default),
            Some(PropertyValue::Bool(value)) => Ok(*value),
            Some(other) => Err(self.invalid(
                key,
                format!("expected a bool, found a {}", other.type_name()),
            )),
        }
    }

    /// A list property merged with its per-axis overrides.
    fn configurable(&self, key: &str) -> Result<ConfigurableList, ConvertError> {
        let base = self.list(&self.module.props, key)?;

        let mut overrides = Vec::new();
        for o in &self.module.overrides {
            if o.props.contains_key(key) {
                overrides.push(AxisEntries {
                    axis: o.axis,
                    value: &o.value,
                    entries: self.list(&o.props, key)?,
                });
            }
        }

        axis_merger::merge(base, &overrides).map_err(|a| ConvertError::AmbiguousAxisOverride {
            module: self.module.name.clone(),
            attribute: key.to_string(),
            axis: a.axis,
            value: a.value,
        })
    }

    /// Overrides may only set properties that can vary per axis.
    fn validate_overrides(&self) -> Result<(), ConvertError> {
        for o in &self.module.overrides {
            for key in o.props.keys() {
                let known = LIST_PROPERTIES.contains(&key.as_str())
                    || key == "include_build_directory";
                if known && !AXIS_PROPERTIES.contains(&key.as_str()) {
                    return Err(self.invalid(
                        key,
                        format!(
                            "cannot vary by {} (set under `{}: {{ {}: ... }}`)",
                            o.axis,
                            o.axis.source_keyword(),
                            o.value
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    fn invalid(&self, key: &str, reason: String) -> ConvertError {
        ConvertError::InvalidProperty {
            module: self.module.name.clone(),
            attribute: key.to_string(),
            reason,
        }
    }
}

fn missing(module: &Module, attribute: &str, path: String) -> ConvertError {
    ConvertError::MissingPath {
        module: module.name.clone(),
        attribute: attribute.to_string(),
        path,
    }
}

fn is_label(src: &str) -> bool {
    src.starts_with(':') || src.starts_with("//")
}
