//! Module-to-rule conversion.
//!
//! The pipeline for one module is:
//! 1. `Assembler` reads the module's properties and computes its attributes,
//!    using the `axis_merger` for per-axis lists and the `PathResolver` (backed
//!    by the `PackageIndex`) for header collection.
//! 2. `emitter::emit` wraps the attributes into an `EmittedRule`.
//!
//! Conversion of a module depends only on the module graph, the file-tree
//! snapshot and the package index, none of which change during a run, so
//! the modules of a package are converted in parallel.

pub mod assembler;
pub mod axis_merger;
pub mod emitter;
pub mod error;
pub mod package_index;
pub mod path_resolver;

use rayon::prelude::*;
use serde::Serialize;

pub use assembler::{Assembler, Attributes};
pub use error::ConvertError;
pub use package_index::PackageIndex;
pub use path_resolver::PathResolver;

use crate::core::{Axis, EmittedRule, FileTree, Module, ModuleGraph, ModuleKind};

/// Labels used for the conditions of `select()` expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionLabels {
    pub arch_prefix: String,
    pub os_prefix: String,
    pub default_condition: String,
}

impl Default for ConditionLabels {
    fn default() -> Self {
        ConditionLabels {
            arch_prefix: "//build/bazel/platforms/arch".to_string(),
            os_prefix: "//build/bazel/platforms/os".to_string(),
            default_condition: "//conditions:default".to_string(),
        }
    }
}

impl ConditionLabels {
    /// Label of the condition matching `value` on `axis`.
    pub fn condition(&self, axis: Axis, value: &str) -> String {
        let prefix = match axis {
            Axis::Arch => &self.arch_prefix,
            Axis::Os => &self.os_prefix,
        };
        format!("{}:{}", prefix, value)
    }
}

/// Settings for a conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// File names marking a package directory
    pub marker_files: Vec<String>,
    /// Extensions of header files, without the dot
    pub header_extensions: Vec<String>,
    /// Kinds excluded from conversion even though they have a rule
    pub disabled_kinds: Vec<ModuleKind>,
    pub labels: ConditionLabels,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            marker_files: vec!["Android.bp".to_string()],
            header_extensions: ["h", "hh", "hpp", "hxx"].map(String::from).to_vec(),
            disabled_kinds: Vec::new(),
            labels: ConditionLabels::default(),
        }
    }
}

/// Result of converting one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModuleOutcome {
    Converted { rule: EmittedRule },
    Skipped { name: String, reason: String },
    Failed {
        name: String,
        error: String,
        #[serde(skip)]
        cause: ConvertError,
    },
}

impl ModuleOutcome {
    fn failed(cause: ConvertError) -> Self {
        ModuleOutcome::Failed {
            name: cause.module().to_string(),
            error: cause.to_string(),
            cause,
        }
    }
}

/// Conversion results of one package, in module declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageOutput {
    pub package: String,
    pub outcomes: Vec<ModuleOutcome>,
}

impl PackageOutput {
    /// Rules that converted successfully.
    pub fn rules(&self) -> Vec<EmittedRule> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ModuleOutcome::Converted { rule } => Some(rule.clone()),
                _ => None,
            })
            .collect()
    }

    /// Errors of the modules that failed.
    pub fn errors(&self) -> Vec<&ConvertError> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ModuleOutcome::Failed { cause, .. } => Some(cause),
                _ => None,
            })
            .collect()
    }

    /// The package's build file text.
    pub fn render(&self, labels: &ConditionLabels) -> String {
        emitter::render_build_file(&self.rules(), labels)
    }
}

/// Converts modules using a shared snapshot and package index.
pub struct Converter<'a> {
    graph: &'a ModuleGraph,
    tree: &'a FileTree,
    index: &'a PackageIndex,
    options: &'a ConvertOptions,
}

impl<'a> Converter<'a> {
    pub fn new(
        graph: &'a ModuleGraph,
        tree: &'a FileTree,
        index: &'a PackageIndex,
        options: &'a ConvertOptions,
    ) -> Self {
        Converter {
            graph,
            tree,
            index,
            options,
        }
    }

    /// Convert a single module.
    ///
    /// Returns `Ok(None)` if the module is excluded from conversion.
    pub fn convert_module(&self, module: &Module) -> Result<Option<EmittedRule>, ConvertError> {
        let Some(class) = self.rule_class(module) else {
            return Ok(None);
        };
        if !self.index.is_package(&module.package) {
            return Err(ConvertError::UndeclaredPackage {
                module: module.name.clone(),
                package: module.package.clone(),
            });
        }

        let resolver = PathResolver::new(self.tree, self.index, &self.options.header_extensions);
        let assembler = Assembler::new(self.graph, self.tree, resolver);
        let attrs = assembler.assemble(module, class)?;
        Ok(Some(emitter::emit(class, &module.name, attrs)))
    }

    /// Convert every module declared in `package`.
    pub fn convert_package(&self, package: &str) -> PackageOutput {
        let modules: Vec<&Module> = self.graph.in_package(package).collect();
        tracing::debug!("converting {} modules in `//{}`", modules.len(), package);

        let outcomes = modules
            .par_iter()
            .map(|module| match self.convert_module(module) {
                Ok(Some(rule)) => ModuleOutcome::Converted { rule },
                Ok(None) => ModuleOutcome::Skipped {
                    name: module.name.clone(),
                    reason: self.skip_reason(module),
                },
                Err(e) => ModuleOutcome::failed(e),
            })
            .collect::<Vec<_>>();

        for outcome in &outcomes {
            if let ModuleOutcome::Failed { error, .. } = outcome {
                tracing::debug!("{}", error);
            }
        }

        PackageOutput {
            package: package.to_string(),
            outcomes,
        }
    }

    /// Convert every package that declares modules, sorted by package path.
    pub fn convert_all(&self) -> Vec<PackageOutput> {
        self.graph
            .packages()
            .into_iter()
            .map(|package| self.convert_package(package))
            .collect()
    }

    fn rule_class(&self, module: &Module) -> Option<crate::core::RuleClass> {
        if !module.convertible || self.options.disabled_kinds.contains(&module.kind) {
            return None;
        }
        module.kind.rule_class()
    }

    fn skip_reason(&self, module: &Module) -> String {
        if !module.convertible {
            "marked as not convertible".to_string()
        } else if self.options.disabled_kinds.contains(&module.kind) {
            format!("`{}` conversion is disabled", module.kind)
        } else {
            format!("`{}` has no rule equivalent", module.kind)
        }
    }
}
