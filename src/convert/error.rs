//! Conversion error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::{path, Axis};
use crate::util::diagnostic::Diagnostic;

/// Error converting a single module.
///
/// Errors are fatal for the module that raised them only; sibling modules in
/// the same package are still converted.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ConvertError {
    #[error("in module `{module}`: `{attribute}` references missing path `{path}`")]
    #[diagnostic(code(rulegen::convert::missing_path))]
    MissingPath {
        module: String,
        attribute: String,
        path: String,
    },

    #[error("in module `{module}`: dependency `{dependency}` is a `{kind}`, which has no rule equivalent")]
    #[diagnostic(code(rulegen::convert::unsupported_dependency_kind))]
    UnsupportedDependencyKind {
        module: String,
        attribute: String,
        dependency: String,
        kind: String,
    },

    #[error("in module `{module}`: `{attribute}` is overridden more than once for {axis} `{value}`")]
    #[diagnostic(code(rulegen::convert::ambiguous_axis_override))]
    AmbiguousAxisOverride {
        module: String,
        attribute: String,
        axis: Axis,
        value: String,
    },

    #[error("in module `{module}`: invalid property `{attribute}`: {reason}")]
    #[diagnostic(code(rulegen::convert::invalid_property))]
    InvalidProperty {
        module: String,
        attribute: String,
        reason: String,
    },

    #[error("in module `{module}`: dependency `{dependency}` not found")]
    #[diagnostic(code(rulegen::convert::unknown_dependency))]
    UnknownDependency {
        module: String,
        attribute: String,
        dependency: String,
        candidates: Vec<String>,
    },

    #[error("in module `{module}`: package `{package}` has no module definition file")]
    #[diagnostic(code(rulegen::convert::undeclared_package))]
    UndeclaredPackage { module: String, package: String },
}

impl ConvertError {
    /// Name of the module the error belongs to.
    pub fn module(&self) -> &str {
        match self {
            ConvertError::MissingPath { module, .. }
            | ConvertError::UnsupportedDependencyKind { module, .. }
            | ConvertError::AmbiguousAxisOverride { module, .. }
            | ConvertError::InvalidProperty { module, .. }
            | ConvertError::UnknownDependency { module, .. }
            | ConvertError::UndeclaredPackage { module, .. } => module,
        }
    }

    /// The property the error was raised for.
    pub fn attribute(&self) -> &str {
        match self {
            ConvertError::MissingPath { attribute, .. }
            | ConvertError::UnsupportedDependencyKind { attribute, .. }
            | ConvertError::AmbiguousAxisOverride { attribute, .. }
            | ConvertError::InvalidProperty { attribute, .. }
            | ConvertError::UnknownDependency { attribute, .. } => attribute,
            ConvertError::UndeclaredPackage { .. } => "package",
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConvertError::MissingPath {
                module,
                attribute,
                path,
            } => Diagnostic::error(format!(
                "path `{}` does not exist in the workspace snapshot",
                path
            ))
            .with_context(format!("referenced by `{}` of module `{}`", attribute, module))
            .with_suggestion("Check the path for typos, or remove it from the module definition")
            .with_suggestion("Re-run the conversion if files were added after the snapshot was taken"),

            ConvertError::UnsupportedDependencyKind {
                module,
                attribute,
                dependency,
                kind,
            } => Diagnostic::error(format!(
                "dependency `{}` cannot be converted",
                dependency
            ))
            .with_context(format!(
                "`{}` of module `{}` references a `{}`",
                attribute, module, kind
            ))
            .with_context(format!("`{}` modules have no rule equivalent", kind))
            .with_suggestion(format!("Remove `{}` from `{}`", dependency, attribute)),

            ConvertError::AmbiguousAxisOverride {
                module,
                attribute,
                axis,
                value,
            } => Diagnostic::error(format!(
                "conflicting overrides of `{}` in module `{}`",
                attribute, module
            ))
            .with_context(format!("{} value `{}` is overridden more than once", axis, value))
            .with_suggestion("Merge the overrides upstream before conversion"),

            ConvertError::InvalidProperty {
                module,
                attribute,
                reason,
            } => Diagnostic::error(format!(
                "invalid property `{}` in module `{}`",
                attribute, module
            ))
            .with_context(reason.clone()),

            ConvertError::UnknownDependency {
                module,
                attribute,
                dependency,
                candidates,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "could not find dependency `{}`",
                    dependency
                ))
                .with_context(format!("referenced by `{}` of module `{}`", attribute, module));

                if candidates.is_empty() {
                    diag = diag.with_suggestion("Check that the module name is spelled correctly");
                } else {
                    diag = diag
                        .with_context(format!("matching modules: {}", candidates.join(", ")))
                        .with_suggestion("Qualify the dependency as `//<package>:<name>`");
                }

                diag
            }

            ConvertError::UndeclaredPackage { module, package } => Diagnostic::error(format!(
                "module `{}` is declared in `{}`, which is not a package",
                module,
                path::display_dir(package)
            ))
            .with_context("no module definition file was found in that directory")
            .with_suggestion("Re-run the conversion on a snapshot that includes the module definition file"),
        }
    }
}
