//! Command implementations

pub mod check;
pub mod completions;
pub mod convert;
pub mod packages;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::cli::WorkspaceArgs;
use rulegen::convert::{ConvertOptions, Converter, PackageIndex, PackageOutput};
use rulegen::core::{FileTree, ModuleGraph};
use rulegen::util::config::{global_config_path, load_config, project_config_path};
use rulegen::util::diagnostic::{self, suggestions, GraphParseError};
use rulegen::util::fs::{read_to_string, scan_tree};
use rulegen::util::Config;

/// Options shared by all commands.
pub struct GlobalOpts {
    /// Colorize diagnostics
    pub color: bool,
    /// Explicit global config file
    pub config: Option<PathBuf>,
}

/// Config, snapshot and package index of a workspace.
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
    pub options: ConvertOptions,
    pub tree: FileTree,
    pub index: PackageIndex,
}

impl Workspace {
    /// Load configuration and snapshot the workspace below `root`.
    pub fn load(root: &Path, opts: &GlobalOpts) -> Result<Self> {
        if !root.is_dir() {
            return Err(anyhow!(
                "workspace root `{}` is not a directory",
                root.display()
            ));
        }

        let global = opts.config.clone().or_else(global_config_path);
        let config = load_config(global.as_deref(), &project_config_path(root));
        let options = config.convert_options();

        let tree = scan_tree(root)?;
        let index = PackageIndex::build(&tree, &options.marker_files);
        tracing::debug!("found {} packages", index.packages().count());

        Ok(Workspace {
            root: root.to_path_buf(),
            config,
            options,
            tree,
            index,
        })
    }

    pub fn converter<'a>(&'a self, graph: &'a ModuleGraph) -> Converter<'a> {
        Converter::new(graph, &self.tree, &self.index, &self.options)
    }

    /// Path of the build file generated for `package`.
    pub fn build_file(&self, package: &str) -> PathBuf {
        self.root
            .join(package)
            .join(self.config.build_file_name())
    }
}

/// Load the workspace and module graph named by `args`.
pub fn load(args: &WorkspaceArgs, opts: &GlobalOpts) -> Result<(Workspace, ModuleGraph)> {
    let graph = load_graph(&args.modules)?;
    let ws = Workspace::load(&args.root, opts)?;
    Ok((ws, graph))
}

/// Read and parse a module graph file.
///
/// Syntax errors are rendered with the offending source span.
pub fn load_graph(path: &Path) -> Result<ModuleGraph> {
    let contents =
        read_to_string(path).map_err(|e| anyhow!("{:#}\n{}", e, suggestions::NO_GRAPH))?;

    ModuleGraph::from_toml_str(&contents).map_err(|e| {
        if let Some(toml_err) = e.downcast_ref::<toml::de::Error>() {
            let report = miette::Report::new(GraphParseError::new(path, &contents, toml_err));
            eprintln!("{:?}", report);
        }
        e.context(format!("invalid module graph: {}", path.display()))
    })
}

/// Print the diagnostics of every failed module; returns how many failed.
pub fn report_failures(outputs: &[PackageOutput], ws: &Workspace, color: bool) -> usize {
    let mut failed = 0;
    for output in outputs {
        for error in output.errors() {
            let diag = error
                .to_diagnostic()
                .with_location(ws.root.join(&output.package));
            diagnostic::emit(&diag, color);
            failed += 1;
        }
    }
    failed
}
