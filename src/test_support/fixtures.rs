//! Test fixtures for common conversion scenarios.
//!
//! Snapshots and module graphs that mirror real Android.bp layouts, kept in
//! pairs: `workspace::x()` is the file tree that `graph::x()` is declared in.

/// File-tree snapshots.
pub mod workspace {
    use crate::core::FileTree;

    /// A root package with sources, implicit headers and four kinds of
    /// include directories.
    pub fn full_static_library() -> FileTree {
        let mut tree = FileTree::from_files([
            "Android.bp",
            "foo_static1.cc",
            "foo_static2.cc",
            "static_lib_1.cc",
            "static_lib_2.cc",
            "whole_static_lib_1.cc",
            "whole_static_lib_2.cc",
            "implicit_include_1.h",
            "implicit_include_2.h",
            "include_dir_1/include_dir_1_a.h",
            "include_dir_1/include_dir_1_b.h",
            "include_dir_2/include_dir_2_a.h",
            "include_dir_2/include_dir_2_b.h",
            "local_include_dir_1/local_include_dir_1_a.h",
            "local_include_dir_1/local_include_dir_1_b.h",
            "local_include_dir_2/local_include_dir_2_a.h",
            "local_include_dir_2/local_include_dir_2_b.h",
            "export_include_dir_1/export_include_dir_1_a.h",
            "export_include_dir_1/export_include_dir_1_b.h",
            "export_include_dir_2/export_include_dir_2_a.h",
            "export_include_dir_2/export_include_dir_2_b.h",
        ]);
        tree.add_dir("header_lib_1");
        tree.add_dir("header_lib_2");
        tree
    }

    /// Three nested packages, each with a header and a plain subdirectory.
    pub fn nested_subpackages() -> FileTree {
        FileTree::from_files([
            "subpackage/Android.bp",
            "subpackage/subpackage_header.h",
            "subpackage/subdirectory/subdirectory_header.h",
            "subpackage/subsubpackage/Android.bp",
            "subpackage/subsubpackage/subsubpackage_header.h",
            "subpackage/subsubpackage/subdirectory/subdirectory_header.h",
            "subpackage/subsubpackage/subsubsubpackage/Android.bp",
            "subpackage/subsubpackage/subsubsubpackage/subsubsubpackage_header.h",
            "subpackage/subsubpackage/subsubsubpackage/subdirectory/subdirectory_header.h",
        ])
    }
}

/// Module graphs.
pub mod graph {
    use crate::core::{Axis, Module, ModuleGraph, ModuleKind};

    /// Modules of `workspace::full_static_library`, in declaration order.
    pub fn full_static_library() -> ModuleGraph {
        ModuleGraph::new(vec![
            Module::new("linux_bionic_supported", ModuleKind::Defaults),
            Module::new("libclang_rt.builtins-x86_64-android", ModuleKind::ToolchainLibrary),
            Module::header_lib("header_lib_1").with_list("export_include_dirs", ["header_lib_1"]),
            Module::header_lib("header_lib_2").with_list("export_include_dirs", ["header_lib_2"]),
            Module::static_lib("static_lib_1").with_list("srcs", ["static_lib_1.cc"]),
            Module::static_lib("static_lib_2").with_list("srcs", ["static_lib_2.cc"]),
            Module::static_lib("whole_static_lib_1").with_list("srcs", ["whole_static_lib_1.cc"]),
            Module::static_lib("whole_static_lib_2").with_list("srcs", ["whole_static_lib_2.cc"]),
            Module::static_lib("foo_static")
                .with_list("srcs", ["foo_static1.cc", "foo_static2.cc"])
                .with_list("cflags", ["-Dflag1", "-Dflag2"])
                .with_list("static_libs", ["static_lib_1", "static_lib_2"])
                .with_list("whole_static_libs", ["whole_static_lib_1", "whole_static_lib_2"])
                .with_list("include_dirs", ["include_dir_1", "include_dir_2"])
                .with_list("local_include_dirs", ["local_include_dir_1", "local_include_dir_2"])
                .with_list("export_include_dirs", ["export_include_dir_1", "export_include_dir_2"])
                .with_list("header_libs", ["header_lib_1", "header_lib_2"]),
        ])
        .expect("fixture modules are unique")
    }

    /// Base static libs plus one arch and one os override.
    pub fn arch_and_os_deps() -> ModuleGraph {
        ModuleGraph::new(vec![
            Module::static_lib("static_dep"),
            Module::static_lib("static_dep2"),
            Module::static_lib("static_dep3"),
            Module::static_lib("static_dep4"),
            Module::static_lib("foo_static")
                .with_list("static_libs", ["static_dep"])
                .with_list("whole_static_libs", ["static_dep2"])
                .with_override(Axis::Os, "android", "static_libs", ["static_dep3"])
                .with_override(Axis::Arch, "arm64", "static_libs", ["static_dep4"]),
        ])
        .expect("fixture modules are unique")
    }

    /// The same graph as `arch_and_os_deps`, as a graph file.
    pub const ARCH_AND_OS_DEPS_TOML: &str = r#"
[[module]]
name = "static_dep"
kind = "cc_library_static"

[[module]]
name = "static_dep2"
kind = "cc_library_static"

[[module]]
name = "static_dep3"
kind = "cc_library_static"

[[module]]
name = "static_dep4"
kind = "cc_library_static"

[[module]]
name = "foo_static"
kind = "cc_library_static"

[module.props]
static_libs = ["static_dep"]
whole_static_libs = ["static_dep2"]

[[module.overrides]]
axis = "target"
value = "android"
props = { static_libs = ["static_dep3"] }

[[module.overrides]]
axis = "arch"
value = "arm64"
props = { static_libs = ["static_dep4"] }
"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_file_matches_builder_fixture() {
        let parsed = crate::core::ModuleGraph::from_toml_str(graph::ARCH_AND_OS_DEPS_TOML).unwrap();
        assert_eq!(parsed.modules(), graph::arch_and_os_deps().modules());
    }

    #[test]
    fn test_full_static_library_tree() {
        let tree = workspace::full_static_library();
        assert!(tree.is_dir("header_lib_1"));
        assert!(tree.is_file("export_include_dir_2/export_include_dir_2_b.h"));
    }
}
