//! Rule emission and Starlark rendering.
//!
//! `emit` wraps assembled attributes into an `EmittedRule` without touching
//! their order. `render` turns a rule into build-file text; rendering is a
//! pure function of the rule and the condition labels, so identical rules
//! always produce identical bytes.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use crate::convert::assembler::Attributes;
use crate::convert::ConditionLabels;
use crate::core::{AttrValue, ConditionalBlock, ConfigurableList, EmittedRule, RuleClass};

const INDENT: &str = "    ";

/// Wrap assembled attributes into a rule.
pub fn emit(class: RuleClass, name: &str, attrs: Attributes) -> EmittedRule {
    EmittedRule {
        kind: class.kind.to_string(),
        load_from: class.load_from.map(str::to_string),
        name: name.to_string(),
        attrs,
    }
}

/// Render one rule as build-file text (no trailing newline).
pub fn render(rule: &EmittedRule, labels: &ConditionLabels) -> String {
    let mut out = String::new();
    writeln!(out, "{}(", rule.kind).unwrap();
    writeln!(out, "{}name = {},", INDENT, quote(&rule.name)).unwrap();
    for (key, value) in &rule.attrs {
        writeln!(out, "{}{} = {},", INDENT, key, render_value(value, 1, labels)).unwrap();
    }
    out.push(')');
    out
}

/// `load()` statements needed by `rules`, one per `.bzl` file.
///
/// Files are sorted, and so are the symbols loaded from each file. Native
/// rules need no load and contribute nothing.
pub fn load_statements(rules: &[EmittedRule]) -> String {
    let mut loads: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for rule in rules {
        if let Some(ref file) = rule.load_from {
            loads.entry(file.as_str()).or_default().insert(rule.kind.as_str());
        }
    }

    loads
        .into_iter()
        .map(|(file, symbols)| {
            let mut line = format!("load({}", quote(file));
            for symbol in symbols {
                write!(line, ", {}", quote(symbol)).unwrap();
            }
            line.push(')');
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a whole build file: load statements, then each rule.
pub fn render_build_file(rules: &[EmittedRule], labels: &ConditionLabels) -> String {
    let mut out = String::new();
    let loads = load_statements(rules);
    if !loads.is_empty() {
        out.push_str(&loads);
        out.push_str("\n\n");
    }
    let bodies: Vec<String> = rules.iter().map(|r| render(r, labels)).collect();
    out.push_str(&bodies.join("\n\n"));
    if !bodies.is_empty() {
        out.push('\n');
    }
    out
}

fn render_value(value: &AttrValue, indent: usize, labels: &ConditionLabels) -> String {
    match value {
        AttrValue::Bool(true) => "True".to_string(),
        AttrValue::Bool(false) => "False".to_string(),
        AttrValue::Str(s) => quote(s),
        AttrValue::List(items) => render_list(items, indent),
        AttrValue::Configurable(list) => render_configurable(list, indent, labels),
    }
}

fn render_configurable(list: &ConfigurableList, indent: usize, labels: &ConditionLabels) -> String {
    let mut parts = Vec::with_capacity(list.blocks.len() + 1);
    if !list.common.is_empty() || list.blocks.is_empty() {
        parts.push(render_list(&list.common, indent));
    }
    for block in &list.blocks {
        parts.push(render_select(block, indent, labels));
    }
    parts.join(" + ")
}

fn render_select(block: &ConditionalBlock, indent: usize, labels: &ConditionLabels) -> String {
    let inner = INDENT.repeat(indent + 1);
    let mut out = String::from("select({\n");
    for (value, entries) in &block.branches {
        writeln!(
            out,
            "{}{}: {},",
            inner,
            quote(&labels.condition(block.axis, value)),
            render_list(entries, indent + 1)
        )
        .unwrap();
    }
    writeln!(
        out,
        "{}{}: {},",
        inner,
        quote(&labels.default_condition),
        render_list(block.default_branch(), indent + 1)
    )
    .unwrap();
    out.push_str(&INDENT.repeat(indent));
    out.push_str("})");
    out
}

fn render_list(items: &[String], indent: usize) -> String {
    match items {
        [] => "[]".to_string(),
        [only] => format!("[{}]", quote(only)),
        many => {
            let inner = INDENT.repeat(indent + 1);
            let mut out = String::from("[\n");
            for item in many {
                writeln!(out, "{}{},", inner, quote(item)).unwrap();
            }
            out.push_str(&INDENT.repeat(indent));
            out.push(']');
            out
        }
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Axis;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_plain_rule() {
        let rule = emit(
            RuleClass::CC_LIBRARY_STATIC,
            "foo_static",
            vec![
                ("copts".into(), AttrValue::List(strings(&["-Dflag1", "-I."]))),
                ("deps".into(), AttrValue::List(strings(&[":bar"]))),
                ("linkstatic".into(), AttrValue::Bool(true)),
            ],
        );

        assert_eq!(
            render(&rule, &ConditionLabels::default()),
            r#"cc_library_static(
    name = "foo_static",
    copts = [
        "-Dflag1",
        "-I.",
    ],
    deps = [":bar"],
    linkstatic = True,
)"#
        );
    }

    #[test]
    fn test_render_select_only() {
        let deps = ConfigurableList {
            common: Vec::new(),
            blocks: vec![ConditionalBlock {
                axis: Axis::Arch,
                branches: vec![("arm64".into(), strings(&[":static_dep", ":static_dep2"]))],
            }],
        };
        let rule = emit(
            RuleClass::CC_LIBRARY_STATIC,
            "foo_static",
            vec![
                ("copts".into(), AttrValue::List(strings(&["-I."]))),
                ("deps".into(), AttrValue::Configurable(deps)),
                ("linkstatic".into(), AttrValue::Bool(true)),
            ],
        );

        assert_eq!(
            render(&rule, &ConditionLabels::default()),
            r#"cc_library_static(
    name = "foo_static",
    copts = ["-I."],
    deps = select({
        "//build/bazel/platforms/arch:arm64": [
            ":static_dep",
            ":static_dep2",
        ],
        "//conditions:default": [],
    }),
    linkstatic = True,
)"#
        );
    }

    #[test]
    fn test_render_common_plus_two_selects() {
        let deps = ConfigurableList {
            common: strings(&[":static_dep", ":static_dep2"]),
            blocks: vec![
                ConditionalBlock {
                    axis: Axis::Arch,
                    branches: vec![("arm64".into(), strings(&[":static_dep4"]))],
                },
                ConditionalBlock {
                    axis: Axis::Os,
                    branches: vec![("android".into(), strings(&[":static_dep3"]))],
                },
            ],
        };

        assert_eq!(
            render_value(&AttrValue::Configurable(deps), 1, &ConditionLabels::default()),
            r#"[
        ":static_dep",
        ":static_dep2",
    ] + select({
        "//build/bazel/platforms/arch:arm64": [":static_dep4"],
        "//conditions:default": [],
    }) + select({
        "//build/bazel/platforms/os:android": [":static_dep3"],
        "//conditions:default": [],
    })"#
        );
    }

    #[test]
    fn test_load_statements() {
        let native = emit(RuleClass::CC_LIBRARY_STATIC, "a", Vec::new());
        assert_eq!(load_statements(&[native.clone()]), "");

        let headers = emit(RuleClass::CC_LIBRARY_HEADERS, "h", Vec::new());
        let headers2 = emit(RuleClass::CC_LIBRARY_HEADERS, "h2", Vec::new());
        assert_eq!(
            load_statements(&[native, headers, headers2]),
            r#"load("//build/bazel/rules:cc_library_headers.bzl", "cc_library_headers")"#
        );
    }

    #[test]
    fn test_render_build_file() {
        let labels = ConditionLabels::default();
        let a = emit(RuleClass::CC_LIBRARY_HEADERS, "a", Vec::new());
        let b = emit(RuleClass::CC_LIBRARY_STATIC, "b", Vec::new());
        let text = render_build_file(&[a, b], &labels);
        assert_eq!(
            text,
            "load(\"//build/bazel/rules:cc_library_headers.bzl\", \"cc_library_headers\")\n\n\
             cc_library_headers(\n    name = \"a\",\n)\n\n\
             cc_library_static(\n    name = \"b\",\n)\n"
        );
        assert_eq!(render_build_file(&[], &labels), "");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote(r#"-DMSG="hi""#), r#""-DMSG=\"hi\"""#);
        assert_eq!(quote(r"a\b"), r#""a\\b""#);
    }
}
