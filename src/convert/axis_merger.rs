//! Per-axis merging of list properties.
//!
//! A list property has a base value plus optional additions per axis value.
//! Merging keeps the base untouched as the common part and folds the
//! additions of each axis into one conditional block. Blocks are ordered by
//! axis precedence and branches by axis value, so the result never depends on
//! the order overrides were declared in.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::core::{Axis, ConditionalBlock, ConfigurableList};

/// One override's entries for the property being merged.
#[derive(Debug, Clone, Copy)]
pub struct AxisEntries<'a> {
    pub axis: Axis,
    pub value: &'a str,
    pub entries: &'a [String],
}

/// The same axis value was overridden twice for one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousOverride {
    pub axis: Axis,
    pub value: String,
}

/// Merge a base list with its per-axis additions.
///
/// Axes whose overrides are all empty produce no block.
pub fn merge(
    base: &[String],
    overrides: &[AxisEntries<'_>],
) -> Result<ConfigurableList, AmbiguousOverride> {
    let mut seen = BTreeSet::new();
    let mut by_axis: BTreeMap<Axis, BTreeMap<&str, Vec<String>>> = BTreeMap::new();

    for o in overrides {
        if !seen.insert((o.axis, o.value)) {
            return Err(AmbiguousOverride {
                axis: o.axis,
                value: o.value.to_string(),
            });
        }
        if o.entries.is_empty() {
            continue;
        }
        by_axis
            .entry(o.axis)
            .or_default()
            .insert(o.value, o.entries.to_vec());
    }

    Ok(ConfigurableList {
        common: base.to_vec(),
        blocks: by_axis
            .into_iter()
            .map(|(axis, branches)| ConditionalBlock {
                axis,
                branches: branches
                    .into_iter()
                    .map(|(value, entries)| (value.to_string(), entries))
                    .collect(),
            })
            .collect(),
    })
}

/// Concatenate configurable lists, in order.
///
/// The common parts are concatenated, and for each axis the branches of the
/// same axis value are concatenated, so that evaluating the result under any
/// configuration equals concatenating the evaluated inputs.
pub fn concat<I>(lists: I) -> ConfigurableList
where
    I: IntoIterator<Item = ConfigurableList>,
{
    let mut common = Vec::new();
    let mut by_axis: BTreeMap<Axis, BTreeMap<String, Vec<String>>> = BTreeMap::new();

    for list in lists {
        common.extend(list.common);
        for block in list.blocks {
            let branches = by_axis.entry(block.axis).or_default();
            for (value, entries) in block.branches {
                branches.entry(value).or_default().extend(entries);
            }
        }
    }

    ConfigurableList {
        common,
        blocks: by_axis
            .into_iter()
            .map(|(axis, branches)| ConditionalBlock {
                axis,
                branches: branches.into_iter().collect(),
            })
            .collect(),
    }
}

/// Remove repeated entries, keeping the first occurrence.
///
/// Branches also lose entries already in the common part, since those apply
/// under every configuration. Branches left empty are dropped, and so are
/// blocks left without branches. The common part only loses its own repeats.
pub fn dedup(mut list: ConfigurableList) -> ConfigurableList {
    list.common = dedup_first(list.common);
    let common: HashSet<&String> = list.common.iter().collect();
    for block in &mut list.blocks {
        for (_, entries) in &mut block.branches {
            *entries = dedup_first(std::mem::take(entries))
                .into_iter()
                .filter(|e| !common.contains(e))
                .collect();
        }
        block.branches.retain(|(_, entries)| !entries.is_empty());
    }
    list.blocks.retain(|block| !block.branches.is_empty());
    list
}

/// Remove repeated entries, keeping the first occurrence of each.
pub fn dedup_first(entries: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .filter(|e| seen.insert(e.clone()))
        .collect()
}
