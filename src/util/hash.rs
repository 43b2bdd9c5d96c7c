//! Hashing utilities for fingerprinting generated output.

use sha2::{Digest, Sha256};

use crate::convert::{emitter, ConditionLabels, PackageOutput};

/// A hasher for building fingerprints from multiple components.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    /// Create a new fingerprint builder.
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component to the fingerprint.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0"); // Separator
        self
    }

    /// Finalize and return the fingerprint as a hex string.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }

    /// Finalize and return a short fingerprint (first 16 chars).
    pub fn finish_short(self) -> String {
        self.finish()[..16].to_string()
    }
}

/// Fingerprint of a whole conversion run.
///
/// Covers every package's path and rendered rules, so it changes exactly
/// when some generated build file would change.
pub fn fingerprint_outputs(outputs: &[PackageOutput], labels: &ConditionLabels) -> String {
    let mut fp = Fingerprint::new();
    for output in outputs {
        fp.update_str(&output.package);
        for rule in output.rules() {
            fp.update_str(&emitter::render(&rule, labels));
        }
    }
    fp.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{ConvertOptions, Converter, PackageIndex};
    use crate::core::{FileTree, Module, ModuleGraph};

    #[test]
    fn test_fingerprint() {
        let fp1 = {
            let mut fp = Fingerprint::new();
            fp.update_str("hello").update_str("world");
            fp.finish()
        };

        let fp2 = {
            let mut fp = Fingerprint::new();
            fp.update_str("helloworld");
            fp.finish_short()
        };

        assert_ne!(&fp1[..16], fp2);
        assert_eq!(fp2.len(), 16);
    }

    #[test]
    fn test_fingerprint_outputs_tracks_rule_changes() {
        let tree = FileTree::from_files(["a.cc", "b.cc"]);
        let options = ConvertOptions::default();
        let index = PackageIndex::build(&tree, &options.marker_files);

        let run = |src: &str| {
            let graph =
                ModuleGraph::new(vec![Module::static_lib("foo").with_list("srcs", [src])]).unwrap();
            let outputs = Converter::new(&graph, &tree, &index, &options).convert_all();
            fingerprint_outputs(&outputs, &options.labels)
        };

        assert_eq!(run("a.cc"), run("a.cc"));
        assert_ne!(run("a.cc"), run("b.cc"));
    }
}
