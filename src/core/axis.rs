//! Configuration axes.
//!
//! An axis is a dimension a module's properties can vary along. Axes are
//! independent: a module may override properties per architecture and per
//! operating system, but never per (architecture, os) pair.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A configuration axis.
///
/// The declaration order is the axis precedence: when a property carries
/// overrides on several axes, the conditional blocks are concatenated in
/// this order (architecture first, then operating system).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// CPU architecture: `arm`, `arm64`, `x86`, `x86_64`
    Arch,
    /// Operating system: `android`, `linux_glibc`, `darwin`, ...
    #[serde(alias = "target")]
    Os,
}

impl Axis {
    /// All axes in precedence order.
    pub const ALL: [Axis; 2] = [Axis::Arch, Axis::Os];

    /// The keyword used for this axis in module definitions.
    pub fn source_keyword(&self) -> &'static str {
        match self {
            Axis::Arch => "arch",
            Axis::Os => "target",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Arch => write!(f, "arch"),
            Axis::Os => write!(f, "os"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_is_arch_then_os() {
        assert!(Axis::Arch < Axis::Os);
        let mut axes = vec![Axis::Os, Axis::Arch];
        axes.sort();
        assert_eq!(axes, Axis::ALL.to_vec());
    }

    #[test]
    fn test_target_keyword_deserializes_as_os() {
        #[derive(Deserialize)]
        struct Wrapper {
            axis: Axis,
        }
        let w: Wrapper = toml::from_str("axis = \"target\"").unwrap();
        assert_eq!(w.axis, Axis::Os);
        let w: Wrapper = toml::from_str("axis = \"arch\"").unwrap();
        assert_eq!(w.axis, Axis::Arch);
    }
}
