//! The two-point taint lattice.
//!
//! Every analyzed node ends up with exactly one [`TaintLabel`]. The lattice
//! is deliberately minimal: a value either may depend on private witness
//! input (`Tainted`) or provably does not (`Public`). `join` is the only
//! combinator the propagation rules need; no meet is used in practice.

use serde::{Deserialize, Serialize};

/// Taint label for a single IR node or binding.
///
/// Ordered: `Public < Tainted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaintLabel {
    /// Value is independent of all private witness inputs.
    Public,
    /// Value may depend on a private witness input.
    Tainted,
}

impl TaintLabel {
    /// Lattice join (least upper bound): `Tainted` if either side is.
    #[must_use]
    pub fn join(self, other: Self) -> Self {
        if self == Self::Tainted || other == Self::Tainted {
            Self::Tainted
        } else {
            Self::Public
        }
    }

    /// Returns true for [`TaintLabel::Tainted`].
    #[must_use]
    pub fn is_tainted(self) -> bool {
        self == Self::Tainted
    }
}

impl Default for TaintLabel {
    fn default() -> Self {
        Self::Public
    }
}

#[cfg(test)]
mod tests {
    use super::TaintLabel;

    #[test]
    fn join_is_commutative_and_absorbs_tainted() {
        assert_eq!(
            TaintLabel::Public.join(TaintLabel::Public),
            TaintLabel::Public
        );
        assert_eq!(
            TaintLabel::Public.join(TaintLabel::Tainted),
            TaintLabel::Tainted
        );
        assert_eq!(
            TaintLabel::Tainted.join(TaintLabel::Public),
            TaintLabel::Tainted
        );
        assert_eq!(
            TaintLabel::Tainted.join(TaintLabel::Tainted),
            TaintLabel::Tainted
        );
    }

    #[test]
    fn order_matches_lattice() {
        assert!(TaintLabel::Public < TaintLabel::Tainted);
    }
}
