//! Per-node flow sets.
//!
//! The propagation rules compute a [`FlowSet`] for every node rather than a
//! bare [`TaintLabel`]: violations have to cite the witness reads that
//! contributed (the provenance chain), and helper functions are analyzed
//! symbolically in their parameters so that one pass yields a reusable
//! signature. The label is a projection of the flow set.

use crate::ir::NodeId;
use crate::label::TaintLabel;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A witness read that contributed taint to a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessOrigin {
    /// Declared witness name.
    pub witness: CompactString,
    /// The `WitnessRead` node.
    pub node: NodeId,
    /// Its source line.
    pub line: u32,
}

/// Set of function parameters a value depends on, as a bitset.
///
/// Functions with more than 64 parameters are rejected upstream
/// ([`crate::errors::EngineError::UnsupportedArity`]).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct ParamSet(u64);

impl ParamSet {
    /// The empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self(0)
    }

    /// Singleton set.
    #[must_use]
    pub fn singleton(index: usize) -> Self {
        debug_assert!(index < 64);
        Self(1u64 << index)
    }

    /// Set union.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Membership test.
    #[must_use]
    pub fn contains(self, index: usize) -> bool {
        index < 64 && self.0 & (1u64 << index) != 0
    }

    /// True when no parameter is in the set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates member indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..64usize).filter(move |i| self.contains(*i))
    }
}

/// What a value may depend on: witness reads, enclosing-function parameters,
/// or an opaque conservative top used to seed recursive cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowSet {
    /// Contributing witness reads, sorted by node id and deduplicated.
    pub witnesses: SmallVec<[WitnessOrigin; 2]>,
    /// Contributing parameters of the enclosing function.
    pub params: ParamSet,
    /// Conservatively tainted without provenance (recursive-cycle seed).
    pub opaque: bool,
}

impl FlowSet {
    /// A value with no private dependencies.
    #[must_use]
    pub fn pure() -> Self {
        Self::default()
    }

    /// Flow introduced by a single witness read.
    #[must_use]
    pub fn from_witness(witness: CompactString, node: NodeId, line: u32) -> Self {
        let mut witnesses = SmallVec::new();
        witnesses.push(WitnessOrigin {
            witness,
            node,
            line,
        });
        Self {
            witnesses,
            params: ParamSet::empty(),
            opaque: false,
        }
    }

    /// Flow introduced by reading parameter `index` of the enclosing helper.
    #[must_use]
    pub fn from_param(index: usize) -> Self {
        Self {
            witnesses: SmallVec::new(),
            params: ParamSet::singleton(index),
            opaque: false,
        }
    }

    /// The conservative top: tainted with unknown provenance.
    #[must_use]
    pub fn opaque() -> Self {
        Self {
            witnesses: SmallVec::new(),
            params: ParamSet::empty(),
            opaque: true,
        }
    }

    /// Joins `other` into `self` (set union on every component).
    pub fn join(&mut self, other: &Self) {
        for origin in &other.witnesses {
            if let Err(at) = self
                .witnesses
                .binary_search_by(|o| o.node.cmp(&origin.node))
            {
                self.witnesses.insert(at, origin.clone());
            }
        }
        self.params = self.params.union(other.params);
        self.opaque |= other.opaque;
    }

    /// Consuming join, convenient when folding operands.
    #[must_use]
    pub fn joined(mut self, other: &Self) -> Self {
        self.join(other);
        self
    }

    /// Projects the two-point label: tainted iff a witness (or the opaque
    /// top) contributes. Parameter dependence alone is not taint — it is
    /// resolved per call site through the function's signature.
    #[must_use]
    pub fn label(&self) -> TaintLabel {
        if self.opaque || !self.witnesses.is_empty() {
            TaintLabel::Tainted
        } else {
            TaintLabel::Public
        }
    }

    /// True when the value has no witness, parameter, or opaque dependence.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.witnesses.is_empty() && self.params.is_empty() && !self.opaque
    }

    /// Human-readable provenance chain for diagnostics, e.g.
    /// ``witness `secret_key` (read at line 4)``.
    #[must_use]
    pub fn provenance(&self) -> String {
        if self.witnesses.is_empty() {
            return if self.opaque {
                "a value carried through a recursive call".to_owned()
            } else {
                "a private value".to_owned()
            };
        }
        let cited: Vec<String> = self
            .witnesses
            .iter()
            .map(|o| format!("witness `{}` (read at line {})", o.witness, o.line))
            .collect();
        cited.join(", ")
    }
}
