//! Function taint signatures.
//!
//! A signature summarizes one function's taint behavior so call sites can be
//! evaluated without re-analyzing the body: how the return label depends on
//! argument labels, and which parameters reach a disclosure sink inside the
//! function (directly or through further calls). Signatures are computed
//! bottom-up over the call graph and published exactly once; afterwards the
//! table is read-only and shared.

use super::flow::{FlowSet, ParamSet};
use super::sinks::SinkKind;
use crate::ir::{FuncId, NodeId};
use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// "Parameter `param` reaches sink `sink` inside `within` (at `node`)."
///
/// Obligations are checked against concrete argument flows at every call
/// site; an obligation on an argument that itself depends on the caller's
/// parameters is lifted into the caller's own signature, so chains of
/// helpers are handled transitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinkObligation {
    /// Index of the obligated parameter.
    pub param: usize,
    /// The sink kind reached.
    pub sink: SinkKind,
    /// Name of the function physically containing the sink.
    pub within: CompactString,
    /// The sink node.
    pub node: NodeId,
    /// Its source line.
    pub line: u32,
}

/// The taint-sensitivity of a function's return value, projected from its
/// computed return flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnPolicy {
    /// The return value is public for every call site.
    Public,
    /// The return label is the join of the labels of these arguments.
    JoinParams(Vec<usize>),
    /// The return value is tainted regardless of arguments.
    Tainted,
}

/// One function's computed taint signature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signature {
    /// Declared parameter count.
    pub arity: usize,
    /// Return flow template: witness origins are intrinsic to the body,
    /// parameter bits refer to the callee's own parameters.
    pub return_flow: FlowSet,
    /// Parameters that reach a sink inside the function, sorted and deduped.
    pub obligations: Vec<SinkObligation>,
}

impl Signature {
    /// The conservative seed used for members of a recursive cycle before
    /// their fixpoint stabilizes: every parameter tainted implies a tainted
    /// return, expressed as the opaque top.
    #[must_use]
    pub fn conservative(arity: usize) -> Self {
        Self {
            arity,
            return_flow: FlowSet::opaque(),
            obligations: Vec::new(),
        }
    }

    /// Normalizes obligations for deterministic equality (fixpoint tests
    /// compare whole signatures).
    pub fn normalize(&mut self) {
        self.obligations
            .sort_by_key(|o| (o.param, o.node, o.sink.code()));
        self.obligations.dedup();
    }

    /// Applies the signature to concrete argument flows: intrinsic witness
    /// origins are kept, and each parameter bit is replaced by the
    /// corresponding argument's flow.
    #[must_use]
    pub fn apply(&self, args: &[FlowSet]) -> FlowSet {
        let mut result = FlowSet {
            witnesses: self.return_flow.witnesses.clone(),
            params: ParamSet::empty(),
            opaque: self.return_flow.opaque,
        };
        for index in self.return_flow.params.iter() {
            if let Some(arg) = args.get(index) {
                result.join(arg);
            }
        }
        result
    }

    /// Projects the coarse return-policy ADT consumed by external tooling.
    #[must_use]
    pub fn policy(&self) -> ReturnPolicy {
        if self.return_flow.opaque || !self.return_flow.witnesses.is_empty() {
            ReturnPolicy::Tainted
        } else if self.return_flow.params.is_empty() {
            ReturnPolicy::Public
        } else {
            ReturnPolicy::JoinParams(self.return_flow.params.iter().collect())
        }
    }
}

/// The per-program signature table (Output 3 of the analysis).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignatureTable {
    inner: FxHashMap<FuncId, Signature>,
}

/// One row of the exported signature table.
#[derive(Debug, Clone, Serialize)]
pub struct SignatureEntry<'a> {
    /// Function id.
    pub func: FuncId,
    /// Parameter count.
    pub arity: usize,
    /// Coarse return policy.
    pub policy: ReturnPolicy,
    /// Per-parameter sink obligations.
    pub obligations: &'a [SinkObligation],
}

impl SignatureTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes (or, during a cycle fixpoint, revises) a signature.
    pub fn publish(&mut self, func: FuncId, signature: Signature) {
        self.inner.insert(func, signature);
    }

    /// Looks up a published signature.
    #[must_use]
    pub fn get(&self, func: FuncId) -> Option<&Signature> {
        self.inner.get(&func)
    }

    /// Number of published signatures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True when nothing has been published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Deterministic (id-ordered) export for serialization and tooling.
    #[must_use]
    pub fn export(&self) -> Vec<SignatureEntry<'_>> {
        let mut entries: Vec<SignatureEntry<'_>> = self
            .inner
            .iter()
            .map(|(func, sig)| SignatureEntry {
                func: *func,
                arity: sig.arity,
                policy: sig.policy(),
                obligations: &sig.obligations,
            })
            .collect();
        entries.sort_by_key(|e| e.func);
        entries
    }
}

/// Read view over the shared table plus an unpublished local overlay.
///
/// Cycle fixpoints revise their members' signatures repeatedly; the overlay
/// keeps those revisions private to the analyzing worker until the cycle
/// stabilizes, so concurrent readers of the shared table never observe a
/// partial signature.
#[derive(Debug)]
pub struct SignatureView<'a> {
    base: &'a SignatureTable,
    overlay: FxHashMap<FuncId, Signature>,
}

impl<'a> SignatureView<'a> {
    /// Creates a view with an empty overlay.
    #[must_use]
    pub fn new(base: &'a SignatureTable) -> Self {
        Self {
            base,
            overlay: FxHashMap::default(),
        }
    }

    /// Looks up a signature, overlay first.
    #[must_use]
    pub fn get(&self, func: FuncId) -> Option<&Signature> {
        self.overlay.get(&func).or_else(|| self.base.get(func))
    }

    /// Revises a signature in the overlay.
    pub fn revise(&mut self, func: FuncId, signature: Signature) {
        self.overlay.insert(func, signature);
    }

    /// Consumes the view, yielding the overlay for publication.
    #[must_use]
    pub fn into_overlay(self) -> FxHashMap<FuncId, Signature> {
        self.overlay
    }
}

#[cfg(test)]
mod tests {
    use super::{ReturnPolicy, Signature, SignatureTable};
    use crate::ir::{FuncId, NodeId};
    use crate::label::TaintLabel;
    use crate::taint::flow::FlowSet;

    #[test]
    fn apply_substitutes_argument_flows() {
        let sig = Signature {
            arity: 2,
            return_flow: FlowSet::from_param(1),
            obligations: Vec::new(),
        };
        let tainted = FlowSet::from_witness("w".into(), NodeId(0), 1);
        let out = sig.apply(&[FlowSet::pure(), tainted]);
        assert_eq!(out.label(), TaintLabel::Tainted);

        let out = sig.apply(&[FlowSet::pure(), FlowSet::pure()]);
        assert_eq!(out.label(), TaintLabel::Public);
    }

    #[test]
    fn policy_projection() {
        let public = Signature {
            arity: 0,
            return_flow: FlowSet::pure(),
            obligations: Vec::new(),
        };
        assert_eq!(public.policy(), ReturnPolicy::Public);

        let join = Signature {
            arity: 3,
            return_flow: FlowSet::from_param(0).joined(&FlowSet::from_param(2)),
            obligations: Vec::new(),
        };
        assert_eq!(join.policy(), ReturnPolicy::JoinParams(vec![0, 2]));

        assert_eq!(Signature::conservative(1).policy(), ReturnPolicy::Tainted);
    }

    #[test]
    fn export_is_id_ordered() {
        let mut table = SignatureTable::new();
        table.publish(FuncId(2), Signature::conservative(0));
        table.publish(FuncId(0), Signature::conservative(0));
        let ids: Vec<FuncId> = table.export().iter().map(|e| e.func).collect();
        assert_eq!(ids, vec![FuncId(0), FuncId(2)]);
    }
}
