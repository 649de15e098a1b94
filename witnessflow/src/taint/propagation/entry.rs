//! Pass driver: parameter seeding and signature assembly.

use crate::config::AnalysisConfig;
use crate::diagnostics::{Diagnostic, Reporter};
use crate::errors::EngineError;
use crate::ir::{Function, FunctionKind, NodeId, Program, Span};
use crate::label::TaintLabel;
use crate::taint::flow::FlowSet;
use crate::taint::signatures::{Signature, SignatureView, SinkObligation};
use crate::taint::sinks::{self, SinkKind};
use crate::taint::state::TaintState;
use rustc_hash::FxHashMap;

/// Result of analyzing one function.
pub(crate) struct FunctionOutcome {
    /// Label per expression node of this body.
    pub labels: FxHashMap<NodeId, TaintLabel>,
    /// Findings, in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// The function's computed taint signature.
    pub signature: Signature,
}

/// State of one function pass.
pub(super) struct FunctionPass<'a> {
    pub(super) program: &'a Program,
    pub(super) signatures: &'a SignatureView<'a>,
    pub(super) config: &'a AnalysisConfig,
    pub(super) current: &'a Function,
    pub(super) state: TaintState,
    pub(super) labels: FxHashMap<NodeId, TaintLabel>,
    pub(super) reporter: Reporter,
    pub(super) obligations: Vec<SinkObligation>,
    pub(super) return_flow: FlowSet,
    /// Flows of the conditions the current statement executes under.
    /// Branch selection can leak a tainted condition, so these are joined
    /// into bindings assigned and sinks checked inside the branch.
    pub(super) control: Vec<FlowSet>,
}

/// Analyzes one function body against already-known callee signatures.
///
/// Circuit parameters are public inputs; helper parameters are seeded with
/// symbolic per-parameter flows so the resulting signature describes the
/// function for every call site.
pub(crate) fn analyze_function(
    program: &Program,
    signatures: &SignatureView<'_>,
    config: &AnalysisConfig,
    function: &Function,
) -> Result<FunctionOutcome, EngineError> {
    if function.params.len() > 64 {
        return Err(EngineError::UnsupportedArity {
            func: function.id,
            arity: function.params.len(),
        });
    }

    let mut pass = FunctionPass {
        program,
        signatures,
        config,
        current: function,
        state: TaintState::new(),
        labels: FxHashMap::default(),
        reporter: Reporter::new(),
        obligations: Vec::new(),
        return_flow: FlowSet::pure(),
        control: Vec::new(),
    };

    for (index, param) in function.params.iter().enumerate() {
        let flow = match function.kind {
            FunctionKind::Circuit => FlowSet::pure(),
            FunctionKind::Helper => FlowSet::from_param(index),
        };
        pass.state.declare(param.name.clone(), flow);
    }

    pass.exec_block(&function.body)?;

    // A circuit's return is itself a sink; after the check its value is
    // treated as declassified, so the published signature is public.
    let return_flow = match function.kind {
        FunctionKind::Circuit => FlowSet::pure(),
        FunctionKind::Helper => pass.return_flow,
    };
    let mut signature = Signature {
        arity: function.params.len(),
        return_flow,
        obligations: pass.obligations,
    };
    signature.normalize();

    Ok(FunctionOutcome {
        labels: pass.labels,
        diagnostics: pass.reporter.into_sorted(),
        signature,
    })
}

impl FunctionPass<'_> {
    /// Join of every enclosing condition's flow.
    pub(super) fn control_context(&self) -> FlowSet {
        let mut context = FlowSet::pure();
        for flow in &self.control {
            context.join(flow);
        }
        context
    }

    /// Validates a sink operand: a witness-carrying flow is a violation
    /// here; a parameter-dependent flow becomes an obligation the caller
    /// must satisfy. `flow` must already include the control context.
    pub(super) fn check_sink(&mut self, kind: SinkKind, node: NodeId, span: Span, flow: &FlowSet) {
        if flow.label().is_tainted() {
            self.reporter.push(sinks::violation(kind, node, span, flow));
        }
        for param in flow.params.iter() {
            self.obligations.push(SinkObligation {
                param,
                sink: kind,
                within: self.current.name.clone(),
                node,
                line: span.line,
            });
        }
    }
}
