//! Disclosure sinks and their violation policy.
//!
//! A sink is a program point where a value becomes observable outside the
//! circuit's private boundary. Sinks do not alter propagation (a checked
//! comparison still yields a public boolean); their job is to emit
//! diagnostics when an undeclassified witness-derived value reaches them.

use super::flow::FlowSet;
use super::signatures::SinkObligation;
use crate::diagnostics::Diagnostic;
use crate::ir::{NodeId, Span};
use serde::{Deserialize, Serialize};

/// The kinds of disclosure sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// Return from an exported circuit; the verifier sees the value.
    Return,
    /// Write to public ledger state.
    LedgerWrite,
    /// Argument of a call leaving the circuit boundary.
    ExternalCall,
    /// Comparison operand; the boolean outcome leaks through branching.
    Comparison,
    /// Assertion condition; proof success/failure is observable.
    Assert,
}

impl SinkKind {
    /// Stable rule id used in diagnostics and tooling filters.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Return => "undisclosed-return",
            Self::LedgerWrite => "undisclosed-ledger-write",
            Self::ExternalCall => "undisclosed-external-call",
            Self::Comparison => "witness-comparison",
            Self::Assert => "witness-assert",
        }
    }

    /// How the leak reads in a message.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Return => "returned from an exported circuit",
            Self::LedgerWrite => "written to the public ledger",
            Self::ExternalCall => "passed outside the circuit boundary",
            Self::Comparison => "used in a comparison, whose outcome is observable",
            Self::Assert => "asserted, and proof failure is observable",
        }
    }

    /// Suggested remediation attached to violations at this sink.
    #[must_use]
    pub fn suggestion(self) -> &'static str {
        match self {
            Self::Comparison | Self::Assert => {
                "disclose the operands first if revealing the outcome is intended"
            }
            _ => "wrap the value in disclose(...) if revealing it is intended",
        }
    }
}

/// Violation at a sink the current function contains.
#[must_use]
pub fn violation(kind: SinkKind, node: NodeId, span: Span, flow: &FlowSet) -> Diagnostic {
    Diagnostic::violation(
        kind.code(),
        node,
        span.line,
        format!("{} is {}", capitalize(&flow.provenance()), kind.describe()),
        Some(kind.suggestion().to_owned()),
    )
}

/// Violation at a call site: a tainted argument reaches a sink inside the
/// callee (possibly through further calls).
#[must_use]
pub fn call_site_violation(
    obligation: &SinkObligation,
    callee: &str,
    node: NodeId,
    span: Span,
    flow: &FlowSet,
) -> Diagnostic {
    Diagnostic::violation(
        obligation.sink.code(),
        node,
        span.line,
        format!(
            "{} flows into `{}` as argument {} and is {} in `{}` (line {})",
            capitalize(&flow.provenance()),
            callee,
            obligation.param,
            obligation.sink.describe(),
            obligation.within,
            obligation.line,
        ),
        Some(obligation.sink.suggestion().to_owned()),
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
