//! Declassification semantics.
//!
//! Two families of label-lowering operators exist:
//!
//! - **Strong** — `disclose` and cryptographic commitments reset the label
//!   to public unconditionally. A commitment's randomness-freshness is the
//!   front-end's contract and is not re-verified here.
//! - **Weak/advisory** — hashing resets the label for propagation purposes,
//!   but a hash of a small or enumerable domain does not survive offline
//!   brute force, so it draws a non-blocking advisory unless the operand's
//!   declared type proves enough entropy.

use super::flow::FlowSet;
use crate::config::AnalysisConfig;
use crate::diagnostics::Diagnostic;
use crate::ir::{Expr, ExprKind, NodeId, Program, TypeInfo};

/// Rule id of the weak-declassification advisory.
pub const LOW_ENTROPY_HASH: &str = "low-entropy-hash";

/// Declared type of the hashed operand, falling back to the witness
/// declaration when the operand is a direct witness read.
fn operand_type<'a>(program: &'a Program, operand: &'a Expr) -> Option<&'a TypeInfo> {
    if let Some(ty) = &operand.ty {
        return Some(ty);
    }
    if let ExprKind::WitnessRead { witness } = &operand.kind {
        return program.witness(witness).map(|w| &w.ty);
    }
    None
}

/// Checks a hash application and returns the advisory to emit, if any.
///
/// `flow` is the hashed operand's flow set; hashing an already-public value
/// is not worth warning about. "Cannot prove the entropy" is treated the
/// same as "too little entropy" — the obligation is on the program, not on
/// the analysis.
#[must_use]
pub fn hash_advisory(
    config: &AnalysisConfig,
    program: &Program,
    hash_node: NodeId,
    line: u32,
    operand: &Expr,
    flow: &FlowSet,
) -> Option<Diagnostic> {
    if !config.hash_advisories || flow.is_clean() {
        return None;
    }

    let required = config.min_hash_entropy_bits;
    let message = match operand_type(program, operand) {
        Some(ty) => match ty.entropy_bits() {
            Some(bits) if bits >= required => return None,
            Some(bits) => format!(
                "hash of {} ({}, {bits} bits of entropy) can be brute-forced offline; \
                 {required} bits are required to rely on hashing alone",
                flow.provenance(),
                ty.describe(),
            ),
            None => format!(
                "hash of {} ({}) has unprovable entropy; mix in fresh randomness \
                 or use a commitment",
                flow.provenance(),
                ty.describe(),
            ),
        },
        None => format!(
            "hash of {} has no declared type; its entropy cannot be established",
            flow.provenance(),
        ),
    };

    Some(Diagnostic::advisory(
        LOW_ENTROPY_HASH,
        hash_node,
        line,
        message,
    ))
}
