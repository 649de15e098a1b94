//! Witness-taint analysis.
//!
//! Tracks private witness values from their reads to disclosure sinks.
//!
//! # Pipeline
//! - **Propagation**: per-function flow computation over the IR
//! - **Interprocedural**: callees-first ordering, signatures, cycle fixpoints
//! - **Sinks**: disclosure-policy checks producing diagnostics

pub mod analyzer;
pub mod declass;
pub mod flow;
mod interprocedural;
mod propagation;
pub mod signatures;
pub mod sinks;
pub mod state;

pub use analyzer::{Analysis, Analyzer, NodeLabels};
pub use flow::{FlowSet, ParamSet, WitnessOrigin};
pub use signatures::{ReturnPolicy, Signature, SignatureTable, SinkObligation};
pub use sinks::SinkKind;
pub use state::TaintState;
