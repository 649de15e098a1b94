//! witnessflow — witness-taint and disclosure analysis for circuit IR.
//!
//! A two-level information-flow analysis for zero-knowledge circuit
//! languages: every value that originates from a private witness input is
//! tracked through the program, and any flow into a publicly observable
//! point — a circuit return, a ledger write, a call across the circuit
//! boundary, a comparison, an assertion — without an explicit
//! declassification is reported as a compile error.
//!
//! The crate consumes an already-built IR ([`ir::Program`]) supplied by an
//! external front-end and produces three outputs: a taint label per IR node,
//! an ordered list of diagnostics, and a per-function signature table.
//!
//! ```
//! use witnessflow::ir::{FunctionKind, ProgramBuilder, TypeInfo};
//! use witnessflow::{AnalysisConfig, Analyzer};
//!
//! let mut b = ProgramBuilder::new();
//! b.witness("secret", TypeInfo::Field);
//! let main = b.declare("main", FunctionKind::Circuit);
//! let read = b.witness_read("secret");
//! let disclosed = b.disclose(read);
//! let ret = b.ret(Some(disclosed));
//! b.define(main, vec![], vec![ret]);
//!
//! let analysis = Analyzer::new(AnalysisConfig::default())
//!     .analyze(&b.finish())
//!     .unwrap();
//! assert!(analysis.passed());
//! ```

pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod ir;
pub mod label;
pub mod taint;

pub use config::AnalysisConfig;
pub use diagnostics::{Diagnostic, Reporter, Severity};
pub use errors::EngineError;
pub use label::TaintLabel;
pub use taint::{Analysis, Analyzer, NodeLabels, ReturnPolicy, SignatureTable, SinkKind};
