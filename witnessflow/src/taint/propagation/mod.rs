//! Per-function taint propagation.
//!
//! One pass walks a single function body, computing a flow set for every
//! expression node, checking disclosure sinks as it goes, and producing the
//! function's taint signature. Split by concern: `entry` drives the pass and
//! seeds parameters, `handlers` executes statements, `exprs` evaluates
//! expressions.

mod entry;
mod exprs;
mod handlers;

pub(crate) use entry::{analyze_function, FunctionOutcome};
