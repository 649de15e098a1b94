//! Internal (contract-failure) errors.
//!
//! These are not user-facing compile errors: a malformed program reaching
//! this engine means an upstream phase broke its contract (the IR is
//! documented as well-scoped and well-typed). They abort the current
//! compilation unit immediately instead of being collected as diagnostics.

use crate::ir::{FuncId, NodeId};
use thiserror::Error;

/// Fatal engine/contract failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A variable was read or assigned without a live binding in scope.
    #[error("unbound identifier `{name}` at node {node:?}; upstream scoping contract violated")]
    UnboundIdentifier {
        /// The identifier that failed to resolve.
        name: String,
        /// The node that referenced it.
        node: NodeId,
    },

    /// A call edge points at a function the program does not define.
    #[error("call at node {node:?} targets unknown function {callee:?}")]
    UnknownFunction {
        /// The unresolved callee id.
        callee: FuncId,
        /// The call node.
        node: NodeId,
    },

    /// A witness read names a witness the program never declared.
    #[error("witness read at node {node:?} names undeclared witness `{name}`")]
    UnknownWitness {
        /// The undeclared witness name.
        name: String,
        /// The offending read node.
        node: NodeId,
    },

    /// Two IR nodes share an id; labels are keyed by node id, so ids must be
    /// unique per program.
    #[error("duplicate node id {node:?} in input program")]
    DuplicateNode {
        /// The repeated id.
        node: NodeId,
    },

    /// A function exceeds the parameter-tracking capacity of the engine.
    #[error("function {func:?} has {arity} parameters; at most 64 are supported")]
    UnsupportedArity {
        /// The offending function.
        func: FuncId,
        /// Its declared arity.
        arity: usize,
    },
}
