//! Statement nodes of the consumed IR.

use super::expr::{Expr, NodeId, Span};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A statement node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    /// Unique node id (shared id space with expressions).
    pub id: NodeId,
    /// Source position.
    pub span: Span,
    /// Statement form.
    pub kind: StmtKind,
}

/// The closed set of statement forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StmtKind {
    /// Introduce a new binding in the current scope.
    Let {
        /// Binding name.
        name: CompactString,
        /// Initializer.
        value: Expr,
    },
    /// Reassign an existing binding; its label is recomputed from the RHS.
    Assign {
        /// Binding name.
        name: CompactString,
        /// New value.
        value: Expr,
    },
    /// Expression evaluated for effect.
    Expr(Expr),
    /// Two-way branch. Branch bodies open their own scopes; bindings updated
    /// under the branch additionally absorb the condition's taint.
    If {
        /// Condition.
        cond: Expr,
        /// Statements when true.
        then_body: Vec<Stmt>,
        /// Statements when false.
        else_body: Vec<Stmt>,
    },
    /// Bounded circuit loop. The body is analyzed to a fixpoint over the
    /// loop-carried bindings.
    Loop {
        /// Loop body.
        body: Vec<Stmt>,
    },
    /// Function return. For exported circuits this is a disclosure sink.
    Return {
        /// Returned value, if any.
        value: Option<Expr>,
    },
    /// Constraint assertion. Proof success/failure is an observable channel,
    /// so a tainted condition is a disclosure sink.
    Assert {
        /// Asserted condition.
        cond: Expr,
        /// Optional front-end message.
        message: Option<CompactString>,
    },
    /// Write to public ledger state. A disclosure sink on the written value.
    LedgerWrite {
        /// Ledger field name.
        field: CompactString,
        /// Written value.
        value: Expr,
    },
}
