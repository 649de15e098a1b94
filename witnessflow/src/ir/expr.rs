//! Expression nodes of the consumed IR.

use super::program::FuncId;
use super::types::TypeInfo;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Unique id of an IR node within one program.
///
/// Node labels (the analysis output) are a parallel map keyed by this id, so
/// the front-end must issue each id exactly once per program.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(pub u32);

/// Source position of a node, 1-indexed, as reported by the front-end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Line number.
    pub line: u32,
    /// Column number.
    pub column: u32,
}

/// A literal constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    /// Integer or field constant.
    Num(i128),
    /// Boolean constant.
    Bool(bool),
}

/// Binary arithmetic/logical operators. The analysis treats them uniformly
/// (join of operands); the set exists so front-ends can round-trip programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Logical and.
    And,
    /// Logical or.
    Or,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// Arithmetic negation.
    Neg,
    /// Logical negation.
    Not,
}

/// Comparison operators. Comparisons are disclosure sinks on both operands,
/// not ordinary propagation nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// Equality.
    Eq,
    /// Inequality.
    Ne,
    /// Less-than.
    Lt,
    /// Less-or-equal.
    Le,
    /// Greater-than.
    Gt,
    /// Greater-or-equal.
    Ge,
}

/// One arm of a `match` expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchArm {
    /// Variables bound by the arm's pattern; they inherit the scrutinee's
    /// taint inside the arm body.
    pub bindings: Vec<CompactString>,
    /// The arm's value.
    pub body: Expr,
}

/// An expression node: id, position, optional declared type, and kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    /// Unique node id.
    pub id: NodeId,
    /// Source position.
    pub span: Span,
    /// Declared type, where the front-end resolved one.
    pub ty: Option<TypeInfo>,
    /// Expression form.
    pub kind: ExprKind,
}

/// The closed set of expression forms the engine understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    /// Compile-time constant. Always public.
    Literal(Literal),
    /// Read of a declared private witness. The origin of all taint.
    WitnessRead {
        /// Declared witness name.
        witness: CompactString,
    },
    /// Read of a local binding or parameter.
    Var {
        /// Binding name.
        name: CompactString,
    },
    /// Unary operation.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Comparison of two values. A disclosure sink on both operands: the
    /// boolean outcome is observable through branching and proof failure.
    Comparison {
        /// Operator.
        op: CompareOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Call of another function in the same program, callee already resolved
    /// by the front-end.
    Call {
        /// Resolved callee.
        callee: FuncId,
        /// Argument expressions, in declaration order.
        args: Vec<Expr>,
    },
    /// Call that leaves the circuit boundary (oracle, host function). A
    /// disclosure sink on every argument; its result is considered public
    /// input from outside.
    ExternalCall {
        /// External symbol name.
        name: CompactString,
        /// Argument expressions.
        args: Vec<Expr>,
    },
    /// Field access on an aggregate. Whole-value conservatism: any field of
    /// a partly tainted aggregate reads as tainted.
    FieldAccess {
        /// Aggregate expression.
        base: Box<Expr>,
        /// Field name.
        field: CompactString,
    },
    /// Struct or enum literal.
    Construct {
        /// Constructed type name.
        type_name: CompactString,
        /// Field initializers.
        fields: Vec<(CompactString, Expr)>,
    },
    /// Value-level conditional.
    Conditional {
        /// Condition.
        cond: Box<Expr>,
        /// Value when true.
        then_value: Box<Expr>,
        /// Value when false.
        else_value: Box<Expr>,
    },
    /// Match over a scrutinee.
    Match {
        /// Matched value.
        scrutinee: Box<Expr>,
        /// Arms, in source order.
        arms: Vec<MatchArm>,
    },
    /// Explicit, intentional declassification. Unconditionally public.
    Disclose {
        /// The declassified value.
        value: Box<Expr>,
    },
    /// Cryptographic commitment. Unconditionally public; the front-end is
    /// responsible for having mixed in fresh randomness.
    Commit {
        /// The committed value.
        value: Box<Expr>,
    },
    /// Hash of a value. Public for propagation purposes, but advisory-only:
    /// hashing a small domain does not survive offline brute force.
    Hash {
        /// The hashed value.
        value: Box<Expr>,
    },
}
