//! The circuit IR this engine consumes.
//!
//! The IR is produced by an external front-end: a tree of expression and
//! statement nodes with declared types, witness-declaration markers and
//! resolved call targets. The engine assumes it is well-scoped and
//! well-typed and does not re-validate syntax; contract breaches surface as
//! [`crate::errors::EngineError`].

pub mod build;
pub mod expr;
pub mod program;
pub mod stmt;
pub mod types;
pub mod walk;

pub use build::ProgramBuilder;
pub use expr::{BinaryOp, CompareOp, Expr, ExprKind, Literal, MatchArm, NodeId, Span, UnaryOp};
pub use program::{FuncId, Function, FunctionKind, Param, Program, WitnessDecl};
pub use stmt::{Stmt, StmtKind};
pub use types::TypeInfo;
