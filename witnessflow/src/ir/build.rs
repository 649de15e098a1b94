//! Programmatic IR construction.
//!
//! Front-ends (and this crate's own tests) assemble programs through
//! [`ProgramBuilder`], which mints unique node ids and keeps call targets
//! resolved. Functions are declared first (reserving a [`FuncId`]) and
//! defined later, so mutually recursive call graphs can be expressed.

use super::expr::{
    BinaryOp, CompareOp, Expr, ExprKind, Literal, MatchArm, NodeId, Span, UnaryOp,
};
use super::program::{FuncId, Function, FunctionKind, Param, Program, WitnessDecl};
use super::stmt::{Stmt, StmtKind};
use super::types::TypeInfo;
use compact_str::CompactString;

/// Builder for a whole [`Program`].
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    next_node: u32,
    next_func: u32,
    line: u32,
    witnesses: Vec<WitnessDecl>,
    functions: Vec<Function>,
}

/// An untyped parameter.
#[must_use]
pub fn param(name: &str) -> Param {
    Param {
        name: CompactString::from(name),
        ty: None,
    }
}

/// A parameter with a declared type.
#[must_use]
pub fn typed_param(name: &str, ty: TypeInfo) -> Param {
    Param {
        name: CompactString::from(name),
        ty: Some(ty),
    }
}

impl ProgramBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source line stamped onto subsequently built nodes.
    pub fn line(&mut self, line: u32) -> &mut Self {
        self.line = line;
        self
    }

    /// Declares a private witness.
    pub fn witness(&mut self, name: &str, ty: TypeInfo) -> &mut Self {
        self.witnesses.push(WitnessDecl {
            name: CompactString::from(name),
            ty,
        });
        self
    }

    /// Reserves a function id; the body is supplied later via
    /// [`ProgramBuilder::define`].
    pub fn declare(&mut self, name: &str, kind: FunctionKind) -> FuncId {
        let id = FuncId(self.next_func);
        self.next_func += 1;
        self.functions.push(Function {
            id,
            name: CompactString::from(name),
            kind,
            params: Vec::new(),
            body: Vec::new(),
        });
        id
    }

    /// Supplies parameters and body for a previously declared function.
    pub fn define(&mut self, id: FuncId, params: Vec<Param>, body: Vec<Stmt>) {
        if let Some(func) = self.functions.iter_mut().find(|f| f.id == id) {
            func.params = params;
            func.body = body;
        }
    }

    /// Finishes the program.
    #[must_use]
    pub fn finish(self) -> Program {
        Program {
            witnesses: self.witnesses,
            functions: self.functions,
        }
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            column: 0,
        }
    }

    fn node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    fn expr(&mut self, kind: ExprKind) -> Expr {
        Expr {
            id: self.node(),
            span: self.span(),
            ty: None,
            kind,
        }
    }

    fn stmt(&mut self, kind: StmtKind) -> Stmt {
        Stmt {
            id: self.node(),
            span: self.span(),
            kind,
        }
    }

    // -- expressions ------------------------------------------------------

    /// Numeric literal.
    pub fn lit(&mut self, value: i128) -> Expr {
        self.expr(ExprKind::Literal(Literal::Num(value)))
    }

    /// Boolean literal.
    pub fn lit_bool(&mut self, value: bool) -> Expr {
        self.expr(ExprKind::Literal(Literal::Bool(value)))
    }

    /// Read of a declared witness.
    pub fn witness_read(&mut self, witness: &str) -> Expr {
        self.expr(ExprKind::WitnessRead {
            witness: CompactString::from(witness),
        })
    }

    /// Read of a local binding.
    pub fn var(&mut self, name: &str) -> Expr {
        self.expr(ExprKind::Var {
            name: CompactString::from(name),
        })
    }

    /// Unary operation.
    pub fn unary(&mut self, op: UnaryOp, operand: Expr) -> Expr {
        self.expr(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// Binary operation.
    pub fn binary(&mut self, op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        self.expr(ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// Comparison.
    pub fn cmp(&mut self, op: CompareOp, lhs: Expr, rhs: Expr) -> Expr {
        self.expr(ExprKind::Comparison {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// Call of a declared function.
    pub fn call(&mut self, callee: FuncId, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Call { callee, args })
    }

    /// Call across the circuit boundary.
    pub fn external_call(&mut self, name: &str, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::ExternalCall {
            name: CompactString::from(name),
            args,
        })
    }

    /// Field access.
    pub fn field(&mut self, base: Expr, field: &str) -> Expr {
        self.expr(ExprKind::FieldAccess {
            base: Box::new(base),
            field: CompactString::from(field),
        })
    }

    /// Struct or enum literal.
    pub fn construct(&mut self, type_name: &str, fields: Vec<(&str, Expr)>) -> Expr {
        self.expr(ExprKind::Construct {
            type_name: CompactString::from(type_name),
            fields: fields
                .into_iter()
                .map(|(name, value)| (CompactString::from(name), value))
                .collect(),
        })
    }

    /// Value-level conditional.
    pub fn conditional(&mut self, cond: Expr, then_value: Expr, else_value: Expr) -> Expr {
        self.expr(ExprKind::Conditional {
            cond: Box::new(cond),
            then_value: Box::new(then_value),
            else_value: Box::new(else_value),
        })
    }

    /// Match expression.
    pub fn match_(&mut self, scrutinee: Expr, arms: Vec<MatchArm>) -> Expr {
        self.expr(ExprKind::Match {
            scrutinee: Box::new(scrutinee),
            arms,
        })
    }

    /// One match arm.
    #[must_use]
    pub fn arm(&self, bindings: &[&str], body: Expr) -> MatchArm {
        MatchArm {
            bindings: bindings.iter().map(|b| CompactString::from(*b)).collect(),
            body,
        }
    }

    /// Explicit declassification.
    pub fn disclose(&mut self, value: Expr) -> Expr {
        self.expr(ExprKind::Disclose {
            value: Box::new(value),
        })
    }

    /// Cryptographic commitment.
    pub fn commit(&mut self, value: Expr) -> Expr {
        self.expr(ExprKind::Commit {
            value: Box::new(value),
        })
    }

    /// Hash.
    pub fn hash(&mut self, value: Expr) -> Expr {
        self.expr(ExprKind::Hash {
            value: Box::new(value),
        })
    }

    /// Attaches a declared type to an expression.
    #[must_use]
    pub fn typed(&self, mut expr: Expr, ty: TypeInfo) -> Expr {
        expr.ty = Some(ty);
        expr
    }

    // -- statements -------------------------------------------------------

    /// `let name = value;`
    pub fn let_(&mut self, name: &str, value: Expr) -> Stmt {
        self.stmt(StmtKind::Let {
            name: CompactString::from(name),
            value,
        })
    }

    /// `name = value;`
    pub fn assign(&mut self, name: &str, value: Expr) -> Stmt {
        self.stmt(StmtKind::Assign {
            name: CompactString::from(name),
            value,
        })
    }

    /// Expression statement.
    pub fn expr_stmt(&mut self, value: Expr) -> Stmt {
        self.stmt(StmtKind::Expr(value))
    }

    /// Two-way branch.
    pub fn if_(&mut self, cond: Expr, then_body: Vec<Stmt>, else_body: Vec<Stmt>) -> Stmt {
        self.stmt(StmtKind::If {
            cond,
            then_body,
            else_body,
        })
    }

    /// Bounded loop.
    pub fn loop_(&mut self, body: Vec<Stmt>) -> Stmt {
        self.stmt(StmtKind::Loop { body })
    }

    /// Return statement.
    pub fn ret(&mut self, value: Option<Expr>) -> Stmt {
        self.stmt(StmtKind::Return { value })
    }

    /// Assertion.
    pub fn assert_(&mut self, cond: Expr) -> Stmt {
        self.stmt(StmtKind::Assert {
            cond,
            message: None,
        })
    }

    /// Ledger write.
    pub fn ledger_write(&mut self, field: &str, value: Expr) -> Stmt {
        self.stmt(StmtKind::LedgerWrite {
            field: CompactString::from(field),
            value,
        })
    }
}
