//! Read-only traversal over a function body.

use super::expr::{Expr, ExprKind};
use super::stmt::{Stmt, StmtKind};

/// A statement or expression node, for callers that care about both.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    /// A statement node.
    Stmt(&'a Stmt),
    /// An expression node.
    Expr(&'a Expr),
}

/// Visits every statement and expression of `body`, depth first, in source
/// order.
pub fn visit<'a>(body: &'a [Stmt], visit: &mut impl FnMut(NodeRef<'a>)) {
    for stmt in body {
        visit_stmt(stmt, visit);
    }
}

fn visit_stmt<'a>(stmt: &'a Stmt, visit: &mut impl FnMut(NodeRef<'a>)) {
    visit(NodeRef::Stmt(stmt));
    match &stmt.kind {
        StmtKind::Let { value, .. }
        | StmtKind::Assign { value, .. }
        | StmtKind::Expr(value)
        | StmtKind::LedgerWrite { value, .. } => visit_expr(value, visit),
        StmtKind::If {
            cond,
            then_body,
            else_body,
        } => {
            visit_expr(cond, visit);
            for nested in then_body {
                visit_stmt(nested, visit);
            }
            for nested in else_body {
                visit_stmt(nested, visit);
            }
        }
        StmtKind::Loop { body } => {
            for nested in body {
                visit_stmt(nested, visit);
            }
        }
        StmtKind::Return { value } => {
            if let Some(value) = value {
                visit_expr(value, visit);
            }
        }
        StmtKind::Assert { cond, .. } => visit_expr(cond, visit),
    }
}

fn visit_expr<'a>(expr: &'a Expr, visit: &mut impl FnMut(NodeRef<'a>)) {
    visit(NodeRef::Expr(expr));
    match &expr.kind {
        ExprKind::Literal(_) | ExprKind::WitnessRead { .. } | ExprKind::Var { .. } => {}
        ExprKind::Unary { operand, .. } => visit_expr(operand, visit),
        ExprKind::Binary { lhs, rhs, .. } | ExprKind::Comparison { lhs, rhs, .. } => {
            visit_expr(lhs, visit);
            visit_expr(rhs, visit);
        }
        ExprKind::Call { args, .. } | ExprKind::ExternalCall { args, .. } => {
            for arg in args {
                visit_expr(arg, visit);
            }
        }
        ExprKind::FieldAccess { base, .. } => visit_expr(base, visit),
        ExprKind::Construct { fields, .. } => {
            for (_, value) in fields {
                visit_expr(value, visit);
            }
        }
        ExprKind::Conditional {
            cond,
            then_value,
            else_value,
        } => {
            visit_expr(cond, visit);
            visit_expr(then_value, visit);
            visit_expr(else_value, visit);
        }
        ExprKind::Match { scrutinee, arms } => {
            visit_expr(scrutinee, visit);
            for arm in arms {
                visit_expr(&arm.body, visit);
            }
        }
        ExprKind::Disclose { value } | ExprKind::Commit { value } | ExprKind::Hash { value } => {
            visit_expr(value, visit);
        }
    }
}
