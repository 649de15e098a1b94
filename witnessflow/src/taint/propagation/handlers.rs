//! Statement execution.

use super::entry::FunctionPass;
use crate::errors::EngineError;
use crate::ir::{FunctionKind, Stmt, StmtKind};
use crate::taint::flow::FlowSet;
use crate::taint::sinks::SinkKind;

impl FunctionPass<'_> {
    /// Executes a straight-line block in order.
    pub(super) fn exec_block(&mut self, stmts: &[Stmt]) -> Result<(), EngineError> {
        for stmt in stmts {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), EngineError> {
        match &stmt.kind {
            StmtKind::Let { name, value } => {
                let flow = self.eval(value)?.joined(&self.control_context());
                self.state.declare(name.clone(), flow);
            }
            StmtKind::Assign { name, value } => {
                let flow = self.eval(value)?.joined(&self.control_context());
                self.state.assign(name, stmt.id, flow)?;
            }
            StmtKind::Expr(value) => {
                self.eval(value)?;
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                let cond_flow = self.eval(cond)?;
                self.control.push(cond_flow);

                let base = self.state.clone();
                self.state.push_scope();
                self.exec_block(then_body)?;
                self.state.pop_scope();

                let then_state = std::mem::replace(&mut self.state, base);
                self.state.push_scope();
                self.exec_block(else_body)?;
                self.state.pop_scope();

                self.state.merge(&then_state);
                self.control.pop();
            }
            StmtKind::Loop { body } => {
                // Fixpoint over the loop-carried bindings: run the body,
                // join the exit state back in, repeat until stable. The
                // flow sets only grow, so this terminates quickly.
                loop {
                    let before = self.state.clone();
                    self.state.push_scope();
                    self.exec_block(body)?;
                    self.state.pop_scope();
                    self.state.merge(&before);
                    if self.state == before {
                        break;
                    }
                }
            }
            StmtKind::Return { value } => {
                let flow = match value {
                    Some(expr) => self.eval(expr)?,
                    None => FlowSet::pure(),
                }
                .joined(&self.control_context());
                match self.current.kind {
                    FunctionKind::Circuit => {
                        self.check_sink(SinkKind::Return, stmt.id, stmt.span, &flow);
                    }
                    FunctionKind::Helper => {
                        self.return_flow.join(&flow);
                    }
                }
            }
            StmtKind::Assert { cond, .. } => {
                // A comparison condition has already checked itself and
                // reads as public here; anything else tainted is a leak
                // through proof success/failure.
                let flow = self.eval(cond)?.joined(&self.control_context());
                self.check_sink(SinkKind::Assert, stmt.id, stmt.span, &flow);
            }
            StmtKind::LedgerWrite { value, .. } => {
                let flow = self.eval(value)?.joined(&self.control_context());
                self.check_sink(SinkKind::LedgerWrite, stmt.id, stmt.span, &flow);
            }
        }
        Ok(())
    }
}
