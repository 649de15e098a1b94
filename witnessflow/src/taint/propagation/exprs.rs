//! Expression evaluation: one flow set per node.
//!
//! Every rule is monotone under join; only the declassification operators
//! (`disclose`, `commit`, `hash`) lower a label, and comparisons yield a
//! public boolean because their sink check has already accounted for the
//! leak.

use super::entry::FunctionPass;
use crate::errors::EngineError;
use crate::ir::{Expr, ExprKind, FuncId};
use crate::taint::declass;
use crate::taint::flow::FlowSet;
use crate::taint::signatures::SinkObligation;
use crate::taint::sinks::{self, SinkKind};

impl FunctionPass<'_> {
    /// Evaluates an expression, records its label, and returns its flow.
    pub(super) fn eval(&mut self, expr: &Expr) -> Result<FlowSet, EngineError> {
        let flow = match &expr.kind {
            ExprKind::Literal(_) => FlowSet::pure(),

            ExprKind::WitnessRead { witness } => {
                if self.program.witness(witness).is_none() {
                    return Err(EngineError::UnknownWitness {
                        name: witness.to_string(),
                        node: expr.id,
                    });
                }
                FlowSet::from_witness(witness.clone(), expr.id, expr.span.line)
            }

            ExprKind::Var { name } => self.state.lookup(name, expr.id)?.clone(),

            ExprKind::Unary { operand, .. } => self.eval(operand)?,

            ExprKind::Binary { lhs, rhs, .. } => {
                let left = self.eval(lhs)?;
                let right = self.eval(rhs)?;
                left.joined(&right)
            }

            ExprKind::Comparison { lhs, rhs, .. } => {
                let left = self.eval(lhs)?;
                let right = self.eval(rhs)?;
                let operands = left
                    .joined(&right)
                    .joined(&self.control_context());
                self.check_sink(SinkKind::Comparison, expr.id, expr.span, &operands);
                // Post-check the boolean is treated as declassified, so one
                // root cause does not cascade into the enclosing branch.
                FlowSet::pure()
            }

            ExprKind::Call { callee, args } => self.eval_call(expr, *callee, args)?,

            ExprKind::ExternalCall { args, .. } => {
                let mut carried = FlowSet::pure();
                for arg in args {
                    let flow = self.eval(arg)?;
                    carried.join(&flow);
                }
                let checked = carried.joined(&self.control_context());
                self.check_sink(SinkKind::ExternalCall, expr.id, expr.span, &checked);
                // Whatever comes back crossed the boundary in public form.
                FlowSet::pure()
            }

            // Whole-value conservatism: any field of a partly tainted
            // aggregate reads as tainted.
            ExprKind::FieldAccess { base, .. } => self.eval(base)?,

            ExprKind::Construct { fields, .. } => {
                let mut flow = FlowSet::pure();
                for (_, value) in fields {
                    let field_flow = self.eval(value)?;
                    flow.join(&field_flow);
                }
                flow
            }

            ExprKind::Conditional {
                cond,
                then_value,
                else_value,
            } => {
                let cond_flow = self.eval(cond)?;
                self.control.push(cond_flow.clone());
                let then_flow = self.eval(then_value)?;
                let else_flow = self.eval(else_value)?;
                self.control.pop();
                // Branch selection leaks the condition, so its flow joins
                // the result even when both branch values are public.
                cond_flow.joined(&then_flow).joined(&else_flow)
            }

            ExprKind::Match { scrutinee, arms } => {
                let scrutinee_flow = self.eval(scrutinee)?;
                let mut result = scrutinee_flow.clone();
                self.control.push(scrutinee_flow.clone());
                for arm in arms {
                    self.state.push_scope();
                    for binding in &arm.bindings {
                        self.state.declare(binding.clone(), scrutinee_flow.clone());
                    }
                    let arm_flow = self.eval(&arm.body)?;
                    self.state.pop_scope();
                    result.join(&arm_flow);
                }
                self.control.pop();
                result
            }

            ExprKind::Disclose { value } | ExprKind::Commit { value } => {
                // Strong declassification: evaluate the operand for its own
                // labels and inner sinks, then reset unconditionally.
                self.eval(value)?;
                FlowSet::pure()
            }

            ExprKind::Hash { value } => {
                let inner = self.eval(value)?;
                if let Some(advisory) = declass::hash_advisory(
                    self.config,
                    self.program,
                    expr.id,
                    expr.span.line,
                    value,
                    &inner,
                ) {
                    self.reporter.push(advisory);
                }
                FlowSet::pure()
            }
        };

        self.labels.insert(expr.id, flow.label());
        Ok(flow)
    }

    /// Call of another function: validates the callee's sink obligations
    /// against the concrete argument flows, then applies its signature.
    fn eval_call(
        &mut self,
        expr: &Expr,
        callee: FuncId,
        args: &[Expr],
    ) -> Result<FlowSet, EngineError> {
        let mut arg_flows = Vec::with_capacity(args.len());
        for arg in args {
            arg_flows.push(self.eval(arg)?);
        }

        let signatures = self.signatures;
        let Some(signature) = signatures.get(callee) else {
            return Err(EngineError::UnknownFunction {
                callee,
                node: expr.id,
            });
        };
        let callee_name = self
            .program
            .function(callee)
            .map_or("<unknown>", |f| f.name.as_str());

        let control = self.control_context();
        for obligation in &signature.obligations {
            let Some(arg_flow) = arg_flows.get(obligation.param) else {
                continue;
            };
            let checked = arg_flow.clone().joined(&control);
            if checked.label().is_tainted() {
                self.reporter.push(sinks::call_site_violation(
                    obligation,
                    callee_name,
                    expr.id,
                    expr.span,
                    &checked,
                ));
            }
            // An argument that depends on our own parameters turns the
            // callee's obligation into one of ours.
            for param in checked.params.iter() {
                self.obligations.push(SinkObligation {
                    param,
                    sink: obligation.sink,
                    within: obligation.within.clone(),
                    node: obligation.node,
                    line: obligation.line,
                });
            }
        }

        Ok(signature.apply(&arg_flows))
    }
}
