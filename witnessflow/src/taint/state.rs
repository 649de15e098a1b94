//! Scoped binding table for one function pass.
//!
//! Tracks the flow set of every live binding. Scopes nest with blocks:
//! a binding declared inside a branch or loop body is dropped when its
//! scope is popped. Branch merging joins the two resulting states.

use super::flow::FlowSet;
use crate::errors::EngineError;
use crate::ir::NodeId;
use compact_str::CompactString;
use rustc_hash::FxHashMap;

/// The binding table: a stack of scopes, innermost last.
#[derive(Debug, Clone, PartialEq)]
pub struct TaintState {
    scopes: Vec<FxHashMap<CompactString, FlowSet>>,
}

impl TaintState {
    /// Creates a state with a single (function-body) scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![FxHashMap::default()],
        }
    }

    /// Opens a nested scope.
    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Closes the innermost scope, dropping its bindings.
    pub fn pop_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1, "cannot pop the function scope");
        self.scopes.pop();
    }

    /// Introduces a binding in the innermost scope.
    pub fn declare(&mut self, name: CompactString, flow: FlowSet) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, flow);
        }
    }

    /// Overwrites an existing binding, innermost scope first.
    ///
    /// The IR is documented as well-scoped; an unbound name here is an
    /// upstream contract breach, not a user error.
    pub fn assign(
        &mut self,
        name: &str,
        node: NodeId,
        flow: FlowSet,
    ) -> Result<(), EngineError> {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = flow;
                return Ok(());
            }
        }
        Err(EngineError::UnboundIdentifier {
            name: name.to_owned(),
            node,
        })
    }

    /// Resolves a binding, innermost scope first.
    pub fn lookup(&self, name: &str, node: NodeId) -> Result<&FlowSet, EngineError> {
        for scope in self.scopes.iter().rev() {
            if let Some(flow) = scope.get(name) {
                return Ok(flow);
            }
        }
        Err(EngineError::UnboundIdentifier {
            name: name.to_owned(),
            node,
        })
    }

    /// Joins another state into this one, scope by scope.
    ///
    /// Both states must descend from a common base (branch analysis clones
    /// the state before each arm), so the scope stacks line up. A name
    /// present on only one side keeps that side's flow.
    pub fn merge(&mut self, other: &Self) {
        for (scope, other_scope) in self.scopes.iter_mut().zip(&other.scopes) {
            for (name, other_flow) in other_scope {
                match scope.get_mut(name) {
                    Some(flow) => flow.join(other_flow),
                    None => {
                        scope.insert(name.clone(), other_flow.clone());
                    }
                }
            }
        }
    }
}

impl Default for TaintState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::TaintState;
    use crate::errors::EngineError;
    use crate::ir::NodeId;
    use crate::label::TaintLabel;
    use crate::taint::flow::FlowSet;

    #[test]
    fn scoped_bindings_drop_at_exit() {
        let mut state = TaintState::new();
        state.declare("x".into(), FlowSet::pure());
        state.push_scope();
        state.declare("y".into(), FlowSet::opaque());
        assert!(state.lookup("y", NodeId(0)).is_ok());
        state.pop_scope();
        assert!(matches!(
            state.lookup("y", NodeId(0)),
            Err(EngineError::UnboundIdentifier { .. })
        ));
        assert!(state.lookup("x", NodeId(0)).is_ok());
    }

    #[test]
    fn assign_requires_live_binding() {
        let mut state = TaintState::new();
        assert!(state
            .assign("ghost", NodeId(7), FlowSet::pure())
            .is_err());
        state.declare("x".into(), FlowSet::pure());
        assert!(state.assign("x", NodeId(8), FlowSet::opaque()).is_ok());
        assert_eq!(
            state.lookup("x", NodeId(9)).map(FlowSet::label),
            Ok(TaintLabel::Tainted)
        );
    }

    #[test]
    fn merge_joins_branch_states() {
        let mut base = TaintState::new();
        base.declare("x".into(), FlowSet::pure());
        let mut then_state = base.clone();
        then_state
            .assign("x", NodeId(1), FlowSet::opaque())
            .unwrap();
        base.merge(&then_state);
        assert_eq!(
            base.lookup("x", NodeId(2)).map(FlowSet::label),
            Ok(TaintLabel::Tainted)
        );
    }
}
