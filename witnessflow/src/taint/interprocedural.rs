//! Interprocedural driver.
//!
//! Functions are analyzed callees-first so every call site sees a published
//! callee signature. The call graph's strongly connected components are
//! condensed and grouped into ready waves; independent components of one
//! wave are analyzed in parallel, and their signatures are published to the
//! shared table between waves (publish-once — no reader ever observes a
//! partial signature). Recursive cycles are seeded with the conservative
//! signature and iterated to a fixpoint bounded by cycle size times the
//! lattice height.

use super::propagation::{analyze_function, FunctionOutcome};
use super::signatures::{Signature, SignatureTable, SignatureView};
use crate::config::AnalysisConfig;
use crate::diagnostics::Diagnostic;
use crate::errors::EngineError;
use crate::ir::walk::{self, NodeRef};
use crate::ir::{ExprKind, FuncId, Function, NodeId, Program};
use crate::label::TaintLabel;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

/// Everything the driver produces; assembled into the public `Analysis` by
/// the analyzer.
pub(crate) struct DriverOutput {
    pub labels: FxHashMap<NodeId, TaintLabel>,
    pub diagnostics: Vec<Diagnostic>,
    pub signatures: SignatureTable,
}

/// Distinct callees of one function, validated against the program.
fn collect_callees(
    function: &Function,
    index: &FxHashMap<FuncId, &Function>,
) -> Result<Vec<FuncId>, EngineError> {
    let mut callees = Vec::new();
    let mut seen = FxHashSet::default();
    let mut error = None;
    walk::visit(&function.body, &mut |node| {
        if let NodeRef::Expr(expr) = node {
            if let ExprKind::Call { callee, .. } = &expr.kind {
                if !index.contains_key(callee) && error.is_none() {
                    error = Some(EngineError::UnknownFunction {
                        callee: *callee,
                        node: expr.id,
                    });
                }
                if seen.insert(*callee) {
                    callees.push(*callee);
                }
            }
        }
    });
    match error {
        Some(err) => Err(err),
        None => Ok(callees),
    }
}

/// Iterative Tarjan over the call graph. Emits strongly connected
/// components callees-first, which is exactly the analysis order.
fn condense(order: &[FuncId], edges: &FxHashMap<FuncId, Vec<FuncId>>) -> Vec<Vec<FuncId>> {
    #[derive(Default, Clone)]
    struct NodeState {
        index: Option<u32>,
        lowlink: u32,
        on_stack: bool,
    }

    let mut states: FxHashMap<FuncId, NodeState> = FxHashMap::default();
    let mut stack: Vec<FuncId> = Vec::new();
    let mut components: Vec<Vec<FuncId>> = Vec::new();
    let mut next_index = 0u32;

    // Explicit DFS frames: (node, next-edge cursor).
    let empty: Vec<FuncId> = Vec::new();
    for &root in order {
        if states.get(&root).is_some_and(|s| s.index.is_some()) {
            continue;
        }
        let mut frames: Vec<(FuncId, usize)> = vec![(root, 0)];
        while let Some(&mut (node, ref mut cursor)) = frames.last_mut() {
            if *cursor == 0 {
                let state = states.entry(node).or_default();
                state.index = Some(next_index);
                state.lowlink = next_index;
                state.on_stack = true;
                next_index += 1;
                stack.push(node);
            }
            let succs = edges.get(&node).unwrap_or(&empty);
            if let Some(&succ) = succs.get(*cursor) {
                *cursor += 1;
                let succ_state = states.entry(succ).or_default().clone();
                match succ_state.index {
                    None => frames.push((succ, 0)),
                    Some(succ_index) if succ_state.on_stack => {
                        let lowlink = states[&node].lowlink.min(succ_index);
                        if let Some(state) = states.get_mut(&node) {
                            state.lowlink = lowlink;
                        }
                    }
                    Some(_) => {}
                }
            } else {
                // Node finished: close its component if it is a root.
                let (index, lowlink) = {
                    let state = &states[&node];
                    (state.index.unwrap_or(0), state.lowlink)
                };
                frames.pop();
                if let Some(&mut (parent, _)) = frames.last_mut() {
                    let parent_lowlink = states[&parent].lowlink.min(lowlink);
                    if let Some(state) = states.get_mut(&parent) {
                        state.lowlink = parent_lowlink;
                    }
                }
                if lowlink == index {
                    let mut component = Vec::new();
                    while let Some(member) = stack.pop() {
                        if let Some(state) = states.get_mut(&member) {
                            state.on_stack = false;
                        }
                        component.push(member);
                        if member == node {
                            break;
                        }
                    }
                    component.sort_unstable();
                    components.push(component);
                }
            }
        }
    }
    components
}

/// Analyzes one condensed component against the published table.
fn analyze_component(
    program: &Program,
    index: &FxHashMap<FuncId, &Function>,
    edges: &FxHashMap<FuncId, Vec<FuncId>>,
    table: &SignatureTable,
    config: &AnalysisConfig,
    members: &[FuncId],
) -> Result<Vec<(FuncId, FunctionOutcome)>, EngineError> {
    let view = SignatureView::new(table);
    let self_recursive = members.len() == 1
        && edges
            .get(&members[0])
            .is_some_and(|succs| succs.contains(&members[0]));

    if members.len() == 1 && !self_recursive {
        let function = index[&members[0]];
        let outcome = analyze_function(program, &view, config, function)?;
        return Ok(vec![(members[0], outcome)]);
    }

    // Recursive cycle: seed every member with the most conservative
    // signature and iterate until the signatures stop changing. The final
    // (stable) pass supplies the outcomes, so labels and diagnostics are
    // consistent with the published signatures.
    let mut view = view;
    for &member in members {
        view.revise(member, Signature::conservative(index[&member].params.len()));
    }
    // Cycle size x lattice height, plus slack for the symbolic components.
    let max_rounds = members.len() * 2 + 2;
    for _ in 0..max_rounds {
        let mut changed = false;
        let mut outcomes = Vec::with_capacity(members.len());
        for &member in members {
            let outcome = analyze_function(program, &view, config, index[&member])?;
            if view.get(member) != Some(&outcome.signature) {
                changed = true;
                view.revise(member, outcome.signature.clone());
            }
            outcomes.push((member, outcome));
        }
        if !changed {
            return Ok(outcomes);
        }
    }

    // The bound only trips if a signature oscillates; fall back to the
    // conservative seeds and take the outcomes they induce.
    for &member in members {
        view.revise(member, Signature::conservative(index[&member].params.len()));
    }
    let mut outcomes = Vec::with_capacity(members.len());
    for &member in members {
        let outcome = analyze_function(program, &view, config, index[&member])?;
        outcomes.push((member, outcome));
    }
    Ok(outcomes)
}

/// Runs the whole-program analysis.
pub(crate) fn run(program: &Program, config: &AnalysisConfig) -> Result<DriverOutput, EngineError> {
    let index = program.function_index();

    let mut edges: FxHashMap<FuncId, Vec<FuncId>> = FxHashMap::default();
    for function in &program.functions {
        edges.insert(function.id, collect_callees(function, &index)?);
    }

    let order: Vec<FuncId> = program.functions.iter().map(|f| f.id).collect();
    let components = condense(&order, &edges);

    // Ready waves: a component's wave is one past the deepest callee wave.
    // Components arrive callees-first, so one pass suffices.
    let mut component_of: FxHashMap<FuncId, usize> = FxHashMap::default();
    for (slot, members) in components.iter().enumerate() {
        for &member in members {
            component_of.insert(member, slot);
        }
    }
    let mut wave_of: Vec<usize> = vec![0; components.len()];
    for (slot, members) in components.iter().enumerate() {
        let mut wave = 0;
        for member in members {
            for callee in edges.get(member).into_iter().flatten() {
                let callee_slot = component_of[callee];
                if callee_slot != slot {
                    wave = wave.max(wave_of[callee_slot] + 1);
                }
            }
        }
        wave_of[slot] = wave;
    }
    let wave_count = wave_of.iter().copied().max().map_or(0, |w| w + 1);
    let mut waves: Vec<Vec<usize>> = vec![Vec::new(); wave_count];
    for (slot, &wave) in wave_of.iter().enumerate() {
        waves[wave].push(slot);
    }

    let mut table = SignatureTable::new();
    let mut labels: FxHashMap<NodeId, TaintLabel> = FxHashMap::default();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    for wave in waves {
        let results: Vec<Result<Vec<(FuncId, FunctionOutcome)>, EngineError>> =
            if config.parallel && wave.len() > 1 {
                wave.par_iter()
                    .map(|&slot| {
                        analyze_component(
                            program,
                            &index,
                            &edges,
                            &table,
                            config,
                            &components[slot],
                        )
                    })
                    .collect()
            } else {
                wave.iter()
                    .map(|&slot| {
                        analyze_component(
                            program,
                            &index,
                            &edges,
                            &table,
                            config,
                            &components[slot],
                        )
                    })
                    .collect()
            };

        for result in results {
            for (func, outcome) in result? {
                table.publish(func, outcome.signature);
                labels.extend(outcome.labels);
                diagnostics.extend(outcome.diagnostics);
            }
        }
    }

    Ok(DriverOutput {
        labels,
        diagnostics,
        signatures: table,
    })
}
