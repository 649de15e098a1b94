//! Analysis entry point and outputs.

use super::interprocedural;
use super::signatures::SignatureTable;
use crate::config::AnalysisConfig;
use crate::diagnostics::{self, Diagnostic, Severity};
use crate::errors::EngineError;
use crate::ir::walk::{self, NodeRef};
use crate::ir::{NodeId, Program};
use crate::label::TaintLabel;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

/// The disclosure analyzer.
pub struct Analyzer {
    /// Configuration for this run.
    pub config: AnalysisConfig,
}

impl Analyzer {
    /// Creates an analyzer with the given configuration.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Analyzes a whole program.
    ///
    /// Violations and advisories are collected in the returned
    /// [`Analysis`]; an `Err` means the IR broke its contract and the
    /// compilation unit must be aborted.
    pub fn analyze(&self, program: &Program) -> Result<Analysis, EngineError> {
        validate_node_ids(program)?;
        let output = interprocedural::run(program, &self.config)?;
        let mut diagnostics = output.diagnostics;
        diagnostics::sort_diagnostics(&mut diagnostics);
        Ok(Analysis {
            labels: NodeLabels(output.labels),
            diagnostics,
            signatures: output.signatures,
        })
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

/// Labels are keyed by node id, so ids must be unique program-wide.
fn validate_node_ids(program: &Program) -> Result<(), EngineError> {
    let mut seen: FxHashSet<NodeId> = FxHashSet::default();
    let mut duplicate = None;
    for function in &program.functions {
        walk::visit(&function.body, &mut |node| {
            let id = match node {
                NodeRef::Stmt(stmt) => stmt.id,
                NodeRef::Expr(expr) => expr.id,
            };
            if !seen.insert(id) && duplicate.is_none() {
                duplicate = Some(id);
            }
        });
    }
    match duplicate {
        Some(node) => Err(EngineError::DuplicateNode { node }),
        None => Ok(()),
    }
}

/// The per-node label map (Output 1): a parallel map keyed by node id,
/// consumed by downstream phases that pick representations per label.
#[derive(Debug, Clone, Default)]
pub struct NodeLabels(FxHashMap<NodeId, TaintLabel>);

impl NodeLabels {
    /// Label of a node, if it was analyzed.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<TaintLabel> {
        self.0.get(&node).copied()
    }

    /// True if the node was analyzed and labeled tainted.
    #[must_use]
    pub fn is_tainted(&self, node: NodeId) -> bool {
        self.get(node) == Some(TaintLabel::Tainted)
    }

    /// Number of labeled nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no nodes were labeled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deterministic (id-ordered) view for serialization.
    #[must_use]
    pub fn export(&self) -> Vec<(NodeId, TaintLabel)> {
        let mut entries: Vec<(NodeId, TaintLabel)> =
            self.0.iter().map(|(id, label)| (*id, *label)).collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
    }
}

impl Serialize for NodeLabels {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.export().serialize(serializer)
    }
}

/// Everything one run produces.
#[derive(Debug)]
pub struct Analysis {
    /// Per-node taint labels.
    pub labels: NodeLabels,
    /// All findings, in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// Per-function taint signatures.
    pub signatures: SignatureTable,
}

impl Analysis {
    /// Exit contract with the surrounding compiler: false iff any
    /// violation is present (advisories never block).
    #[must_use]
    pub fn passed(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Violation)
    }

    /// The blocking findings.
    pub fn violations(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Violation)
    }

    /// The non-blocking findings.
    pub fn advisories(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Advisory)
    }

    /// Renders every finding for terminal output.
    #[must_use]
    pub fn render_diagnostics(&self) -> String {
        self.diagnostics
            .iter()
            .map(Diagnostic::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Serializes diagnostics and signatures for editor tooling.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        #[derive(Serialize)]
        struct Export<'a> {
            passed: bool,
            diagnostics: &'a [Diagnostic],
            signatures: Vec<crate::taint::signatures::SignatureEntry<'a>>,
            labels: &'a NodeLabels,
        }
        serde_json::to_string_pretty(&Export {
            passed: self.passed(),
            diagnostics: &self.diagnostics,
            signatures: self.signatures.export(),
            labels: &self.labels,
        })
    }
}
