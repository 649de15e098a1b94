//! Diagnostics: severities, rendering, and the collecting reporter.
//!
//! Violations and advisories accumulate without short-circuiting so a single
//! pass surfaces every problem; internal contract failures are a separate,
//! aborting path ([`crate::errors::EngineError`]) but can be rendered
//! uniformly via [`Diagnostic::internal`].

use crate::errors::EngineError;
use crate::ir::NodeId;
use colored::Colorize;
use rustc_hash::FxHashSet;
use serde::Serialize;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning only; never blocks compilation.
    Advisory,
    /// Compile error; compilation must fail, analysis continues.
    Violation,
    /// Upstream contract breach; aborts the compilation unit.
    Internal,
}

/// A single finding with its source location and remediation hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity class.
    pub severity: Severity,
    /// Stable rule id (e.g. `witness-comparison`).
    pub code: &'static str,
    /// Offending node.
    pub node: NodeId,
    /// 1-indexed source line.
    pub line: u32,
    /// Human message.
    pub message: String,
    /// Optional suggested fix (e.g. a declassification site).
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// A blocking violation.
    #[must_use]
    pub fn violation(
        code: &'static str,
        node: NodeId,
        line: u32,
        message: String,
        suggestion: Option<String>,
    ) -> Self {
        Self {
            severity: Severity::Violation,
            code,
            node,
            line,
            message,
            suggestion,
        }
    }

    /// A non-blocking advisory.
    #[must_use]
    pub fn advisory(code: &'static str, node: NodeId, line: u32, message: String) -> Self {
        Self {
            severity: Severity::Advisory,
            code,
            node,
            line,
            message,
            suggestion: None,
        }
    }

    /// Renders an aborting engine error in the same format as collected
    /// diagnostics, for drivers that want uniform output.
    #[must_use]
    pub fn internal(error: &EngineError) -> Self {
        Self {
            severity: Severity::Internal,
            code: "internal",
            node: NodeId(0),
            line: 0,
            message: error.to_string(),
            suggestion: None,
        }
    }

    /// Terminal rendering, colorized in the usual compiler style.
    #[must_use]
    pub fn render(&self) -> String {
        let tag = match self.severity {
            Severity::Advisory => "advisory".yellow().bold(),
            Severity::Violation => "error".red().bold(),
            Severity::Internal => "internal error".red().bold(),
        };
        let mut out = format!("{tag}[{}]: {} (line {})", self.code, self.message, self.line);
        if let Some(suggestion) = &self.suggestion {
            out.push_str(&format!("\n  {} {}", "help:".cyan(), suggestion));
        }
        out
    }
}

/// Collects diagnostics for one pass: deduplicates per (node, rule) so loop
/// fixpoints and repeated sink visits report once, and sorts into source
/// order for deterministic output.
#[derive(Debug, Default)]
pub struct Reporter {
    seen: FxHashSet<(NodeId, &'static str)>,
    items: Vec<Diagnostic>,
}

impl Reporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic unless the same rule already fired at the node.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if self.seen.insert((diagnostic.node, diagnostic.code)) {
            self.items.push(diagnostic);
        }
    }

    /// True if any violation has been recorded.
    #[must_use]
    pub fn has_violations(&self) -> bool {
        self.items
            .iter()
            .any(|d| d.severity == Severity::Violation)
    }

    /// Finishes the pass: diagnostics in source order (line, then node).
    #[must_use]
    pub fn into_sorted(mut self) -> Vec<Diagnostic> {
        self.items
            .sort_by_key(|d| (d.line, d.node, d.severity));
        self.items
    }
}

/// Sorts merged per-function diagnostics into source order.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|d| (d.line, d.node, d.severity));
}

#[cfg(test)]
mod tests {
    use super::{Diagnostic, Reporter, Severity};
    use crate::ir::NodeId;

    #[test]
    fn reporter_dedups_per_node_and_rule() {
        let mut reporter = Reporter::new();
        let d = Diagnostic::violation("witness-comparison", NodeId(4), 2, "x".to_owned(), None);
        reporter.push(d.clone());
        reporter.push(d);
        reporter.push(Diagnostic::advisory(
            "low-entropy-hash",
            NodeId(4),
            2,
            "y".to_owned(),
        ));
        let items = reporter.into_sorted();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn sorted_output_is_source_ordered() {
        let mut reporter = Reporter::new();
        reporter.push(Diagnostic::advisory("low-entropy-hash", NodeId(9), 8, String::new()));
        reporter.push(Diagnostic::violation(
            "undisclosed-return",
            NodeId(3),
            2,
            String::new(),
            None,
        ));
        let items = reporter.into_sorted();
        assert_eq!(items[0].line, 2);
        assert_eq!(items[0].severity, Severity::Violation);
    }
}
