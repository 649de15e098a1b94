//! Declassification operators: strong resets are silent, weak (hash)
//! resets draw entropy advisories.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use witnessflow::ir::{FunctionKind, ProgramBuilder, TypeInfo};
use witnessflow::{AnalysisConfig, Analyzer, Severity, TaintLabel};

fn analyzer() -> Analyzer {
    Analyzer::new(AnalysisConfig::sequential())
}

#[test]
fn test_disclosed_witness_return_is_clean() {
    // let x = disclose(witness_read(w)); return x;
    let mut b = ProgramBuilder::new();
    b.witness("w", TypeInfo::Field);
    let main = b.declare("main", FunctionKind::Circuit);
    let read = b.witness_read("w");
    let disclosed = b.disclose(read);
    let let_x = b.let_("x", disclosed.clone());
    let x = b.var("x");
    let ret = b.ret(Some(x));
    b.define(main, vec![], vec![let_x, ret]);

    let analysis = analyzer().analyze(&b.finish()).unwrap();
    assert!(analysis.passed());
    assert!(analysis.diagnostics.is_empty());
    assert_eq!(analysis.labels.get(disclosed.id), Some(TaintLabel::Public));
}

#[test]
fn test_commitment_return_is_clean() {
    // let c = commit(witness_read(w)); return c;
    let mut b = ProgramBuilder::new();
    b.witness("w", TypeInfo::Field);
    let main = b.declare("main", FunctionKind::Circuit);
    let read = b.witness_read("w");
    let committed = b.commit(read);
    let let_c = b.let_("c", committed);
    let c = b.var("c");
    let ret = b.ret(Some(c));
    b.define(main, vec![], vec![let_c, ret]);

    let analysis = analyzer().analyze(&b.finish()).unwrap();
    assert!(analysis.passed());
    assert!(analysis.diagnostics.is_empty());
}

#[test]
fn test_hash_of_narrow_witness_draws_advisory() {
    let mut b = ProgramBuilder::new();
    b.witness("age", TypeInfo::Uint { bits: 8 });
    let main = b.declare("main", FunctionKind::Circuit);
    let read = b.witness_read("age");
    let hashed = b.hash(read);
    let hashed_id = hashed.id;
    let let_h = b.let_("h", hashed);
    let h = b.var("h");
    let ret = b.ret(Some(h));
    b.define(main, vec![], vec![let_h, ret]);

    let analysis = analyzer().analyze(&b.finish()).unwrap();
    // Advisory only: hashing still declassifies for propagation.
    assert!(analysis.passed());
    let advisories: Vec<_> = analysis.advisories().collect();
    assert_eq!(advisories.len(), 1);
    assert_eq!(advisories[0].severity, Severity::Advisory);
    assert_eq!(advisories[0].code, "low-entropy-hash");
    assert_eq!(advisories[0].node, hashed_id);
    assert!(advisories[0].message.contains("8 bits"));
}

#[test]
fn test_hash_of_boolean_witness_draws_advisory() {
    let mut b = ProgramBuilder::new();
    b.witness("flag", TypeInfo::Boolean);
    let main = b.declare("main", FunctionKind::Circuit);
    let read = b.witness_read("flag");
    let hashed = b.hash(read);
    let stmt = b.let_("h", hashed);
    b.define(main, vec![], vec![stmt]);

    let analysis = analyzer().analyze(&b.finish()).unwrap();
    assert_eq!(analysis.advisories().count(), 1);
}

#[test]
fn test_hash_of_wide_witness_is_silent() {
    let mut b = ProgramBuilder::new();
    b.witness("preimage", TypeInfo::Bytes { len: 32 });
    let main = b.declare("main", FunctionKind::Circuit);
    let read = b.witness_read("preimage");
    let hashed = b.hash(read);
    let stmt = b.let_("h", hashed);
    b.define(main, vec![], vec![stmt]);

    let analysis = analyzer().analyze(&b.finish()).unwrap();
    assert!(analysis.diagnostics.is_empty());
}

#[test]
fn test_hash_at_exact_threshold_is_silent() {
    let mut b = ProgramBuilder::new();
    b.witness("key", TypeInfo::Uint { bits: 128 });
    let main = b.declare("main", FunctionKind::Circuit);
    let read = b.witness_read("key");
    let hashed = b.hash(read);
    let stmt = b.let_("h", hashed);
    b.define(main, vec![], vec![stmt]);

    let analysis = analyzer().analyze(&b.finish()).unwrap();
    assert!(analysis.diagnostics.is_empty());
}

#[test]
fn test_hash_just_below_threshold_draws_advisory() {
    let mut b = ProgramBuilder::new();
    b.witness("key", TypeInfo::Uint { bits: 127 });
    let main = b.declare("main", FunctionKind::Circuit);
    let read = b.witness_read("key");
    let hashed = b.hash(read);
    let stmt = b.let_("h", hashed);
    b.define(main, vec![], vec![stmt]);

    let analysis = analyzer().analyze(&b.finish()).unwrap();
    assert_eq!(analysis.advisories().count(), 1);
}

#[test]
fn test_hash_of_opaque_type_has_unprovable_entropy() {
    let mut b = ProgramBuilder::new();
    b.witness("blob", TypeInfo::Opaque { name: "Data".into() });
    let main = b.declare("main", FunctionKind::Circuit);
    let read = b.witness_read("blob");
    let hashed = b.hash(read);
    let stmt = b.let_("h", hashed);
    b.define(main, vec![], vec![stmt]);

    let analysis = analyzer().analyze(&b.finish()).unwrap();
    let advisories: Vec<_> = analysis.advisories().collect();
    assert_eq!(advisories.len(), 1);
    assert!(advisories[0].message.contains("unprovable"));
}

#[test]
fn test_hash_of_public_value_is_silent() {
    let mut b = ProgramBuilder::new();
    let main = b.declare("main", FunctionKind::Circuit);
    let lit = b.lit(5);
    let small = b.typed(lit, TypeInfo::Uint { bits: 8 });
    let hashed = b.hash(small);
    let stmt = b.let_("h", hashed);
    b.define(main, vec![], vec![stmt]);

    let analysis = analyzer().analyze(&b.finish()).unwrap();
    assert!(analysis.diagnostics.is_empty());
}

#[test]
fn test_advisories_can_be_disabled() {
    let mut config = AnalysisConfig::sequential();
    config.hash_advisories = false;

    let mut b = ProgramBuilder::new();
    b.witness("flag", TypeInfo::Boolean);
    let main = b.declare("main", FunctionKind::Circuit);
    let read = b.witness_read("flag");
    let hashed = b.hash(read);
    let stmt = b.let_("h", hashed);
    b.define(main, vec![], vec![stmt]);

    let analysis = Analyzer::new(config).analyze(&b.finish()).unwrap();
    assert!(analysis.diagnostics.is_empty());
}

#[test]
fn test_threshold_is_configurable_from_toml() {
    let config = AnalysisConfig::from_toml_str("min_hash_entropy_bits = 4\n").unwrap();
    assert_eq!(config.min_hash_entropy_bits, 4);

    let mut b = ProgramBuilder::new();
    b.witness("age", TypeInfo::Uint { bits: 8 });
    let main = b.declare("main", FunctionKind::Circuit);
    let read = b.witness_read("age");
    let hashed = b.hash(read);
    let stmt = b.let_("h", hashed);
    b.define(main, vec![], vec![stmt]);

    let analysis = Analyzer::new(config).analyze(&b.finish()).unwrap();
    assert!(analysis.diagnostics.is_empty());
}
