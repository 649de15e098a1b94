//! Interprocedural tests: taint-polymorphic helper signatures, call-site
//! obligation checking, and recursive-cycle conservatism.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use witnessflow::ir::{build::param, FunctionKind, ProgramBuilder, TypeInfo};
use witnessflow::{AnalysisConfig, Analyzer, ReturnPolicy, TaintLabel};

fn analyzer() -> Analyzer {
    Analyzer::new(AnalysisConfig::sequential())
}

#[test]
fn test_identity_helper_is_taint_polymorphic() {
    let mut b = ProgramBuilder::new();
    b.witness("w", TypeInfo::Field);
    let id = b.declare("identity", FunctionKind::Helper);
    let main = b.declare("main", FunctionKind::Circuit);

    let x = b.var("x");
    let helper_ret = b.ret(Some(x));
    b.define(id, vec![param("x")], vec![helper_ret]);

    // A public argument flows through clean; the same helper called with a
    // witness yields a tainted result.
    let pub_arg = b.lit(7);
    let pub_call = b.call(id, vec![pub_arg]);
    let let_a = b.let_("a", pub_call.clone());
    let read = b.witness_read("w");
    let sec_call = b.call(id, vec![read]);
    let let_b = b.let_("b", sec_call.clone());
    b.define(main, vec![], vec![let_a, let_b]);

    let analysis = analyzer().analyze(&b.finish()).unwrap();
    assert!(analysis.passed());
    assert_eq!(analysis.labels.get(pub_call.id), Some(TaintLabel::Public));
    assert_eq!(analysis.labels.get(sec_call.id), Some(TaintLabel::Tainted));
    assert_eq!(
        analysis.signatures.get(id).unwrap().policy(),
        ReturnPolicy::JoinParams(vec![0])
    );
}

#[test]
fn test_disclosing_helper_returns_public() {
    let mut b = ProgramBuilder::new();
    b.witness("w", TypeInfo::Field);
    let reveal = b.declare("reveal", FunctionKind::Helper);
    let main = b.declare("main", FunctionKind::Circuit);

    let x = b.var("x");
    let disclosed = b.disclose(x);
    let helper_ret = b.ret(Some(disclosed));
    b.define(reveal, vec![param("x")], vec![helper_ret]);

    let read = b.witness_read("w");
    let call = b.call(reveal, vec![read]);
    let ret = b.ret(Some(call));
    b.define(main, vec![], vec![ret]);

    let analysis = analyzer().analyze(&b.finish()).unwrap();
    assert!(analysis.passed());
    assert_eq!(
        analysis.signatures.get(reveal).unwrap().policy(),
        ReturnPolicy::Public
    );
}

#[test]
fn test_helper_sink_becomes_call_site_obligation() {
    // The helper writes its parameter to the ledger. That is fine for
    // public arguments and a violation at the call site for tainted ones.
    let mut b = ProgramBuilder::new();
    b.witness("w", TypeInfo::Field);
    let record = b.declare("record", FunctionKind::Helper);
    let main = b.declare("main", FunctionKind::Circuit);

    let x = b.var("x");
    let write = b.ledger_write("log", x);
    b.define(record, vec![param("x")], vec![write]);

    b.line(1);
    let pub_arg = b.lit(3);
    let clean_call = b.call(record, vec![pub_arg]);
    let clean_stmt = b.expr_stmt(clean_call);
    b.line(2);
    let read = b.witness_read("w");
    let bad_call = b.call(record, vec![read]);
    let bad_call_id = bad_call.id;
    let bad_stmt = b.expr_stmt(bad_call);
    b.define(main, vec![], vec![clean_stmt, bad_stmt]);

    let analysis = analyzer().analyze(&b.finish()).unwrap();
    let violations: Vec<_> = analysis.violations().collect();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].code, "undisclosed-ledger-write");
    assert_eq!(violations[0].node, bad_call_id);
    assert!(violations[0].message.contains("record"));
}

#[test]
fn test_obligations_lift_through_helper_chain() {
    // main -> outer -> inner, where inner asserts on its parameter. The
    // obligation must surface at main's call into outer.
    let mut b = ProgramBuilder::new();
    b.witness("w", TypeInfo::Boolean);
    let inner = b.declare("inner", FunctionKind::Helper);
    let outer = b.declare("outer", FunctionKind::Helper);
    let main = b.declare("main", FunctionKind::Circuit);

    let x = b.var("x");
    let assertion = b.assert_(x);
    b.define(inner, vec![param("x")], vec![assertion]);

    let y = b.var("y");
    let forward = b.call(inner, vec![y]);
    let forward_stmt = b.expr_stmt(forward);
    b.define(outer, vec![param("y")], vec![forward_stmt]);

    let read = b.witness_read("w");
    let call = b.call(outer, vec![read]);
    let call_id = call.id;
    let stmt = b.expr_stmt(call);
    b.define(main, vec![], vec![stmt]);

    let analysis = analyzer().analyze(&b.finish()).unwrap();
    let violations: Vec<_> = analysis.violations().collect();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].code, "witness-assert");
    assert_eq!(violations[0].node, call_id);
}

#[test]
fn test_self_recursive_helper_stays_conservative() {
    let mut b = ProgramBuilder::new();
    b.witness("w", TypeInfo::Field);
    let rec = b.declare("spin", FunctionKind::Helper);
    let main = b.declare("main", FunctionKind::Circuit);

    let x = b.var("x");
    let inner_call = b.call(rec, vec![x]);
    let helper_ret = b.ret(Some(inner_call));
    b.define(rec, vec![param("x")], vec![helper_ret]);

    let pub_arg = b.lit(1);
    let call = b.call(rec, vec![pub_arg]);
    let ret = b.ret(Some(call));
    let ret_id = ret.id;
    b.define(main, vec![], vec![ret]);

    let analysis = analyzer().analyze(&b.finish()).unwrap();
    // The cycle never produces a value without going through itself, so
    // the signature stays at the conservative top and the circuit return
    // is flagged even for a public argument.
    assert_eq!(
        analysis.signatures.get(rec).unwrap().policy(),
        ReturnPolicy::Tainted
    );
    let violations: Vec<_> = analysis.violations().collect();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].node, ret_id);
    assert!(violations[0].message.contains("recursive"));
}

#[test]
fn test_mutually_recursive_helpers_terminate() {
    let mut b = ProgramBuilder::new();
    let even = b.declare("even", FunctionKind::Helper);
    let odd = b.declare("odd", FunctionKind::Helper);
    let main = b.declare("main", FunctionKind::Circuit);

    let n1 = b.var("n");
    let to_odd = b.call(odd, vec![n1]);
    let even_ret = b.ret(Some(to_odd));
    b.define(even, vec![param("n")], vec![even_ret]);

    let n2 = b.var("n");
    let to_even = b.call(even, vec![n2]);
    let odd_ret = b.ret(Some(to_even));
    b.define(odd, vec![param("n")], vec![odd_ret]);

    let arg = b.lit(4);
    let call = b.call(even, vec![arg]);
    let stmt = b.let_("r", call);
    b.define(main, vec![], vec![stmt]);

    let analysis = analyzer().analyze(&b.finish()).unwrap();
    assert_eq!(
        analysis.signatures.get(even).unwrap().policy(),
        ReturnPolicy::Tainted
    );
    assert_eq!(
        analysis.signatures.get(odd).unwrap().policy(),
        ReturnPolicy::Tainted
    );
}

#[test]
fn test_parallel_and_sequential_agree() {
    let mut b = ProgramBuilder::new();
    b.witness("w", TypeInfo::Field);
    let left = b.declare("left", FunctionKind::Helper);
    let right = b.declare("right", FunctionKind::Helper);
    let main = b.declare("main", FunctionKind::Circuit);

    let x = b.var("x");
    let left_ret = b.ret(Some(x));
    b.define(left, vec![param("x")], vec![left_ret]);

    let y = b.var("y");
    let write = b.ledger_write("out", y);
    b.define(right, vec![param("y")], vec![write]);

    b.line(1);
    let read = b.witness_read("w");
    let routed = b.call(left, vec![read]);
    let leak = b.call(right, vec![routed]);
    let stmt = b.expr_stmt(leak);
    b.define(main, vec![], vec![stmt]);
    let program = b.finish();

    let sequential = analyzer().analyze(&program).unwrap();
    let parallel = Analyzer::new(AnalysisConfig::default())
        .analyze(&program)
        .unwrap();
    assert_eq!(sequential.diagnostics, parallel.diagnostics);
    assert_eq!(sequential.labels.export(), parallel.labels.export());
}

#[test]
fn test_undefined_callee_is_an_engine_error() {
    use witnessflow::ir::FuncId;

    let mut b = ProgramBuilder::new();
    let main = b.declare("main", FunctionKind::Circuit);
    let arg = b.lit(0);
    let call = b.call(FuncId(99), vec![arg]);
    let stmt = b.expr_stmt(call);
    b.define(main, vec![], vec![stmt]);

    let err = analyzer().analyze(&b.finish()).unwrap_err();
    assert!(matches!(
        err,
        witnessflow::EngineError::UnknownFunction { .. }
    ));
}

#[test]
fn test_unknown_witness_is_an_engine_error() {
    let mut b = ProgramBuilder::new();
    let main = b.declare("main", FunctionKind::Circuit);
    let read = b.witness_read("nope");
    let stmt = b.let_("x", read);
    b.define(main, vec![], vec![stmt]);

    let err = analyzer().analyze(&b.finish()).unwrap_err();
    assert!(matches!(err, witnessflow::EngineError::UnknownWitness { .. }));
}
