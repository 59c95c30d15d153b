//! Integration tests for the deterministic strategy.
//!
//! Tests key evaluator features:
//! - literals & arithmetic
//! - assignment & augmented assignment
//! - comparison chains
//! - if / while control flow
//! - builtin and bound calls
//! - error kinds, depth and gas limits
//! - JSON program input

use pylite_eval::{
    Builtins, Callable, EvalConfig, EvalError, Interpreter, OutputBuffer, Strategy, Value,
};
use pylite_types::ast::{CompareKind, Node, OperatorKind, Program};

use CompareKind::{Eq, Gt, Lt};
use OperatorKind::{Add, Div, FloorDiv, Mod, Mult, Pow, Sub};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Deterministic interpreter whose `print` output is captured.
fn interp() -> (Interpreter, OutputBuffer) {
    let (builtins, out) = Builtins::capturing();
    (
        Interpreter::new(Strategy::Deterministic).with_builtins(builtins),
        out,
    )
}

fn run(nodes: Vec<Node>) -> (Interpreter, Result<Value, EvalError>) {
    let (mut interp, _) = interp();
    let result = interp.run(&Program::new(nodes));
    (interp, result)
}

fn eval(node: Node) -> Result<Value, EvalError> {
    run(vec![node]).1
}

fn int(n: i64) -> Node {
    Node::int(n)
}

fn var(interp: &Interpreter, name: &str) -> Value {
    interp.env().get(name).cloned().expect("variable should be bound")
}

// ══════════════════════════════════════════════════════════════════════════════
// Literals & arithmetic
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn literal_values() {
    assert_eq!(eval(int(3)), Ok(Value::Int(3)));
    assert_eq!(eval(Node::float(1.5)), Ok(Value::Float(1.5)));
    assert_eq!(eval(Node::str("hi")), Ok(Value::str("hi")));
}

#[test]
fn arithmetic_matches_host() {
    let cases = [
        (Mult, 6, 7, Value::Int(42)),
        (Add, 2, 3, Value::Int(5)),
        (Sub, 2, 3, Value::Int(-1)),
        (Div, 7, 2, Value::Float(3.5)),
        (Div, 6, 3, Value::Float(2.0)),
        (FloorDiv, -7, 2, Value::Int(-4)),
        (Mod, -7, 3, Value::Int(2)),
        (Pow, 3, 4, Value::Int(81)),
    ];
    for (op, a, b, expected) in cases {
        assert_eq!(eval(Node::binary(op, int(a), int(b))), Ok(expected), "{a} {op} {b}");
    }
}

#[test]
fn mixed_int_float_is_float() {
    assert_eq!(
        eval(Node::binary(Add, int(1), Node::float(0.5))),
        Ok(Value::Float(1.5))
    );
}

#[test]
fn nested_binary_ops() {
    // (2 * 3) + 4
    let node = Node::binary(Add, Node::binary(Mult, int(2), int(3)), int(4));
    assert_eq!(eval(node), Ok(Value::Int(10)));
}

#[test]
fn arithmetic_on_string_is_type_mismatch() {
    let err = eval(Node::binary(Add, Node::str("a"), int(1))).unwrap_err();
    assert!(matches!(
        err,
        EvalError::TypeMismatch { left: "str", right: "int", .. }
    ));
}

#[test]
fn division_by_zero_is_reported() {
    assert_eq!(
        eval(Node::binary(Div, int(1), int(0))),
        Err(EvalError::DivisionByZero("/".into()))
    );
}

#[test]
fn integer_overflow_is_reported() {
    assert_eq!(
        eval(Node::binary(Mult, int(i64::MAX), int(2))),
        Err(EvalError::Overflow("*".into()))
    );
}

#[test]
fn operands_evaluate_left_then_right() {
    let (mut interp, out) = interp();
    let result = interp.run(&Program::new(vec![Node::binary(
        Add,
        Node::call("print", vec![Node::str("left")]),
        Node::call("print", vec![Node::str("right")]),
    )]));
    // Both prints ran before `None + None` was rejected.
    assert!(matches!(result, Err(EvalError::TypeMismatch { .. })));
    assert_eq!(out.lines(), vec!["left".to_string(), "right".to_string()]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Assignment
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn assign_then_name() {
    for value in [int(5), Node::float(2.25), Node::str("text")] {
        let (_, result) = run(vec![Node::assign("x", value.clone()), Node::name("x")]);
        let expected = match value {
            Node::Literal(c) => Value::from(&c),
            _ => unreachable!(),
        };
        assert_eq!(result, Ok(expected));
    }
}

#[test]
fn assign_overwrites() {
    let (interp, _) = run(vec![
        Node::assign("x", int(1)),
        Node::assign("x", Node::str("two")),
    ]);
    assert_eq!(var(&interp, "x"), Value::str("two"));
}

#[test]
fn assignment_is_a_statement() {
    assert_eq!(eval(Node::assign("x", int(1))), Ok(Value::Unit));
}

#[test]
fn aug_assign_matches_expanded_assign() {
    let (aug, _) = run(vec![
        Node::assign("x", int(3)),
        Node::aug_assign("x", Add, int(4)),
    ]);
    let (expanded, _) = run(vec![
        Node::assign("x", int(3)),
        Node::assign("x", Node::binary(Add, Node::name("x"), int(4))),
    ]);
    assert_eq!(aug.env().bindings(), expanded.env().bindings());
    assert_eq!(var(&aug, "x"), Value::Int(7));
}

#[test]
fn aug_assign_every_operator() {
    let (interp, _) = run(vec![
        Node::assign("x", int(10)),
        Node::aug_assign("x", Sub, int(3)),
        Node::aug_assign("x", Mult, int(2)),
        Node::aug_assign("x", Mod, int(4)),
        Node::aug_assign("x", Pow, int(3)),
        Node::aug_assign("x", FloorDiv, int(3)),
        Node::aug_assign("x", Div, int(2)),
    ]);
    // ((((10 - 3) * 2) % 4) ** 3) // 3 / 2
    assert_eq!(var(&interp, "x"), Value::Float(1.0));
}

#[test]
fn aug_assign_unbound_target() {
    assert_eq!(
        eval(Node::aug_assign("n", Add, int(1))),
        Err(EvalError::UndefinedVariable("n".into()))
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Comparisons
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn compare_chain() {
    assert_eq!(
        eval(Node::compare(int(1), vec![Lt, Lt], vec![int(2), int(3)])),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        eval(Node::compare(int(1), vec![Lt, Lt], vec![int(3), int(2)])),
        Ok(Value::Bool(false))
    );
}

#[test]
fn compare_evaluates_all_operands_before_comparing() {
    let (mut interp, out) = interp();
    // 1 > 2 fails first, yet the later comparator has already run.
    let result = interp.run(&Program::new(vec![Node::compare(
        int(1),
        vec![Gt, Lt],
        vec![int(2), Node::call("print", vec![Node::str("evaluated")])],
    )]));
    assert_eq!(result, Ok(Value::Bool(false)));
    assert_eq!(out.lines(), vec!["evaluated".to_string()]);
}

#[test]
fn compare_short_circuits_comparisons() {
    // 2 < 1 is false, so the ill-typed `1 < "a"` is never compared.
    let node = Node::compare(int(2), vec![Lt, Lt], vec![int(1), Node::str("a")]);
    assert_eq!(eval(node), Ok(Value::Bool(false)));
}

#[test]
fn compare_equality_across_kinds() {
    assert_eq!(
        eval(Node::compare(int(1), vec![Eq], vec![Node::float(1.0)])),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        eval(Node::compare(int(1), vec![Eq], vec![Node::str("1")])),
        Ok(Value::Bool(false))
    );
}

#[test]
fn ordering_strings_against_numbers_fails() {
    let err = eval(Node::compare(Node::str("a"), vec![Lt], vec![int(1)])).unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch { .. }));
}

// ══════════════════════════════════════════════════════════════════════════════
// Control flow
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn if_false_takes_orelse() {
    let (interp, _) = run(vec![Node::if_(
        int(0),
        vec![Node::assign("x", int(1))],
        vec![Node::assign("x", int(2))],
    )]);
    assert_eq!(var(&interp, "x"), Value::Int(2));
}

#[test]
fn if_true_takes_body() {
    let (interp, _) = run(vec![Node::if_(
        Node::str("yes"),
        vec![Node::assign("x", int(1))],
        vec![Node::assign("x", int(2))],
    )]);
    assert_eq!(var(&interp, "x"), Value::Int(1));
}

#[test]
fn if_with_empty_branch_does_nothing() {
    let (interp, result) = run(vec![Node::if_(
        Node::str(""),
        vec![Node::assign("x", int(1))],
        vec![],
    )]);
    assert_eq!(result, Ok(Value::Unit));
    assert!(interp.env().is_empty());
}

#[test]
fn unit_is_falsy() {
    let (interp, _) = run(vec![Node::if_(
        Node::call("print", vec![]),
        vec![Node::assign("x", int(1))],
        vec![Node::assign("x", int(2))],
    )]);
    assert_eq!(var(&interp, "x"), Value::Int(2));
}

#[test]
fn while_false_never_runs_body() {
    let (interp, result) = run(vec![Node::while_(
        int(0),
        vec![Node::assign("x", int(1))],
    )]);
    assert_eq!(result, Ok(Value::Unit));
    assert!(!interp.env().contains("x"));
}

#[test]
fn while_counts_up() {
    // i = 0; total = 0; while i < 5: i += 1; total += i
    let (interp, _) = run(vec![
        Node::assign("i", int(0)),
        Node::assign("total", int(0)),
        Node::while_(
            Node::compare(Node::name("i"), vec![Lt], vec![int(5)]),
            vec![
                Node::aug_assign("i", Add, int(1)),
                Node::aug_assign("total", Add, Node::name("i")),
            ],
        ),
    ]);
    assert_eq!(var(&interp, "i"), Value::Int(5));
    assert_eq!(var(&interp, "total"), Value::Int(15));
}

#[test]
fn gas_limit_stops_infinite_loop() {
    let (builtins, _) = Builtins::capturing();
    let mut interp = Interpreter::new(Strategy::Deterministic)
        .with_builtins(builtins)
        .with_config(EvalConfig::default().with_gas_limit(500));
    let result = interp.run(&Program::new(vec![Node::while_(
        int(1),
        vec![Node::assign("x", int(1))],
    )]));
    assert_eq!(result, Err(EvalError::GasExhausted { limit: 500 }));
    assert_eq!(interp.gas_used(), 501);
}

// ══════════════════════════════════════════════════════════════════════════════
// Calls
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn print_writes_display_forms() {
    let (mut interp, out) = interp();
    let result = interp.run(&Program::new(vec![Node::call(
        "print",
        vec![
            int(1),
            Node::binary(Div, int(5), int(2)),
            Node::str("hi"),
            Node::compare(int(1), vec![Lt], vec![int(2)]),
        ],
    )]));
    assert_eq!(result, Ok(Value::Unit));
    assert_eq!(out.lines(), vec!["1 2.5 hi True".to_string()]);
}

#[test]
fn call_bound_callable() {
    let (mut interp, _) = interp();
    interp.env_mut().set(
        "double",
        Value::Callable(Callable::new("double", |args| match args {
            [Value::Int(n)] => Ok(Value::Int(n * 2)),
            _ => Err(EvalError::Builtin {
                name: "double".into(),
                message: "expected one int".into(),
            }),
        })),
    );
    let result = interp.run(&Program::new(vec![Node::call("double", vec![int(21)])]));
    assert_eq!(result, Ok(Value::Int(42)));
}

#[test]
fn builtins_shadow_environment() {
    let (mut interp, out) = interp();
    interp.env_mut().set("print", Value::Int(0));
    let result = interp.run(&Program::new(vec![Node::call("print", vec![int(7)])]));
    assert_eq!(result, Ok(Value::Unit));
    assert_eq!(out.lines(), vec!["7".to_string()]);
}

#[test]
fn extra_builtins_plug_in() {
    let builtins = Builtins::empty().with_fn("answer", |_| Ok(Value::Int(42)));
    let mut interp = Interpreter::new(Strategy::Deterministic).with_builtins(builtins);
    let result = interp.run(&Program::new(vec![Node::call("answer", vec![])]));
    assert_eq!(result, Ok(Value::Int(42)));
}

#[test]
fn undefined_name_and_function() {
    assert_eq!(
        eval(Node::name("z")),
        Err(EvalError::UndefinedVariable("z".into()))
    );
    assert_eq!(
        eval(Node::call("nope", vec![])),
        Err(EvalError::UndefinedFunction("nope".into()))
    );
}

#[test]
fn calling_a_number_fails() {
    let (_, result) = run(vec![
        Node::assign("f", int(3)),
        Node::call("f", vec![]),
    ]);
    assert_eq!(
        result,
        Err(EvalError::NotCallable {
            name: "f".into(),
            type_name: "int",
        })
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Runs, limits & program input
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn run_returns_last_value() {
    let (interp, result) = run(vec![
        Node::assign("x", int(6)),
        Node::binary(Mult, Node::name("x"), int(7)),
    ]);
    assert_eq!(result, Ok(Value::Int(42)));
    assert_eq!(interp.last_value(), &Value::Int(42));
    assert_eq!(run(vec![]).1, Ok(Value::Unit));
}

#[test]
fn errors_abort_the_run() {
    let (interp, result) = run(vec![
        Node::assign("a", int(1)),
        Node::name("nope"),
        Node::assign("b", int(2)),
    ]);
    assert!(result.is_err());
    assert!(interp.env().contains("a"));
    assert!(!interp.env().contains("b"));
}

fn deep_sum(depth: usize) -> Node {
    let mut node = int(1);
    for _ in 0..depth {
        node = Node::binary(Add, node, int(1));
    }
    node
}

#[test]
fn depth_limit_reports_stack_exhausted() {
    let config = EvalConfig::default().with_max_depth(50);
    let mut shallow = Interpreter::new(Strategy::Deterministic).with_config(config);
    assert_eq!(
        shallow.run(&Program::new(vec![deep_sum(40)])),
        Ok(Value::Int(41))
    );

    let mut deep = Interpreter::new(Strategy::Deterministic).with_config(config);
    assert_eq!(
        deep.run(&Program::new(vec![deep_sum(100)])),
        Err(EvalError::StackExhausted { limit: 50 })
    );
}

#[test]
fn default_depth_limit() {
    let result = pylite_eval::run_deterministic(&Program::new(vec![deep_sum(2000)]));
    assert_eq!(result, Err(EvalError::StackExhausted { limit: 1000 }));
}

#[test]
fn program_from_json() {
    let source = r#"{
        "body": [
            { "Assign": { "target": "x", "value": { "Literal": { "Int": 6 } } } },
            { "BinaryOp": {
                "op": "Mult",
                "left": { "Name": "x" },
                "right": { "Literal": { "Int": 7 } }
            } }
        ]
    }"#;
    let program = Program::from_json(source).expect("valid program");
    assert_eq!(pylite_eval::run_deterministic(&program), Ok(Value::Int(42)));
}

/// JSON text of `deep_sum(depth)`, built without recursion.
fn deep_sum_json(depth: usize) -> String {
    let one = r#"{"Literal":{"Int":1}}"#;
    let mut json = one.to_string();
    for _ in 0..depth {
        json = format!(r#"{{"BinaryOp":{{"op":"Add","left":{json},"right":{one}}}}}"#);
    }
    format!(r#"{{"body":[{json}]}}"#)
}

#[test]
fn program_json_accepts_deep_nesting() {
    let program = Program::from_json(&deep_sum_json(500)).expect("deep program loads");
    assert_eq!(program, Program::new(vec![deep_sum(500)]));
    assert_eq!(pylite_eval::run_deterministic(&program), Ok(Value::Int(501)));

    // Loading never limits depth; evaluation does.
    let program = Program::from_json(&deep_sum_json(1500)).expect("deeper program loads");
    assert_eq!(
        pylite_eval::run_deterministic(&program),
        Err(EvalError::StackExhausted { limit: 1000 })
    );
}

#[test]
fn program_json_rejects_mismatched_compare() {
    let source = r#"{
        "body": [
            { "Compare": {
                "left": { "Literal": { "Int": 1 } },
                "ops": ["Lt", "Lt"],
                "comparators": [{ "Literal": { "Int": 2 } }]
            } }
        ]
    }"#;
    let err = Program::from_json(source).unwrap_err();
    assert!(matches!(
        err,
        pylite_types::ProgramError::CompareArity { ops: 2, comparators: 1 }
    ));
}

#[test]
fn config_from_json_fills_defaults() {
    let config: EvalConfig = serde_json::from_str(r#"{ "gas_limit": 10 }"#).unwrap();
    assert_eq!(config, EvalConfig::default().with_gas_limit(10));
}
