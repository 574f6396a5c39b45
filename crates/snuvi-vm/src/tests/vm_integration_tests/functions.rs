use super::helpers::{execute, global, num, run, string, Harness};
use crate::config::EngineConfig;
use snuvi_types::Value;

#[test]
fn test_simple_call() {
    let script = run("function add(a, b) { return a + b; } r = add(2, 3);");
    assert_eq!(global(&script, "r"), num(5));
    assert_eq!(script.get_global("a"), None);
    assert_eq!(script.call_depth(), 0);
    assert_eq!(script.stack_depth(), 0);
}

#[test]
fn test_recursion() {
    let script = run(
        "function fact(n) { if (n <= 1) { return 1; } return n * fact(n - 1); } r = fact(20);",
    );
    assert_eq!(global(&script, "r"), num(2_432_902_008_176_640_000));
}

#[test]
fn test_call_before_definition() {
    let script = run("r = twice(21); function twice(x) { return x * 2; }");
    assert_eq!(global(&script, "r"), num(42));
}

#[test]
fn test_locals_are_isolated() {
    let script = run(
        "x = 1; function f() { x = 99; return x; } r = f(); \
         function g(n) { if (n == 0) { return 0; } y = n; g(n - 1); return y; } s = g(3);",
    );
    assert_eq!(global(&script, "x"), num(1));
    assert_eq!(global(&script, "r"), num(99));
    assert_eq!(global(&script, "s"), num(3));
}

#[test]
fn test_dollar_reaches_globals() {
    let script = run("x = 1; function bump() { $x += 10; } bump(); bump();");
    assert_eq!(global(&script, "x"), num(21));
}

#[test]
fn test_missing_return_value_is_null() {
    let script = run("function f() { } function g() { return; } a = f(); b = g();");
    assert_eq!(global(&script, "a"), Value::Null);
    assert_eq!(global(&script, "b"), Value::Null);
}

#[test]
fn test_discarded_call_result() {
    let script = run("function f() { return 1; } f(); f();");
    assert_eq!(script.stack_depth(), 0);
    assert!(script.failure().is_none());
}

#[test]
fn test_user_function_shadows_native() {
    let script = run("function len(x) { return \"mine\"; } r = len(\"abc\");");
    assert_eq!(global(&script, "r"), string("mine"));
}

#[test]
fn test_undefined_function() {
    let err = execute("x = nope(1);").unwrap_err();
    assert_eq!(err, "Runtime error: undefined function 'nope'");
}

#[test]
fn test_collections_pass_by_reference() {
    let script = run("function fill(l) { list.add(l, 1); list.add(l, 2); } l = list.new(); fill(l); n = list.size(l);");
    assert_eq!(global(&script, "n"), num(2));
}

#[test]
fn test_call_depth_limit() {
    let harness = Harness::with_config(EngineConfig {
        max_call_depth: 32,
        ..EngineConfig::default()
    });
    let script = harness.start("function f(n) { return f(n + 1); } f(0);");
    assert_eq!(
        script.failure().map(|e| e.to_string()),
        Some("call depth limit of 32 exceeded".to_string())
    );
    assert_eq!(script.call_depth(), 0);
}

#[test]
fn test_default_call_depth_limit() {
    let err = execute("function f() { f(); } f();").unwrap_err();
    assert_eq!(err, "Runtime error: call depth limit of 512 exceeded");
}

#[test]
fn test_function_labels() {
    let script = run(
        "function f() { c = 0; @again c++; if (c < 3) { goto(@again); } return c; } r = f();",
    );
    assert_eq!(global(&script, "r"), num(3));
}
