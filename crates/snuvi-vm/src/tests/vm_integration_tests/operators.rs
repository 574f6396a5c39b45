use super::helpers::{execute, global, num, run};
use snuvi_types::Value;

#[test]
fn test_arithmetic_operators() {
    let script = run("a = 7 % 3; b = -7 % 3; c = 2 * 3 - 4 / 2; d = (1 + 2) * 3;");
    assert_eq!(global(&script, "a"), num(1));
    assert_eq!(global(&script, "b"), num(-1));
    assert_eq!(global(&script, "c"), num(4));
    assert_eq!(global(&script, "d"), num(9));
}

#[test]
fn test_bitwise_operators() {
    let script = run("c = 1 << 4; d = 6 & 3; e = 6 | 3; f = 6 ^ 3; g = ~0; h = 256 >> 4;");
    assert_eq!(global(&script, "c"), num(16));
    assert_eq!(global(&script, "d"), num(2));
    assert_eq!(global(&script, "e"), num(7));
    assert_eq!(global(&script, "f"), num(5));
    assert_eq!(global(&script, "g"), num(-1));
    assert_eq!(global(&script, "h"), num(16));
}

#[test]
fn test_comparisons() {
    let script = run("a = \"abc\" < \"abd\"; b = 2 >= 2; c = null == null; d = 1 != \"1\"; e = 1 / 2 < 2 / 3;");
    for name in ["a", "b", "c", "d", "e"] {
        assert_eq!(global(&script, name), Value::Bool(true), "{}", name);
    }
}

#[test]
fn test_logical_operators() {
    let script = run("a = true && false; b = false || true; c = !true; d = !(1 > 2) && 2 > 1;");
    assert_eq!(global(&script, "a"), Value::Bool(false));
    assert_eq!(global(&script, "b"), Value::Bool(true));
    assert_eq!(global(&script, "c"), Value::Bool(false));
    assert_eq!(global(&script, "d"), Value::Bool(true));
}

#[test]
fn test_short_circuit_skips_right_side() {
    let script = run("x = false && undefined_fn(); y = true || undefined_fn();");
    assert_eq!(global(&script, "x"), Value::Bool(false));
    assert_eq!(global(&script, "y"), Value::Bool(true));
}

#[test]
fn test_logical_operators_require_booleans() {
    let err = execute("x = 1 && true;").unwrap_err();
    assert!(err.contains("expected bool, got number"), "{}", err);
    let err = execute("x = true && 1;").unwrap_err();
    assert!(err.contains("expected bool"), "{}", err);
}

#[test]
fn test_compound_assignment() {
    let script = run("a = 10; a -= 3; a *= 2; a /= 7; a += 1; b = 3; b <<= 2; b |= 1; c = \"x\"; c += 1;");
    assert_eq!(global(&script, "a"), num(3));
    assert_eq!(global(&script, "b"), num(13));
    assert_eq!(global(&script, "c"), Value::String("x1".into()));
}

#[test]
fn test_increment_and_decrement() {
    let script = run("i = 5; a = i++; b = i; c = --i; d = i;");
    assert_eq!(global(&script, "a"), num(5));
    assert_eq!(global(&script, "b"), num(6));
    assert_eq!(global(&script, "c"), num(5));
    assert_eq!(global(&script, "d"), num(5));
}

#[test]
fn test_assignment_is_an_expression() {
    let script = run("a = b = 3; c = (d = 2) + 1;");
    assert_eq!(global(&script, "a"), num(3));
    assert_eq!(global(&script, "b"), num(3));
    assert_eq!(global(&script, "c"), num(3));
    assert_eq!(global(&script, "d"), num(2));
}

#[test]
fn test_type_errors() {
    let err = execute("x = 1 - \"a\";").unwrap_err();
    assert_eq!(err, "Runtime error: type error in '-': expected number, got string");
    let err = execute("x = true < false;").unwrap_err();
    assert!(err.contains("'<'"), "{}", err);
    let err = execute("x = null; x++;").unwrap_err();
    assert!(err.contains("'++'"), "{}", err);
}

#[test]
fn test_arithmetic_errors() {
    assert_eq!(
        execute("x = 1 % 0;").unwrap_err(),
        "Runtime error: division by zero"
    );
    assert!(execute("x = 1.5 & 1;").is_err());
    let err = execute("x = 4611686018427387904; x = x * 2;").unwrap_err();
    assert!(err.contains("overflow"), "{}", err);
}
