use super::helpers::{frac, global, num, run, string, Harness};
use snuvi_types::Value;

#[test]
fn test_exact_fractions() {
    let script = run("x = 1 / 3; y = x * 3; z = 0.1 + 0.2;");
    assert_eq!(global(&script, "x"), frac(1, 3));
    assert_eq!(global(&script, "y"), num(1));
    assert_eq!(global(&script, "z"), frac(3, 10));
}

#[test]
fn test_harmonic_sum_stays_exact() {
    let script = run("s = 0; for (i, 1, 10) { s += 1 / i; }");
    assert_eq!(global(&script, "s"), frac(7381, 2520));
}

#[test]
fn test_string_concatenation() {
    let script = run("s = \"n=\" + 3; t = 1 + 2 + \"x\"; u = \"a\" + null;");
    assert_eq!(global(&script, "s"), string("n=3"));
    assert_eq!(global(&script, "t"), string("3x"));
    assert_eq!(global(&script, "u"), string("anull"));
}

#[test]
fn test_print_goes_to_logger() {
    let harness = Harness::new();
    harness.start("print(\"a\", 1, \" \", 1 / 2); print();");
    assert_eq!(harness.printed(), vec!["a1 0.5".to_string(), String::new()]);
}

#[test]
fn test_typeof_and_str() {
    let script = run("a = typeof(1); b = typeof(\"s\"); c = str(1 / 4); d = typeof(list.new());");
    assert_eq!(global(&script, "a"), string("number"));
    assert_eq!(global(&script, "b"), string("string"));
    assert_eq!(global(&script, "c"), string("0.25"));
    assert_eq!(global(&script, "d"), string("list"));
}

#[test]
fn test_len() {
    let script = run("a = len(\"héllo\"); l = list.new(); list.add(l, 1); b = len(l);");
    assert_eq!(global(&script, "a"), num(5));
    assert_eq!(global(&script, "b"), num(1));
}

#[test]
fn test_math_natives() {
    let script = run(
        "a = math.sqrt(16); b = math.pow(2, 10); c = math.abs(-3); d = math.round(5 / 2); \
         e = math.floor(-1 / 2); f = math.min(3, 1); g = math.root(27, 3); h = math.ceil(1 / 3); \
         i = math.max(1 / 2, 1 / 3);",
    );
    assert_eq!(global(&script, "a"), num(4));
    assert_eq!(global(&script, "b"), num(1024));
    assert_eq!(global(&script, "c"), num(3));
    assert_eq!(global(&script, "d"), num(3));
    assert_eq!(global(&script, "e"), num(-1));
    assert_eq!(global(&script, "f"), num(1));
    assert_eq!(global(&script, "g"), num(3));
    assert_eq!(global(&script, "h"), num(1));
    assert_eq!(global(&script, "i"), frac(1, 2));
}

#[test]
fn test_constants() {
    let script = run("a = math.pi() == PI; b = math.e() == E; c = PI > 3 && PI < 4;");
    assert_eq!(global(&script, "a"), Value::Bool(true));
    assert_eq!(global(&script, "b"), Value::Bool(true));
    assert_eq!(global(&script, "c"), Value::Bool(true));
}

#[test]
fn test_todouble() {
    let script = run("a = math.todouble(1 / 4); b = math.todouble(1 / 3) == 1 / 3;");
    assert_eq!(global(&script, "a"), frac(1, 4));
    assert_eq!(global(&script, "b"), Value::Bool(false));
}

#[test]
fn test_bit_helpers() {
    let script = run("a = bit.test(5, 0); b = bit.set(0, 3); c = bit.clear(7, 1); d = bit.test(5, 1);");
    assert_eq!(global(&script, "a"), Value::Bool(true));
    assert_eq!(global(&script, "b"), num(8));
    assert_eq!(global(&script, "c"), num(5));
    assert_eq!(global(&script, "d"), Value::Bool(false));
}
