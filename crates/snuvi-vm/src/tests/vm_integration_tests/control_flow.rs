use super::helpers::{execute, global, num, run, string, Harness};
use crate::config::{EngineConfig, GotoMode};
use crate::vm::ScriptState;
use proptest::prelude::*;

#[test]
fn test_while_loop() {
    let script = run("a = 1; while (a <= 3) { a += 1; } wait();");
    assert_eq!(script.state(), ScriptState::Waiting);
    assert_eq!(global(&script, "a"), num(4));
    assert_eq!(script.stack_depth(), 0);
}

#[test]
fn test_while_false_never_runs() {
    let script = run("a = 0; while (false) { a = 1; }");
    assert_eq!(global(&script, "a"), num(0));
}

#[test]
fn test_for_counts_inclusive() {
    let script = run("c = 0; for (i, 1, 5) { c++; }");
    assert_eq!(global(&script, "c"), num(5));
    assert_eq!(global(&script, "i"), num(6));
}

#[test]
fn test_for_negative_step() {
    let script = run("c = 0; for (i, 5, 1, -2) { c++; }");
    assert_eq!(global(&script, "c"), num(3));
    assert_eq!(global(&script, "i"), num(-1));
}

#[test]
fn test_for_empty_range() {
    let script = run("c = 0; for (i, 5, 1) { c++; }");
    assert_eq!(global(&script, "c"), num(0));
    assert_eq!(global(&script, "i"), num(5));
}

#[test]
fn test_for_fractional_step() {
    let script = run("c = 0; for (i, 0, 1, 1 / 4) { c++; }");
    assert_eq!(global(&script, "c"), num(5));
}

#[test]
fn test_for_bounds_are_evaluated_once() {
    let script = run("n = 3; c = 0; for (i, 1, n) { n = 10; c++; }");
    assert_eq!(global(&script, "c"), num(3));
}

#[test]
fn test_for_zero_step() {
    let err = execute("for (i, 1, 5, 0) { }").unwrap_err();
    assert_eq!(err, "Runtime error: for loop step must not be zero");
}

#[test]
fn test_nested_break_leaves_inner_loop_only() {
    let script = run(
        "c = 0; for (i, 1, 3) { for (j, 1, 10) { if (j == 2) { break; } c++; } }",
    );
    assert_eq!(global(&script, "c"), num(3));
}

#[test]
fn test_continue_skips_rest_of_body() {
    let script = run("c = 0; i = 0; while (i < 6) { i++; if (i % 2 == 0) { continue; } c++; }");
    assert_eq!(global(&script, "c"), num(3));
}

#[test]
fn test_continue_in_for_still_steps() {
    let script = run("c = 0; for (i, 1, 4) { if (i == 2) { continue; } c += i; }");
    assert_eq!(global(&script, "c"), num(8));
}

#[test]
fn test_if_chain() {
    let source = "if (x < 0) { r = \"a\"; } elseif (x == 0) { r = \"b\"; } else { r = \"c\"; }";
    for (x, expected) in [("-1", "a"), ("0", "b"), ("1", "c")] {
        let script = run(&format!("x = {}; {}", x, source));
        assert_eq!(global(&script, "r"), string(expected), "x = {}", x);
    }
}

#[test]
fn test_only_first_true_branch_runs() {
    let script = run("c = 0; if (true) { c += 1; } elseif (true) { c += 10; } else { c += 100; }");
    assert_eq!(global(&script, "c"), num(1));
}

#[test]
fn test_nested_if_with_else() {
    let script = run(
        "a = true; b = false; \
         if (a) { if (b) { r = 1; } else { r = 2; } } else { r = 3; } \
         if (!a) { s = 1; } else if (b) { s = 2; } else { s = 3; }",
    );
    assert_eq!(global(&script, "r"), num(2));
    assert_eq!(global(&script, "s"), num(3));
}

#[test]
fn test_if_inside_loop_keeps_chain_state() {
    let script = run(
        "c = 0; for (i, 1, 4) { if (i == 1) { c += 1; } elseif (i == 2) { c += 10; } else { c += 100; } }",
    );
    assert_eq!(global(&script, "c"), num(211));
}

#[test]
fn test_condition_must_be_bool() {
    let err = execute("if (1) { }").unwrap_err();
    assert_eq!(err, "Runtime error: type error in if: expected bool, got number");
    let err = execute("while (null) { }").unwrap_err();
    assert!(err.contains("while"), "{}", err);
}

#[test]
fn test_goto_loop() {
    let script = run("i = 0; @loop i++; if (i < 5) { goto(@loop); }");
    assert_eq!(global(&script, "i"), num(5));
}

#[test]
fn test_goto_with_string_label() {
    let script = run("x = 1; goto(\"skip\"); x = 2; @skip");
    assert_eq!(global(&script, "x"), num(1));
}

#[test]
fn test_gosub_returns_after_call() {
    let script = run("a = 1; gosub(@add); gosub(@add); term(); @add a += 5; return;");
    assert_eq!(global(&script, "a"), num(11));
    assert!(script.is_terminated());
    assert!(script.failure().is_none());
}

#[test]
fn test_return_at_top_level_ends_script() {
    let script = run("a = 1; return; a = 2;");
    assert!(script.is_terminated());
    assert_eq!(global(&script, "a"), num(1));
}

#[test]
fn test_unknown_label_strict() {
    let err = execute("goto(\"nowhere\");").unwrap_err();
    assert_eq!(err, "Runtime error: unknown label '@nowhere'");
}

#[test]
fn test_unknown_label_lenient() {
    let harness = Harness::with_config(EngineConfig {
        goto_mode: GotoMode::Lenient,
        ..EngineConfig::default()
    });
    let script = harness.start("goto(\"nowhere\"); gosub(\"nowhere\"); x = 1;");
    assert!(script.failure().is_none());
    assert_eq!(global(&script, "x"), num(1));
}

#[test]
fn test_labels_are_scoped_to_functions() {
    let err = execute("function f() { goto(@top); } @top f();").unwrap_err();
    assert_eq!(err, "Runtime error: unknown label '@top'");
}

#[test]
fn test_term_stops_immediately() {
    let script = run("x = 1; term(); x = 2;");
    assert!(script.is_terminated());
    assert_eq!(global(&script, "x"), num(1));
}

proptest! {
    #[test]
    fn prop_for_iteration_count(start in -20i64..20, end in -20i64..20, step in 1i64..5) {
        let script = run(&format!("c = 0; for (i, {}, {}, {}) {{ c++; }}", start, end, step));
        let expected = if end < start { 0 } else { (end - start) / step + 1 };
        prop_assert_eq!(global(&script, "c"), num(expected));
    }
}
