use super::helpers::{execute, frac, global, num, run, string, Harness};
use crate::error::VmError;
use snuvi_types::{ArithmeticError, Value};

#[test]
fn test_catch_binds_message() {
    let script = run("try { x = 1 / 0; } catch (e) { msg = e; } after = 1;");
    assert_eq!(global(&script, "msg"), string("division by zero"));
    assert_eq!(global(&script, "after"), num(1));
    assert_eq!(script.stack_depth(), 0);
}

#[test]
fn test_throw_message_is_verbatim() {
    let script = run("try { throw(\"boom\"); } catch (e) { m = e; }");
    assert_eq!(global(&script, "m"), string("boom"));
}

#[test]
fn test_catch_without_binding() {
    let script = run("c = 0; try { throw(1); } catch { c = 1; }");
    assert_eq!(global(&script, "c"), num(1));
}

#[test]
fn test_catch_block_skipped_without_error() {
    let script = run("c = 0; try { c = 1; } catch { c = 2; }");
    assert_eq!(global(&script, "c"), num(1));
    assert_eq!(script.stack_depth(), 0);
}

#[test]
fn test_error_in_function_caught_outside() {
    let script = run(
        "function f(n) { return 1 / n; } \
         try { r = f(0); } catch (e) { m = e; } \
         after = f(2);",
    );
    assert_eq!(global(&script, "m"), string("division by zero"));
    assert_eq!(global(&script, "r"), Value::Null);
    assert_eq!(global(&script, "after"), frac(1, 2));
    assert_eq!(script.call_depth(), 0);
}

#[test]
fn test_error_deep_in_recursion_unwinds_frames() {
    let script = run(
        "function down(n) { if (n == 0) { throw(\"bottom\"); } return down(n - 1); } \
         try { down(10); } catch (e) { m = e; }",
    );
    assert_eq!(global(&script, "m"), string("bottom"));
    assert_eq!(script.call_depth(), 0);
}

#[test]
fn test_handler_dropped_when_function_returns() {
    let err = execute("function f() { try { return 1; } catch { } } r = f(); x = 1 / 0;").unwrap_err();
    assert_eq!(err, "Runtime error: division by zero");
}

#[test]
fn test_break_out_of_try_leaves_no_handler() {
    let err = execute("while (true) { try { break; } catch { } } x = 1 / 0;").unwrap_err();
    assert_eq!(err, "Runtime error: division by zero");
}

#[test]
fn test_continue_out_of_try_leaves_no_handler() {
    let err = execute("i = 0; while (i < 3) { i++; try { continue; } catch { } } x = 1 / 0;")
        .unwrap_err();
    assert_eq!(err, "Runtime error: division by zero");
}

#[test]
fn test_rethrow_reaches_outer_handler() {
    let script = run(
        "try { try { throw(\"a\"); } catch (e) { throw(e + \"b\"); } } catch (e2) { m = e2; }",
    );
    assert_eq!(global(&script, "m"), string("ab"));
}

#[test]
fn test_try_inside_loop() {
    let script = run(
        "c = 0; for (i, -2, 2) { try { x = 1 / i; c++; } catch { } }",
    );
    assert_eq!(global(&script, "c"), num(4));
}

#[test]
fn test_if_chain_recovers_after_catch() {
    let script = run(
        "try { if (1 / 0 == 1) { } } catch { } \
         if (false) { r = 1; } else { r = 2; }",
    );
    assert_eq!(global(&script, "r"), num(2));
}

#[test]
fn test_uncaught_error_is_logged() {
    let harness = Harness::new();
    let script = harness.start("x = 1;\ny = x / 0;\nz = 2;");
    assert_eq!(
        script.failure(),
        Some(&VmError::Arithmetic(ArithmeticError::DivisionByZero))
    );
    assert!(script.is_terminated());
    assert_eq!(script.get_global("z"), Some(Value::Null));

    let errors = harness.errors();
    assert_eq!(errors.len(), 1);
    let entry = &errors[0];
    assert_eq!(entry.message, "uncaught runtime error");
    assert_eq!(entry.error.as_deref(), Some("division by zero"));
    assert_eq!(entry.location.as_deref(), Some("test:2"));
    assert_eq!(entry.script_name.as_deref(), Some("test"));
    assert_eq!(entry.function, None);
}

#[test]
fn test_uncaught_error_names_function() {
    let harness = Harness::new();
    let script = harness.start("function f() {\n  return 1 / 0;\n}\nf();");
    assert!(script.failure().is_some());

    let errors = harness.errors();
    assert_eq!(errors[0].function.as_deref(), Some("f"));
    assert_eq!(errors[0].location.as_deref(), Some("test:2"));
    assert_eq!(
        errors[0].to_string(),
        "[test] test:2: uncaught runtime error: division by zero (in f)"
    );
}

#[test]
fn test_throw_non_string_uses_display_form() {
    let script = run("try { throw(1 / 2); } catch (e) { m = e; }");
    assert_eq!(global(&script, "m"), string("0.5"));
}
