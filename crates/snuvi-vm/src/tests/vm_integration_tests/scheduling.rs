use super::helpers::{global, num, string, Harness};
use crate::bytecode::{Constant, Instruction, Op, Program};
use crate::config::EngineConfig;
use crate::host::{LogLevel, ScriptResource};
use crate::vm::{Script, ScriptId, ScriptState};
use snuvi_lexer::SourceLine;
use snuvi_types::{Rational, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const TICK_COUNTER: &str = "event.load(\"tick\"); count = 0; \
    while (true) { wait(); if (event == \"tick\") { count++; } }";

#[test]
fn test_events_resume_waiting_scripts() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    let id = manager.start("counter", TICK_COUNTER).unwrap();
    assert_eq!(manager.get(id).unwrap().state(), ScriptState::Waiting);

    assert_eq!(manager.fire_event("tick"), 1);
    assert_eq!(manager.fire_event("other"), 0);
    assert_eq!(manager.fire_event("tick"), 1);
    assert_eq!(manager.fire_event("tick"), 1);

    let script = manager.get(id).unwrap();
    assert_eq!(global(script, "count"), num(3));
    assert_eq!(global(script, "event"), string("tick"));
    assert_eq!(script.state(), ScriptState::Waiting);
}

#[test]
fn test_event_reaches_every_listener() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    let a = manager.start("a", TICK_COUNTER).unwrap();
    let b = manager.start("b", TICK_COUNTER).unwrap();
    manager.start("deaf", "wait();").unwrap();

    assert_eq!(manager.fire_event("tick"), 2);
    assert_eq!(global(manager.get(a).unwrap(), "count"), num(1));
    assert_eq!(global(manager.get(b).unwrap(), "count"), num(1));
    assert_eq!(manager.len(), 3);
}

#[test]
fn test_event_variables() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    let id = manager
        .start("chat", "event.load(\"chat\"); wait(); got = message + \"!\"; wait();")
        .unwrap();

    let resumed = manager.fire_event_with("chat", &[("message", Value::from("hi"))]);
    assert_eq!(resumed, 1);
    assert_eq!(global(manager.get(id).unwrap(), "got"), string("hi!"));
}

#[test]
fn test_finished_scripts_are_reaped_after_events() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    manager.start("once", "event.load(\"go\"); wait(); done = true;").unwrap();
    assert_eq!(manager.len(), 1);

    assert_eq!(manager.fire_event("go"), 1);
    assert!(manager.is_empty());
}

#[test]
fn test_event_unload() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    let id = manager
        .start(
            "events",
            "event.load(\"a\"); x = event.isloaded(\"a\"); event.unload(\"a\"); \
             y = event.isloaded(\"a\"); wait();",
        )
        .unwrap();

    let script = manager.get(id).unwrap();
    assert_eq!(global(script, "x"), Value::Bool(true));
    assert_eq!(global(script, "y"), Value::Bool(false));
    assert!(!script.is_event_loaded("a"));
    assert_eq!(manager.fire_event("a"), 0);
}

#[test]
fn test_sleep_holds_until_scheduled() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    let id = manager.start("sleeper", "a = 1; sleep(5); a = 2; print(a);").unwrap();

    assert_eq!(manager.get(id).unwrap().state(), ScriptState::Holded);
    assert_eq!(global(manager.get(id).unwrap(), "a"), num(1));
    assert_eq!(harness.scheduler.pending(), 1);

    assert!(harness.scheduler.advance(4).is_empty());
    assert_eq!(harness.scheduler.advance(1), vec![id]);
    assert!(manager.resume(id));

    // Finished during the resume, so already reaped
    assert!(manager.get(id).is_none());
    assert!(manager.is_empty());
    assert_eq!(harness.printed(), vec!["2".to_string()]);
}

#[test]
fn test_resume_requires_held_script() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    let id = manager.start("waiter", "wait();").unwrap();
    assert!(!manager.resume(id));
    assert!(!manager.resume(ScriptId(99)));
}

#[test]
fn test_sleep_rejects_non_numbers() {
    let harness = Harness::new();
    let script = harness.start("sleep(\"soon\");");
    assert_eq!(
        script.failure().map(|e| e.to_string()),
        Some("type error in sleep: expected number, got string".to_string())
    );
}

#[test]
fn test_term_ends_script() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    let id = manager.start("quitter", "x = 1; term(); x = 2;").unwrap();
    assert!(manager.get(id).unwrap().is_terminated());
    assert_eq!(manager.reap(), vec![id]);
    assert!(harness.warnings().is_empty());
}

#[test]
fn test_quantum_expiry_yields() {
    let harness = Harness::with_config(EngineConfig {
        quantum_micros: 0,
        check_interval: 1,
        ..EngineConfig::default()
    });
    let mut manager = harness.manager();
    let id = manager
        .start("busy", "c = 0; for (i, 1, 100) { c++; } print(c);")
        .unwrap();
    assert_eq!(manager.get(id).unwrap().state(), ScriptState::Holded);

    let mut rounds = 0;
    while manager.get(id).is_some() {
        for ready in harness.scheduler.advance(0) {
            assert!(manager.resume(ready));
        }
        rounds += 1;
        assert!(rounds < 10_000, "script never finished");
    }
    assert!(rounds > 100);
    assert_eq!(harness.printed(), vec!["100".to_string()]);
}

#[test]
fn test_quantum_resume_delay() {
    let harness = Harness::with_config(EngineConfig {
        quantum_micros: 0,
        check_interval: 1,
        quantum_resume_delay: 3,
        ..EngineConfig::default()
    });
    let mut manager = harness.manager();
    let id = manager.start("busy", "a = 1; b = 2;").unwrap();

    assert!(harness.scheduler.advance(2).is_empty());
    assert_eq!(harness.scheduler.advance(1), vec![id]);
}

struct TestResource {
    name: &'static str,
    closed: Arc<AtomicBool>,
}

impl ScriptResource for TestResource {
    fn name(&self) -> &str {
        self.name
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[test]
fn test_open_resources_closed_on_terminate() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    let id = manager.start("owner", "wait();").unwrap();

    let open = Arc::new(AtomicBool::new(false));
    let closed = Arc::new(AtomicBool::new(true));
    let script = manager.get_mut(id).unwrap();
    script.add_resource(Box::new(TestResource {
        name: "file",
        closed: Arc::clone(&open),
    }));
    script.add_resource(Box::new(TestResource {
        name: "socket",
        closed: Arc::clone(&closed),
    }));

    assert!(manager.terminate(id));
    assert!(open.load(Ordering::SeqCst));
    assert_eq!(harness.warnings(), vec!["resource 'file' was not closed".to_string()]);
    assert!(manager.get(id).is_none());
    assert!(!manager.terminate(id));
}

#[test]
fn test_shared_variables_cross_scripts() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    manager
        .start("writer", "shared.set(\"k\", 5); shared.set(\"gone\", 1); shared.remove(\"gone\");")
        .unwrap();
    let reader = manager
        .start(
            "reader",
            "v = shared.get(\"k\"); h = shared.has(\"gone\"); u = shared.get(\"nope\"); wait();",
        )
        .unwrap();

    let script = manager.get(reader).unwrap();
    assert_eq!(global(script, "v"), num(5));
    assert_eq!(global(script, "h"), Value::Bool(false));
    assert_eq!(global(script, "u"), Value::Null);
    assert_eq!(harness.engine.shared().get("k"), Some(num(5)));
}

#[test]
fn test_failure_is_isolated() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    let bad = manager.start("bad", "x = 1 / 0;").unwrap();
    let good = manager.start("good", TICK_COUNTER).unwrap();

    assert!(manager.get(bad).unwrap().failure().is_some());
    assert_eq!(manager.reap(), vec![bad]);
    assert_eq!(manager.fire_event("tick"), 1);
    assert_eq!(global(manager.get(good).unwrap(), "count"), num(1));

    let errors = harness.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].script_id, Some(bad));
}

#[test]
fn test_compile_error_is_logged() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    let err = manager.start("bad", "x = ;").unwrap_err();
    assert_eq!(err.file, "bad");
    assert!(manager.is_empty());

    let errors = harness.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "compile error");
    assert_eq!(errors[0].location.as_deref(), Some("bad:1"));
    assert_eq!(errors[0].script_name.as_deref(), Some("bad"));
    assert_eq!(errors[0].script_id, None);
}

#[test]
fn test_values_left_on_stack_are_reported() {
    let harness = Harness::new();
    // A lone push with nothing consuming it
    let program = Program {
        code: vec![Instruction::new(
            SourceLine::new(0, 1),
            0,
            Op::Push(Constant::Number(Rational::ONE)),
        )],
        files: vec!["test".to_string()],
        ..Default::default()
    };
    let mut script = Script::new(Arc::clone(&harness.engine), Arc::new(program), "test", ScriptId(1));
    script.run();

    assert!(script.is_terminated());
    let warnings = harness.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("1 value(s) left on the stack"), "{}", warnings[0]);
}

#[test]
fn test_term_with_pending_operands_is_silent() {
    let harness = Harness::new();
    let script = harness.start("x = term();");
    assert!(script.is_terminated());
    assert_eq!(script.stack_depth(), 0);

    let script = harness.start("function f() { term(); return 1; } a = 1 + f(); b = 2;");
    assert!(script.is_terminated());
    assert!(script.failure().is_none());
    assert_eq!(global(&script, "a"), Value::Null);
    assert_eq!(global(&script, "b"), Value::Null);
    assert!(harness.warnings().is_empty(), "{:?}", harness.warnings());
}

#[test]
fn test_script_ids_are_unique() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    let a = manager.start("a", "wait();").unwrap();
    let b = manager.start("b", "wait();").unwrap();
    assert_ne!(a, b);
    assert_eq!(manager.ids(), vec![a, b]);
    assert_eq!(manager.get(a).unwrap().name(), "a");
}

#[test]
fn test_print_carries_script_identity() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    let id = manager.start("talker", "print(\"hello\");").unwrap();

    let entries: Vec<_> = harness
        .logger
        .entries()
        .into_iter()
        .filter(|e| e.level == LogLevel::Info)
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "hello");
    assert_eq!(entries[0].script_id, Some(id));
    assert_eq!(entries[0].script_name.as_deref(), Some("talker"));
}
