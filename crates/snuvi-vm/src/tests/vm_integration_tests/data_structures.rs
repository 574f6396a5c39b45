use super::helpers::{execute, frac, global, num, run, string};
use snuvi_types::Value;

#[test]
fn test_list_operations() {
    let script = run(
        "l = list.new(); list.add(l, 10); list.add(l, \"x\"); \
         a = list.get(l, 0); b = l[1]; n = list.size(l); l[0] += 5; c = l[0];",
    );
    assert_eq!(global(&script, "a"), num(10));
    assert_eq!(global(&script, "b"), string("x"));
    assert_eq!(global(&script, "n"), num(2));
    assert_eq!(global(&script, "c"), num(15));
}

#[test]
fn test_list_index_out_of_bounds() {
    let err = execute("l = list.new(); x = l[0];").unwrap_err();
    assert_eq!(err, "Runtime error: index 0 out of bounds for list of length 0");
    let err = execute("l = list.new(); list.add(l, 1); x = list.get(l, -1);").unwrap_err();
    assert!(err.contains("index -1 out of bounds"), "{}", err);
}

#[test]
fn test_list_index_must_be_integer() {
    let err = execute("l = list.new(); list.add(l, 1); x = l[1 / 2];").unwrap_err();
    assert!(err.contains("expected integer"), "{}", err);
}

#[test]
fn test_lists_share_by_reference() {
    let script = run("a = list.new(); b = a; list.add(b, 1); n = list.size(a); same = a == b;");
    assert_eq!(global(&script, "n"), num(1));
    assert_eq!(global(&script, "same"), Value::Bool(true));
}

#[test]
fn test_list_display() {
    let script = run("l = list.new(); list.add(l, 1); list.add(l, 1 / 2); s = str(l);");
    assert_eq!(global(&script, "s"), string("[1, 0.5]"));
}

#[test]
fn test_self_containing_list_prints() {
    let script = run(
        "l = list.new(); list.add(l, 1); list.add(l, l); s = str(l); t = \"\" + l; \
         m = list.new(); list.add(m, 1); list.add(m, m); same = l == m; \
         try { throw(l); } catch (e) { msg = e; }",
    );
    assert_eq!(global(&script, "s"), string("[1, [...]]"));
    assert_eq!(global(&script, "t"), string("[1, [...]]"));
    assert_eq!(global(&script, "same"), Value::Bool(true));
    assert_eq!(global(&script, "msg"), string("[1, [...]]"));
}

#[test]
fn test_self_containing_map_prints() {
    let script = run("m = map.new(); map.put(m, \"self\", m); s = str(m);");
    assert_eq!(global(&script, "s"), string("{self={...}}"));
}

#[test]
fn test_map_operations() {
    let script = run(
        "m = map.new(); map.put(m, \"a\", 1); m[\"b\"] = 2; m[\"a\"] += 10; \
         a = map.get(m, \"a\"); b = m[\"b\"]; missing = m[\"zzz\"]; \
         has = map.contains(m, \"b\"); n = len(m);",
    );
    assert_eq!(global(&script, "a"), num(11));
    assert_eq!(global(&script, "b"), num(2));
    assert_eq!(global(&script, "missing"), Value::Null);
    assert_eq!(global(&script, "has"), Value::Bool(true));
    assert_eq!(global(&script, "n"), num(2));
}

#[test]
fn test_map_keys_compare_by_value() {
    let script = run("m = map.new(); m[2 / 4] = \"half\"; v = m[1 / 2]; w = map.get(m, 0.5);");
    assert_eq!(global(&script, "v"), string("half"));
    assert_eq!(global(&script, "w"), string("half"));
}

#[test]
fn test_containers_are_not_keys() {
    let err = execute("m = map.new(); m[list.new()] = 1;").unwrap_err();
    assert_eq!(err, "Runtime error: list cannot be used as a map key or set element");
    let err = execute("s = set.new(); set.add(s, map.new());").unwrap_err();
    assert!(err.contains("map cannot be used"), "{}", err);
}

#[test]
fn test_set_operations() {
    let script = run(
        "s = set.new(); first = set.add(s, \"x\"); again = set.add(s, \"x\"); \
         set.add(s, 1); has = set.contains(s, 1); absent = set.contains(s, 2); n = len(s);",
    );
    assert_eq!(global(&script, "first"), Value::Bool(true));
    assert_eq!(global(&script, "again"), Value::Bool(false));
    assert_eq!(global(&script, "has"), Value::Bool(true));
    assert_eq!(global(&script, "absent"), Value::Bool(false));
    assert_eq!(global(&script, "n"), num(2));
}

#[test]
fn test_sets_are_not_indexable() {
    let err = execute("s = set.new(); x = s[0];").unwrap_err();
    assert!(err.contains("type error in indexing"), "{}", err);
}

#[test]
fn test_array_operations() {
    let script = run(
        "a = array.new(2, 3); a[1, 2] = 5; a[0, 0] = 1 / 3; \
         x = a[1, 2]; y = a[0, 0]; z = a[0, 1]; n = len(a); d = array.dims(a); d1 = d[1];",
    );
    assert_eq!(global(&script, "x"), num(5));
    assert_eq!(global(&script, "y"), frac(1, 3));
    assert_eq!(global(&script, "z"), Value::Null);
    assert_eq!(global(&script, "n"), num(6));
    assert_eq!(global(&script, "d1"), num(3));
}

#[test]
fn test_array_fill_with_loops() {
    let script = run(
        "a = array.new(3, 3); \
         for (i, 0, 2) { for (j, 0, 2) { a[i, j] = i * 3 + j; } } \
         s = 0; for (i, 0, 2) { s += a[i, i]; }",
    );
    assert_eq!(global(&script, "s"), num(12));
}

#[test]
fn test_array_dimension_mismatch() {
    let err = execute("a = array.new(2, 2); x = a[1];").unwrap_err();
    assert_eq!(
        err,
        "Runtime error: array has 2 dimension(s), got 1 index value(s)"
    );
    let err = execute("l = list.new(); x = l[0, 1];").unwrap_err();
    assert!(err.contains("array has 1 dimension(s), got 2"), "{}", err);
}

#[test]
fn test_array_out_of_bounds() {
    let err = execute("a = array.new(2); a[2] = 1;").unwrap_err();
    assert!(err.contains("out of bounds for dimension 0 of size 2"), "{}", err);
}

#[test]
fn test_array_requires_dimensions() {
    let err = execute("a = array.new();").unwrap_err();
    assert_eq!(err, "Runtime error: 'array.new' takes 1 argument(s), got 0");
}

#[test]
fn test_nested_containers() {
    let script = run(
        "m = map.new(); m[\"list\"] = list.new(); list.add(m[\"list\"], 7); \
         inner = m[\"list\"]; x = inner[0]; m[\"list\"][0] = 8; y = inner[0];",
    );
    assert_eq!(global(&script, "x"), num(7));
    assert_eq!(global(&script, "y"), num(8));
}

#[test]
fn test_typeof_containers() {
    let script = run(
        "a = typeof(map.new()); b = typeof(set.new()); c = typeof(array.new(1)); d = typeof(null);",
    );
    assert_eq!(global(&script, "a"), string("map"));
    assert_eq!(global(&script, "b"), string("set"));
    assert_eq!(global(&script, "c"), string("array"));
    assert_eq!(global(&script, "d"), string("null"));
}
