//! Built-in functions module
//!
//! The default native catalog, organized by category:
//! - Utils: error raising, type inspection, conversion, length
//! - I/O: print through the host logger
//! - Math: exact rational math and bit helpers
//! - Collections: lists, maps, sets and multi-dimensional arrays
//! - Shared: the cross-script variable table

mod args;
pub mod collections;
pub mod io;
pub mod math;
pub mod registry;
pub mod shared;
pub mod utils;

use registry::BuiltinRegistry;

/// Create and populate the built-in function registry
pub fn create_builtin_registry() -> BuiltinRegistry {
    let mut registry = BuiltinRegistry::new();

    // ========================================================================
    // Utils and I/O
    // ========================================================================

    registry.register("throw", utils::vm_throw, 1);
    registry.register("typeof", utils::vm_typeof, 1);
    registry.register("str", utils::vm_str, 1);
    registry.register("len", utils::vm_len, 1);
    registry.register("print", io::vm_print, -1); // variadic

    // ========================================================================
    // Math
    // ========================================================================

    registry.register("math.abs", math::vm_abs, 1);
    registry.register("math.floor", math::vm_floor, 1);
    registry.register("math.ceil", math::vm_ceil, 1);
    registry.register("math.round", math::vm_round, 1);
    registry.register("math.sqrt", math::vm_sqrt, 1);
    registry.register("math.root", math::vm_root, 2);
    registry.register("math.pow", math::vm_pow, 2);
    registry.register("math.min", math::vm_min, 2);
    registry.register("math.max", math::vm_max, 2);
    registry.register("math.pi", math::vm_pi, 0);
    registry.register("math.e", math::vm_e, 0);
    registry.register("math.todouble", math::vm_todouble, 1);

    // Bit helpers
    registry.register("bit.test", math::vm_bit_test, 2);
    registry.register("bit.set", math::vm_bit_set, 2);
    registry.register("bit.clear", math::vm_bit_clear, 2);

    // ========================================================================
    // Collections
    // ========================================================================

    registry.register("list.new", collections::vm_list_new, 0);
    registry.register("list.add", collections::vm_list_add, 2);
    registry.register("list.get", collections::vm_list_get, 2);
    registry.register("list.size", collections::vm_list_size, 1);

    registry.register("map.new", collections::vm_map_new, 0);
    registry.register("map.put", collections::vm_map_put, 3);
    registry.register("map.get", collections::vm_map_get, 2);
    registry.register("map.contains", collections::vm_map_contains, 2);

    registry.register("set.new", collections::vm_set_new, 0);
    registry.register("set.add", collections::vm_set_add, 2);
    registry.register("set.contains", collections::vm_set_contains, 2);

    registry.register("array.new", collections::vm_array_new, -1); // variadic
    registry.register("array.dims", collections::vm_array_dims, 1);

    // ========================================================================
    // Shared variables
    // ========================================================================

    registry.register("shared.set", shared::vm_shared_set, 2);
    registry.register("shared.get", shared::vm_shared_get, 1);
    registry.register("shared.has", shared::vm_shared_has, 1);
    registry.register("shared.remove", shared::vm_shared_remove, 1);

    registry
}
