//! Predefined constants folded at compile time

use crate::bytecode::Constant;
use snuvi_types::{E, PI};

/// Get a predefined constant by name (case-sensitive)
pub(crate) fn get_constant(name: &str) -> Option<Constant> {
    match name {
        "PI" => Some(Constant::Number(*PI)),
        "E" => Some(Constant::Number(*E)),
        _ => None,
    }
}
