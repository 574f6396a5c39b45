pub mod helpers;

pub mod basic_operations;
pub mod control_flow;
pub mod data_structures;
pub mod exceptions;
pub mod functions;
pub mod operators;
pub mod scheduling;
