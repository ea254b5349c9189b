// Device-agnostic input handling with gamepad ownership

pub mod core;
pub mod engine;
