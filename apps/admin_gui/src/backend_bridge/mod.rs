//! Backend bridge: commands queued from pages and the runtime that executes them.

pub mod commands;
pub mod runtime;
