//! The pipelined execution modes (with and without forwarding).

pub mod controller;
pub mod hazard;
pub mod registers;

pub use controller::{run, HazardMode};
