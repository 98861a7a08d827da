//! Error types for the simulator

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the simulator
#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("Failed to load program image: {0}")]
    ImageError(#[from] ImageError),

    #[error("Execution error: {0}")]
    ExecutionError(#[from] ExecutionError),

    #[error("Invalid instruction {0:#010x} at PC={1:#010x}")]
    InvalidInstructionError(u32, u32),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Errors related to loading the program image
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to read image file '{0}': {1}")]
    FileReadError(PathBuf, #[source] std::io::Error),

    #[error("Image file '{0}' is empty")]
    Empty(PathBuf),

    #[error("Invalid hexadecimal word '{1}' on line {0}")]
    InvalidWord(usize, String),
}

/// Errors related to architectural execution (out-of-bounds accesses, etc.)
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Effective address {0:#x} is not word-aligned")]
    Unaligned(i64),

    #[error("Effective address {0:#x} is out of memory range (capacity {1} words)")]
    OutOfRange(i64, usize),
}

/// Type alias for Result with SimulatorError
pub type SimulatorResult<T> = Result<T, SimulatorError>;
