//! Command-line interface: argument parsing with an interactive fallback
//! when the image path or mode selector is omitted, so the binary can be
//! driven either by arguments or by prompt.

use std::path::PathBuf;

use clap::Parser;
use text_io::read;

use crate::error::{SimulatorError, SimulatorResult};

/// Which execution mode to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Functional,
    PipelinedNoForwarding,
    PipelinedForwarding,
}

impl Mode {
    fn from_selector(selector: u32) -> Option<Self> {
        match selector {
            0 => Some(Mode::Functional),
            1 => Some(Mode::PipelinedNoForwarding),
            2 => Some(Mode::PipelinedForwarding),
            _ => None,
        }
    }
}

/// A 32-bit MIPS-lite instruction-set simulator with a functional reference
/// mode and two pipelined modes (with and without operand forwarding).
#[derive(Parser, Debug)]
#[command(name = "mips-lite-sim", version, about)]
struct Args {
    /// Path to the program image (one hex word per line). Prompted for
    /// interactively if omitted.
    image: Option<PathBuf>,

    /// Execution mode: 0=functional, 1=pipelined (no forwarding),
    /// 2=pipelined (forwarding). Prompted for interactively if omitted.
    #[arg(short, long)]
    mode: Option<u32>,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,
}

/// The resolved configuration for a single run.
pub struct Config {
    pub image: PathBuf,
    pub mode: Mode,
    pub verbose: bool,
}

/// Parses CLI arguments, falling back to interactive prompts for any of
/// `image`/`mode` left unspecified.
pub fn parse() -> SimulatorResult<Config> {
    let args = Args::parse();

    let image = match args.image {
        Some(path) => path,
        None => {
            print!("Program image file: ");
            let line: String = read!("{}\n");
            PathBuf::from(line.trim())
        }
    };

    let selector: u32 = match args.mode {
        Some(m) => m,
        None => {
            print!("Mode (0=functional, 1=no-forwarding, 2=forwarding): ");
            let selector: u32 = read!("{}\n");
            selector
        }
    };

    let mode = Mode::from_selector(selector).ok_or_else(|| {
        SimulatorError::ConfigError(format!(
            "invalid mode selector '{selector}': expected 0, 1, or 2"
        ))
    })?;

    Ok(Config { image, mode, verbose: args.verbose })
}
