use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use sim_lib::arch::ArchState;
use sim_lib::cli::{self, Mode};
use sim_lib::error::SimulatorResult;
use sim_lib::pipeline::{self, HazardMode};
use sim_lib::stats::Stats;
use sim_lib::summary::format_summary;
use sim_lib::{functional, loader};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> SimulatorResult<()> {
    let config = cli::parse()?;

    let filter = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).expect("static log filter is valid"))
        .init();

    let image = loader::load_image(&config.image)?;
    let mut arch = ArchState::new(&image);

    let stats: Stats = match config.mode {
        Mode::Functional => functional::run(&mut arch, image.len())?,
        Mode::PipelinedNoForwarding => {
            pipeline::run(&mut arch, image.len(), HazardMode::NoForwarding)?
        }
        Mode::PipelinedForwarding => {
            pipeline::run(&mut arch, image.len(), HazardMode::Forwarding)?
        }
    };

    print!("{}", format_summary(&stats, &arch.registers, &arch.memory));
    Ok(())
}
