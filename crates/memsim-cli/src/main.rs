use std::{io, num::NonZeroUsize, process};

use argh::FromArgs;
use log::{LevelFilter, info};
use memsim::{DEFAULT_PAGE_SIZE, DEFAULT_TOTAL_MEMORY, MemoryConfig, Simulator};
use memsim_cli::{
    logger,
    shell::{DEFAULT_GRANULARITY, DEFAULT_MAP_WIDTH, DisplayConfig, Shell},
};
use snafu::ResultExt as _;
use snafu_utils::{GenericError, Report};

/// Interactive simulator of contiguous allocation and pure paging.
#[derive(Debug, FromArgs)]
struct Args {
    /// total simulated memory in bytes
    #[argh(option, default = "DEFAULT_TOTAL_MEMORY")]
    memory: usize,
    /// page size in bytes used by the paging model
    #[argh(option, default = "DEFAULT_PAGE_SIZE")]
    page_size: usize,
    /// bytes per cell of the contiguous occupancy map
    #[argh(option, default = "DEFAULT_GRANULARITY")]
    granularity: NonZeroUsize,
    /// maximum number of glyphs in an occupancy map
    #[argh(option, default = "DEFAULT_MAP_WIDTH")]
    width: NonZeroUsize,
    /// log level: off, error, warn, info, debug or trace
    #[argh(option, default = "LevelFilter::Warn")]
    log_level: LevelFilter,
    /// disable colored output
    #[argh(switch)]
    no_color: bool,
}

fn main() {
    let args: Args = argh::from_env();

    if let Err(err) = run(&args) {
        let report = Report::new(err);
        if args.no_color {
            eprintln!("{}", report.plain());
        } else {
            eprintln!("{report}");
        }
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), GenericError> {
    logger::init(args.log_level, !args.no_color).whatever_context("failed to install logger")?;

    let config = MemoryConfig::new(args.memory, args.page_size)
        .whatever_context("invalid memory configuration")?;
    info!(
        "simulating {} bytes, {} frames of {} bytes",
        config.total_memory_bytes(),
        config.total_frames(),
        config.page_size()
    );

    let display = DisplayConfig {
        granularity: args.granularity,
        width: args.width,
        color: !args.no_color,
    };
    let mut shell = Shell::new(
        Simulator::new(config),
        display,
        io::stdin().lock(),
        io::stdout().lock(),
    );
    shell.run().whatever_context("interactive session failed")?;

    Ok(())
}
