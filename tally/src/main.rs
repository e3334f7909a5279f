use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{Context, Result};
use clap::Parser;
use tally::{Cli, MemoryMode, Workbench, logger};
use tally_probe::{CountingAllocator, MemorySource, NoMemory, ResidentSet};

#[global_allocator]
static ALLOC: CountingAllocator = CountingAllocator::new();

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.log_level).context("failed to install logger")?;

    let memory: Box<dyn MemorySource> = match cli.memory {
        MemoryMode::Rss => Box::new(ResidentSet),
        MemoryMode::Alloc => Box::new(&ALLOC),
        MemoryMode::Off => Box::new(NoMemory),
    };
    let mut workbench = Workbench::with_memory(cli.workbench_config(), memory);
    log::info!(
        "ring capacity {}, memory source {:?}",
        workbench.config().ring_capacity,
        cli.memory
    );

    let stdout = io::stdout().lock();
    let summary = match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            tally::run(&mut workbench, BufReader::new(file), stdout)
                .with_context(|| format!("failed while running {}", path.display()))?
        }
        None => tally::run(&mut workbench, io::stdin().lock(), stdout)
            .context("failed while reading commands from stdin")?,
    };

    log::info!(
        "{} commands run, {} lines rejected",
        summary.commands,
        summary.rejected
    );
    Ok(())
}
