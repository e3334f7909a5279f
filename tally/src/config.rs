//! Command-line configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::workbench::{MAX_RING_CAPACITY, WorkbenchConfig};

/// Where per-call memory deltas come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MemoryMode {
    /// Process resident set size (page granular).
    Rss,
    /// Live heap bytes counted by the global allocator.
    Alloc,
    /// Do not measure memory.
    Off,
}

/// Runs container commands from a script (or stdin) and reports the cost of
/// each call.
#[derive(Debug, Parser)]
#[command(name = "tally", version)]
#[command(about = "Drive classroom containers and measure every operation")]
pub struct Cli {
    /// Command script; reads stdin when absent
    pub script: Option<PathBuf>,

    /// Initial ring buffer capacity
    #[arg(
        long,
        default_value_t = 5,
        env = "TALLY_RING_CAPACITY",
        value_parser = clap::value_parser!(u32).range(1..=MAX_RING_CAPACITY as i64)
    )]
    pub ring_capacity: u32,

    /// Memory measurement source
    #[arg(long, value_enum, default_value_t = MemoryMode::Alloc)]
    pub memory: MemoryMode,

    /// Log level written to stderr (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", env = "TALLY_LOG")]
    pub log_level: LevelFilter,
}

impl Cli {
    /// Workbench settings derived from the flags.
    pub fn workbench_config(&self) -> WorkbenchConfig {
        WorkbenchConfig {
            ring_capacity: self.ring_capacity as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["tally"]).unwrap();
        assert_eq!(cli.script, None);
        assert_eq!(cli.memory, MemoryMode::Alloc);
        assert_eq!(cli.workbench_config(), WorkbenchConfig { ring_capacity: 5 });
    }

    #[test]
    fn flags_and_script() {
        let cli = Cli::try_parse_from([
            "tally",
            "--ring-capacity",
            "8",
            "--memory",
            "off",
            "--log-level",
            "debug",
            "demo.tally",
        ])
        .unwrap();

        assert_eq!(cli.ring_capacity, 8);
        assert_eq!(cli.memory, MemoryMode::Off);
        assert_eq!(cli.log_level, LevelFilter::Debug);
        assert_eq!(cli.script, Some(PathBuf::from("demo.tally")));
    }

    #[test]
    fn ring_capacity_is_bounded() {
        assert!(Cli::try_parse_from(["tally", "--ring-capacity", "0"]).is_err());
        assert!(Cli::try_parse_from(["tally", "--ring-capacity", "4000000000"]).is_err());

        let max = MAX_RING_CAPACITY.to_string();
        let cli = Cli::try_parse_from(["tally", "--ring-capacity", max.as_str()]).unwrap();
        assert_eq!(cli.workbench_config().ring_capacity, MAX_RING_CAPACITY);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
