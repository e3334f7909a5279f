//! Workbench for the `tally` containers.
//!
//! Reads commands line by line, runs each against one long-lived instance
//! of every container, and reports the outcome together with the measured
//! cost of every call.
//!
//! ```
//! use tally::{Workbench, WorkbenchConfig, run};
//! use tally_probe::NoMemory;
//!
//! let mut bench = Workbench::with_memory(WorkbenchConfig::default(), Box::new(NoMemory));
//! let script = "queue enqueue a,b\nqueue dequeue\n";
//! let mut out = Vec::new();
//!
//! let summary = run(&mut bench, script.as_bytes(), &mut out).unwrap();
//! assert_eq!(summary.commands, 2);
//! assert_eq!(summary.rejected, 0);
//! ```

#![warn(missing_docs)]

pub mod command;
pub mod config;
pub mod logger;
pub mod render;
pub mod workbench;

pub use command::{Action, Command, CommandError, Item, Structure};
pub use config::{Cli, MemoryMode};
pub use workbench::{Message, Report, Snapshot, Workbench, WorkbenchConfig};

use std::io::{self, BufRead, Write};

/// Counts from one [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Commands executed.
    pub commands: usize,
    /// Lines that failed to parse or were not supported.
    pub rejected: usize,
}

/// Executes every command in `input`, writing reports to `out`.
///
/// A bad line is reported to `out` and skipped; only I/O errors stop the
/// run.
pub fn run<R, W>(workbench: &mut Workbench, input: R, mut out: W) -> io::Result<Summary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = Summary::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let number = index + 1;

        let outcome = Command::parse_line(&line)
            .and_then(|command| command.map(|c| workbench.execute(c)).transpose());

        match outcome {
            Ok(Some(report)) => {
                summary.commands += 1;
                writeln!(out, "{report}")?;
            }
            Ok(None) => {}
            Err(err) => {
                summary.rejected += 1;
                log::warn!("line {number}: {err}");
                writeln!(out, "line {number}: {err}\n")?;
            }
        }
    }

    out.flush()?;
    Ok(summary)
}
