//! Job concurrency analysis of parallel make builds

#![deny(missing_docs)]

mod display;
mod report;
mod tree;

use clap::{Parser, Subcommand};
use jobtrace::{AnalysisError, IntervalError};
use log::debug;
use makelog::{LogLoadError, LogReadError};
use std::{io, num::NonZeroUsize, path::PathBuf, process::ExitCode};
use thiserror::Error;

/// Reconstruct the job concurrency of a parallel build from its process log
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Build log to be analyzed
    #[arg(short, long, default_value = makelog::DEFAULT_LOCATION)]
    log: PathBuf,

    /// Analysis to be performed
    #[command(subcommand)]
    command: Command,
}

/// Available analyses
#[derive(Subcommand, Debug)]
enum Command {
    /// Show how long the build ran with each number of concurrent jobs
    Conprocs(report::ConprocsArgs),

    /// Show the time intervals of some processes, and how they overlap
    Timeline {
        /// Processes to be displayed (default: all processes)
        pids: Vec<String>,
    },

    /// Show the process tree
    Ptree {
        /// Only show processes that spawned children
        #[arg(long)]
        make: bool,

        /// Process at the root of the displayed tree (default: toplevel)
        pid: Option<String>,
    },

    /// Show child processes packed into non-overlapping execution lanes
    Lanes {
        /// Process whose children are displayed (default: toplevel)
        pid: Option<String>,
    },

    /// Locate periods of the build with unusually low parallelism
    Bottleneck {
        /// Number of time slices that the build is cut into
        num_parts: NonZeroUsize,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Run the requested analysis
fn run(args: Args) -> Result<(), CliError> {
    debug!("Reading build log from {}", args.log.display());
    let records = makelog::open(&args.log)?;
    let mut output = io::stdout().lock();
    match args.command {
        Command::Conprocs(conprocs) => report::conprocs(&mut output, records, &conprocs),
        Command::Timeline { pids } => report::timeline(&mut output, records, pids),
        Command::Ptree { make, pid } => tree::ptree(&mut output, records, make, pid.as_deref()),
        Command::Lanes { pid } => tree::lanes(&mut output, records, pid.as_deref()),
        Command::Bottleneck { num_parts } => report::bottleneck(&mut output, records, num_parts),
    }
}

/// Things that can go wrong while running an analysis
#[derive(Debug, Error)]
enum CliError {
    /// Failed to open the build log
    #[error(transparent)]
    Load(#[from] LogLoadError),

    /// Failed to read a record from the build log
    #[error(transparent)]
    Read(#[from] LogReadError),

    /// Concurrency analysis failed
    #[error("concurrency analysis failed ({0})")]
    Analysis(#[from] AnalysisError),

    /// A record has an invalid time span
    #[error("invalid process time span ({0})")]
    Interval(#[from] IntervalError),

    /// The requested process is not in the build log
    #[error("no process with PID={0} in the build log")]
    UnknownPid(Box<str>),

    /// The build log has no toplevel process
    #[error("no top-most record found")]
    NoRoot,

    /// Failed to write the report
    #[error("failed to write report ({0})")]
    Io(#[from] io::Error),
}
