//! Textual reports on job concurrency

use crate::{display::duration::HumanDuration, CliError};
use jobtrace::{
    AnalysisConfig, Anomalies, ConcurrencyAnalyzer, ConcurrencyProfile, IntervalMap, Mode,
    ProcessRecord, Timeline,
};
use makelog::LogReadError;
use std::{io::Write, num::NonZeroUsize};

/// Options of the concurrency histogram
#[derive(clap::Args, Debug)]
pub struct ConprocsArgs {
    /// Count every process
    #[arg(long, group = "mode")]
    all: bool,

    /// Only count processes that did not spawn children (default)
    #[arg(long, group = "mode")]
    non_make: bool,

    /// Only count processes that spawned children
    #[arg(long, group = "mode")]
    only_make: bool,

    /// Show how many processes of each tool ran at each concurrency level
    #[arg(long)]
    tools: bool,

    /// Show which processes ran at each concurrency level
    #[arg(long)]
    procs: bool,

    /// Show which processes ran at a given concurrency level
    #[arg(long, value_name = "N")]
    procs_j: Option<usize>,

    /// Also show the timeline of the counted processes
    #[arg(long)]
    timeline: bool,
}
//
impl ConprocsArgs {
    /// Which processes should be counted
    fn mode(&self) -> Mode {
        if self.all {
            Mode::All
        } else if self.only_make && !self.non_make {
            Mode::OnlyMake
        } else {
            Mode::NonMake
        }
    }

    /// Truth that processes should be listed at some concurrency level
    fn list_procs(&self, level: usize) -> bool {
        self.procs || self.procs_j == Some(level)
    }
}

/// Run a concurrency analysis over a build log
fn analyze(
    records: impl Iterator<Item = Result<ProcessRecord, LogReadError>>,
    config: AnalysisConfig,
) -> Result<ConcurrencyProfile, CliError> {
    let mut analyzer = ConcurrencyAnalyzer::new(config);
    for record in records {
        analyzer.add(record?)?;
    }
    Ok(analyzer.finish()?)
}

/// Display the time spent at each concurrency level
pub fn conprocs(
    mut output: impl Write,
    records: impl Iterator<Item = Result<ProcessRecord, LogReadError>>,
    args: &ConprocsArgs,
) -> Result<(), CliError> {
    let profile = analyze(
        records,
        AnalysisConfig {
            mode: args.mode(),
            require_root: true,
            save_commands: args.timeline,
        },
    )?;
    let root = profile.root_record().ok_or(CliError::NoRoot)?;
    let counted = match profile.mode() {
        Mode::All => "all processes",
        Mode::OnlyMake => "processes that spawned children",
        Mode::NonMake => "processes that did not spawn children",
        Mode::SpecificPids(_) => "selected processes",
    };

    writeln!(output, "Counting {counted}")?;
    writeln!(output, "Total processes considered: {}", profile.total_processes())?;
    writeln!(output, "Build duration: {}", HumanDuration(root.duration()))?;
    writeln!(output, "\nTime spent at each concurrency level:")?;
    for (level, percent) in profile.histogram() {
        writeln!(
            output,
            "  J={level:<4} {percent:>6.2}%  {}",
            HumanDuration(profile.duration_at_level(level))
        )?;
        if args.tools {
            for (tool, count) in profile.tools_at_level(level) {
                let tool = if tool.is_empty() { "<unknown>" } else { tool };
                writeln!(output, "      {count:>5}  {tool}")?;
            }
        }
        if args.list_procs(level) {
            for id in profile.ids_at_level(level) {
                let record = profile.record_by_id(id);
                writeln!(output, "      PID={} {}", record.pid, record.cmdline)?;
            }
        }
    }

    if args.timeline {
        writeln!(output)?;
        write_timeline(&mut output, profile.map())?;
    }
    write_anomalies(output, profile.anomalies())
}

/// Display the intervals of some processes and how they overlap
pub fn timeline(
    mut output: impl Write,
    records: impl Iterator<Item = Result<ProcessRecord, LogReadError>>,
    pids: Vec<String>,
) -> Result<(), CliError> {
    let mode = if pids.is_empty() {
        Mode::All
    } else {
        Mode::SpecificPids(pids.into_iter().map(String::into_boxed_str).collect())
    };
    let profile = analyze(
        records,
        AnalysisConfig {
            mode,
            require_root: false,
            save_commands: true,
        },
    )?;
    write_timeline(&mut output, profile.map())?;
    write_anomalies(output, profile.anomalies())
}

/// Display the contents of an interval map
fn write_timeline(mut output: impl Write, map: &IntervalMap<Box<str>>) -> Result<(), CliError> {
    writeln!(output, "Processes:")?;
    for item in map.items() {
        write!(
            output,
            "  #{:<5} {:>12.3} .. {:<12.3} PID={}",
            item.id(),
            item.start(),
            item.end(),
            item.name()
        )?;
        if let Some(comment) = item.comment() {
            write!(output, " {comment}")?;
        }
        writeln!(output)?;
    }

    writeln!(output, "\nOccupancy:")?;
    for chunk in map.sweep().iter() {
        write!(
            output,
            "  {:>12.3} .. {:<12.3} {:>3} running:",
            chunk.start(),
            chunk.end(),
            chunk.ids().len()
        )?;
        for &id in chunk.ids() {
            write!(output, " {}", map.name(id))?;
        }
        writeln!(output)?;
    }
    Ok(())
}

/// Display the anomalies found in the build log, if any
pub fn write_anomalies(mut output: impl Write, anomalies: &Anomalies) -> Result<(), CliError> {
    if anomalies.is_empty() {
        return Ok(());
    }
    writeln!(output, "\nBuild log anomalies:")?;
    for anomaly in anomalies {
        writeln!(output, "- {anomaly}")?;
    }
    Ok(())
}

/// Display periods of the build with unusually low parallelism
pub fn bottleneck(
    mut output: impl Write,
    records: impl Iterator<Item = Result<ProcessRecord, LogReadError>>,
    num_parts: NonZeroUsize,
) -> Result<(), CliError> {
    let records = records.collect::<Result<Vec<_>, _>>()?;
    let timeline = Timeline::from_leaf_records(&records)?;
    let (Some(start), Some(finish)) = (timeline.start_time(), timeline.finish_time()) else {
        writeln!(output, "No job was found in the build log")?;
        return Ok(());
    };

    writeln!(output, "Leaf jobs: {}", timeline.num_records())?;
    writeln!(output, "First job start: {start:.3}")?;
    writeln!(output, "Last job finish: {finish:.3}")?;
    writeln!(
        output,
        "Wall-clock duration: {}",
        HumanDuration(timeline.wall_duration())
    )?;
    writeln!(
        output,
        "Cumulative job duration: {}",
        HumanDuration(timeline.cumulative_duration())
    )?;

    let report = timeline.bottlenecks(num_parts);
    writeln!(
        output,
        "\nMean running jobs per slice: {:.2} (std dev {:.2}, bottleneck below {:.2})",
        report.mean, report.std_dev, report.limit
    )?;
    for slice in report.slices.iter() {
        write!(
            output,
            "  {:>14} .. {:<14} {:>6.2}",
            HumanDuration(slice.start - start).to_string(),
            HumanDuration(slice.end - start).to_string(),
            slice.mean_jobs
        )?;
        if report.is_bottleneck(slice) {
            write!(output, "  <-- bottleneck")?;
        }
        writeln!(output)?;
    }
    Ok(())
}
