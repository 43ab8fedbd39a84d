//! Detection of periods of low build parallelism
//!
//! Only leaf processes (those which did not spawn any child) are taken into
//! account, since they are the ones doing the actual work. The build's
//! wall-clock span is cut into equal slices, the mean number of running jobs
//! is computed for each slice, and slices that fall far below the average are
//! flagged as bottlenecks.

use crate::{
    interval::{IntervalError, IntervalMap},
    parents::ParentFinder,
    record::{Duration, ProcessRecord, Timestamp},
};
use log::debug;
use std::num::NonZeroUsize;

/// Number of standard deviations below the mean at which a slice of the build
/// is considered to be a bottleneck (one-sided 95% normal quantile)
pub const BOTTLENECK_Z_SCORE: f64 = 1.64;

/// Job occupancy of the build over time
#[derive(Debug, Default)]
pub struct Timeline {
    /// Wall-clock intervals of the recorded jobs, named by PID
    map: IntervalMap<Box<str>>,

    /// Earliest start and latest end of a recorded job
    span: Option<(Timestamp, Timestamp)>,

    /// Sum of the durations of the recorded jobs
    cumulative_duration: Duration,
}
//
impl Timeline {
    /// Set up an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the timeline of leaf processes from a build log
    ///
    /// Records must come in order of completion, as build logs list them.
    pub fn from_leaf_records<'a>(
        records: impl IntoIterator<Item = &'a ProcessRecord>,
    ) -> Result<Self, IntervalError> {
        let mut finder = ParentFinder::new();
        let mut timeline = Self::new();
        for record in records {
            finder.record(record);
            if !finder.is_parent(record) {
                timeline.record(record)?;
            }
        }
        debug!(
            "Recorded {} leaf jobs in the build timeline",
            timeline.num_records()
        );
        Ok(timeline)
    }

    /// Add a job to the timeline
    pub fn record(&mut self, record: &ProcessRecord) -> Result<(), IntervalError> {
        let duration = record.duration();
        self.map.add(record.start, duration, record.pid.clone(), None)?;
        self.cumulative_duration += duration;
        self.span = Some(match self.span {
            Some((start, end)) => (start.min(record.start), end.max(record.end)),
            None => (record.start, record.end),
        });
        Ok(())
    }

    /// Number of recorded jobs
    pub fn num_records(&self) -> usize {
        self.map.len()
    }

    /// Start time of the earliest job
    pub fn start_time(&self) -> Option<Timestamp> {
        self.span.map(|(start, _)| start)
    }

    /// End time of the latest job
    pub fn finish_time(&self) -> Option<Timestamp> {
        self.span.map(|(_, end)| end)
    }

    /// Wall-clock time from the start of the first job to the end of the last
    pub fn wall_duration(&self) -> Duration {
        self.span.map_or(0.0, |(start, end)| end - start)
    }

    /// Sum of the durations of all jobs
    pub fn cumulative_duration(&self) -> Duration {
        self.cumulative_duration
    }

    /// Mean number of running jobs in equal slices of the timeline
    ///
    /// Returns no slice if no job was recorded.
    pub fn mean_jobs(&self, num_parts: NonZeroUsize) -> Box<[Slice]> {
        let Some((start, finish)) = self.span else {
            return Box::default();
        };
        let num_parts = num_parts.get();
        let width = (finish - start) / num_parts as f64;
        let chunks = self.map.sweep();
        (0..num_parts)
            .map(|part| {
                let slice_start = start + part as f64 * width;
                let slice_end = if part + 1 == num_parts {
                    finish
                } else {
                    slice_start + width
                };
                let job_time = chunks
                    .iter()
                    .map(|chunk| {
                        let overlap =
                            chunk.end().min(slice_end) - chunk.start().max(slice_start);
                        overlap.max(0.0) * chunk.ids().len() as f64
                    })
                    .sum::<Duration>();
                let length = slice_end - slice_start;
                Slice {
                    start: slice_start,
                    end: slice_end,
                    mean_jobs: if length > 0.0 { job_time / length } else { 0.0 },
                }
            })
            .collect()
    }

    /// Locate slices of the timeline with unusually low parallelism
    pub fn bottlenecks(&self, num_parts: NonZeroUsize) -> BottleneckReport {
        let slices = self.mean_jobs(num_parts);
        let (mean, std_dev) = if slices.is_empty() {
            (0.0, 0.0)
        } else {
            let count = slices.len() as f64;
            let mean = slices.iter().map(|slice| slice.mean_jobs).sum::<f64>() / count;
            let variance = slices
                .iter()
                .map(|slice| (slice.mean_jobs - mean).powi(2))
                .sum::<f64>()
                / count;
            (mean, variance.sqrt())
        };
        BottleneckReport {
            slices,
            mean,
            std_dev,
            limit: mean - BOTTLENECK_Z_SCORE * std_dev,
        }
    }
}

/// Slice of the build timeline
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slice {
    /// Start of the slice
    pub start: Timestamp,

    /// End of the slice
    pub end: Timestamp,

    /// Mean number of jobs running during the slice
    pub mean_jobs: f64,
}

/// Statistics on the parallelism of the build over time
#[derive(Clone, Debug, PartialEq)]
pub struct BottleneckReport {
    /// Slices of the build timeline, in chronological order
    pub slices: Box<[Slice]>,

    /// Mean over slices of the mean number of running jobs
    pub mean: f64,

    /// Standard deviation over slices of the mean number of running jobs
    pub std_dev: f64,

    /// Slices whose mean number of running jobs is below this are bottlenecks
    pub limit: f64,
}
//
impl BottleneckReport {
    /// Truth that a slice is a bottleneck
    pub fn is_bottleneck(&self, slice: &Slice) -> bool {
        slice.mean_jobs < self.limit
    }

    /// Slices that are bottlenecks
    pub fn bottlenecks(&self) -> impl Iterator<Item = &Slice> + Clone {
        self.slices.iter().filter(|slice| self.is_bottleneck(slice))
    }
}
