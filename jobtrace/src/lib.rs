//! Reconstruction of the job concurrency of a parallel build, from a log of
//! the processes that the build spawned
//!
//! Each process of the build is described by a [`ProcessRecord`]. From these,
//! this crate can tell for how long the build ran N jobs in parallel
//! ([`ConcurrencyAnalyzer`]), rebuild the process tree ([`ProcessTreeBuilder`]),
//! pack processes into non-overlapping execution lanes for display
//! ([`LaneTree`]) and locate periods of low parallelism ([`Timeline`]).

#![deny(missing_docs)]

mod anomaly;
mod bottleneck;
mod concurrency;
mod interval;
mod lanes;
mod parents;
mod record;
mod tree;

// Reexport types which appear in the public interface
pub use self::{
    anomaly::{Anomalies, Anomaly},
    bottleneck::{BottleneckReport, Slice, Timeline, BOTTLENECK_Z_SCORE},
    concurrency::{
        analyze, AnalysisConfig, AnalysisError, ConcurrencyAnalyzer, ConcurrencyProfile, Mode,
    },
    interval::{Chunk, IntervalError, IntervalItem, IntervalMap, ItemId},
    lanes::{Lane, LaneEntry, LaneTree},
    parents::ParentFinder,
    record::{Duration, ProcessRecord, Timestamp},
    tree::{ProcessNode, ProcessTree, ProcessTreeBuilder, Walk},
};
