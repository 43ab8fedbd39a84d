//! Data quality issues found in build logs
//!
//! Real-world build logs are noisy: builds get killed halfway, process IDs get
//! recycled... These issues are not fatal to the analysis, so they are
//! collected into a report that is handed back to the caller along with the
//! analysis results, and logged as warnings when detected.

use log::warn;
use std::fmt::{self, Display, Formatter};

/// Build log inconsistency
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Anomaly {
    /// Several records share a process ID, the last one was kept
    DuplicatePid {
        /// Process ID that was seen more than once
        pid: Box<str>,
    },

    /// Several records have no parent process, the earliest one was kept
    MultipleRoots {
        /// Process ID of the record that was kept as the root
        root: Box<str>,

        /// Process ID of the extra root record
        extra: Box<str>,
    },

    /// A record's parent process is not in the log
    Orphan {
        /// Process ID of the orphaned record
        pid: Box<str>,

        /// Process ID of the missing parent
        ppid: Box<str>,
    },

    /// A record is its own ancestor, its link to its parent was cut
    ParentCycle {
        /// Process ID of the record that was detached
        pid: Box<str>,

        /// Process ID of its former parent
        ppid: Box<str>,
    },

    /// No time elapsed while the selected processes were running
    EmptyTimeline,
}
//
impl Display for Anomaly {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePid { pid } => write!(f, "detected multiple records with PID={pid}"),
            Self::MultipleRoots { root, extra } => write!(
                f,
                "detected multiple root records (kept PID={root}, ignored PID={extra})"
            ),
            Self::Orphan { pid, ppid } if pid == ppid => {
                write!(f, "record PID={pid} claims to be its own parent")
            }
            Self::Orphan { pid, ppid } => {
                write!(f, "couldn't find parent PID={ppid} of PID={pid}")
            }
            Self::ParentCycle { pid, ppid } => write!(
                f,
                "record PID={pid} is its own ancestor (detached from parent PID={ppid})"
            ),
            Self::EmptyTimeline => write!(f, "selected processes have no elapsed time"),
        }
    }
}

/// Collection of anomalies, in order of detection
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Anomalies(Vec<Anomaly>);
//
impl Anomalies {
    /// Record a new anomaly
    pub(crate) fn report(&mut self, anomaly: Anomaly) {
        warn!("Build log anomaly: {anomaly}");
        self.0.push(anomaly);
    }

    /// Merge anomalies that were detected by another component
    pub(crate) fn merge(&mut self, other: Anomalies) {
        self.0.extend(other.0);
    }

    /// Number of recorded anomalies
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Truth that the build log looked fine
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over anomalies in order of detection
    pub fn iter(&self) -> impl Iterator<Item = &Anomaly> + Clone {
        self.0.iter()
    }
}
//
impl<'a> IntoIterator for &'a Anomalies {
    type Item = &'a Anomaly;
    type IntoIter = std::slice::Iter<'a, Anomaly>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
