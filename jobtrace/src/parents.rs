//! Streaming detection of parent processes

use crate::record::ProcessRecord;
use std::collections::HashSet;

/// Tells which records belong to processes that spawned children
///
/// This relies on build logs listing processes in order of completion: by the
/// time a parent's record is read, the records of all of its children have
/// been seen, so there is no need to build a full process tree.
#[derive(Clone, Debug, Default)]
pub struct ParentFinder {
    /// PIDs that were mentioned as the parent of some record
    parent_pids: HashSet<Box<str>>,
}
//
impl ParentFinder {
    /// Start with no known parent
    pub fn new() -> Self {
        Self::default()
    }

    /// Take note of a record's parent
    pub fn record(&mut self, record: &ProcessRecord) {
        if let Some(ppid) = &record.ppid {
            self.parent_pids.insert(ppid.clone());
        }
    }

    /// Truth that some previously noted record was a child of this one
    pub fn is_parent(&self, record: &ProcessRecord) -> bool {
        self.parent_pids.contains(&record.pid)
    }
}
