//! Job slot analysis: how many jobs ran concurrently, and for how long
//!
//! The build's wall-clock time is split into chunks where the set of running
//! processes does not change, and each chunk is accounted to the number of
//! running processes of a selected class, which we call the chunk's job slot
//! or concurrency level.

use crate::{
    anomaly::{Anomalies, Anomaly},
    interval::{IntervalError, IntervalMap, ItemId},
    record::{Duration, ProcessRecord},
    tree::{ProcessTree, ProcessTreeBuilder},
};
use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use thiserror::Error;

/// Which processes are counted towards concurrency
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    /// Count every process
    All,

    /// Only count processes that did not spawn children (build tools)
    #[default]
    NonMake,

    /// Only count processes that spawned children (make and friends)
    OnlyMake,

    /// Only count processes with these PIDs, ignore everything else
    SpecificPids(HashSet<Box<str>>),
}
//
impl Mode {
    /// Truth that this mode needs to know which processes have children
    fn needs_tree(&self) -> bool {
        matches!(self, Self::NonMake | Self::OnlyMake)
    }

    /// Lowest concurrency level that is reported
    ///
    /// When counting make processes, there is always at least one job running
    /// (the toplevel make), so level 0 is meaningless. But make may run for a
    /// while without spawning any tool, so level 0 matters when counting tools.
    pub fn first_level(&self) -> usize {
        match self {
            Self::NonMake => 0,
            Self::All | Self::OnlyMake | Self::SpecificPids(_) => 1,
        }
    }

    /// Truth that a record is ingested at all in this mode
    fn accepts(&self, record: &ProcessRecord) -> bool {
        match self {
            Self::SpecificPids(pids) => pids.contains(&record.pid),
            Self::All | Self::NonMake | Self::OnlyMake => true,
        }
    }
}

/// Configuration of the concurrency analysis
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AnalysisConfig {
    /// Which processes are counted
    pub mode: Mode,

    /// Fail if no toplevel (parentless) process is found
    pub require_root: bool,

    /// Attach command lines to the intervals of the timeline map
    pub save_commands: bool,
}

/// Mechanism to compute a ConcurrencyProfile from a stream of records
///
/// Feed it every record from the build log with [`add()`](Self::add), in any
/// order, then call [`finish()`](Self::finish). Stopping early is fine: the
/// analysis will simply cover the records that were provided.
#[derive(Debug)]
pub struct ConcurrencyAnalyzer {
    /// Analysis configuration
    config: AnalysisConfig,

    /// Wall-clock intervals of ingested records, named by PID
    map: IntervalMap<Box<str>>,

    /// Ingested records, indexed by their handle in `map`
    records: Vec<ProcessRecord>,

    /// Handle of the last ingested record with a given PID
    by_pid: HashMap<Box<str>, ItemId>,

    /// Handles of records without a parent process
    root_candidates: Vec<ItemId>,

    /// Process tree, if the mode needs it
    tree: Option<ProcessTreeBuilder>,

    /// Anomalies detected so far
    anomalies: Anomalies,
}
//
impl ConcurrencyAnalyzer {
    /// Prepare for a concurrency analysis
    pub fn new(config: AnalysisConfig) -> Self {
        let tree = config.mode.needs_tree().then(ProcessTreeBuilder::new);
        Self {
            config,
            map: IntervalMap::new(),
            records: Vec::new(),
            by_pid: HashMap::new(),
            root_candidates: Vec::new(),
            tree,
            anomalies: Anomalies::default(),
        }
    }

    /// Ingest a record from the build log
    ///
    /// Records ending before they start are rejected.
    pub fn add(&mut self, record: ProcessRecord) -> Result<(), AnalysisError> {
        if !self.config.mode.accepts(&record) {
            return Ok(());
        }

        let comment = self.config.save_commands.then(|| record.cmdline.clone());
        let id = self
            .map
            .add(record.start, record.duration(), record.pid.clone(), comment)
            .map_err(|source| AnalysisError::MalformedRecord {
                pid: record.pid.clone(),
                source,
            })?;
        debug_assert_eq!(id.0, self.records.len());

        if self.by_pid.insert(record.pid.clone(), id).is_some() && self.tree.is_none() {
            // The process tree reports duplicates by itself
            self.anomalies.report(Anomaly::DuplicatePid {
                pid: record.pid.clone(),
            });
        }
        if record.is_root() {
            self.root_candidates.push(id);
        }
        if let Some(tree) = &mut self.tree {
            tree.add(record.clone());
        }
        self.records.push(record);
        Ok(())
    }

    /// Number of records ingested so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Truth that no record was ingested yet
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Compute the concurrency profile of the ingested records
    pub fn finish(self) -> Result<ConcurrencyProfile, AnalysisError> {
        let Self {
            config,
            map,
            records,
            by_pid,
            root_candidates,
            tree,
            mut anomalies,
        } = self;
        let mode = config.mode;

        // Link the process tree and locate the toplevel process
        let tree = tree.map(ProcessTreeBuilder::finish);
        let root = if let Some(tree) = &tree {
            anomalies.merge(tree.anomalies().clone());
            tree.root().map(|root| by_pid[root.pid()])
        } else {
            find_root(&records, root_candidates, &mut anomalies)
        };
        if config.require_root && root.is_none() {
            return Err(AnalysisError::MissingRoot);
        }

        // Account each chunk of time to the number of selected jobs running
        let mut buckets = Vec::<Bucket>::new();
        {
            let branch_pids = tree.as_ref().map(ProcessTree::branch_pids);
            let is_selected = |id: &ItemId| match (&mode, &branch_pids) {
                (Mode::NonMake, Some(branches)) => !branches.contains(&**map.name(*id)),
                (Mode::OnlyMake, Some(branches)) => branches.contains(&**map.name(*id)),
                _ => true,
            };
            for chunk in map.sweep().iter() {
                let selected = chunk
                    .ids()
                    .iter()
                    .copied()
                    .filter(is_selected)
                    .collect::<Vec<_>>();
                let level = selected.len();
                if buckets.len() <= level {
                    buckets.resize_with(level + 1, Bucket::default);
                }
                let bucket = &mut buckets[level];
                bucket.duration += chunk.length();
                bucket.ids.extend(selected);
            }
        }

        // Normalize reported levels to percentages of the whole timeline
        let first_level = mode.first_level();
        let total_duration = buckets
            .iter()
            .map(|bucket| bucket.duration)
            .sum::<Duration>();
        if total_duration <= 0.0 {
            anomalies.report(Anomaly::EmptyTimeline);
        }
        debug!(
            "Accounted {} records to {} concurrency levels over {total_duration}s",
            records.len(),
            buckets.len()
        );

        Ok(ConcurrencyProfile {
            mode,
            map,
            records,
            by_pid,
            tree,
            root,
            buckets: buckets.into_boxed_slice(),
            first_level,
            total_duration,
            anomalies,
        })
    }
}

/// Pick the earliest parentless record as the root, report the others
fn find_root(
    records: &[ProcessRecord],
    mut candidates: Vec<ItemId>,
    anomalies: &mut Anomalies,
) -> Option<ItemId> {
    candidates.sort_by(|id1, id2| records[id1.0].start.total_cmp(&records[id2.0].start));
    let (&root, extras) = candidates.split_first()?;
    for extra in extras {
        anomalies.report(Anomaly::MultipleRoots {
            root: records[root.0].pid.clone(),
            extra: records[extra.0].pid.clone(),
        });
    }
    Some(root)
}

/// Run a concurrency analysis over a complete stream of records
pub fn analyze(
    records: impl IntoIterator<Item = ProcessRecord>,
    config: AnalysisConfig,
) -> Result<ConcurrencyProfile, AnalysisError> {
    let mut analyzer = ConcurrencyAnalyzer::new(config);
    for record in records {
        analyzer.add(record)?;
    }
    analyzer.finish()
}

/// Accumulated data about one concurrency level
#[derive(Clone, Debug, Default, PartialEq)]
struct Bucket {
    /// Time during which exactly this number of selected jobs were running
    duration: Duration,

    /// Selected jobs that were running at this concurrency level at some point
    ids: BTreeSet<ItemId>,
}

/// Result of a concurrency analysis
#[derive(Debug)]
pub struct ConcurrencyProfile {
    /// Which processes were counted
    mode: Mode,

    /// Wall-clock intervals of ingested records, named by PID
    map: IntervalMap<Box<str>>,

    /// Ingested records, indexed by their handle in `map`
    records: Vec<ProcessRecord>,

    /// Handle of the last ingested record with a given PID
    by_pid: HashMap<Box<str>, ItemId>,

    /// Process tree, if the mode needed it
    tree: Option<ProcessTree>,

    /// Handle of the toplevel process
    root: Option<ItemId>,

    /// Data about each concurrency level, starting at level 0
    buckets: Box<[Bucket]>,

    /// Lowest reported concurrency level
    first_level: usize,

    /// Total duration of all concurrency levels, including level 0
    total_duration: Duration,

    /// Anomalies found in the build log
    anomalies: Anomalies,
}
//
impl ConcurrencyProfile {
    /// Percentage of the time spent at each reported concurrency level,
    /// in order of increasing level
    ///
    /// Percentages are relative to the whole timeline, so they add up to 100%
    /// only if level 0 is reported or no time was spent there. Empty if no
    /// time elapsed at all, which is flagged as an anomaly.
    pub fn histogram(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        let levels = if self.total_duration > 0.0 {
            self.first_level..self.buckets.len().max(self.first_level)
        } else {
            0..0
        };
        levels.map(move |level| {
            let percent = 100.0 * self.buckets[level].duration / self.total_duration;
            (level, percent)
        })
    }

    /// Lowest reported concurrency level
    pub fn first_level(&self) -> usize {
        self.first_level
    }

    /// Number of concurrency levels that were observed, including level 0
    pub fn num_levels(&self) -> usize {
        self.buckets.len()
    }

    /// Total time spent at every concurrency level, including level 0
    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// Time spent at a given concurrency level
    pub fn duration_at_level(&self, level: usize) -> Duration {
        self.buckets.get(level).map_or(0.0, |bucket| bucket.duration)
    }

    /// Jobs that were running at a given concurrency level at some point
    pub fn ids_at_level(&self, level: usize) -> impl Iterator<Item = ItemId> + Clone + '_ {
        self.buckets
            .get(level)
            .into_iter()
            .flat_map(|bucket| bucket.ids.iter().copied())
    }

    /// PIDs of the jobs that were running at a given concurrency level
    pub fn pids_at_level(&self, level: usize) -> BTreeSet<&str> {
        self.ids_at_level(level)
            .map(|id| &**self.map.name(id))
            .collect()
    }

    /// Number of jobs running each tool at a given concurrency level
    pub fn tools_at_level(&self, level: usize) -> BTreeMap<&str, usize> {
        let mut tools = BTreeMap::new();
        for id in self.ids_at_level(level) {
            *tools.entry(&*self.records[id.0].tool).or_default() += 1;
        }
        tools
    }

    /// Number of distinct jobs that were running at some reported level
    pub fn total_processes(&self) -> usize {
        self.buckets
            .iter()
            .skip(self.first_level)
            .flat_map(|bucket| bucket.ids.iter())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Record of the toplevel build process, if any
    pub fn root_record(&self) -> Option<&ProcessRecord> {
        self.root.map(|id| &self.records[id.0])
    }

    /// Record of a process, by PID
    ///
    /// If several records share this PID, the last one is returned.
    pub fn record(&self, pid: &str) -> Option<&ProcessRecord> {
        self.by_pid.get(pid).map(|id| &self.records[id.0])
    }

    /// Record associated with a job handle
    ///
    /// # Panics
    ///
    /// If the handle does not come from this profile.
    pub fn record_by_id(&self, id: ItemId) -> &ProcessRecord {
        &self.records[id.0]
    }

    /// Wall-clock intervals of the analyzed records, named by PID
    pub fn map(&self) -> &IntervalMap<Box<str>> {
        &self.map
    }

    /// Process tree, if the analysis mode needed one
    pub fn tree(&self) -> Option<&ProcessTree> {
        self.tree.as_ref()
    }

    /// Which processes were counted
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Anomalies found in the build log
    pub fn anomalies(&self) -> &Anomalies {
        &self.anomalies
    }
}

/// What can go wrong during a concurrency analysis
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// A record has an invalid time span
    #[error("invalid time span in record PID={pid} ({source})")]
    MalformedRecord {
        /// PID of the faulty record
        pid: Box<str>,

        /// What is wrong with its time span
        source: IntervalError,
    },

    /// No toplevel record was found, but one was required
    #[error("no top-most record found")]
    MissingRoot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use more_asserts::assert_le;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    /// Root P1 [0,10) with children P2 [2,6) and P3 [8,12), in log order
    fn example() -> Vec<ProcessRecord> {
        vec![
            ProcessRecord::new("P2", Some("P1"), 2.0, 6.0).with_command("gcc", "gcc -c a.c"),
            ProcessRecord::new("P1", None, 0.0, 10.0).with_command("make", "make -j2"),
            ProcessRecord::new("P3", Some("P1"), 8.0, 12.0).with_command("ld", "ld a.o"),
        ]
    }

    fn config(mode: Mode) -> AnalysisConfig {
        AnalysisConfig {
            mode,
            ..AnalysisConfig::default()
        }
    }

    fn histogram(profile: &ConcurrencyProfile) -> Vec<(usize, f64)> {
        profile.histogram().collect()
    }

    #[test]
    fn non_make() {
        // No tool runs during [0, 2) and [6, 8), P3 still runs during [10, 12)
        let profile = analyze(example(), config(Mode::NonMake)).unwrap();
        let histogram = histogram(&profile);
        assert_eq!(histogram.len(), 2);
        assert_eq!(histogram[0].0, 0);
        assert_eq!(histogram[1].0, 1);
        assert!((histogram[0].1 - 100.0 / 3.0).abs() < 1e-9);
        assert!((histogram[1].1 - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(profile.first_level(), 0);
        assert_eq!(profile.num_levels(), 2);
        assert_eq!(profile.total_duration(), 12.0);
        assert_eq!(profile.duration_at_level(0), 4.0);
        assert_eq!(profile.duration_at_level(1), 8.0);
        assert_eq!(profile.duration_at_level(2), 0.0);
        assert_eq!(profile.pids_at_level(0), BTreeSet::new());
        assert_eq!(profile.pids_at_level(1), maplit::btreeset! {"P2", "P3"});
        assert_eq!(
            profile.tools_at_level(1),
            maplit::btreemap! {"gcc" => 1, "ld" => 1}
        );
        assert_eq!(profile.total_processes(), 2);
        assert_eq!(&*profile.root_record().unwrap().pid, "P1");
        assert!(profile.tree().unwrap().is_branch("P1"));
        assert!(profile.anomalies().is_empty());
    }

    #[test]
    fn all() {
        let profile = analyze(example(), config(Mode::All)).unwrap();
        assert_eq!(histogram(&profile), vec![(1, 50.0), (2, 50.0)]);
        assert_eq!(profile.mode(), &Mode::All);
        assert_eq!(profile.pids_at_level(1), maplit::btreeset! {"P1", "P3"});
        assert_eq!(profile.pids_at_level(2), maplit::btreeset! {"P1", "P2", "P3"});
        assert_eq!(profile.total_processes(), 3);
        assert_matches!(profile.tree(), None);
        assert_eq!(&*profile.root_record().unwrap().pid, "P1");
    }

    #[test]
    fn only_make() {
        // P3 runs alone during [10, 12), which is level 0 for make processes:
        // it is not reported, but still counts towards the total duration
        let profile = analyze(example(), config(Mode::OnlyMake)).unwrap();
        let histogram = histogram(&profile);
        assert_eq!(histogram.len(), 1);
        assert_eq!(histogram[0].0, 1);
        assert!((histogram[0].1 - 250.0 / 3.0).abs() < 1e-9);
        assert_eq!(profile.total_duration(), 12.0);
        assert_eq!(profile.duration_at_level(0), 2.0);
        assert_eq!(profile.duration_at_level(1), 10.0);
        assert_eq!(profile.pids_at_level(1), maplit::btreeset! {"P1"});
    }

    #[test]
    fn idle_time_counts() {
        // Nothing runs during [2, 4), which is not reported in All mode
        let records = [
            ProcessRecord::new("1", None, 0.0, 2.0),
            ProcessRecord::new("2", None, 4.0, 6.0),
        ];
        let profile = analyze(records, config(Mode::All)).unwrap();
        let histogram = histogram(&profile);
        assert_eq!(histogram.len(), 1);
        assert_eq!(histogram[0].0, 1);
        assert!((histogram[0].1 - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(profile.duration_at_level(0), 2.0);
        assert_eq!(profile.total_duration(), 6.0);
    }

    #[test]
    fn specific_pids() {
        let mode = Mode::SpecificPids(maplit::hashset! {"P2".into(), "P3".into()});
        let profile = analyze(example(), config(mode)).unwrap();
        // Nothing selected runs during [6, 8)
        assert_eq!(histogram(&profile), vec![(1, 80.0)]);
        assert_eq!(profile.map().len(), 2);
        assert_matches!(profile.record("P1"), None);
        assert_matches!(profile.root_record(), None);

        let mode = Mode::SpecificPids(maplit::hashset! {"P2".into()});
        let profile = analyze(
            example(),
            AnalysisConfig {
                mode,
                require_root: true,
                ..AnalysisConfig::default()
            },
        );
        assert_matches!(profile, Err(AnalysisError::MissingRoot));
    }

    #[test]
    fn saved_commands() {
        let profile = analyze(
            example(),
            AnalysisConfig {
                mode: Mode::All,
                save_commands: true,
                ..AnalysisConfig::default()
            },
        )
        .unwrap();
        let comments = profile
            .map()
            .items()
            .map(|item| (&**item.name(), item.comment()))
            .collect::<Vec<_>>();
        assert_eq!(
            comments,
            vec![
                ("P2", Some("gcc -c a.c")),
                ("P1", Some("make -j2")),
                ("P3", Some("ld a.o"))
            ]
        );

        let profile = analyze(example(), config(Mode::All)).unwrap();
        assert!(profile.map().items().all(|item| item.comment().is_none()));
    }

    #[test]
    fn records() {
        let profile = analyze(example(), config(Mode::All)).unwrap();
        assert_eq!(profile.record("P3").unwrap().end, 12.0);
        assert_eq!(&*profile.record_by_id(ItemId(0)).pid, "P2");
        assert_matches!(profile.record("P4"), None);
    }

    #[test]
    fn empty() {
        for mode in [Mode::All, Mode::NonMake, Mode::OnlyMake] {
            let profile = analyze([], config(mode)).unwrap();
            assert_eq!(histogram(&profile), vec![]);
            assert_eq!(profile.num_levels(), 0);
            assert_eq!(
                profile.anomalies().iter().cloned().collect::<Vec<_>>(),
                vec![Anomaly::EmptyTimeline]
            );
        }
        assert_matches!(
            analyze(
                [],
                AnalysisConfig {
                    require_root: true,
                    ..AnalysisConfig::default()
                }
            ),
            Err(AnalysisError::MissingRoot)
        );
    }

    #[test]
    fn instantaneous_only() {
        let records = [ProcessRecord::new("1", None, 3.0, 3.0)];
        let profile = analyze(records, config(Mode::All)).unwrap();
        assert_eq!(histogram(&profile), vec![]);
        assert_eq!(&*profile.root_record().unwrap().pid, "1");
        assert_eq!(profile.anomalies().len(), 1);
    }

    #[test]
    fn malformed() {
        let records = [ProcessRecord::new("1", None, 3.0, 2.0)];
        assert_matches!(
            analyze(records, config(Mode::All)),
            Err(AnalysisError::MalformedRecord { pid, source: IntervalError::NegativeLength(_) }) => {
                assert_eq!(&*pid, "1");
            }
        );
    }

    #[test]
    fn anomalies() {
        let records = [
            ProcessRecord::new("2", Some("1"), 1.0, 2.0),
            ProcessRecord::new("2", Some("1"), 2.0, 3.0),
            ProcessRecord::new("9", None, 0.5, 4.0),
            ProcessRecord::new("1", None, 0.0, 4.0),
        ];
        let expected = vec![
            Anomaly::DuplicatePid { pid: "2".into() },
            Anomaly::MultipleRoots {
                root: "1".into(),
                extra: "9".into(),
            },
        ];
        for mode in [Mode::All, Mode::NonMake] {
            let profile = analyze(records.clone(), config(mode)).unwrap();
            assert_eq!(
                profile.anomalies().iter().cloned().collect::<Vec<_>>(),
                expected
            );
            assert_eq!(&*profile.root_record().unwrap().pid, "1");
            assert_eq!(profile.record("2").unwrap().start, 2.0);
        }
    }

    #[test]
    fn partial_input() {
        // Stopping the stream early still yields a consistent analysis
        let mut analyzer = ConcurrencyAnalyzer::new(config(Mode::NonMake));
        analyzer.add(example().remove(0)).unwrap();
        assert_eq!(analyzer.len(), 1);
        let profile = analyzer.finish().unwrap();
        assert_eq!(histogram(&profile), vec![(0, 0.0), (1, 100.0)]);
    }

    /// Random build log: a process tree rooted at PID 0 in random order,
    /// along with a random subset of PIDs
    fn build_log() -> impl Strategy<Value = (Vec<ProcessRecord>, HashSet<Box<str>>)> {
        (1usize..32)
            .prop_flat_map(|len| {
                (
                    prop::collection::vec(any::<prop::sample::Index>(), len),
                    prop::collection::vec((0u8..100, 0u8..30), len),
                    Just((0..len).collect::<Vec<_>>()).prop_shuffle(),
                    prop::collection::vec(any::<bool>(), len),
                )
            })
            .prop_map(|(parents, times, order, selected)| {
                let records = order
                    .into_iter()
                    .map(|pid| {
                        let ppid = (pid > 0).then(|| parents[pid].index(pid).to_string());
                        let (start, length) = times[pid];
                        ProcessRecord::new(
                            pid.to_string(),
                            ppid.as_deref(),
                            start.into(),
                            f64::from(start) + f64::from(length),
                        )
                    })
                    .collect();
                let pids = (0..selected.len())
                    .filter(|&pid| selected[pid])
                    .map(|pid| pid.to_string().into_boxed_str())
                    .collect();
                (records, pids)
            })
    }

    proptest! {
        #[test]
        fn histogram_sums_to_100((records, pids) in build_log()) {
            for mode in [Mode::All, Mode::NonMake, Mode::OnlyMake, Mode::SpecificPids(pids.clone())] {
                let first_level = mode.first_level();
                let profile = analyze(records.clone(), config(mode)).unwrap();
                let histogram = histogram(&profile);
                if profile.total_duration() <= 0.0 {
                    prop_assert!(histogram.is_empty());
                    prop_assert!(profile.anomalies().iter().any(|a| *a == Anomaly::EmptyTimeline));
                } else if histogram.is_empty() {
                    // Time elapsed, but only at unreported level 0
                    prop_assert!(profile.num_levels() <= first_level);
                } else {
                    let sum = histogram.iter().map(|(_, percent)| percent).sum::<f64>();
                    assert_le!(sum, 100.0 + 1e-9);
                    if first_level == 0 || profile.duration_at_level(0) == 0.0 {
                        prop_assert!((sum - 100.0).abs() < 1e-9);
                    } else {
                        let idle = 100.0 * profile.duration_at_level(0) / profile.total_duration();
                        prop_assert!((sum + idle - 100.0).abs() < 1e-9);
                    }
                    prop_assert_eq!(histogram[0].0, first_level);
                    prop_assert_eq!(histogram.last().unwrap().0, profile.num_levels() - 1);
                    for (level, percent) in histogram {
                        assert_le!(0.0, percent);
                        if profile.duration_at_level(level) > 0.0 {
                            prop_assert!(profile.pids_at_level(level).len() >= level);
                        }
                    }
                }
            }
        }
    }
}
