//! Parent<->child tree of the processes spawned during a build
//!
//! Build logs list processes in order of completion, which means that children
//! come before their parents and that a parent cannot be linked to its
//! children as its record is read. Tree building is therefore a two-step
//! process: all records are first collected by a [`ProcessTreeBuilder`], then
//! [`ProcessTreeBuilder::finish()`] ties records to their parents.

use crate::{
    anomaly::{Anomalies, Anomaly},
    record::{Duration, ProcessRecord, Timestamp},
};
use log::debug;
use std::{
    collections::{HashMap, HashSet},
    fmt::{self, Debug, Formatter},
};

/// Mechanism to build a ProcessTree
#[derive(Debug, Default)]
pub struct ProcessTreeBuilder {
    /// Records collected so far
    records: Vec<ProcessRecord>,

    /// Position of each process' record in `records`
    by_pid: HashMap<Box<str>, usize>,

    /// Anomalies detected so far
    anomalies: Anomalies,
}
//
impl ProcessTreeBuilder {
    /// Prepare to build a ProcessTree
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a process, in any order
    ///
    /// If a record with the same PID was added before, it is replaced and the
    /// duplicate is reported as an anomaly.
    pub fn add(&mut self, record: ProcessRecord) {
        if let Some(&idx) = self.by_pid.get(&record.pid) {
            self.anomalies.report(Anomaly::DuplicatePid {
                pid: record.pid.clone(),
            });
            self.records[idx] = record;
        } else {
            self.by_pid.insert(record.pid.clone(), self.records.len());
            self.records.push(record);
        }
    }

    /// Number of distinct processes recorded so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Truth that no process was recorded yet
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Tie processes to their parents
    ///
    /// Processes are visited in order of increasing start time, so children
    /// lists come out sorted by start time, and the earliest process without a
    /// parent becomes the root of the tree. Other parentless processes and
    /// processes whose parent was never recorded are reported as anomalies and
    /// stay detached from the tree.
    pub fn finish(self) -> ProcessTree {
        let Self {
            records,
            by_pid,
            mut anomalies,
        } = self;

        // Stable sort, so that equal start times keep insertion order
        let mut order = (0..records.len()).collect::<Vec<_>>();
        order.sort_by(|&idx1, &idx2| records[idx1].start.total_cmp(&records[idx2].start));

        // Link processes to their parents
        let mut parents = vec![None; records.len()];
        let mut children = vec![Vec::new(); records.len()];
        let mut root = None;
        for idx in order {
            let record = &records[idx];
            match record.ppid.as_deref() {
                None => {
                    if let Some(root_idx) = root {
                        let root_record: &ProcessRecord = &records[root_idx];
                        anomalies.report(Anomaly::MultipleRoots {
                            root: root_record.pid.clone(),
                            extra: record.pid.clone(),
                        });
                    } else {
                        root = Some(idx);
                    }
                }
                Some(ppid) => match by_pid.get(ppid) {
                    Some(&parent_idx) if parent_idx != idx => {
                        parents[idx] = Some(parent_idx);
                        children[parent_idx].push(idx);
                    }
                    _ => anomalies.report(Anomaly::Orphan {
                        pid: record.pid.clone(),
                        ppid: ppid.into(),
                    }),
                },
            }
        }

        // Processes that are unreachable from parentless ones have a cycle in
        // their ancestry. Walk up to the first process that repeats, which is
        // part of the cycle, and detach it from its parent.
        let mut reached = vec![false; records.len()];
        let mut stack = (0..records.len())
            .filter(|&idx| parents[idx].is_none())
            .collect::<Vec<_>>();
        let mut candidates = 0..records.len();
        loop {
            while let Some(idx) = stack.pop() {
                reached[idx] = true;
                stack.extend_from_slice(&children[idx]);
            }
            let Some(idx) = candidates.find(|&idx| !reached[idx]) else {
                break;
            };
            let mut cycle_idx = idx;
            let mut ancestors = HashSet::new();
            while ancestors.insert(cycle_idx) {
                let Some(parent_idx) = parents[cycle_idx] else {
                    break;
                };
                cycle_idx = parent_idx;
            }
            if let Some(parent_idx) = parents[cycle_idx].take() {
                children[parent_idx].retain(|&child_idx| child_idx != cycle_idx);
                anomalies.report(Anomaly::ParentCycle {
                    pid: records[cycle_idx].pid.clone(),
                    ppid: records[parent_idx].pid.clone(),
                });
            }
            stack.push(cycle_idx);
        }

        let nodes = records
            .into_iter()
            .zip(parents)
            .zip(children)
            .map(|((record, parent_idx), children)| NodeData {
                record,
                parent_idx,
                children: children.into_boxed_slice(),
            })
            .collect::<Box<[_]>>();
        debug!(
            "Built process tree of {} processes, {} of which spawned children",
            nodes.len(),
            nodes.iter().filter(|node| !node.children.is_empty()).count()
        );
        ProcessTree {
            nodes,
            by_pid,
            root_idx: root,
            anomalies,
        }
    }
}

/// Tree of the processes that were spawned during a build
#[derive(Debug, PartialEq)]
pub struct ProcessTree {
    /// Processes, in order of first insertion
    nodes: Box<[NodeData]>,

    /// Position of each process in `nodes`
    by_pid: HashMap<Box<str>, usize>,

    /// Position of the root process in `nodes`
    root_idx: Option<usize>,

    /// Anomalies detected while building the tree
    anomalies: Anomalies,
}
//
impl ProcessTree {
    /// Toplevel build process, if one was recorded
    pub fn root(&self) -> Option<ProcessNode> {
        self.root_idx.map(|idx| self.node(idx))
    }

    /// Find a process by PID
    pub fn lookup(&self, pid: &str) -> Option<ProcessNode> {
        self.by_pid.get(pid).map(|&idx| self.node(idx))
    }

    /// All processes, including those which are detached from the root, in
    /// unspecified order
    pub fn nodes(&self) -> impl Iterator<Item = ProcessNode> + Clone {
        (0..self.nodes.len()).map(move |idx| self.node(idx))
    }

    /// Number of processes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Truth that the tree has no process
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// PIDs of the processes that spawned at least one child
    ///
    /// In a build, these are the processes that coordinate sub-work, like
    /// recursive make invocations, as opposed to the tools doing actual work.
    pub fn branch_pids(&self) -> HashSet<&str> {
        self.nodes
            .iter()
            .filter(|node| !node.children.is_empty())
            .map(|node| &*node.record.pid)
            .collect()
    }

    /// Truth that a process spawned at least one child
    pub fn is_branch(&self, pid: &str) -> bool {
        self.lookup(pid).is_some_and(|node| node.is_branch())
    }

    /// Anomalies detected while building the tree
    pub fn anomalies(&self) -> &Anomalies {
        &self.anomalies
    }

    /// Access a node by index
    fn node(&self, idx: usize) -> ProcessNode {
        ProcessNode { tree: self, idx }
    }
}

/// Process as stored within the ProcessTree
#[derive(Debug, PartialEq)]
struct NodeData {
    /// Execution record
    record: ProcessRecord,

    /// Position of the parent process in ProcessTree::nodes
    parent_idx: Option<usize>,

    /// Positions of the child processes in ProcessTree::nodes, in order of
    /// increasing start time
    children: Box<[usize]>,
}

/// Hierarchical view of a process from a ProcessTree
#[derive(Clone, Copy)]
pub struct ProcessNode<'tree> {
    /// Tree which this process belongs to
    tree: &'tree ProcessTree,

    /// Position of this process in ProcessTree::nodes
    idx: usize,
}
//
impl<'tree> ProcessNode<'tree> {
    /// Execution record of this process
    pub fn record(&self) -> &'tree ProcessRecord {
        &self.data().record
    }

    /// Process ID
    pub fn pid(&self) -> &'tree str {
        &self.record().pid
    }

    /// When this process started
    pub fn start(&self) -> Timestamp {
        self.record().start
    }

    /// When this process ended
    pub fn end(&self) -> Timestamp {
        self.record().end
    }

    /// How long this process ran
    pub fn duration(&self) -> Duration {
        self.record().duration()
    }

    /// Process that spawned this one, if it was recorded
    pub fn parent(&self) -> Option<ProcessNode<'tree>> {
        self.data().parent_idx.map(|idx| self.tree.node(idx))
    }

    /// Processes directly spawned by this one, in order of increasing start
    /// time
    pub fn children(&self) -> impl ExactSizeIterator<Item = ProcessNode<'tree>> + Clone {
        let tree = self.tree;
        self.data().children.iter().map(move |&idx| tree.node(idx))
    }

    /// Number of processes directly spawned by this one
    pub fn num_children(&self) -> usize {
        self.data().children.len()
    }

    /// Truth that this process spawned children
    pub fn is_branch(&self) -> bool {
        self.num_children() > 0
    }

    /// Pre-order walk of this process and its transitive children, along with
    /// their depth relative to this process
    pub fn walk(&self) -> Walk<'tree> {
        Walk {
            tree: self.tree,
            stack: vec![(0, self.idx)],
        }
    }

    /// Data of this process
    fn data(&self) -> &'tree NodeData {
        &self.tree.nodes[self.idx]
    }
}
//
impl Debug for ProcessNode<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_struct("ProcessNode")
            .field("record", self.record())
            .field("num_children", &self.num_children())
            // Elide ProcessTree from output as that's huge
            .finish_non_exhaustive()
    }
}
//
impl PartialEq for ProcessNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.idx == other.idx
    }
}

/// Pre-order iterator over a process subtree, see [`ProcessNode::walk()`]
#[derive(Clone, Debug)]
pub struct Walk<'tree> {
    /// Tree being walked
    tree: &'tree ProcessTree,

    /// Processes left to visit, with their depth, next one last
    stack: Vec<(usize, usize)>,
}
//
impl<'tree> Iterator for Walk<'tree> {
    type Item = (usize, ProcessNode<'tree>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, idx) = self.stack.pop()?;
        let node = self.tree.node(idx);
        self.stack.extend(
            node.data()
                .children
                .iter()
                .rev()
                .map(|&child_idx| (depth + 1, child_idx)),
        );
        Some((depth, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    /// Build a tree from records given in completion order
    fn build(records: impl IntoIterator<Item = ProcessRecord>) -> ProcessTree {
        let mut builder = ProcessTreeBuilder::new();
        for record in records {
            builder.add(record);
        }
        builder.finish()
    }

    fn pids<'tree>(nodes: impl Iterator<Item = ProcessNode<'tree>>) -> Vec<&'tree str> {
        nodes.map(|node| node.pid()).collect()
    }

    #[test]
    fn empty() {
        let tree = ProcessTreeBuilder::new().finish();
        assert!(tree.is_empty());
        assert_matches!(tree.root(), None);
        assert!(tree.branch_pids().is_empty());
        assert!(tree.anomalies().is_empty());
    }

    #[test]
    fn completion_order() {
        let tree = build([
            ProcessRecord::new("2", Some("1"), 2.0, 6.0),
            ProcessRecord::new("4", Some("3"), 8.5, 9.0),
            ProcessRecord::new("3", Some("1"), 8.0, 12.0),
            ProcessRecord::new("1", None, 0.0, 12.0),
        ]);
        assert!(tree.anomalies().is_empty());
        assert_eq!(tree.len(), 4);

        let root = tree.root().unwrap();
        assert_eq!(root.pid(), "1");
        assert_matches!(root.parent(), None);
        assert_eq!(pids(root.children()), vec!["2", "3"]);
        assert_eq!(
            root.walk()
                .map(|(depth, node)| (depth, node.pid()))
                .collect::<Vec<_>>(),
            vec![(0, "1"), (1, "2"), (1, "3"), (2, "4")]
        );

        let leaf = tree.lookup("4").unwrap();
        assert!(!leaf.is_branch());
        assert_eq!(leaf.duration(), 0.5);
        assert_eq!(leaf.parent().unwrap().pid(), "3");
        assert_eq!(leaf.parent().unwrap().parent(), Some(root));
        assert_matches!(tree.lookup("5"), None);

        assert_eq!(tree.branch_pids(), maplit::hashset! {"1", "3"});
        assert!(tree.is_branch("3"));
        assert!(!tree.is_branch("2"));
        assert!(!tree.is_branch("42"));
    }

    #[test]
    fn children_sorted_by_start() {
        let tree = build([
            ProcessRecord::new("c", Some("p"), 5.0, 6.0),
            ProcessRecord::new("a", Some("p"), 1.0, 7.0),
            ProcessRecord::new("b", Some("p"), 3.0, 4.0),
            ProcessRecord::new("p", None, 0.0, 8.0),
        ]);
        assert_eq!(pids(tree.root().unwrap().children()), vec!["a", "b", "c"]);
    }

    #[test]
    fn duplicate_pid() {
        let tree = build([
            ProcessRecord::new("2", Some("1"), 1.0, 2.0),
            ProcessRecord::new("2", Some("1"), 3.0, 4.0),
            ProcessRecord::new("1", None, 0.0, 5.0),
        ]);
        assert_eq!(
            tree.anomalies().iter().cloned().collect::<Vec<_>>(),
            vec![Anomaly::DuplicatePid { pid: "2".into() }]
        );
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.lookup("2").unwrap().start(), 3.0);
        assert_eq!(tree.root().unwrap().num_children(), 1);
    }

    #[test]
    fn multiple_roots() {
        let tree = build([
            ProcessRecord::new("late", None, 1.0, 2.0),
            ProcessRecord::new("early", None, 0.0, 3.0),
        ]);
        assert_eq!(tree.root().unwrap().pid(), "early");
        assert_eq!(
            tree.anomalies().iter().cloned().collect::<Vec<_>>(),
            vec![Anomaly::MultipleRoots {
                root: "early".into(),
                extra: "late".into()
            }]
        );
        assert!(tree.lookup("late").is_some());
    }

    #[test]
    fn orphans() {
        let tree = build([
            ProcessRecord::new("2", Some("gone"), 1.0, 2.0),
            ProcessRecord::new("3", Some("3"), 1.5, 2.0),
            ProcessRecord::new("1", None, 0.0, 5.0),
        ]);
        assert_eq!(
            tree.anomalies().iter().cloned().collect::<Vec<_>>(),
            vec![
                Anomaly::Orphan {
                    pid: "2".into(),
                    ppid: "gone".into()
                },
                Anomaly::Orphan {
                    pid: "3".into(),
                    ppid: "3".into()
                }
            ]
        );
        let root = tree.root().unwrap();
        assert_eq!(root.num_children(), 0);
        assert_eq!(root.walk().count(), 1);
        assert_matches!(tree.lookup("2").unwrap().parent(), None);
        assert!(tree.branch_pids().is_empty());
    }

    #[test]
    fn no_root() {
        let tree = build([
            ProcessRecord::new("2", Some("1"), 1.0, 2.0),
            ProcessRecord::new("1", Some("0"), 0.0, 3.0),
        ]);
        assert_matches!(tree.root(), None);
        assert_eq!(tree.lookup("1").unwrap().num_children(), 1);
        assert_eq!(tree.anomalies().len(), 1);
    }

    #[test]
    fn parent_cycle() {
        let tree = build([
            ProcessRecord::new("R", None, 0.0, 9.0),
            ProcessRecord::new("A", Some("B"), 1.0, 2.0),
            ProcessRecord::new("B", Some("A"), 1.5, 2.5),
            ProcessRecord::new("C", Some("A"), 1.8, 1.9),
        ]);
        assert_eq!(
            tree.anomalies().iter().cloned().collect::<Vec<_>>(),
            vec![Anomaly::ParentCycle {
                pid: "A".into(),
                ppid: "B".into()
            }]
        );
        let a = tree.lookup("A").unwrap();
        assert_matches!(a.parent(), None);
        assert_eq!(pids(a.walk().map(|(_, node)| node)), vec!["A", "B", "C"]);
        assert_eq!(tree.lookup("R").unwrap().num_children(), 0);
    }

    #[test]
    fn cycle_descendant() {
        // C is a legitimate child of A, and is seen before the A <-> B cycle
        let tree = build([
            ProcessRecord::new("C", Some("A"), 1.8, 1.9),
            ProcessRecord::new("A", Some("B"), 1.0, 2.0),
            ProcessRecord::new("B", Some("A"), 1.5, 2.5),
            ProcessRecord::new("R", None, 0.0, 9.0),
        ]);
        assert_eq!(
            tree.anomalies().iter().cloned().collect::<Vec<_>>(),
            vec![Anomaly::ParentCycle {
                pid: "A".into(),
                ppid: "B".into()
            }]
        );
        let c = tree.lookup("C").unwrap();
        assert_eq!(c.parent().map(|parent| parent.pid()), Some("A"));
        let a = tree.lookup("A").unwrap();
        assert_matches!(a.parent(), None);
        assert_eq!(pids(a.walk().map(|(_, node)| node)), vec!["A", "B", "C"]);
    }

    /// Random process tree rooted at PID 0, in random insertion order
    ///
    /// Each process' parent has a smaller PID, which guarantees acyclicity.
    fn process_tree() -> impl Strategy<Value = Vec<ProcessRecord>> {
        (1usize..40)
            .prop_flat_map(|len| {
                (
                    prop::collection::vec(any::<prop::sample::Index>(), len),
                    prop::collection::vec((0u8..100, 0u8..20), len),
                    Just((0..len).collect::<Vec<_>>()).prop_shuffle(),
                )
            })
            .prop_map(|(parents, times, order)| {
                order
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
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn reconstruction(records in process_tree()) {
            let tree = build(records.clone());
            prop_assert!(tree.anomalies().is_empty());

            // Walking from the root visits every process exactly once
            let root = tree.root().unwrap();
            prop_assert_eq!(root.pid(), "0");
            let mut visited = root.walk().map(|(_, node)| node.pid()).collect::<Vec<_>>();
            visited.sort_unstable();
            let mut expected = records.iter().map(|r| &*r.pid).collect::<Vec<_>>();
            expected.sort_unstable();
            prop_assert_eq!(visited, expected);

            // Children lists match ppid references and are sorted by start
            for node in tree.nodes() {
                let expected_children = records
                    .iter()
                    .filter(|r| r.ppid.as_deref() == Some(node.pid()))
                    .count();
                prop_assert_eq!(node.num_children(), expected_children);
                for child in node.children() {
                    prop_assert_eq!(child.parent(), Some(node));
                }
                let starts = node.children().map(|c| c.start()).collect::<Vec<_>>();
                prop_assert!(starts.windows(2).all(|w| w[0] <= w[1]));
            }

            // Branches are exactly the processes with children
            let expected_branches = tree
                .nodes()
                .filter(|node| node.num_children() > 0)
                .map(|node| node.pid())
                .collect::<HashSet<_>>();
            prop_assert_eq!(tree.branch_pids(), expected_branches);
            let ppids = records.iter().filter_map(|r| r.ppid.as_deref()).collect::<HashSet<_>>();
            prop_assert_eq!(tree.branch_pids(), ppids);
        }
    }
}
