//! Execution lanes, for chronological display of a process tree
//!
//! The children of each branch process are packed into lanes, each of which
//! holds a sequence of processes that do not overlap in time. Rendering each
//! lane as a row of a timeline gives a compact picture of what a make process
//! was doing in parallel.

use crate::{
    record::Timestamp,
    tree::{ProcessNode, ProcessTree},
};

/// Children of a process, packed into lanes of non-overlapping executions
#[derive(Clone, Debug, PartialEq)]
pub struct LaneTree<'tree> {
    /// Process whose children are packed
    node: ProcessNode<'tree>,

    /// Lanes, in order of creation
    lanes: Box<[Lane<'tree>]>,
}
//
impl<'tree> LaneTree<'tree> {
    /// Pack the children of a process into lanes, recursively
    ///
    /// Children are considered in order of increasing start time and go to
    /// the first lane whose last process ended before they started. If there
    /// is no such lane, a new lane is opened. This greedy strategy is fast and
    /// predictable, but it does not try to minimize the number of lanes when
    /// processes have zero duration.
    pub fn assign(node: ProcessNode<'tree>) -> Self {
        let mut children = node.children().collect::<Vec<_>>();
        children.sort_by(|c1, c2| c1.start().total_cmp(&c2.start()));

        let mut lanes = Vec::<Lane<'tree>>::new();
        for child in children {
            let entry = if child.is_branch() {
                LaneEntry::Branch(Self::assign(child))
            } else {
                LaneEntry::Leaf(child)
            };
            match lanes.iter_mut().find(|lane| lane.last_end <= child.start()) {
                Some(lane) => lane.push(entry),
                None => lanes.push(Lane::new(entry)),
            }
        }
        Self {
            node,
            lanes: lanes.into_boxed_slice(),
        }
    }

    /// Pack the whole process tree, starting from its root
    pub fn from_tree(tree: &'tree ProcessTree) -> Option<Self> {
        tree.root().map(Self::assign)
    }

    /// Process whose children are packed
    pub fn node(&self) -> ProcessNode<'tree> {
        self.node
    }

    /// Lanes, in order of creation
    pub fn lanes(&self) -> &[Lane<'tree>] {
        &self.lanes
    }
}

/// Sequence of child processes that did not overlap in time
#[derive(Clone, Debug, PartialEq)]
pub struct Lane<'tree> {
    /// Processes of this lane, in order of start time
    entries: Vec<LaneEntry<'tree>>,

    /// End time of the last process in this lane
    last_end: Timestamp,
}
//
impl<'tree> Lane<'tree> {
    /// Open a lane with one process
    fn new(entry: LaneEntry<'tree>) -> Self {
        Self {
            last_end: entry.node().end(),
            entries: vec![entry],
        }
    }

    /// Append a process that starts after the last one ended
    fn push(&mut self, entry: LaneEntry<'tree>) {
        debug_assert!(self.last_end <= entry.node().start());
        self.last_end = entry.node().end();
        self.entries.push(entry);
    }

    /// Processes of this lane, in order of start time
    pub fn entries(&self) -> &[LaneEntry<'tree>] {
        &self.entries
    }

    /// Process nodes of this lane, in order of start time
    pub fn nodes(&self) -> impl Iterator<Item = ProcessNode<'tree>> + Clone + '_ {
        self.entries.iter().map(LaneEntry::node)
    }

    /// End time of the last process in this lane
    pub fn last_end(&self) -> Timestamp {
        self.last_end
    }
}

/// Process within a lane
#[derive(Clone, Debug, PartialEq)]
pub enum LaneEntry<'tree> {
    /// Process without children
    Leaf(ProcessNode<'tree>),

    /// Process with children, which have been packed into their own lanes
    Branch(LaneTree<'tree>),
}
//
impl<'tree> LaneEntry<'tree> {
    /// Process node
    pub fn node(&self) -> ProcessNode<'tree> {
        match self {
            Self::Leaf(node) => *node,
            Self::Branch(tree) => tree.node,
        }
    }
}
