//! Hierarchical displays of the processes spawned by the build

use crate::{
    display::{duration::HumanDuration, PALETTE},
    report::write_anomalies,
    CliError,
};
use jobtrace::{LaneEntry, LaneTree, ProcessNode, ProcessRecord, ProcessTree, ProcessTreeBuilder};
use makelog::LogReadError;
use std::io::Write;
use termtree::Tree;

/// Display the process tree
pub fn ptree(
    mut output: impl Write,
    records: impl Iterator<Item = Result<ProcessRecord, LogReadError>>,
    make_only: bool,
    pid: Option<&str>,
) -> Result<(), CliError> {
    let tree = build_tree(records)?;
    let node = start_node(&tree, pid)?;
    write!(output, "{}", process_tree(node, make_only))?;
    write_anomalies(output, tree.anomalies())
}

/// Display the children of a process packed into execution lanes
pub fn lanes(
    mut output: impl Write,
    records: impl Iterator<Item = Result<ProcessRecord, LogReadError>>,
    pid: Option<&str>,
) -> Result<(), CliError> {
    let tree = build_tree(records)?;
    let node = start_node(&tree, pid)?;
    write!(output, "{}", lane_tree(&LaneTree::assign(node)))?;
    write_anomalies(output, tree.anomalies())
}

/// Build the process tree of a build log
fn build_tree(
    records: impl Iterator<Item = Result<ProcessRecord, LogReadError>>,
) -> Result<ProcessTree, CliError> {
    let mut builder = ProcessTreeBuilder::new();
    for record in records {
        builder.add(record?);
    }
    Ok(builder.finish())
}

/// Find the process from which display should start
fn start_node<'tree>(
    tree: &'tree ProcessTree,
    pid: Option<&str>,
) -> Result<ProcessNode<'tree>, CliError> {
    match pid {
        Some(pid) => tree
            .lookup(pid)
            .ok_or_else(|| CliError::UnknownPid(pid.into())),
        None => tree.root().ok_or(CliError::NoRoot),
    }
}

/// Make a tree display of a process and its descendants
fn process_tree(node: ProcessNode<'_>, make_only: bool) -> Tree<String> {
    Tree::new(label(node)).with_glyphs(PALETTE).with_leaves(
        node.children()
            .filter(|child| !make_only || child.is_branch())
            .map(|child| process_tree(child, make_only)),
    )
}

/// Make a tree display of execution lanes, with one subtree per lane
fn lane_tree(lanes: &LaneTree<'_>) -> Tree<String> {
    Tree::new(label(lanes.node())).with_glyphs(PALETTE).with_leaves(
        lanes.lanes().iter().enumerate().map(|(idx, lane)| {
            Tree::new(format!("lane {idx}"))
                .with_glyphs(PALETTE)
                .with_leaves(lane.entries().iter().map(|entry| match entry {
                    LaneEntry::Leaf(node) => Tree::new(label(*node)).with_glyphs(PALETTE),
                    LaneEntry::Branch(lanes) => lane_tree(lanes),
                }))
        }),
    )
}

/// One-line description of a process
fn label(node: ProcessNode<'_>) -> String {
    let record = node.record();
    let tool = if record.tool.is_empty() {
        "?"
    } else {
        &*record.tool
    };
    let mut label = format!(
        "PID={} {tool} ({:.3} .. {:.3}, {})",
        node.pid(),
        node.start(),
        node.end(),
        HumanDuration(node.duration())
    );
    if let Some(target) = &record.make_target {
        label.push_str(" -> ");
        label.push_str(target);
    }
    label
}
