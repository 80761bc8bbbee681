use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use taskcore::{check_structure, NodeId, WorkflowEdge, WorkflowError, WorkflowNode};

/// Order nodes so every edge's source precedes its target.
///
/// Kahn's algorithm over a petgraph `DiGraph`. Among nodes that are ready at
/// the same time, the one declared first in `nodes` goes first.
///
/// A returned order shorter than `nodes` means a cycle: the nodes on or
/// behind it never reach in-degree zero. Unknown edge endpoints and
/// duplicate ids are rejected outright.
pub fn topological_order(
    nodes: &[WorkflowNode],
    edges: &[WorkflowEdge],
) -> Result<Vec<NodeId>, WorkflowError> {
    let graph = build_graph(nodes, edges)?;

    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|idx| graph.neighbors_directed(idx, Direction::Incoming).count())
        .collect();

    // Node indices follow declaration order, so a min-heap on the index
    // gives the declaration-order tie-break.
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(idx, _)| Reverse(idx))
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(Reverse(current)) = ready.pop() {
        order.push(graph[NodeIndex::new(current)].to_string());

        let successors = graph.neighbors_directed(NodeIndex::new(current), Direction::Outgoing);
        for successor in successors {
            let degree = &mut in_degree[successor.index()];
            *degree -= 1;
            if *degree == 0 {
                ready.push(Reverse(successor.index()));
            }
        }
    }

    if order.len() != nodes.len() {
        tracing::debug!(
            ordered = order.len(),
            total = nodes.len(),
            "Dependency cycle leaves nodes unordered"
        );
    }

    Ok(order)
}

/// Build a dependency graph whose node indices match declaration order
fn build_graph<'a>(
    nodes: &'a [WorkflowNode],
    edges: &[WorkflowEdge],
) -> Result<DiGraph<&'a str, ()>, WorkflowError> {
    check_structure(nodes, edges)?;

    let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
    let node_to_index: HashMap<&str, NodeIndex> = nodes
        .iter()
        .map(|node| (node.id.as_str(), graph.add_node(node.id.as_str())))
        .collect();

    for edge in edges {
        if let (Some(&from_idx), Some(&to_idx)) = (
            node_to_index.get(edge.source.as_str()),
            node_to_index.get(edge.target.as_str()),
        ) {
            graph.add_edge(from_idx, to_idx, ());
        }
    }

    Ok(graph)
}
