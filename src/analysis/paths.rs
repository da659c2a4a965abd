use petgraph::graph::NodeIndex;

use crate::model::TransactionGraph;

/// Longest linear path starting at `start`.
///
/// The walk follows the unique successor and stops at a node with no or several
/// successors, after `max_hops` hops, or before revisiting a node already on the
/// path. Since the walk never branches there is exactly one such path per start.
pub fn linear_path(
    graph: &TransactionGraph,
    start: NodeIndex,
    max_hops: usize,
) -> Vec<NodeIndex> {
    let mut path = vec![start];
    let mut current = start;

    while path.len() <= max_hops {
        let successors = graph.successors(current);
        let [next] = successors.as_slice() else {
            break;
        };
        if path.contains(next) {
            break;
        }
        path.push(*next);
        current = *next;
    }

    path
}
