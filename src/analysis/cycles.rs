//! Johnson's elementary circuit enumeration.

use std::collections::HashSet;

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use crate::error::AnalysisError;

/// Every simple directed cycle of the graph given as successor lists.
///
/// Each cycle is reported once, starting at its smallest node index. Fails with
/// `CycleLimitExceeded` as soon as more than `limit` cycles have been found.
pub fn simple_cycles(
    adjacency: &[Vec<usize>],
    limit: usize,
) -> Result<Vec<Vec<usize>>, AnalysisError> {
    let n = adjacency.len();
    let mut cycles = Vec::new();
    let mut start = 0;

    while start < n {
        let Some(component) = least_cyclic_component(adjacency, start) else {
            break;
        };
        let Some(&root) = component.iter().min() else {
            break;
        };

        let members: HashSet<usize> = component.into_iter().collect();
        let local: Vec<Vec<usize>> = (0..n)
            .map(|v| {
                if members.contains(&v) {
                    adjacency[v].iter().copied().filter(|w| members.contains(w)).collect()
                } else {
                    Vec::new()
                }
            })
            .collect();

        circuits_from(root, &local, &mut cycles, limit)?;
        start = root + 1;
    }

    Ok(cycles)
}

/// Strongly connected component holding the smallest node `>= start` among
/// components that can contain a cycle.
fn least_cyclic_component(
    adjacency: &[Vec<usize>],
    start: usize,
) -> Option<Vec<usize>> {
    let mut subgraph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for v in start..adjacency.len() {
        subgraph.add_node(v);
        for &w in &adjacency[v] {
            if w >= start {
                subgraph.add_edge(v, w, ());
            }
        }
    }

    tarjan_scc(&subgraph)
        .into_iter()
        .filter(|component| component.len() > 1 || component.iter().any(|&v| adjacency[v].contains(&v)))
        .min_by_key(|component| component.iter().copied().min().unwrap_or(usize::MAX))
}

/// Circuit search rooted at `root`, iterative form of Johnson's CIRCUIT routine.
fn circuits_from(
    root: usize,
    adjacency: &[Vec<usize>],
    cycles: &mut Vec<Vec<usize>>,
    limit: usize,
) -> Result<(), AnalysisError> {
    let n = adjacency.len();
    let mut blocked = vec![false; n];
    let mut blocked_by: Vec<HashSet<usize>> = vec![HashSet::new(); n];

    let mut path = vec![root];
    blocked[root] = true;
    // (node, next successor position, closed)
    let mut stack: Vec<(usize, usize, bool)> = vec![(root, 0, false)];

    while let Some(top) = stack.last_mut() {
        let (v, position, _) = *top;

        if position < adjacency[v].len() {
            top.1 += 1;
            let w = adjacency[v][position];
            if w == root {
                cycles.push(path.clone());
                if cycles.len() > limit {
                    return Err(AnalysisError::CycleLimitExceeded { limit });
                }
                top.2 = true;
            } else if !blocked[w] {
                path.push(w);
                blocked[w] = true;
                stack.push((w, 0, false));
            }
            continue;
        }

        let Some((v, _, closed)) = stack.pop() else {
            break;
        };
        path.pop();
        if closed {
            if let Some(parent) = stack.last_mut() {
                parent.2 = true;
            }
            unblock(v, &mut blocked, &mut blocked_by);
        } else {
            for &w in &adjacency[v] {
                blocked_by[w].insert(v);
            }
        }
    }

    Ok(())
}

fn unblock(
    node: usize,
    blocked: &mut [bool],
    blocked_by: &mut [HashSet<usize>],
) {
    let mut pending = vec![node];
    while let Some(v) = pending.pop() {
        if blocked[v] {
            blocked[v] = false;
            pending.extend(blocked_by[v].drain());
        }
    }
}
