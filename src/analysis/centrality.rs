//! Degree, betweenness and eigenvector centrality over a `TransactionGraph`.
//!
//! Every function returns one score per node, indexed by `NodeIndex::index()`.
//! Edges are unweighted; aggregated flows count once.

use std::collections::VecDeque;

use crate::error::AnalysisError;
use crate::model::TransactionGraph;

/// Adjacency lists of successors, in edge insertion order
pub fn successor_lists(graph: &TransactionGraph) -> Vec<Vec<usize>> {
    graph
        .node_indices()
        .map(|idx| graph.successors(idx).into_iter().map(|s| s.index()).collect())
        .collect()
}

fn degree_normalizer(node_count: usize) -> f64 {
    if node_count > 1 { 1.0 / (node_count as f64 - 1.0) } else { 0.0 }
}

pub fn in_degree_centrality(graph: &TransactionGraph) -> Vec<f64> {
    let scale = degree_normalizer(graph.node_count());
    graph.node_indices().map(|idx| graph.predecessors(idx).len() as f64 * scale).collect()
}

pub fn out_degree_centrality(graph: &TransactionGraph) -> Vec<f64> {
    let scale = degree_normalizer(graph.node_count());
    graph.node_indices().map(|idx| graph.successors(idx).len() as f64 * scale).collect()
}

/// Brandes' algorithm for directed, unweighted graphs.
///
/// Scores are normalized by `1 / ((n - 1)(n - 2))` when `n > 2`.
pub fn betweenness_centrality(graph: &TransactionGraph) -> Vec<f64> {
    let adjacency = successor_lists(graph);
    let n = adjacency.len();
    let mut betweenness = vec![0.0; n];

    for source in 0..n {
        let mut order: Vec<usize> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0_f64; n];
        let mut distance: Vec<Option<usize>> = vec![None; n];
        sigma[source] = 1.0;
        distance[source] = Some(0);

        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            let Some(dv) = distance[v] else {
                continue;
            };
            for &w in &adjacency[v] {
                if distance[w].is_none() {
                    distance[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if distance[w] == Some(dv + 1) {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0_f64; n];
        while let Some(w) = order.pop() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != source {
                betweenness[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n as f64 - 1.0) * (n as f64 - 2.0));
        betweenness.iter_mut().for_each(|b| *b *= scale);
    }
    betweenness
}

/// Power iteration on `A^T + I`: a node's score flows to its successors.
///
/// Starts from the uniform vector, L2-normalizes every step and stops once the
/// summed absolute change drops below `n * tolerance`.
pub fn eigenvector_centrality(
    graph: &TransactionGraph,
    max_iterations: usize,
    tolerance: f64,
) -> Result<Vec<f64>, AnalysisError> {
    let adjacency = successor_lists(graph);
    let n = adjacency.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut x = vec![1.0 / n as f64; n];
    for _ in 0..max_iterations {
        let last = x.clone();
        for (v, successors) in adjacency.iter().enumerate() {
            for &w in successors {
                x[w] += last[v];
            }
        }

        let norm = x.iter().map(|value| value * value).sum::<f64>().sqrt();
        let norm = if norm == 0.0 { 1.0 } else { norm };
        x.iter_mut().for_each(|value| *value /= norm);

        let change: f64 = x.iter().zip(&last).map(|(current, previous)| (current - previous).abs()).sum();
        if change < n as f64 * tolerance {
            return Ok(x);
        }
    }

    Err(AnalysisError::EigenvectorNotConverged {
        iterations: max_iterations,
    })
}
