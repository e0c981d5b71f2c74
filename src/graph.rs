//! All-pairs shortest path closure over a raw, not-necessarily-metric
//! distance matrix. Run once per node as a single-source Dijkstra and the
//! result overwrites the raw edge weights in place.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::SolverError;

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    cost: f64,
    node: usize,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest cost first.
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(raw: &[Vec<f64>], source: usize) -> Vec<f64> {
    let n = raw.len();
    let mut dist = vec![f64::INFINITY; n];
    dist[source] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry { cost: 0.0, node: source });

    while let Some(HeapEntry { cost, node }) = heap.pop() {
        if cost > dist[node] {
            continue;
        }
        for (next, &edge) in raw[node].iter().enumerate() {
            if next == node || !edge.is_finite() {
                continue;
            }
            let candidate = cost + edge;
            if candidate < dist[next] {
                dist[next] = candidate;
                heap.push(HeapEntry { cost: candidate, node: next });
            }
        }
    }

    dist
}

/// Closes `raw` into an all-pairs shortest-path matrix, overwriting it in
/// place. Idempotent: closing an already-closed matrix produces the same
/// matrix, since Dijkstra over true shortest-path edges cannot discover a
/// shorter path.
///
/// Fails with `GraphError` if any two locations remain mutually
/// unreachable after closure.
pub fn close_distances(raw: &mut [Vec<f64>]) -> Result<(), SolverError> {
    let n = raw.len();
    let mut closed = Vec::with_capacity(n);
    for source in 0..n {
        closed.push(dijkstra(raw, source));
    }

    for row in &closed {
        if row.iter().any(|d| !d.is_finite()) {
            return Err(SolverError::GraphError(
                "distance graph is disconnected: at least one location pair has no path".into(),
            ));
        }
    }

    for (i, row) in closed.into_iter().enumerate() {
        raw[i] = row;
    }
    Ok(())
}
