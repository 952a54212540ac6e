use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// Undirected adjacency list. Every edge is stored in both directions.
pub type Graph<N> = BTreeMap<N, BTreeSet<N>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("{finish} cannot be reached from {start}")]
    Unreachable { start: String, finish: String },
}

impl PathError {
    fn unreachable<N: fmt::Display>(start: N, finish: N) -> Self {
        PathError::Unreachable {
            start: start.to_string(),
            finish: finish.to_string(),
        }
    }
}

pub fn connect<N>(graph: &mut Graph<N>, a: N, b: N)
where
    N: Ord + Copy,
{
    graph.entry(a).or_default().insert(b);
    graph.entry(b).or_default().insert(a);
}

/// Number of edges on the shortest route between `start` and `finish`.
///
/// Bodies missing from the distance table have no known distance yet. The
/// next body to finalize is the unvisited one with the smallest known
/// distance; ties go to the smallest body.
pub fn shortest_path_length<N>(graph: &Graph<N>, start: N, finish: N) -> Result<usize, PathError>
where
    N: Ord + Copy + fmt::Display,
{
    let mut distances = BTreeMap::new();
    let mut visited = BTreeSet::new();

    distances.insert(start, 0);
    let (mut current, mut distance) = (start, 0);

    while current != finish {
        visited.insert(current);
        trace!(node = %current, distance, "finalized");

        let candidate = distance + 1;
        let neighbors = graph.get(&current).into_iter().flatten();

        for &neighbor in neighbors.filter(|n| !visited.contains(*n)) {
            distances
                .entry(neighbor)
                .and_modify(|d| {
                    if *d > candidate {
                        *d = candidate
                    }
                })
                .or_insert(candidate);
        }

        let next = distances
            .iter()
            .filter(|(n, _)| !visited.contains(*n))
            .min_by_key(|&(_, &d)| d)
            .map(|(&n, &d)| (n, d));

        match next {
            Some((n, d)) => {
                current = n;
                distance = d;
            }
            None => return Err(PathError::unreachable(start, finish)),
        }
    }

    debug!(%start, %finish, distance, visited = visited.len(), "shortest path found");
    Ok(distance)
}
