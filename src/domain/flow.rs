//! Reachability, augmenting paths and maximum flow (Edmonds-Karp).
//!
//! All searches are breadth-first over arcs with positive residual capacity.
//! Arcs leave a vertex in section insertion order, so the first shortest path
//! found is the same on every run.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, instrument};

use super::error::{DomainError, DomainResult, GraphError};
use super::network::Network;

#[derive(Debug, Clone, Copy)]
struct Arc {
    to: usize,
    residual: u64,
}

/// Residual graph with dense vertex indices.
///
/// Arc `2k` is the forward arc of the k-th section, arc `2k + 1` its reverse.
struct Residual<'a> {
    names: Vec<&'a str>,
    positions: HashMap<&'a str, usize>,
    arcs: Vec<Arc>,
    adjacency: Vec<Vec<usize>>,
}

impl<'a> Residual<'a> {
    fn new(network: &'a Network) -> Self {
        let names: Vec<&str> = network.vertices().collect();
        let positions: HashMap<&str, usize> =
            names.iter().enumerate().map(|(i, name)| (*name, i)).collect();
        let mut arcs = Vec::with_capacity(network.section_count() * 2);
        let mut adjacency = vec![Vec::new(); names.len()];

        for (from, to, capacity) in network.graph().edges() {
            let (u, v) = (positions[from], positions[to]);
            adjacency[u].push(arcs.len());
            arcs.push(Arc {
                to: v,
                residual: u64::from(*capacity),
            });
            adjacency[v].push(arcs.len());
            arcs.push(Arc { to: u, residual: 0 });
        }

        Self {
            names,
            positions,
            arcs,
            adjacency,
        }
    }

    fn position(&self, vertex: &str) -> DomainResult<usize> {
        self.positions
            .get(vertex)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(vertex.to_string()).into())
    }

    /// Arcs of a shortest positive-residual path from `s` to `t`, if any.
    fn shortest_path(&self, s: usize, t: usize) -> Option<Vec<usize>> {
        let mut parent_arc: Vec<Option<usize>> = vec![None; self.names.len()];
        let mut visited = vec![false; self.names.len()];
        let mut queue = VecDeque::from([s]);
        visited[s] = true;

        while let Some(u) = queue.pop_front() {
            if u == t {
                break;
            }
            for &arc in &self.adjacency[u] {
                let Arc { to, residual } = self.arcs[arc];
                if residual > 0 && !visited[to] {
                    visited[to] = true;
                    parent_arc[to] = Some(arc);
                    queue.push_back(to);
                }
            }
        }

        if !visited[t] {
            return None;
        }
        let mut path = Vec::new();
        let mut v = t;
        while let Some(arc) = parent_arc[v] {
            path.push(arc);
            // the reverse arc points back to the tail
            v = self.arcs[arc ^ 1].to;
        }
        path.reverse();
        Some(path)
    }

    fn vertices_on(&self, s: usize, path: &[usize]) -> Vec<String> {
        std::iter::once(s)
            .chain(path.iter().map(|&arc| self.arcs[arc].to))
            .map(|v| self.names[v].to_string())
            .collect()
    }
}

/// First shortest path from `from` to `to` over sections with positive capacity.
///
/// Returns the visited vertices including both ends, or `None` if `to` cannot be reached.
#[instrument(level = "debug", skip(network))]
pub fn augmenting_path(network: &Network, from: &str, to: &str) -> DomainResult<Option<Vec<String>>> {
    let residual = Residual::new(network);
    let s = residual.position(from)?;
    let t = residual.position(to)?;
    Ok(residual
        .shortest_path(s, t)
        .map(|path| residual.vertices_on(s, &path)))
}

/// Whether `to` is reachable from `from` over sections with positive capacity.
pub fn reachable(network: &Network, from: &str, to: &str) -> DomainResult<bool> {
    Ok(augmenting_path(network, from, to)?.is_some())
}

/// Maximum flow from `source` to `sink`.
///
/// Disconnected endpoints yield 0. Sections with capacity 0 never carry flow.
#[instrument(level = "debug", skip(network))]
pub fn max_flow(network: &Network, source: &str, sink: &str) -> DomainResult<u64> {
    let mut residual = Residual::new(network);
    let s = residual.position(source)?;
    let t = residual.position(sink)?;
    if s == t {
        return Err(DomainError::SameEndpoints(source.to_string()));
    }

    let mut flow = 0u64;
    let mut rounds = 0usize;
    while let Some(path) = residual.shortest_path(s, t) {
        let Some(bottleneck) = path.iter().map(|&arc| residual.arcs[arc].residual).min() else {
            break;
        };
        for &arc in &path {
            residual.arcs[arc].residual -= bottleneck;
            residual.arcs[arc ^ 1].residual += bottleneck;
        }
        flow += bottleneck;
        rounds += 1;
    }
    debug!("max_flow: {} -> {} = {} after {} augmentations", source, sink, flow, rounds);
    Ok(flow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::network::Section;
    use crate::util::testing;
    use rstest::rstest;

    fn network(raw: &[(&str, u32, &str)]) -> Network {
        let mut network = Network::new();
        for (from, cap, to) in raw {
            network.add_section(&Section::new(*from, *cap, *to)).unwrap();
        }
        network
    }

    fn clrs() -> Vec<(&'static str, u32, &'static str)> {
        vec![
            ("s", 16, "a"),
            ("s", 13, "c"),
            ("a", 12, "b"),
            ("c", 4, "a"),
            ("b", 9, "c"),
            ("c", 14, "d"),
            ("d", 7, "b"),
            ("b", 20, "t"),
            ("d", 4, "t"),
        ]
    }

    #[test]
    fn given_chain_when_computing_flow_then_bottleneck() {
        testing::init_test_setup();
        let n = network(&[("a", 3, "b"), ("b", 2, "c")]);
        assert_eq!(max_flow(&n, "a", "c").unwrap(), 2);
    }

    #[test]
    fn given_textbook_network_when_computing_flow_then_23() {
        let n = network(&clrs());
        assert_eq!(max_flow(&n, "s", "t").unwrap(), 23);
    }

    #[test]
    fn given_textbook_network_when_sections_reordered_then_same_flow() {
        let mut raw = clrs();
        raw.reverse();
        let reversed = network(&raw);
        raw.rotate_left(4);
        let rotated = network(&raw);

        assert_eq!(max_flow(&reversed, "s", "t").unwrap(), 23);
        assert_eq!(max_flow(&rotated, "s", "t").unwrap(), 23);
    }

    #[rstest]
    #[case(1, 2)]
    #[case(2, 3)]
    #[case(5, 4)]
    #[case(50, 4)]
    fn given_growing_capacity_when_computing_flow_then_non_decreasing(
        #[case] capacity: u32,
        #[case] expected: u64,
    ) {
        let n = network(&[("s", capacity, "a"), ("a", 3, "t"), ("s", 1, "t")]);
        assert_eq!(max_flow(&n, "s", "t").unwrap(), expected);
    }

    #[test]
    fn given_disconnected_endpoints_when_computing_flow_then_zero() {
        let n = network(&[("a", 3, "b"), ("x", 2, "y")]);

        assert_eq!(max_flow(&n, "a", "y").unwrap(), 0);
        assert!(!reachable(&n, "a", "y").unwrap());
        assert_eq!(augmenting_path(&n, "a", "y").unwrap(), None);
    }

    #[test]
    fn given_zero_capacity_section_when_searching_then_never_traversed() {
        let n = network(&[("s", 0, "a"), ("a", 5, "t"), ("s", 2, "t")]);

        assert_eq!(max_flow(&n, "s", "t").unwrap(), 2);
        assert!(!reachable(&n, "s", "a").unwrap());
    }

    #[test]
    fn given_equal_length_paths_when_searching_then_first_inserted_wins() {
        let n = network(&[("s", 1, "b"), ("s", 1, "a"), ("a", 1, "t"), ("b", 1, "t")]);

        let path = augmenting_path(&n, "s", "t").unwrap();

        assert_eq!(path, Some(vec!["s".into(), "b".into(), "t".into()]));
    }

    #[test]
    fn given_unchanged_network_when_querying_twice_then_same_answers() {
        let n = network(&clrs());

        assert_eq!(max_flow(&n, "s", "t").unwrap(), max_flow(&n, "s", "t").unwrap());
        assert_eq!(reachable(&n, "a", "d").unwrap(), reachable(&n, "a", "d").unwrap());
    }

    #[test]
    fn given_unknown_vertex_when_computing_flow_then_unknown_node() {
        let n = network(&[("a", 3, "b")]);

        assert_eq!(
            max_flow(&n, "a", "q"),
            Err(DomainError::Graph(GraphError::UnknownNode("q".into())))
        );
        assert_eq!(
            max_flow(&n, "a", "a"),
            Err(DomainError::SameEndpoints("a".into()))
        );
    }
}
