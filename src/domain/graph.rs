//! Arena-backed directed graph with per-node and per-edge payloads.
//!
//! Nodes are addressed by string identifiers. Iteration over nodes and over
//! each node's successors follows insertion order, so every traversal built on
//! top of this type breaks ties the same way on every run.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use super::error::{GraphError, GraphResult};

/// A node in the arena together with its adjacency.
#[derive(Debug, Clone)]
struct Vertex<N, E> {
    id: String,
    data: N,
    /// Successors with edge payloads, in edge insertion order
    outgoing: Vec<(Index, E)>,
    /// Predecessors, in edge insertion order
    incoming: Vec<Index>,
}

/// Directed graph: node id -> payload and adjacency.
///
/// Every edge endpoint references an existing node. Edges are unique per
/// directed pair. Self loops are rejected unless the graph was created with
/// [`Graph::permitting_self_loops`].
#[derive(Debug, Clone)]
pub struct Graph<N, E> {
    arena: Arena<Vertex<N, E>>,
    index: HashMap<String, Index>,
    order: Vec<Index>,
    self_loops: bool,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            index: HashMap::new(),
            order: Vec::new(),
            self_loops: false,
        }
    }

    pub fn permitting_self_loops() -> Self {
        Self {
            self_loops: true,
            ..Self::new()
        }
    }

    fn lookup(&self, id: &str) -> GraphResult<Index> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))
    }

    fn vertex(&self, idx: Index) -> &Vertex<N, E> {
        // indices held in `index`, `order` and adjacency lists are always live
        &self.arena[idx]
    }

    fn id_of(&self, idx: Index) -> &str {
        &self.vertex(idx).id
    }

    #[instrument(level = "trace", skip(self, data))]
    pub fn add_node(&mut self, id: &str, data: N) -> GraphResult<()> {
        if self.index.contains_key(id) {
            return Err(GraphError::DuplicateNode(id.to_string()));
        }
        let idx = self.arena.insert(Vertex {
            id: id.to_string(),
            data,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        });
        self.index.insert(id.to_string(), idx);
        self.order.push(idx);
        Ok(())
    }

    #[instrument(level = "trace", skip(self, data))]
    pub fn add_edge(&mut self, from: &str, to: &str, data: E) -> GraphResult<()> {
        let from_idx = self.lookup(from)?;
        let to_idx = self.lookup(to)?;
        if from_idx == to_idx && !self.self_loops {
            return Err(GraphError::SelfLoop(from.to_string()));
        }
        if self.contains_edge(from, to) {
            return Err(GraphError::DuplicateEdge {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        self.arena[from_idx].outgoing.push((to_idx, data));
        self.arena[to_idx].incoming.push(from_idx);
        Ok(())
    }

    /// Removes the node and every edge incident to it, returning its payload.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_node(&mut self, id: &str) -> GraphResult<N> {
        let idx = self.lookup(id)?;
        let vertex = self
            .arena
            .remove(idx)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;
        self.index.remove(id);
        self.order.retain(|&i| i != idx);

        for (succ, _) in &vertex.outgoing {
            if let Some(v) = self.arena.get_mut(*succ) {
                v.incoming.retain(|&i| i != idx);
            }
        }
        for pred in &vertex.incoming {
            if let Some(v) = self.arena.get_mut(*pred) {
                v.outgoing.retain(|(i, _)| *i != idx);
            }
        }
        debug!(
            "remove_node: {} dropped {} outgoing and {} incoming edges",
            id,
            vertex.outgoing.len(),
            vertex.incoming.len()
        );
        Ok(vertex.data)
    }

    /// Successors of `id` in edge insertion order.
    ///
    /// The returned iterator is lazy and can be cloned to restart the walk.
    pub fn neighbors(&self, id: &str) -> GraphResult<Neighbors<'_, N, E>> {
        let idx = self.lookup(id)?;
        Ok(Neighbors {
            graph: self,
            edges: self.vertex(idx).outgoing.iter(),
        })
    }

    /// Predecessors of `id` in edge insertion order.
    pub fn predecessors(&self, id: &str) -> GraphResult<impl Iterator<Item = &str> + '_> {
        let idx = self.lookup(id)?;
        Ok(self
            .vertex(idx)
            .incoming
            .iter()
            .map(move |&p| self.id_of(p)))
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        self.edge(from, to).is_some()
    }

    pub fn node(&self, id: &str) -> GraphResult<&N> {
        let idx = self.lookup(id)?;
        Ok(&self.vertex(idx).data)
    }

    pub fn node_mut(&mut self, id: &str) -> GraphResult<&mut N> {
        let idx = self.lookup(id)?;
        Ok(&mut self.arena[idx].data)
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<&E> {
        let from_idx = self.index.get(from)?;
        let to_idx = self.index.get(to)?;
        self.vertex(*from_idx)
            .outgoing
            .iter()
            .find(|(i, _)| i == to_idx)
            .map(|(_, data)| data)
    }

    /// Nodes with payloads in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &N)> + '_ {
        self.order.iter().map(move |&idx| {
            let v = self.vertex(idx);
            (v.id.as_str(), &v.data)
        })
    }

    /// Node payloads, mutable. Order is unspecified.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = (&str, &mut N)> + '_ {
        self.arena
            .iter_mut()
            .map(|(_, v)| (v.id.as_str(), &mut v.data))
    }

    /// All edges as `(from, to, payload)`, by source insertion order then edge insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &E)> + '_ {
        self.order.iter().flat_map(move |&idx| {
            let v = self.vertex(idx);
            v.outgoing
                .iter()
                .map(move |(succ, data)| (v.id.as_str(), self.id_of(*succ), data))
        })
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.arena.iter().map(|(_, v)| v.outgoing.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn in_degree(&self, id: &str) -> GraphResult<usize> {
        let idx = self.lookup(id)?;
        Ok(self.vertex(idx).incoming.len())
    }

    pub fn out_degree(&self, id: &str) -> GraphResult<usize> {
        let idx = self.lookup(id)?;
        Ok(self.vertex(idx).outgoing.len())
    }
}

/// Lazy iterator over the successor ids of one node.
pub struct Neighbors<'a, N, E> {
    graph: &'a Graph<N, E>,
    edges: std::slice::Iter<'a, (Index, E)>,
}

impl<N, E> Clone for Neighbors<'_, N, E> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph,
            edges: self.edges.clone(),
        }
    }
}

impl<'a, N, E> Iterator for Neighbors<'a, N, E> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let graph = self.graph;
        self.edges.next().map(|(idx, _)| graph.id_of(*idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.edges.size_hint()
    }
}

impl<N, E> ExactSizeIterator for Neighbors<'_, N, E> {}
