//! Escape networks: directed, capacitated sections between named vertices.

use std::fmt;

use itertools::Itertools;
use tracing::{debug, instrument};

use super::error::{DomainError, DomainResult, GraphError};
use super::graph::Graph;

/// One directed section `from -> to` with its capacity.
///
/// Displayed in the compact form `<from><capacity><to>`, e.g. `ab12cd`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Section {
    pub from: String,
    pub to: String,
    pub capacity: u32,
}

impl Section {
    pub fn new(from: impl Into<String>, capacity: u32, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            capacity,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.from, self.capacity, self.to)
    }
}

/// Position of a vertex within its network, derived from the sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum VertexRole {
    /// No incoming sections
    Source,
    /// No outgoing sections
    Sink,
    Intermediate,
}

/// A named-vertex escape network.
///
/// Vertices only exist as endpoints of sections: removing a vertex also drops
/// every neighbor left without sections.
#[derive(Debug, Clone, Default)]
pub struct Network {
    graph: Graph<(), u32>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a network from a list of sections and validates it.
    #[instrument(level = "debug", skip(sections), fields(count = sections.len()))]
    pub fn from_sections(sections: &[Section]) -> DomainResult<Self> {
        let mut network = Self::new();
        for section in sections {
            network.add_section(section)?;
        }
        network.validate()?;
        Ok(network)
    }

    /// Inserts one section, creating missing endpoints.
    ///
    /// Leaves the network untouched on error. Does not run [`Network::validate`].
    #[instrument(level = "trace", skip(self))]
    pub fn add_section(&mut self, section: &Section) -> DomainResult<()> {
        if section.from == section.to {
            return Err(GraphError::SelfLoop(section.from.clone()).into());
        }
        if self.graph.contains_edge(&section.from, &section.to) {
            return Err(GraphError::DuplicateEdge {
                from: section.from.clone(),
                to: section.to.clone(),
            }
            .into());
        }
        for vertex in [&section.from, &section.to] {
            if !self.graph.contains_node(vertex) {
                self.graph.add_node(vertex, ())?;
            }
        }
        self.graph
            .add_edge(&section.from, &section.to, section.capacity)?;
        Ok(())
    }

    /// Removes a vertex with its sections, then every vertex left without sections.
    ///
    /// Returns the ids of all removed vertices. Does not run [`Network::validate`].
    #[instrument(level = "debug", skip(self))]
    pub fn remove_vertex(&mut self, vertex: &str) -> DomainResult<Vec<String>> {
        let neighbors: Vec<String> = self
            .graph
            .neighbors(vertex)?
            .chain(self.graph.predecessors(vertex)?)
            .map(str::to_string)
            .collect();
        self.graph.remove_node(vertex)?;

        let mut removed = vec![vertex.to_string()];
        for id in neighbors.into_iter().unique() {
            let degree = self.graph.in_degree(&id)? + self.graph.out_degree(&id)?;
            if degree == 0 {
                self.graph.remove_node(&id)?;
                removed.push(id);
            }
        }
        debug!("remove_vertex: removed {:?}", removed);
        Ok(removed)
    }

    /// Checks the structural rules of an escape network.
    ///
    /// A network has at least one section, no pair of opposite sections, at
    /// least one vertex without incoming and one without outgoing sections.
    pub fn validate(&self) -> DomainResult<()> {
        if self.graph.edge_count() == 0 {
            return Err(DomainError::EmptyNetwork);
        }
        if let Some((from, to, _)) = self
            .graph
            .edges()
            .find(|(from, to, _)| self.graph.contains_edge(to, from))
        {
            return Err(DomainError::AntiparallelSections {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        let roles: Vec<VertexRole> = self
            .graph
            .nodes()
            .map(|(id, _)| self.role(id))
            .collect::<DomainResult<_>>()?;
        if !roles.contains(&VertexRole::Source) {
            return Err(DomainError::NoSource);
        }
        if !roles.contains(&VertexRole::Sink) {
            return Err(DomainError::NoSink);
        }
        Ok(())
    }

    pub fn role(&self, vertex: &str) -> DomainResult<VertexRole> {
        let incoming = self.graph.in_degree(vertex)?;
        let outgoing = self.graph.out_degree(vertex)?;
        Ok(match (incoming, outgoing) {
            (0, _) => VertexRole::Source,
            (_, 0) => VertexRole::Sink,
            _ => VertexRole::Intermediate,
        })
    }

    /// Ensures `source` and `sink` can delimit a flow query in this network.
    pub fn check_endpoints(&self, source: &str, sink: &str) -> DomainResult<()> {
        if source == sink {
            return Err(DomainError::SameEndpoints(source.to_string()));
        }
        if self.role(source)? != VertexRole::Source {
            return Err(DomainError::InvalidSource(source.to_string()));
        }
        if self.role(sink)? != VertexRole::Sink {
            return Err(DomainError::InvalidSink(sink.to_string()));
        }
        Ok(())
    }

    /// All sections sorted by `(from, to)`.
    pub fn sections(&self) -> Vec<Section> {
        self.graph
            .edges()
            .map(|(from, to, capacity)| Section::new(from, *capacity, to))
            .sorted_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)))
            .collect()
    }

    /// Vertex ids in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.nodes().map(|(id, _)| id)
    }

    pub fn contains_vertex(&self, vertex: &str) -> bool {
        self.graph.contains_node(vertex)
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn section_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn graph(&self) -> &Graph<(), u32> {
        &self.graph
    }
}
