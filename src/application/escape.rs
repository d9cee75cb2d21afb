//! escape-networks: registry of named networks with flow queries.

use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use strum::{AsRefStr, EnumString};
use tracing::{debug, info, instrument};

use super::error::{ApplicationError, ApplicationResult, Arity, ParseError};
use super::parser::{parse_identifier, parse_line, parse_sections, CommandKind, IdKind};
use super::session::{Environment, Reply};
use crate::config::EscapeSettings;
use crate::domain::{flow, DomainError, Network, Section};

const EMPTY: &str = "EMPTY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum EscapeKind {
    Add,
    Remove,
    Flow,
    Path,
    Reach,
    Neighbors,
    Vertices,
    List,
    Print,
    Quit,
}

impl CommandKind for EscapeKind {
    fn arity(self) -> Arity {
        match self {
            EscapeKind::Add | EscapeKind::Remove | EscapeKind::Neighbors => Arity::Exactly(2),
            EscapeKind::Flow | EscapeKind::Path | EscapeKind::Reach => Arity::Exactly(3),
            EscapeKind::Vertices | EscapeKind::Print => Arity::Exactly(1),
            EscapeKind::List => Arity::AtMost(1),
            EscapeKind::Quit => Arity::Exactly(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscapeCommand {
    Add { network: String, sections: Vec<Section> },
    Remove { network: String, vertex: String },
    Flow { network: String, source: String, sink: String },
    Path { network: String, from: String, to: String },
    Reach { network: String, from: String, to: String },
    Neighbors { network: String, vertex: String },
    Vertices { network: String },
    List { network: Option<String> },
    Print { network: String },
    Quit,
}

/// Cached flow values of one network, keyed by `(source, sink)`.
type FlowCache = BTreeMap<(String, String), u64>;

/// All escape networks of one session.
#[derive(Debug, Default)]
pub struct EscapeNetworks {
    networks: HashMap<String, Network>,
    flows: HashMap<String, FlowCache>,
    settings: EscapeSettings,
}

impl EscapeNetworks {
    pub fn new(settings: EscapeSettings) -> Self {
        Self {
            networks: HashMap::new(),
            flows: HashMap::new(),
            settings,
        }
    }

    pub fn network(&self, id: &str) -> ApplicationResult<&Network> {
        self.networks
            .get(id)
            .ok_or_else(|| ApplicationError::UnknownNetwork(id.to_string()))
    }

    /// Replaces a network after a successful mutation and drops its cached flows.
    fn commit(&mut self, id: &str, network: Network) {
        self.networks.insert(id.to_string(), network);
        if self.flows.remove(id).is_some() {
            debug!("commit: flow cache of {} invalidated", id);
        }
    }

    #[instrument(level = "debug", skip(self, sections), fields(count = sections.len()))]
    fn add(&mut self, id: &str, sections: &[Section]) -> ApplicationResult<Reply> {
        if let Some(section) = sections.iter().find(|s| s.capacity == 0) {
            return Err(DomainError::NonPositiveCapacity(section.capacity).into());
        }

        match self.networks.get(id) {
            Some(existing) => {
                let [section] = sections else {
                    return Err(ApplicationError::Semantic(
                        "sections must be added to an existing escape network one at a time".into(),
                    ));
                };
                let mut updated = existing.clone();
                updated.add_section(section)?;
                updated.validate()?;
                self.commit(id, updated);
                info!("add: section {} added to {}", section, id);
                Ok(Reply::line(format!(
                    "Added new section {section} to escape network {id}."
                )))
            }
            None => {
                if sections.len() < 2 {
                    return Err(ApplicationError::Semantic(
                        "a new escape network must consist of more than one section".into(),
                    ));
                }
                let network = Network::from_sections(sections)?;
                self.commit(id, network);
                info!("add: network {} created", id);
                Ok(Reply::line(format!(
                    "Added new escape network with identifier {id}."
                )))
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    fn remove(&mut self, id: &str, vertex: &str) -> ApplicationResult<Reply> {
        let mut updated = self.network(id)?.clone();
        updated.remove_vertex(vertex)?;
        updated.validate()?;
        self.commit(id, updated);
        Ok(Reply::line(format!(
            "Removed vertex {vertex} from escape network {id}."
        )))
    }

    #[instrument(level = "debug", skip(self))]
    fn flow(&mut self, id: &str, source: &str, sink: &str) -> ApplicationResult<Reply> {
        let network = self.network(id)?;
        network.check_endpoints(source, sink)?;

        let key = (source.to_string(), sink.to_string());
        if let Some(value) = self.flows.get(id).and_then(|cache| cache.get(&key)) {
            debug!("flow: cache hit {} {} -> {}", id, source, sink);
            return Ok(Reply::line(value.to_string()));
        }

        let value = flow::max_flow(network, source, sink)?;
        if self.settings.cache_flows {
            self.flows.entry(id.to_string()).or_default().insert(key, value);
        }
        Ok(Reply::line(value.to_string()))
    }

    fn path(&self, id: &str, from: &str, to: &str) -> ApplicationResult<Reply> {
        let path = flow::augmenting_path(self.network(id)?, from, to)?;
        Ok(Reply::line(match path {
            Some(vertices) => vertices.join(" "),
            None => EMPTY.to_string(),
        }))
    }

    fn reach(&self, id: &str, from: &str, to: &str) -> ApplicationResult<Reply> {
        let reachable = flow::reachable(self.network(id)?, from, to)?;
        Ok(Reply::line(reachable.to_string()))
    }

    fn neighbors(&self, id: &str, vertex: &str) -> ApplicationResult<Reply> {
        let neighbors = self
            .network(id)?
            .graph()
            .neighbors(vertex)
            .map_err(DomainError::from)?
            .join(" ");
        Ok(or_empty(neighbors))
    }

    fn vertices(&self, id: &str) -> ApplicationResult<Reply> {
        let network = self.network(id)?;
        let entries = network
            .vertices()
            .sorted()
            .map(|v| network.role(v).map(|role| format!("{v}:{role}")))
            .collect::<Result<Vec<String>, DomainError>>()?;
        Ok(Reply::line(entries.join(", ")))
    }

    /// Networks by vertex count (descending) then name.
    fn list_networks(&self) -> Reply {
        let entries = self
            .networks
            .iter()
            .sorted_by(|(a_id, a), (b_id, b)| {
                b.vertex_count()
                    .cmp(&a.vertex_count())
                    .then_with(|| a_id.cmp(b_id))
            })
            .map(|(id, network)| format!("{id} {}", network.vertex_count()))
            .join(", ");
        or_empty(entries)
    }

    /// Cached flows of one network by value, source, sink.
    fn list_flows(&self, id: &str) -> ApplicationResult<Reply> {
        self.network(id)?;
        let entries = self
            .flows
            .get(id)
            .into_iter()
            .flatten()
            .sorted_by(|((a_src, a_sink), a), ((b_src, b_sink), b)| {
                (a, a_src, a_sink).cmp(&(b, b_src, b_sink))
            })
            .map(|((source, sink), value)| format!("{value} {source} {sink}"))
            .join(", ");
        Ok(or_empty(entries))
    }

    fn print(&self, id: &str) -> ApplicationResult<Reply> {
        let sections = self.network(id)?.sections();
        Ok(Reply::line(sections.iter().join(";")))
    }
}

fn or_empty(text: String) -> Reply {
    if text.is_empty() {
        Reply::line(EMPTY)
    } else {
        Reply::Line(text)
    }
}

impl Environment for EscapeNetworks {
    type Command = EscapeCommand;

    fn parse(line: &str) -> Result<EscapeCommand, ParseError> {
        let (kind, args) = parse_line::<EscapeKind>(line)?;
        let network = |i: usize| parse_identifier(IdKind::Network, args[i]);
        let vertex = |i: usize| parse_identifier(IdKind::Vertex, args[i]);

        Ok(match kind {
            EscapeKind::Add => EscapeCommand::Add {
                network: network(0)?,
                sections: parse_sections(args[1])?,
            },
            EscapeKind::Remove => EscapeCommand::Remove {
                network: network(0)?,
                vertex: vertex(1)?,
            },
            EscapeKind::Flow => EscapeCommand::Flow {
                network: network(0)?,
                source: vertex(1)?,
                sink: vertex(2)?,
            },
            EscapeKind::Path => EscapeCommand::Path {
                network: network(0)?,
                from: vertex(1)?,
                to: vertex(2)?,
            },
            EscapeKind::Reach => EscapeCommand::Reach {
                network: network(0)?,
                from: vertex(1)?,
                to: vertex(2)?,
            },
            EscapeKind::Neighbors => EscapeCommand::Neighbors {
                network: network(0)?,
                vertex: vertex(1)?,
            },
            EscapeKind::Vertices => EscapeCommand::Vertices {
                network: network(0)?,
            },
            EscapeKind::List => EscapeCommand::List {
                network: args.first().map(|_| network(0)).transpose()?,
            },
            EscapeKind::Print => EscapeCommand::Print {
                network: network(0)?,
            },
            EscapeKind::Quit => EscapeCommand::Quit,
        })
    }

    fn apply(&mut self, command: EscapeCommand) -> ApplicationResult<Reply> {
        match command {
            EscapeCommand::Add { network, sections } => self.add(&network, &sections),
            EscapeCommand::Remove { network, vertex } => self.remove(&network, &vertex),
            EscapeCommand::Flow {
                network,
                source,
                sink,
            } => self.flow(&network, &source, &sink),
            EscapeCommand::Path { network, from, to } => self.path(&network, &from, &to),
            EscapeCommand::Reach { network, from, to } => self.reach(&network, &from, &to),
            EscapeCommand::Neighbors { network, vertex } => self.neighbors(&network, &vertex),
            EscapeCommand::Vertices { network } => self.vertices(&network),
            EscapeCommand::List { network: None } => Ok(self.list_networks()),
            EscapeCommand::List {
                network: Some(network),
            } => self.list_flows(&network),
            EscapeCommand::Print { network } => self.print(&network),
            EscapeCommand::Quit => Ok(Reply::Quit),
        }
    }
}
