//! fire-breaker: turn-based fire spread with per-turn containment.

use itertools::Itertools;
use strum::{AsRefStr, EnumString};
use tracing::{debug, info, instrument};

use super::error::{ApplicationError, ApplicationResult, Arity, ParseError};
use super::parser::{parse_identifier, parse_line, CommandKind, IdKind};
use super::session::{Environment, Reply};
use crate::config::FireSettings;
use crate::domain::Forest;

const OK: &str = "OK";
const EMPTY: &str = "EMPTY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum FireKind {
    AddNode,
    AddEdge,
    RemoveNode,
    Neighbors,
    Ignite,
    Protect,
    Spread,
    Show,
    ShowNode,
    Status,
    Outcome,
    Reset,
    Quit,
}

impl CommandKind for FireKind {
    fn arity(self) -> Arity {
        match self {
            FireKind::AddNode
            | FireKind::RemoveNode
            | FireKind::Neighbors
            | FireKind::Ignite
            | FireKind::ShowNode => Arity::Exactly(1),
            FireKind::AddEdge => Arity::Exactly(2),
            FireKind::Protect => Arity::AtLeast(1),
            FireKind::Spread
            | FireKind::Show
            | FireKind::Status
            | FireKind::Outcome
            | FireKind::Reset
            | FireKind::Quit => Arity::Exactly(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireCommand {
    AddNode(String),
    AddEdge(String, String),
    RemoveNode(String),
    Neighbors(String),
    Ignite(String),
    Protect(Vec<String>),
    Spread,
    Show,
    ShowNode(String),
    Status,
    Outcome,
    Reset,
    Quit,
}

/// One fire-breaker game: the forest plus the containment budget of the current turn.
#[derive(Debug, Default)]
pub struct FireBreaker {
    forest: Forest,
    protects_this_turn: u32,
    settings: FireSettings,
}

impl FireBreaker {
    pub fn new(settings: FireSettings) -> Self {
        Self {
            forest: Forest::new(),
            protects_this_turn: 0,
            settings,
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// `id:state` for every node in insertion order.
    fn report(&self) -> Reply {
        if self.forest.is_empty() {
            return Reply::line(EMPTY);
        }
        Reply::Line(
            self.forest
                .states()
                .map(|(id, state)| format!("{id}:{state}"))
                .join(", "),
        )
    }

    /// Moves are rejected once the fire is out after having burnt.
    fn ensure_running(&self) -> ApplicationResult<()> {
        if self.forest.outcome().is_over() {
            return Err(ApplicationError::Semantic("game is over".into()));
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn ignite(&mut self, id: &str) -> ApplicationResult<Reply> {
        self.ensure_running()?;
        self.forest.ignite(id)?;
        Ok(Reply::line(OK))
    }

    #[instrument(level = "debug", skip(self))]
    fn protect(&mut self, ids: &[String]) -> ApplicationResult<Reply> {
        self.ensure_running()?;
        let limit = self.settings.protect_commands_per_turn;
        if limit > 0 && self.protects_this_turn >= limit {
            return Err(ApplicationError::Semantic(format!(
                "only {limit} protect command(s) allowed per turn"
            )));
        }
        self.forest.protect(ids)?;
        self.protects_this_turn += 1;
        Ok(Reply::line(OK))
    }

    #[instrument(level = "debug", skip(self))]
    fn spread(&mut self) -> ApplicationResult<Reply> {
        // every spread closes the containment phase, even a no-op one
        self.protects_this_turn = 0;
        if self.forest.spread()? {
            info!(
                "spread: turn {} done, {} burning",
                self.forest.turn(),
                self.forest.burning_count()
            );
        } else {
            debug!("spread: fire is out");
        }
        Ok(self.report())
    }

    fn status(&self) -> Reply {
        let turn = self.forest.turn();
        if self.forest.is_extinguished() {
            Reply::line(format!("turn {turn}: extinguished"))
        } else {
            Reply::line(format!("turn {turn}: {} burning", self.forest.burning_count()))
        }
    }
}

impl Environment for FireBreaker {
    type Command = FireCommand;

    fn parse(line: &str) -> Result<FireCommand, ParseError> {
        let (kind, args) = parse_line::<FireKind>(line)?;
        let node = |i: usize| parse_identifier(IdKind::ForestNode, args[i]);

        Ok(match kind {
            FireKind::AddNode => FireCommand::AddNode(node(0)?),
            FireKind::AddEdge => FireCommand::AddEdge(node(0)?, node(1)?),
            FireKind::RemoveNode => FireCommand::RemoveNode(node(0)?),
            FireKind::Neighbors => FireCommand::Neighbors(node(0)?),
            FireKind::Ignite => FireCommand::Ignite(node(0)?),
            FireKind::Protect => FireCommand::Protect(
                (0..args.len()).map(node).collect::<Result<_, _>>()?,
            ),
            FireKind::Spread => FireCommand::Spread,
            FireKind::Show => FireCommand::Show,
            FireKind::ShowNode => FireCommand::ShowNode(node(0)?),
            FireKind::Status => FireCommand::Status,
            FireKind::Outcome => FireCommand::Outcome,
            FireKind::Reset => FireCommand::Reset,
            FireKind::Quit => FireCommand::Quit,
        })
    }

    fn apply(&mut self, command: FireCommand) -> ApplicationResult<Reply> {
        match command {
            FireCommand::AddNode(id) => {
                self.forest.add_node(&id)?;
                Ok(Reply::line(OK))
            }
            FireCommand::AddEdge(a, b) => {
                self.forest.add_edge(&a, &b)?;
                Ok(Reply::line(OK))
            }
            FireCommand::RemoveNode(id) => {
                self.forest.remove_node(&id)?;
                Ok(Reply::line(OK))
            }
            FireCommand::Neighbors(id) => {
                let neighbors = self.forest.neighbors(&id)?.join(" ");
                Ok(if neighbors.is_empty() {
                    Reply::line(EMPTY)
                } else {
                    Reply::Line(neighbors)
                })
            }
            FireCommand::Ignite(id) => self.ignite(&id),
            FireCommand::Protect(ids) => self.protect(&ids),
            FireCommand::Spread => self.spread(),
            FireCommand::Show => Ok(self.report()),
            FireCommand::ShowNode(id) => Ok(Reply::line(self.forest.state(&id)?.to_string())),
            FireCommand::Status => Ok(self.status()),
            FireCommand::Outcome => Ok(Reply::line(self.forest.outcome().to_string())),
            FireCommand::Reset => {
                self.forest.reset();
                self.protects_this_turn = 0;
                Ok(Reply::line(OK))
            }
            FireCommand::Quit => Ok(Reply::Quit),
        }
    }
}
