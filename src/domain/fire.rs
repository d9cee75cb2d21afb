//! Fire spread over an undirected forest graph.

use std::collections::HashSet;

use tracing::{debug, instrument};

use super::error::{DomainError, DomainResult, GraphError};
use super::graph::{Graph, Neighbors};

/// State of one forest node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum FireState {
    #[default]
    Unburnt,
    Burning,
    Protected,
    Burnt,
}

/// Verdict of a game, derived from the node states alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum GameOutcome {
    /// Nothing has been ignited since the last reset.
    Idle,
    Running,
    /// The fire is out and at least one node survived.
    Won,
    /// The fire is out and every node burnt.
    Lost,
}

impl GameOutcome {
    pub fn is_over(self) -> bool {
        matches!(self, GameOutcome::Won | GameOutcome::Lost)
    }
}

/// Undirected graph of forest nodes and the turn counter of the simulation.
///
/// Adjacency is stored as two directed edges per undirected edge.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    graph: Graph<FireState, ()>,
    turn: u32,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn add_node(&mut self, id: &str) -> DomainResult<()> {
        Ok(self.graph.add_node(id, FireState::Unburnt)?)
    }

    /// Connects `a` and `b` in both directions.
    #[instrument(level = "trace", skip(self))]
    pub fn add_edge(&mut self, a: &str, b: &str) -> DomainResult<()> {
        self.graph.node(a)?;
        self.graph.node(b)?;
        if a == b {
            return Err(GraphError::SelfLoop(a.to_string()).into());
        }
        if self.graph.contains_edge(a, b) {
            return Err(GraphError::DuplicateEdge {
                from: a.to_string(),
                to: b.to_string(),
            }
            .into());
        }
        self.graph.add_edge(a, b, ())?;
        self.graph.add_edge(b, a, ())?;
        Ok(())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn remove_node(&mut self, id: &str) -> DomainResult<FireState> {
        Ok(self.graph.remove_node(id)?)
    }

    pub fn neighbors(&self, id: &str) -> DomainResult<Neighbors<'_, FireState, ()>> {
        Ok(self.graph.neighbors(id)?)
    }

    pub fn state(&self, id: &str) -> DomainResult<FireState> {
        Ok(*self.graph.node(id)?)
    }

    /// Node states in insertion order.
    pub fn states(&self) -> impl Iterator<Item = (&str, FireState)> + '_ {
        self.graph.nodes().map(|(id, state)| (id, *state))
    }

    /// Sets an unburnt node on fire.
    #[instrument(level = "debug", skip(self))]
    pub fn ignite(&mut self, id: &str) -> DomainResult<()> {
        let state = self.graph.node_mut(id)?;
        if *state != FireState::Unburnt {
            return Err(DomainError::IllegalTransition {
                node: id.to_string(),
                state: state.to_string(),
                action: "ignite",
            });
        }
        *state = FireState::Burning;
        Ok(())
    }

    /// Marks every listed node protected, or none of them.
    ///
    /// Each node must exist, appear once and currently be unburnt.
    #[instrument(level = "debug", skip(self))]
    pub fn protect(&mut self, ids: &[String]) -> DomainResult<()> {
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id.as_str()) {
                return Err(DomainError::RepeatedNode(id.clone()));
            }
            let state = self.state(id)?;
            if state != FireState::Unburnt {
                return Err(DomainError::IllegalTransition {
                    node: id.clone(),
                    state: state.to_string(),
                    action: "protect",
                });
            }
        }
        for id in ids {
            *self.graph.node_mut(id)? = FireState::Protected;
        }
        Ok(())
    }

    /// Advances the fire by one turn.
    ///
    /// Every burning node ignites its unburnt neighbors and burns out, all at
    /// once. Returns `false` without advancing the turn when nothing burns.
    #[instrument(level = "debug", skip(self), fields(turn = self.turn))]
    pub fn spread(&mut self) -> DomainResult<bool> {
        let burning: Vec<String> = self
            .states()
            .filter(|(_, state)| *state == FireState::Burning)
            .map(|(id, _)| id.to_string())
            .collect();
        if burning.is_empty() {
            debug!("spread: fire is out, turn stays at {}", self.turn);
            return Ok(false);
        }

        let mut catching: Vec<String> = Vec::new();
        for id in &burning {
            for neighbor in self.graph.neighbors(id)? {
                if self.state(neighbor)? == FireState::Unburnt && !catching.iter().any(|c| c == neighbor) {
                    catching.push(neighbor.to_string());
                }
            }
        }

        for id in &burning {
            *self.graph.node_mut(id)? = FireState::Burnt;
        }
        for id in &catching {
            *self.graph.node_mut(id)? = FireState::Burning;
        }
        self.turn += 1;
        debug!(
            "spread: turn {} burnt out {:?}, caught fire {:?}",
            self.turn, burning, catching
        );
        Ok(true)
    }

    /// Returns every node to unburnt and the turn counter to zero.
    pub fn reset(&mut self) {
        for (_, state) in self.graph.nodes_mut() {
            *state = FireState::Unburnt;
        }
        self.turn = 0;
    }

    pub fn burning_count(&self) -> usize {
        self.states()
            .filter(|(_, state)| *state == FireState::Burning)
            .count()
    }

    pub fn is_extinguished(&self) -> bool {
        self.burning_count() == 0
    }

    pub fn outcome(&self) -> GameOutcome {
        let (mut burning, mut burnt, mut saved) = (false, false, false);
        for (_, state) in self.states() {
            match state {
                FireState::Burning => burning = true,
                FireState::Burnt => burnt = true,
                FireState::Unburnt | FireState::Protected => saved = true,
            }
        }
        match (burning, burnt, saved) {
            (true, _, _) => GameOutcome::Running,
            (false, false, _) => GameOutcome::Idle,
            (false, true, true) => GameOutcome::Won,
            (false, true, false) => GameOutcome::Lost,
        }
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}
