//! Fixpoint orchestrator
//!
//! Builds the initial graph from given constraints, then runs every rule over
//! the frontier round after round until the queries resolve, nothing new is
//! derived, or the round cap is hit.

use crate::geometry::Oracle;
use crate::ir::{
    FactGraph, FactId, GraphError, GraphResult, Node, Point2D, PointId, Query, Role,
};
use crate::rules::{all_rules, Effect, Rule, RuleContext};
use crate::search::answer::{answer, Answer};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Solver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of fixpoint rounds
    pub max_rounds: usize,

    /// Radians within which an angle counts as right
    pub right_angle_tolerance: f64,

    /// Decimal places for numeric fallback values
    pub fallback_precision: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_rounds: 100,
            right_angle_tolerance: 0.01,
            fallback_precision: 2,
        }
    }
}

/// Outcome of a solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    Succeeded,
    PartiallySucceeded,
    Unsolved,
    Inconsistent,
    NoQueries,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SolveStatus::Succeeded => "succeeded",
            SolveStatus::PartiallySucceeded => "partially succeeded",
            SolveStatus::Unsolved => "unsolved",
            SolveStatus::Inconsistent => "inconsistent",
            SolveStatus::NoQueries => "no queries",
        };
        f.write_str(text)
    }
}

/// Where the solver is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Building,
    Iterating,
    Finished(SolveStatus),
}

/// A given constraint that knows how to turn itself into a graph fact
pub trait Constraint {
    fn materialize(&self, graph: &mut FactGraph) -> GraphResult<FactId>;
}

/// Solver errors
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Failed to build initial graph: {0}")]
    Graph(#[from] GraphError),

    #[error("Cannot modify the problem once solving has started")]
    AlreadyStarted,
}

pub type SolverResult<T> = Result<T, SolverError>;

/// Everything a caller needs after a solve
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    pub status: SolveStatus,

    /// Fixpoint rounds actually run
    pub rounds: usize,

    /// Facts in the final graph, givens included
    pub facts: usize,

    /// One answer per query, in registration order
    pub answers: Vec<Answer>,
}

/// Forward-chaining solver over one fact graph
pub struct Solver {
    config: SolverConfig,
    graph: FactGraph,
    queries: Vec<Query>,
    rules: Vec<Box<dyn Rule>>,
    phase: Phase,
    frontier: Vec<Node>,
    rounds: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            graph: FactGraph::new(),
            queries: Vec::new(),
            rules: all_rules(),
            phase: Phase::Init,
            frontier: Vec::new(),
            rounds: 0,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn graph(&self) -> &FactGraph {
        &self.graph
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Final status, once the solve has finished
    pub fn status(&self) -> Option<SolveStatus> {
        match self.phase {
            Phase::Finished(status) => Some(status),
            _ => None,
        }
    }

    fn building(&mut self) -> SolverResult<()> {
        match self.phase {
            Phase::Init | Phase::Building => {
                self.phase = Phase::Building;
                Ok(())
            }
            _ => Err(SolverError::AlreadyStarted),
        }
    }

    pub fn add_point(&mut self, name: &str, coords: Option<Point2D>) -> SolverResult<PointId> {
        self.building()?;
        Ok(self.graph.add_point(name, coords))
    }

    pub fn add_constraint(&mut self, constraint: &dyn Constraint) -> SolverResult<FactId> {
        self.building()?;
        Ok(constraint.materialize(&mut self.graph)?)
    }

    pub fn add_query(&mut self, query: Query) -> SolverResult<()> {
        self.building()?;
        self.queries.push(query);
        Ok(())
    }

    /// Seal the problem and seed the frontier with every node
    ///
    /// Does nothing if solving has already started.
    pub fn start(&mut self) {
        if !matches!(self.phase, Phase::Init | Phase::Building) {
            return;
        }
        if self.queries.is_empty() {
            self.finish(SolveStatus::NoQueries);
            return;
        }
        let poisoned = self
            .graph
            .facts()
            .find(|f| f.value().map_or(false, |v| !v.is_finite()));
        if let Some(fact) = poisoned {
            warn!(fact = %self.graph.describe(fact.id), "given value is not finite");
            self.finish(SolveStatus::Inconsistent);
            return;
        }
        self.frontier = self.graph.nodes();
        self.phase = Phase::Iterating;
        debug!(
            points = self.graph.num_points(),
            facts = self.graph.num_facts(),
            queries = self.queries.len(),
            "solver started"
        );
    }

    /// Run one fixpoint round
    ///
    /// Returns `false` once the solve has finished; the status is then
    /// available from [`Solver::status`].
    pub fn step(&mut self) -> bool {
        self.start();
        if self.phase != Phase::Iterating {
            return false;
        }
        if self.frontier.is_empty() || self.all_resolved() {
            let status = self.classify();
            self.finish(status);
            return false;
        }
        if self.rounds >= self.config.max_rounds {
            warn!(max_rounds = self.config.max_rounds, "round cap reached");
            let status = self.classify();
            self.finish(status);
            return false;
        }

        self.rounds += 1;
        let frontier = std::mem::take(&mut self.frontier);
        let mut next = Vec::new();
        let mut created = Vec::new();

        for &node in &frontier {
            for rule in &self.rules {
                let effects = {
                    let ctx = RuleContext {
                        graph: &self.graph,
                        oracle: Oracle::new(self.graph.coords()),
                        right_angle_tolerance: self.config.right_angle_tolerance,
                    };
                    rule.process(&ctx, node)
                };
                apply(&mut self.graph, rule.as_ref(), effects, &mut next, &mut created);
            }
        }

        let poisoned = created
            .iter()
            .find(|&&id| self.graph.value(id).map_or(false, |v| !v.is_finite()));
        if let Some(&id) = poisoned {
            warn!(fact = %self.graph.describe(id), round = self.rounds, "derived value is not finite");
            self.finish(SolveStatus::Inconsistent);
            return false;
        }

        debug!(round = self.rounds, derived = created.len(), frontier = next.len(), "round finished");
        self.frontier = next;
        true
    }

    /// Run to completion and answer every query
    pub fn solve(&mut self) -> SolveReport {
        while self.step() {}
        let status = self.status().unwrap_or(SolveStatus::Unsolved);
        info!(
            rounds = self.rounds,
            facts = self.graph.num_facts(),
            status = ?status,
            "solve finished"
        );
        SolveReport {
            status,
            rounds: self.rounds,
            facts: self.graph.num_facts(),
            answers: self.answers(),
        }
    }

    /// Answers against the current graph
    pub fn answers(&self) -> Vec<Answer> {
        self.queries
            .iter()
            .map(|q| answer(&self.graph, q, self.config.fallback_precision))
            .collect()
    }

    fn all_resolved(&self) -> bool {
        self.queries.iter().all(|q| q.is_resolved(&self.graph))
    }

    fn classify(&self) -> SolveStatus {
        let resolved = self.queries.iter().filter(|q| q.is_resolved(&self.graph)).count();
        if resolved == self.queries.len() {
            SolveStatus::Succeeded
        } else if resolved == 0 {
            SolveStatus::Unsolved
        } else {
            SolveStatus::PartiallySucceeded
        }
    }

    fn finish(&mut self, status: SolveStatus) {
        self.frontier.clear();
        self.phase = Phase::Finished(status);
    }
}

fn apply(
    graph: &mut FactGraph,
    rule: &dyn Rule,
    effects: Vec<Effect>,
    next: &mut Vec<Node>,
    created: &mut Vec<FactId>,
) {
    for effect in effects {
        match effect {
            Effect::MarkVisited(fact, rule_id) => graph.mark_visited(fact, rule_id),
            Effect::MarkWellDetermined(fact) => graph.mark_well_determined(fact),
            Effect::Derive(d) => {
                match graph.add_derived(d.kind, d.roles, d.value, d.explanation, &d.parents) {
                    Ok(Some(id)) => {
                        debug!(rule = rule.name(), fact = %graph.describe(id), value = d.value, "derived");
                        next.push(Node::Fact(id));
                        created.push(id);
                    }
                    Ok(None) => {}
                    Err(e) => warn!(rule = rule.name(), error = %e, "skipping invalid derivation"),
                }
            }
            Effect::ExtendRay { angle, point, side } => {
                match graph.add_role(angle, point, Role::Ray(side)) {
                    Ok(true) => {
                        graph.clear_all_visited(angle);
                        debug!(rule = rule.name(), fact = %graph.describe(angle), point = %graph.label(point), "extended ray");
                        if !next.contains(&Node::Fact(angle)) {
                            next.push(Node::Fact(angle));
                        }
                    }
                    Ok(false) => {}
                    Err(e) => warn!(rule = rule.name(), error = %e, "skipping invalid ray extension"),
                }
            }
        }
    }
}
