//! Inference rules
//!
//! Each rule recognizes one derivable pattern around a single graph node and
//! reports what it found as a list of [`Effect`]s. Rules only read the graph;
//! the fixpoint loop applies the effects, which is also where duplicate
//! facts are filtered out.

pub mod angle_addition;
pub mod angle_extender;
pub mod area_addition;
pub mod area_sine;
pub mod cosine;
pub mod length_addition;
pub mod regular_polygon;

pub use angle_addition::AngleAddition;
pub use angle_extender::AngleExtender;
pub use area_addition::AreaAddition;
pub use area_sine::AreaSineFormula;
pub use cosine::{CosineTheorem, InverseCosineTheorem};
pub use length_addition::LengthAddition;
pub use regular_polygon::RegularPolygon;

use crate::geometry::Oracle;
use crate::ir::{ops, Fact, FactGraph, FactId, Kind, Node, PointId, Role, RuleId, Side};

/// Decimal places shown in derivation text
const TEXT_PRECISION: usize = 2;

pub(crate) fn num(value: f64) -> String {
    ops::format_value(value, TEXT_PRECISION)
}

pub(crate) fn deg(radians: f64) -> String {
    ops::format_degrees(radians, TEXT_PRECISION)
}

/// Read-only view handed to every rule invocation
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub graph: &'a FactGraph,
    pub oracle: Oracle<'a>,
    /// Radians within which an angle counts as right
    pub right_angle_tolerance: f64,
}

impl<'a> RuleContext<'a> {
    /// The fact behind `node` if it is of `kind`
    pub fn fact_of_kind(&self, node: Node, kind: Kind) -> Option<&'a Fact> {
        match node {
            Node::Fact(id) => self.graph.fact(id).filter(|f| f.kind == kind),
            Node::Point(_) => None,
        }
    }
}

/// A new numeric fact proposed by a rule
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub kind: Kind,
    pub roles: Vec<(PointId, Role)>,
    pub value: f64,
    pub explanation: String,
    pub parents: Vec<FactId>,
}

/// Graph change requested by a rule
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    MarkVisited(FactId, RuleId),
    /// Add a fact unless an equivalent one exists
    Derive(Derivation),
    /// Record that `point` lies on ray `side` of an existing angle
    ExtendRay {
        angle: FactId,
        point: PointId,
        side: Side,
    },
    MarkWellDetermined(FactId),
}

/// Rule trait - all inference rules implement this
pub trait Rule: Send + Sync {
    fn id(&self) -> RuleId;

    fn name(&self) -> &'static str {
        self.id().name()
    }

    /// Examine one node and report the derivations it enables
    fn process(&self, ctx: &RuleContext<'_>, node: Node) -> Vec<Effect>;
}

/// All inference rules, in the fixed order they run within a round
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(RegularPolygon),
        Box::new(AngleAddition),
        Box::new(AreaAddition),
        Box::new(LengthAddition),
        Box::new(AngleExtender),
        Box::new(CosineTheorem),
        Box::new(AreaSineFormula),
        Box::new(InverseCosineTheorem),
    ]
}

/// Unordered pairs of distinct items
pub(crate) fn pairs<T: Copy>(items: &[T]) -> impl Iterator<Item = (T, T)> + '_ {
    items
        .iter()
        .enumerate()
        .flat_map(move |(i, &a)| items[i + 1..].iter().map(move |&b| (a, b)))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::ir::Point2D;

    /// Graph over named points with coordinates, for rule tests
    pub fn graph_with(points: &[(&str, f64, f64)]) -> (FactGraph, Vec<PointId>) {
        let mut graph = FactGraph::new();
        let ids = points
            .iter()
            .map(|&(name, x, y)| graph.add_point(name, Some(Point2D::new(x, y))))
            .collect();
        (graph, ids)
    }

    pub fn run(rule: &dyn Rule, graph: &FactGraph, node: Node) -> Vec<Effect> {
        let ctx = RuleContext {
            graph,
            oracle: Oracle::new(graph.coords()),
            right_angle_tolerance: 0.01,
        };
        rule.process(&ctx, node)
    }

    pub fn derivations(effects: &[Effect]) -> Vec<&Derivation> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Derive(d) => Some(d),
                _ => None,
            })
            .collect()
    }
}
