//! Length addition along a line

use super::{num, pairs, Derivation, Effect, Rule, RuleContext};
use crate::geometry::SegmentPosition;
use crate::ir::{Fact, FactId, Kind, Node, PointId, Role, RuleId};

/// Two known lengths from a common point on a line ⇒ the length between
/// their far ends
///
/// With |C-Q1| and |C-Q2| known, the oracle places Q1 relative to C and Q2:
/// behind C gives the sum, between C and Q2 or beyond Q2 gives the difference.
pub struct LengthAddition;

impl Rule for LengthAddition {
    fn id(&self) -> RuleId {
        RuleId::LengthAddition
    }

    fn process(&self, ctx: &RuleContext<'_>, node: Node) -> Vec<Effect> {
        let graph = ctx.graph;
        if let Some(length) = ctx.fact_of_kind(node, Kind::Length) {
            if graph.is_visited(length.id, self.id()) {
                return Vec::new();
            }
            let mut effects = vec![Effect::MarkVisited(length.id, self.id())];
            if let Some((a, b)) = length.endpoints() {
                for line_id in graph.common_facts_of_kind(Kind::Collinear, &[a, b]) {
                    if let Some(line) = graph.fact(line_id) {
                        split(ctx, line, &mut effects);
                    }
                }
            }
            return effects;
        }

        let Some(line) = ctx.fact_of_kind(node, Kind::Collinear) else {
            return Vec::new();
        };
        if graph.is_visited(line.id, self.id()) {
            return Vec::new();
        }
        let mut effects = vec![Effect::MarkVisited(line.id, self.id())];
        split(ctx, line, &mut effects);
        effects
    }
}

fn split(ctx: &RuleContext<'_>, line: &Fact, effects: &mut Vec<Effect>) {
    let graph = ctx.graph;
    let points = line.points();

    for &c in &points {
        let known: Vec<(PointId, FactId, f64)> = points
            .iter()
            .filter(|&&q| q != c)
            .filter_map(|&q| graph.length(c, q).map(|(id, value)| (q, id, value)))
            .collect();

        for ((q1, l1, v1), (q2, l2, v2)) in pairs(&known) {
            if graph.find_length(q1, q2).is_some() {
                continue;
            }
            let (value, formula) = match ctx.oracle.point_on_segment(q1, c, q2) {
                Some(SegmentPosition::OutsideNearA) => (v1 + v2, "+"),
                Some(SegmentPosition::OutsideNearB) => (v1 - v2, "-"),
                Some(SegmentPosition::OnSegment) => (v2 - v1, "-"),
                None => continue,
            };
            let (first, second) = match formula {
                "+" => ((c, q1), (c, q2)),
                _ if v1 >= v2 => ((c, q1), (c, q2)),
                _ => ((c, q2), (c, q1)),
            };
            effects.push(Effect::Derive(Derivation {
                kind: Kind::Length,
                roles: Role::segment(q1, q2),
                value,
                explanation: format!(
                    "|{}| = |{}| {} |{}| = {}",
                    graph.path_label(&[q1, q2]),
                    graph.path_label(&[first.0, first.1]),
                    formula,
                    graph.path_label(&[second.0, second.1]),
                    num(value)
                ),
                parents: vec![l1, l2, line.id],
            }));
        }
    }
}
