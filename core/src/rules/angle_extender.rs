//! Angle extension along collinear points

use super::{deg, pairs, Derivation, Effect, Rule, RuleContext};
use crate::geometry::SegmentPosition;
use crate::ir::{FactId, Kind, Node, Role, RuleId, Side};
use std::f64::consts::PI;

/// Collinear points on the line of an angle's ray
///
/// A point on the same half-line as the ray joins the existing angle as an
/// extra ray point. A point behind the vertex gives the supplementary angle.
pub struct AngleExtender;

impl Rule for AngleExtender {
    fn id(&self) -> RuleId {
        RuleId::AngleExtender
    }

    fn process(&self, ctx: &RuleContext<'_>, node: Node) -> Vec<Effect> {
        let graph = ctx.graph;
        if let Some(angle) = ctx.fact_of_kind(node, Kind::Angle) {
            if graph.is_visited(angle.id, self.id()) {
                return Vec::new();
            }
            let mut effects = vec![Effect::MarkVisited(angle.id, self.id())];
            extend(ctx, angle.id, &mut effects);
            return effects;
        }

        let Some(line) = ctx.fact_of_kind(node, Kind::Collinear) else {
            return Vec::new();
        };
        if graph.is_visited(line.id, self.id()) {
            return Vec::new();
        }
        let mut effects = vec![Effect::MarkVisited(line.id, self.id())];
        let mut seen: Vec<FactId> = Vec::new();
        for p in line.points() {
            for angle in graph.facts_at_of_kind(p, Kind::Angle) {
                if !seen.contains(&angle) {
                    seen.push(angle);
                    extend(ctx, angle, &mut effects);
                }
            }
        }
        effects
    }
}

fn extend(ctx: &RuleContext<'_>, angle_id: FactId, effects: &mut Vec<Effect>) {
    let graph = ctx.graph;
    let Some(view) = graph.angle_view(angle_id) else {
        return;
    };
    let v = view.vertex;

    for side in [Side::First, Side::Second] {
        let Some(&opposite) = view.ray(side.other()).first() else {
            continue;
        };
        let mut ray = view.ray(side).to_vec();
        ray.push(v);

        for (p1, p2) in pairs(&ray) {
            let ray_out = if p1 == v { p2 } else { p1 };
            for line_id in graph.common_facts_of_kind(Kind::Collinear, &[p1, p2]) {
                let Some(line) = graph.fact(line_id) else {
                    continue;
                };
                for new_point in line.points() {
                    if new_point == v || view.side_of(new_point).is_some() {
                        continue;
                    }
                    match ctx.oracle.point_on_segment(new_point, v, ray_out) {
                        Some(SegmentPosition::OnSegment) | Some(SegmentPosition::OutsideNearB) => {
                            effects.push(Effect::ExtendRay {
                                angle: angle_id,
                                point: new_point,
                                side,
                            });
                        }
                        Some(SegmentPosition::OutsideNearA) => {
                            if graph.find_angle(new_point, v, opposite).is_some() {
                                continue;
                            }
                            let value = PI - view.value;
                            effects.push(Effect::Derive(Derivation {
                                kind: Kind::Angle,
                                roles: Role::angle(new_point, v, opposite),
                                value,
                                explanation: format!(
                                    "∠{} = 180° - ∠{} = {}",
                                    graph.path_label(&[new_point, v, opposite]),
                                    graph.path_label(&[ray_out, v, opposite]),
                                    deg(value)
                                ),
                                parents: vec![angle_id, line_id],
                            }));
                        }
                        None => {}
                    }
                }
            }
        }
    }
}
