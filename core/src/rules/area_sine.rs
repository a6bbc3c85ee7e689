//! Triangle area from two sides and the included angle

use super::{num, Derivation, Effect, Rule, RuleContext};
use crate::ir::{AngleView, FactId, Kind, Node, Role, RuleId};

/// Two sides and the included angle ⇒ area = ½·a·b·sin θ
pub struct AreaSineFormula;

impl Rule for AreaSineFormula {
    fn id(&self) -> RuleId {
        RuleId::AreaSineFormula
    }

    fn process(&self, ctx: &RuleContext<'_>, node: Node) -> Vec<Effect> {
        let graph = ctx.graph;
        if let Some(angle) = ctx.fact_of_kind(node, Kind::Angle) {
            if graph.is_visited(angle.id, self.id()) {
                return Vec::new();
            }
            let mut effects = vec![Effect::MarkVisited(angle.id, self.id())];
            if let Some(view) = angle.as_angle() {
                area_of(ctx, angle.id, &view, &mut effects);
            }
            return effects;
        }

        let Some(length) = ctx.fact_of_kind(node, Kind::Length) else {
            return Vec::new();
        };
        if graph.is_visited(length.id, self.id()) {
            return Vec::new();
        }
        let mut effects = vec![Effect::MarkVisited(length.id, self.id())];
        if let Some((a, b)) = length.endpoints() {
            for angle_id in graph.common_facts_of_kind(Kind::Angle, &[a, b]) {
                if let Some(view) = graph.angle_view(angle_id) {
                    area_of(ctx, angle_id, &view, &mut effects);
                }
            }
        }
        effects
    }
}

fn area_of(ctx: &RuleContext<'_>, angle_id: FactId, view: &AngleView, effects: &mut Vec<Effect>) {
    let graph = ctx.graph;
    let v = view.vertex;
    for &p1 in &view.first {
        for &p2 in &view.second {
            let (Some((l1, d1)), Some((l2, d2))) = (graph.length(p1, v), graph.length(v, p2)) else {
                continue;
            };
            let triangle = [p1, v, p2];
            if graph.find_area(&triangle).is_some() {
                continue;
            }
            let value = 0.5 * d1 * d2 * view.value.sin();
            effects.push(Effect::Derive(Derivation {
                kind: Kind::Area,
                roles: Role::corners(&triangle),
                value,
                explanation: format!(
                    "A({}) = ½·|{}|·|{}|·sin ∠{} = {}",
                    graph.path_label(&triangle),
                    graph.path_label(&[p1, v]),
                    graph.path_label(&[v, p2]),
                    graph.path_label(&triangle),
                    num(value)
                ),
                parents: vec![angle_id, l1, l2],
            }));
        }
    }
}
