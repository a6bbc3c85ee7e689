//! Angle addition: two angles sharing a vertex and a ray

use super::{deg, Derivation, Effect, Rule, RuleContext};
use crate::ir::{AngleView, FactId, Kind, Node, PointId, Role, RuleId};
use std::f64::consts::PI;

/// ∠X-V-C and ∠C-V-Y ⇒ ∠X-V-Y as their sum or difference
///
/// The oracle decides whether one outer ray lies inside the other angle. If
/// neither does the angles are adjacent and add up (only while the sum stays
/// below π); if one does they overlap and the smaller is subtracted.
pub struct AngleAddition;

impl Rule for AngleAddition {
    fn id(&self) -> RuleId {
        RuleId::AngleAddition
    }

    fn process(&self, ctx: &RuleContext<'_>, node: Node) -> Vec<Effect> {
        let Some(fact) = ctx.fact_of_kind(node, Kind::Angle) else {
            return Vec::new();
        };
        if ctx.graph.is_visited(fact.id, self.id()) {
            return Vec::new();
        }
        let mut effects = vec![Effect::MarkVisited(fact.id, self.id())];
        let Some(base) = fact.as_angle() else {
            return effects;
        };

        for &p1 in &base.first {
            for &p2 in &base.second {
                combine(ctx, fact.id, &base, p1, p2, &mut effects);
                combine(ctx, fact.id, &base, p2, p1, &mut effects);
            }
        }
        effects
    }
}

/// Pair `base` (common-V-opposite) with every other angle on the ray V-common
fn combine(
    ctx: &RuleContext<'_>,
    base_id: FactId,
    base: &AngleView,
    common: PointId,
    opposite: PointId,
    effects: &mut Vec<Effect>,
) {
    let graph = ctx.graph;
    let v = base.vertex;

    for other_id in graph.angles_on_ray(v, common) {
        if other_id == base_id {
            continue;
        }
        let Some(other) = graph.angle_view(other_id) else {
            continue;
        };
        let Some(common_side) = other.side_of(common) else {
            continue;
        };

        for &new_point in other.ray(common_side.other()) {
            if base.side_of(new_point).is_some() || graph.find_angle(new_point, v, opposite).is_some() {
                continue;
            }
            let Some(new_inside_base) = ctx.oracle.point_inside_angle(new_point, common, v, opposite)
            else {
                continue;
            };
            let Some(opposite_inside_other) =
                ctx.oracle.point_inside_angle(opposite, common, v, new_point)
            else {
                continue;
            };

            let target = format!("∠{}", graph.path_label(&[new_point, v, opposite]));
            let base_name = format!("∠{}", graph.path_label(&[common, v, opposite]));
            let other_name = format!("∠{}", graph.path_label(&[common, v, new_point]));

            let (value, formula) = match (new_inside_base, opposite_inside_other) {
                (false, false) => {
                    let sum = other.value + base.value;
                    if sum >= PI {
                        continue;
                    }
                    (sum, format!("{} + {}", other_name, base_name))
                }
                (true, false) => (base.value - other.value, format!("{} - {}", base_name, other_name)),
                (false, true) => (other.value - base.value, format!("{} - {}", other_name, base_name)),
                (true, true) => continue,
            };

            effects.push(Effect::Derive(Derivation {
                kind: Kind::Angle,
                roles: Role::angle(new_point, v, opposite),
                value,
                explanation: format!("{} = {} = {}", target, formula, deg(value)),
                parents: vec![other_id, base_id],
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{derivations, graph_with, run};

    fn polar(name: &'static str, degrees: f64) -> (&'static str, f64, f64) {
        let r = degrees.to_radians();
        (name, 10.0 * r.cos(), 10.0 * r.sin())
    }

    #[test]
    fn test_adjacent_angles_add() {
        let (mut graph, p) = graph_with(&[
            ("V", 0.0, 0.0),
            polar("A", 0.0),
            polar("B", 30.0),
            polar("C", 70.0),
        ]);
        let (v, a, b, c) = (p[0], p[1], p[2], p[3]);
        let theta1 = 30f64.to_radians();
        let theta2 = 40f64.to_radians();
        let (avb, _) = graph
            .add_given(Kind::Angle, Role::angle(a, v, b), Some(theta1), "Given")
            .unwrap();
        let (bvc, _) = graph
            .add_given(Kind::Angle, Role::angle(b, v, c), Some(theta2), "Given")
            .unwrap();

        let effects = run(&AngleAddition, &graph, Node::Fact(avb));
        let derived = derivations(&effects);

        assert_eq!(derived.len(), 1);
        assert!((derived[0].value - (theta1 + theta2)).abs() < 1e-9);
        assert_eq!(derived[0].roles, Role::angle(c, v, a));
        assert_eq!(derived[0].parents, vec![bvc, avb]);
        assert!(derived[0].explanation.starts_with("∠C-V-A = ∠B-V-C + ∠B-V-A"));
    }

    #[test]
    fn test_nested_angles_subtract() {
        let (mut graph, p) = graph_with(&[
            ("V", 0.0, 0.0),
            polar("A", 0.0),
            polar("B", 30.0),
            polar("C", 70.0),
        ]);
        let (v, a, b, c) = (p[0], p[1], p[2], p[3]);
        let (avc, _) = graph
            .add_given(Kind::Angle, Role::angle(a, v, c), Some(70f64.to_radians()), "Given")
            .unwrap();
        graph
            .add_given(Kind::Angle, Role::angle(a, v, b), Some(30f64.to_radians()), "Given")
            .unwrap();

        let effects = run(&AngleAddition, &graph, Node::Fact(avc));
        let derived = derivations(&effects);

        assert_eq!(derived.len(), 1);
        assert!((derived[0].value - 40f64.to_radians()).abs() < 1e-9);
        assert_eq!(derived[0].roles, Role::angle(b, v, c));
    }

    #[test]
    fn test_reflex_sum_is_skipped() {
        let (mut graph, p) = graph_with(&[
            ("V", 0.0, 0.0),
            polar("A", 0.0),
            polar("B", 100.0),
            polar("C", 200.0),
        ]);
        let (v, a, b, c) = (p[0], p[1], p[2], p[3]);
        let (avb, _) = graph
            .add_given(Kind::Angle, Role::angle(a, v, b), Some(100f64.to_radians()), "Given")
            .unwrap();
        graph
            .add_given(Kind::Angle, Role::angle(b, v, c), Some(100f64.to_radians()), "Given")
            .unwrap();

        let effects = run(&AngleAddition, &graph, Node::Fact(avb));
        assert!(derivations(&effects).is_empty());
    }

    #[test]
    fn test_visited_angle_is_not_reprocessed() {
        let (mut graph, p) = graph_with(&[("V", 0.0, 0.0), polar("A", 0.0), polar("B", 30.0)]);
        let (avb, _) = graph
            .add_given(Kind::Angle, Role::angle(p[1], p[0], p[2]), Some(0.5), "Given")
            .unwrap();

        let effects = run(&AngleAddition, &graph, Node::Fact(avb));
        assert_eq!(effects, vec![Effect::MarkVisited(avb, RuleId::AngleAddition)]);

        graph.mark_visited(avb, RuleId::AngleAddition);
        assert!(run(&AngleAddition, &graph, Node::Fact(avb)).is_empty());
    }
}
