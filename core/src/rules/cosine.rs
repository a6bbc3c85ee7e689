//! Law of cosines, forwards and backwards

use super::{deg, num, Derivation, Effect, Rule, RuleContext};
use crate::ir::{AngleView, FactId, Kind, Node, PointId, Role, RuleId};
use std::f64::consts::FRAC_PI_2;

/// Slack allowed before an out-of-domain argument is treated as real
const DOMAIN_SLACK: f64 = 1e-9;

/// Square root that absorbs rounding noise just below zero
fn sqrt_near(radicand: f64) -> f64 {
    if radicand < 0.0 && radicand > -DOMAIN_SLACK {
        0.0
    } else {
        radicand.sqrt()
    }
}

/// Arc cosine that absorbs rounding noise just outside [-1, 1]
fn acos_near(x: f64) -> f64 {
    if x.abs() > 1.0 && x.abs() - 1.0 <= DOMAIN_SLACK {
        x.signum().acos()
    } else {
        x.acos()
    }
}

/// Two sides and the included angle ⇒ the third side
///
/// A right angle together with the hypotenuse and one leg also gives the
/// other leg.
pub struct CosineTheorem;

impl Rule for CosineTheorem {
    fn id(&self) -> RuleId {
        RuleId::CosineTheorem
    }

    fn process(&self, ctx: &RuleContext<'_>, node: Node) -> Vec<Effect> {
        let graph = ctx.graph;
        if let Some(angle) = ctx.fact_of_kind(node, Kind::Angle) {
            if graph.is_visited(angle.id, self.id()) {
                return Vec::new();
            }
            let mut effects = vec![Effect::MarkVisited(angle.id, self.id())];
            if let Some(view) = angle.as_angle() {
                solve_triangle(ctx, angle.id, &view, &mut effects);
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
        let Some((a, b)) = length.endpoints() else {
            return effects;
        };
        for angle_id in graph.common_facts_of_kind(Kind::Angle, &[a, b]) {
            effects.push(Effect::MarkVisited(angle_id, self.id()));
            if let Some(view) = graph.angle_view(angle_id) {
                solve_triangle(ctx, angle_id, &view, &mut effects);
            }
        }
        effects
    }
}

fn solve_triangle(ctx: &RuleContext<'_>, angle_id: FactId, view: &AngleView, effects: &mut Vec<Effect>) {
    let graph = ctx.graph;
    let v = view.vertex;
    let theta = view.value;
    let right = (theta - FRAC_PI_2).abs() <= ctx.right_angle_tolerance;

    for &p1 in &view.first {
        for &p2 in &view.second {
            let side1 = graph.length(p1, v);
            let side2 = graph.length(v, p2);
            let opposite = graph.length(p1, p2);
            let name1 = format!("|{}|", graph.path_label(&[p1, v]));
            let name2 = format!("|{}|", graph.path_label(&[v, p2]));

            match (side1, side2, opposite) {
                (Some((l1, d1)), Some((l2, d2)), None) => {
                    let value = sqrt_near(d1 * d1 + d2 * d2 - 2.0 * d1 * d2 * theta.cos());
                    let explanation = if right {
                        format!(
                            "|{}| = √({}² + {}²) = {} (Pythagorean theorem)",
                            graph.path_label(&[p1, p2]),
                            name1,
                            name2,
                            num(value)
                        )
                    } else {
                        format!(
                            "|{}| = √({}² + {}² - 2·{}·{}·cos ∠{}) = {} (law of cosines)",
                            graph.path_label(&[p1, p2]),
                            name1,
                            name2,
                            name1,
                            name2,
                            graph.path_label(&[p1, v, p2]),
                            num(value)
                        )
                    };
                    effects.push(Effect::Derive(Derivation {
                        kind: Kind::Length,
                        roles: Role::segment(p1, p2),
                        value,
                        explanation,
                        parents: vec![l2, l1, angle_id],
                    }));
                }
                (Some(leg), None, Some(hyp)) if right => {
                    effects.push(missing_leg(ctx, angle_id, hyp, leg, &name1, v, p2, p1, p2));
                }
                (None, Some(leg), Some(hyp)) if right => {
                    effects.push(missing_leg(ctx, angle_id, hyp, leg, &name2, p1, v, p1, p2));
                }
                _ => {}
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn missing_leg(
    ctx: &RuleContext<'_>,
    angle_id: FactId,
    (hyp_id, hyp): (FactId, f64),
    (leg_id, leg): (FactId, f64),
    leg_name: &str,
    a: PointId,
    b: PointId,
    h1: PointId,
    h2: PointId,
) -> Effect {
    let graph = ctx.graph;
    let value = sqrt_near(hyp * hyp - leg * leg);
    Effect::Derive(Derivation {
        kind: Kind::Length,
        roles: Role::segment(a, b),
        value,
        explanation: format!(
            "|{}| = √(|{}|² - {}²) = {} (Pythagorean theorem)",
            graph.path_label(&[a, b]),
            graph.path_label(&[h1, h2]),
            leg_name,
            num(value)
        ),
        parents: vec![hyp_id, leg_id, angle_id],
    })
}

/// Three sides ⇒ every angle of the triangle
pub struct InverseCosineTheorem;

impl Rule for InverseCosineTheorem {
    fn id(&self) -> RuleId {
        RuleId::InverseCosineTheorem
    }

    fn process(&self, ctx: &RuleContext<'_>, node: Node) -> Vec<Effect> {
        let graph = ctx.graph;
        let Some(length) = ctx.fact_of_kind(node, Kind::Length) else {
            return Vec::new();
        };
        if graph.is_visited(length.id, self.id()) {
            return Vec::new();
        }
        let mut effects = vec![Effect::MarkVisited(length.id, self.id())];
        let Some((p1, p2)) = length.endpoints() else {
            return effects;
        };
        let Some(d12) = length.value() else {
            return effects;
        };

        for other_id in graph.facts_at_of_kind(p1, Kind::Length) {
            let Some(p3) = graph.fact(other_id).and_then(|f| f.opposite_endpoint(p1)) else {
                continue;
            };
            if p3 == p2 {
                continue;
            }
            let (Some(d13), Some((l23, d23))) = (graph.value(other_id), graph.length(p3, p2)) else {
                continue;
            };
            let parents = vec![length.id, other_id, l23];

            // apex, its two sides, the side facing it
            let corners = [
                (p1, (p2, d12), (p3, d13), d23),
                (p2, (p1, d12), (p3, d23), d13),
                (p3, (p1, d13), (p2, d23), d12),
            ];
            for (apex, (a, sa), (b, sb), so) in corners {
                if graph.find_angle(a, apex, b).is_some() {
                    continue;
                }
                let value = acos_near((sa * sa + sb * sb - so * so) / (2.0 * sa * sb));
                let side_a = format!("|{}|", graph.path_label(&[apex, a]));
                let side_b = format!("|{}|", graph.path_label(&[apex, b]));
                effects.push(Effect::Derive(Derivation {
                    kind: Kind::Angle,
                    roles: Role::angle(a, apex, b),
                    value,
                    explanation: format!(
                        "∠{} = arccos(({}² + {}² - |{}|²) / (2·{}·{})) = {}",
                        graph.path_label(&[a, apex, b]),
                        side_a,
                        side_b,
                        graph.path_label(&[a, b]),
                        side_a,
                        side_b,
                        deg(value)
                    ),
                    parents: parents.clone(),
                }));
            }
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{derivations, graph_with, run};
    use std::f64::consts::FRAC_PI_3;

    #[test]
    fn test_domain_slack() {
        assert_eq!(sqrt_near(-1e-12), 0.0);
        assert!(sqrt_near(-1.0).is_nan());
        assert_eq!(acos_near(1.0 + 1e-12), 0.0);
        assert!(acos_near(1.5).is_nan());
    }

    #[test]
    fn test_right_angle_gives_hypotenuse() {
        let (mut graph, p) = graph_with(&[("A", 0.0, 0.0), ("B", 0.0, 3.0), ("C", 4.0, 0.0)]);
        let (a, b, c) = (p[0], p[1], p[2]);
        let (ab, _) = graph
            .add_given(Kind::Length, Role::segment(a, b), Some(3.0), "Given")
            .unwrap();
        let (ac, _) = graph
            .add_given(Kind::Length, Role::segment(a, c), Some(4.0), "Given")
            .unwrap();
        let (bac, _) = graph
            .add_given(Kind::Angle, Role::angle(b, a, c), Some(FRAC_PI_2), "Given")
            .unwrap();

        let effects = run(&CosineTheorem, &graph, Node::Fact(bac));
        let derived = derivations(&effects);

        assert_eq!(derived.len(), 1);
        assert!((derived[0].value - 5.0).abs() < 1e-12);
        assert_eq!(derived[0].parents, vec![ac, ab, bac]);
        assert_eq!(derived[0].explanation, "|B-C| = √(|B-A|² + |A-C|²) = 5 (Pythagorean theorem)");
    }

    #[test]
    fn test_oblique_angle_uses_law_of_cosines() {
        let (mut graph, p) = graph_with(&[("V", 0.0, 0.0), ("A", 2.0, 0.0), ("B", 1.0, 3f64.sqrt())]);
        let (v, a, b) = (p[0], p[1], p[2]);
        graph
            .add_given(Kind::Length, Role::segment(v, a), Some(2.0), "Given")
            .unwrap();
        let (vb, _) = graph
            .add_given(Kind::Length, Role::segment(v, b), Some(2.0), "Given")
            .unwrap();
        graph
            .add_given(Kind::Angle, Role::angle(a, v, b), Some(FRAC_PI_3), "Given")
            .unwrap();

        // the triggering length reaches the angle through its endpoints
        let effects = run(&CosineTheorem, &graph, Node::Fact(vb));
        let derived = derivations(&effects);

        assert_eq!(derived.len(), 1);
        assert!((derived[0].value - 2.0).abs() < 1e-12, "Equilateral triangle");
        assert!(derived[0].explanation.ends_with("(law of cosines)"));
    }

    #[test]
    fn test_right_angle_gives_missing_leg() {
        let (mut graph, p) = graph_with(&[("A", 0.0, 0.0), ("B", 0.0, 3.0), ("C", 4.0, 0.0)]);
        let (a, b, c) = (p[0], p[1], p[2]);
        graph
            .add_given(Kind::Length, Role::segment(b, c), Some(5.0), "Given")
            .unwrap();
        graph
            .add_given(Kind::Length, Role::segment(a, b), Some(3.0), "Given")
            .unwrap();
        let (bac, _) = graph
            .add_given(Kind::Angle, Role::angle(b, a, c), Some(FRAC_PI_2), "Given")
            .unwrap();

        let derived_effects = run(&CosineTheorem, &graph, Node::Fact(bac));
        let derived = derivations(&derived_effects);

        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].roles, Role::segment(a, c));
        assert!((derived[0].value - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_three_sides_give_all_angles() {
        let (mut graph, p) = graph_with(&[("A", 0.0, 0.0), ("B", 3.0, 0.0), ("C", 0.0, 4.0)]);
        let (a, b, c) = (p[0], p[1], p[2]);
        let (ab, _) = graph
            .add_given(Kind::Length, Role::segment(a, b), Some(3.0), "Given")
            .unwrap();
        let (ac, _) = graph
            .add_given(Kind::Length, Role::segment(a, c), Some(4.0), "Given")
            .unwrap();
        let (bc, _) = graph
            .add_given(Kind::Length, Role::segment(b, c), Some(5.0), "Given")
            .unwrap();

        let effects = run(&InverseCosineTheorem, &graph, Node::Fact(ab));
        let derived = derivations(&effects);

        assert_eq!(derived.len(), 3);
        let at_a = derived
            .iter()
            .find(|d| d.roles.contains(&(a, Role::Vertex)))
            .expect("Angle at A must be derived");
        assert!((at_a.value - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(at_a.parents, vec![ab, ac, bc]);

        let total: f64 = derived.iter().map(|d| d.value).sum();
        assert!((total - std::f64::consts::PI).abs() < 1e-9, "Angles of a triangle sum to π");
    }

    #[test]
    fn test_impossible_triangle_yields_nan() {
        let (mut graph, p) = graph_with(&[("A", 0.0, 0.0), ("B", 1.0, 0.0), ("C", 0.0, 1.0)]);
        let (a, b, c) = (p[0], p[1], p[2]);
        let (ab, _) = graph
            .add_given(Kind::Length, Role::segment(a, b), Some(1.0), "Given")
            .unwrap();
        graph
            .add_given(Kind::Length, Role::segment(a, c), Some(1.0), "Given")
            .unwrap();
        graph
            .add_given(Kind::Length, Role::segment(b, c), Some(5.0), "Given")
            .unwrap();

        let effects = run(&InverseCosineTheorem, &graph, Node::Fact(ab));
        assert!(derivations(&effects).iter().any(|d| d.value.is_nan()));
    }
}
