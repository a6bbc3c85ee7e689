//! Regular polygon expansion

use super::{deg, num, Derivation, Effect, Rule, RuleContext};
use crate::ir::{Fact, Kind, Node, Role, RuleId};
use std::f64::consts::PI;

/// A regular n-gon ⇒ its interior angles, and once one side is known, every
/// side and its area
pub struct RegularPolygon;

impl Rule for RegularPolygon {
    fn id(&self) -> RuleId {
        RuleId::RegularPolygon
    }

    fn process(&self, ctx: &RuleContext<'_>, node: Node) -> Vec<Effect> {
        let graph = ctx.graph;
        if let Some(polygon) = ctx.fact_of_kind(node, Kind::RegularPolygon) {
            if graph.is_visited(polygon.id, self.id()) {
                return Vec::new();
            }
            let mut effects = vec![Effect::MarkVisited(polygon.id, self.id())];
            expand(ctx, polygon, &mut effects);
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
        for polygon_id in graph.common_facts_of_kind(Kind::RegularPolygon, &[a, b]) {
            let Some(polygon) = graph.fact(polygon_id) else {
                continue;
            };
            effects.push(Effect::MarkVisited(polygon_id, self.id()));
            expand(ctx, polygon, &mut effects);
        }
        effects
    }
}

fn expand(ctx: &RuleContext<'_>, polygon: &Fact, effects: &mut Vec<Effect>) {
    let graph = ctx.graph;
    if graph.is_well_determined(polygon.id) {
        return;
    }
    let cycle = polygon.cycle();
    let n = cycle.len();
    if n < 3 {
        return;
    }
    let name = graph.path_label(&cycle);

    let interior = PI * (n as f64 - 2.0) / n as f64;
    for i in 0..n {
        let (a, v, b) = (cycle[i], cycle[(i + 1) % n], cycle[(i + 2) % n]);
        if graph.find_angle(a, v, b).is_some() {
            continue;
        }
        effects.push(Effect::Derive(Derivation {
            kind: Kind::Angle,
            roles: Role::angle(a, v, b),
            value: interior,
            explanation: format!(
                "∠{} = 180°·({} - 2) / {} = {} (interior angle of regular polygon {})",
                graph.path_label(&[a, v, b]),
                n,
                n,
                deg(interior),
                name
            ),
            parents: vec![polygon.id],
        }));
    }

    let edges: Vec<_> = (0..n).map(|i| (cycle[i], cycle[(i + 1) % n])).collect();
    let Some((known_edge, (side_id, side))) = edges
        .iter()
        .find_map(|&(a, b)| graph.length(a, b).map(|known| ((a, b), known)))
    else {
        return;
    };
    let side_name = graph.path_label(&[known_edge.0, known_edge.1]);

    for &(a, b) in &edges {
        if graph.find_length(a, b).is_some() {
            continue;
        }
        effects.push(Effect::Derive(Derivation {
            kind: Kind::Length,
            roles: Role::segment(a, b),
            value: side,
            explanation: format!(
                "|{}| = |{}| = {} (sides of regular polygon {})",
                graph.path_label(&[a, b]),
                side_name,
                num(side),
                name
            ),
            parents: vec![side_id, polygon.id],
        }));
    }
    effects.push(Effect::MarkWellDetermined(polygon.id));

    if graph.find_area(&cycle).is_none() {
        let area = n as f64 * side * side / (4.0 * (PI / n as f64).tan());
        effects.push(Effect::Derive(Derivation {
            kind: Kind::Area,
            roles: Role::corners(&cycle),
            value: area,
            explanation: format!(
                "A({}) = {}·|{}|² / (4·tan(180° / {})) = {}",
                name,
                n,
                side_name,
                n,
                num(area)
            ),
            parents: vec![polygon.id, side_id],
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FactGraph, PointId};
    use crate::rules::testing::{derivations, graph_with, run};
    use std::f64::consts::FRAC_PI_2;

    fn square() -> (FactGraph, Vec<PointId>) {
        let (mut graph, p) = graph_with(&[
            ("A", 0.0, 0.0),
            ("B", 2.0, 0.0),
            ("C", 2.0, 2.0),
            ("D", 0.0, 2.0),
        ]);
        graph
            .add_given(Kind::RegularPolygon, Role::corners(&p), None, "Given that A-B-C-D is a regular polygon.")
            .unwrap();
        (graph, p)
    }

    #[test]
    fn test_polygon_alone_gives_interior_angles() {
        let (graph, _) = square();
        let polygon = graph.facts_of_kind(Kind::RegularPolygon)[0];

        let effects = run(&RegularPolygon, &graph, Node::Fact(polygon));
        let derived = derivations(&effects);

        assert_eq!(derived.len(), 4);
        assert!(derived.iter().all(|d| d.kind == Kind::Angle && (d.value - FRAC_PI_2).abs() < 1e-12));
        assert!(!effects.contains(&Effect::MarkWellDetermined(polygon)));
    }

    #[test]
    fn test_known_side_determines_polygon() {
        let (mut graph, p) = square();
        let polygon = graph.facts_of_kind(Kind::RegularPolygon)[0];
        let (ab, _) = graph
            .add_given(Kind::Length, Role::segment(p[0], p[1]), Some(2.0), "Given")
            .unwrap();

        let effects = run(&RegularPolygon, &graph, Node::Fact(ab));
        let derived = derivations(&effects);

        let sides: Vec<_> = derived.iter().filter(|d| d.kind == Kind::Length).collect();
        assert_eq!(sides.len(), 3);
        assert!(sides.iter().all(|d| d.value == 2.0 && d.parents == vec![ab, polygon]));

        let area = derived
            .iter()
            .find(|d| d.kind == Kind::Area)
            .expect("Area must be derived");
        assert!((area.value - 4.0).abs() < 1e-9);
        assert!(effects.contains(&Effect::MarkWellDetermined(polygon)));
        assert!(effects.contains(&Effect::MarkVisited(polygon, RuleId::RegularPolygon)));
    }

    #[test]
    fn test_well_determined_polygon_is_skipped() {
        let (mut graph, _) = square();
        let polygon = graph.facts_of_kind(Kind::RegularPolygon)[0];
        graph.mark_well_determined(polygon);

        let effects = run(&RegularPolygon, &graph, Node::Fact(polygon));
        assert_eq!(effects, vec![Effect::MarkVisited(polygon, RuleId::RegularPolygon)]);
    }
}
