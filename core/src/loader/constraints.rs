//! Given constraints resolved to point ids
//!
//! Each constraint materializes into exactly one given fact with a leaf
//! provenance record describing it.

use crate::ir::{ops, FactGraph, FactId, GraphResult, Kind, PointId, Role, Side};
use crate::search::Constraint;

/// A given fact about named points, ready to be added to the graph
#[derive(Debug, Clone, PartialEq)]
pub enum GivenConstraint {
    Distance { a: PointId, b: PointId, value: f64 },
    Angle { a: PointId, vertex: PointId, b: PointId, degrees: f64 },
    EqualLength { a: PointId, b: PointId, c: PointId, d: PointId },
    EqualAngle { first: [PointId; 3], second: [PointId; 3] },
    Parallel { a: PointId, b: PointId, c: PointId, d: PointId },
    /// `point` lies on line a-b
    PointOnLine { point: PointId, a: PointId, b: PointId },
    PointToLineDistance { point: PointId, a: PointId, b: PointId, value: f64 },
    TriangleArea { a: PointId, b: PointId, c: PointId, value: f64 },
    RegularPolygon { vertices: Vec<PointId> },
}

fn segments(first: (PointId, PointId), second: (PointId, PointId)) -> Vec<(PointId, Role)> {
    vec![
        (first.0, Role::Segment(Side::First)),
        (first.1, Role::Segment(Side::First)),
        (second.0, Role::Segment(Side::Second)),
        (second.1, Role::Segment(Side::Second)),
    ]
}

fn angle_slots(side: Side, points: &[PointId; 3]) -> impl Iterator<Item = (PointId, Role)> + '_ {
    points
        .iter()
        .enumerate()
        .map(move |(slot, &p)| (p, Role::AngleSlot { side, slot: slot as u8 }))
}

impl GivenConstraint {
    /// Kind, role layout, value and leaf text of the fact this constraint states
    fn layout(&self, graph: &FactGraph) -> (Kind, Vec<(PointId, Role)>, Option<f64>, String) {
        let path = |points: &[PointId]| graph.path_label(points);
        let num = |v: f64| ops::format_value(v, 2);
        match self {
            GivenConstraint::Distance { a, b, value } => (
                Kind::Length,
                Role::segment(*a, *b),
                Some(*value),
                format!("Given |{}| = {}", path(&[*a, *b]), num(*value)),
            ),
            GivenConstraint::Angle { a, vertex, b, degrees } => (
                Kind::Angle,
                Role::angle(*a, *vertex, *b),
                Some(degrees.to_radians()),
                format!("Given ∠{} = {}°", path(&[*a, *vertex, *b]), num(*degrees)),
            ),
            GivenConstraint::EqualLength { a, b, c, d } => (
                Kind::EqualLength,
                segments((*a, *b), (*c, *d)),
                None,
                format!("Given |{}| = |{}|", path(&[*a, *b]), path(&[*c, *d])),
            ),
            GivenConstraint::EqualAngle { first, second } => (
                Kind::EqualAngle,
                angle_slots(Side::First, first)
                    .chain(angle_slots(Side::Second, second))
                    .collect(),
                None,
                format!("Given ∠{} = ∠{}", path(first), path(second)),
            ),
            GivenConstraint::Parallel { a, b, c, d } => (
                Kind::Parallel,
                segments((*a, *b), (*c, *d)),
                None,
                format!("Given {} ∥ {}", path(&[*a, *b]), path(&[*c, *d])),
            ),
            GivenConstraint::PointOnLine { point, a, b } => (
                Kind::Collinear,
                vec![(*point, Role::OnLine), (*a, Role::OnLine), (*b, Role::OnLine)],
                None,
                format!("Given {} ∈ {}", graph.label(*point), path(&[*a, *b])),
            ),
            GivenConstraint::PointToLineDistance { point, a, b, value } => (
                Kind::PointToLineDistance,
                vec![(*point, Role::Subject), (*a, Role::LinePoint), (*b, Role::LinePoint)],
                Some(*value),
                format!("Given dist({}, {}) = {}", graph.label(*point), path(&[*a, *b]), num(*value)),
            ),
            GivenConstraint::TriangleArea { a, b, c, value } => (
                Kind::Area,
                Role::corners(&[*a, *b, *c]),
                Some(*value),
                format!("Given Area({}) = {}", path(&[*a, *b, *c]), num(*value)),
            ),
            GivenConstraint::RegularPolygon { vertices } => (
                Kind::RegularPolygon,
                Role::corners(vertices),
                None,
                format!("Given that {} is a regular polygon.", path(vertices)),
            ),
        }
    }
}

impl Constraint for GivenConstraint {
    fn materialize(&self, graph: &mut FactGraph) -> GraphResult<FactId> {
        let (kind, roles, value, text) = self.layout(graph);
        let (id, _) = graph.add_given(kind, roles, value, text)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{GraphError, Point2D};
    use std::f64::consts::FRAC_PI_2;

    fn graph() -> (FactGraph, [PointId; 4]) {
        let mut graph = FactGraph::new();
        let a = graph.add_point("A", Some(Point2D::new(0.0, 0.0)));
        let b = graph.add_point("B", Some(Point2D::new(1.0, 0.0)));
        let c = graph.add_point("C", Some(Point2D::new(1.0, 1.0)));
        let d = graph.add_point("D", Some(Point2D::new(0.0, 1.0)));
        (graph, [a, b, c, d])
    }

    fn leaf_text(graph: &FactGraph, id: FactId) -> String {
        let fact = graph.fact(id).unwrap();
        graph.provenance().get(fact.provenance).unwrap().explanation.clone()
    }

    #[test]
    fn test_angle_stored_in_radians() {
        let (mut graph, [a, b, c, _]) = graph();
        let id = GivenConstraint::Angle { a, vertex: b, b: c, degrees: 90.0 }
            .materialize(&mut graph)
            .unwrap();

        assert!((graph.value(id).unwrap() - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(leaf_text(&graph, id), "Given ∠A-B-C = 90°");
    }

    #[test]
    fn test_leaf_texts() {
        let (mut graph, [a, b, c, d]) = graph();
        let cases = [
            (GivenConstraint::Distance { a, b, value: 2.5 }, "Given |A-B| = 2.5"),
            (GivenConstraint::EqualLength { a, b, c, d }, "Given |A-B| = |C-D|"),
            (GivenConstraint::Parallel { a, b, c: d, d: c }, "Given A-B ∥ D-C"),
            (GivenConstraint::PointOnLine { point: c, a, b: d }, "Given C ∈ A-D"),
            (
                GivenConstraint::PointToLineDistance { point: c, a, b, value: 1.0 },
                "Given dist(C, A-B) = 1",
            ),
            (
                GivenConstraint::TriangleArea { a, b, c, value: 0.5 },
                "Given Area(A-B-C) = 0.5",
            ),
            (
                GivenConstraint::RegularPolygon { vertices: vec![a, b, c, d] },
                "Given that A-B-C-D is a regular polygon.",
            ),
            (
                GivenConstraint::EqualAngle { first: [a, b, c], second: [b, c, d] },
                "Given ∠A-B-C = ∠B-C-D",
            ),
        ];

        for (constraint, expected) in cases {
            let id = constraint.materialize(&mut graph).unwrap();
            assert_eq!(leaf_text(&graph, id), expected);
        }
        assert_eq!(graph.num_facts(), 8);
    }

    #[test]
    fn test_malformed_constraint_is_rejected() {
        let (mut graph, [a, b, _, _]) = graph();
        let result = GivenConstraint::RegularPolygon { vertices: vec![a, b] }.materialize(&mut graph);
        assert!(matches!(result, Err(GraphError::InvalidRoles { .. })));
    }
}
