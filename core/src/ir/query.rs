//! Queries: the quantities a caller wants derived

use super::coords::{ops, CoordinateStore};
use super::graph::FactGraph;
use super::symbols::{FactId, PointId};
use serde::{Deserialize, Serialize};

/// A requested length, angle or area
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Query {
    Length(PointId, PointId),
    /// Angle a-vertex-b
    Angle(PointId, PointId, PointId),
    /// Area of the polygon with these vertices, in order
    Area(Vec<PointId>),
}

impl Query {
    pub fn points(&self) -> Vec<PointId> {
        match self {
            Query::Length(a, b) => vec![*a, *b],
            Query::Angle(a, v, b) => vec![*a, *v, *b],
            Query::Area(points) => points.clone(),
        }
    }

    /// The fact answering this query, if the graph holds one
    pub fn find(&self, graph: &FactGraph) -> Option<FactId> {
        match self {
            Query::Length(a, b) => graph.find_length(*a, *b),
            Query::Angle(a, v, b) => graph.find_angle(*a, *v, *b),
            Query::Area(points) => graph.find_area(points),
        }
    }

    pub fn is_resolved(&self, graph: &FactGraph) -> bool {
        self.find(graph).is_some()
    }

    /// Value measured directly from coordinates (radians for angles)
    pub fn measure(&self, coords: &CoordinateStore) -> Option<f64> {
        let at = |p: &PointId| coords.get(*p);
        match self {
            Query::Length(a, b) => Some(at(a)?.distance(&at(b)?)),
            Query::Angle(a, v, b) => Some(ops::angle(at(a)?, at(v)?, at(b)?)),
            Query::Area(points) => Some(ops::shoelace_area(&coords.get_all(points)?)),
        }
    }

    pub fn describe(&self, graph: &FactGraph) -> String {
        match self {
            Query::Length(a, b) => format!("|{}|", graph.path_label(&[*a, *b])),
            Query::Angle(a, v, b) => format!("∠{}", graph.path_label(&[*a, *v, *b])),
            Query::Area(points) => format!("A({})", graph.path_label(points)),
        }
    }

    /// Format a value of this query's unit for display
    pub fn format(&self, value: f64, places: usize) -> String {
        match self {
            Query::Angle(..) => ops::format_degrees(value, places),
            _ => ops::format_value(value, places),
        }
    }
}
