//! Coordinate geometry support
//!
//! Concrete point positions supplied by the numeric layer. The deduction engine
//! only reads them: the oracle uses them for case splits and the query layer
//! for numeric fallbacks.

use super::symbols::PointId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// 2D point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point
    pub fn distance(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Vector from `origin` to this point
    pub fn minus(&self, origin: &Point2D) -> Point2D {
        Point2D::new(self.x - origin.x, self.y - origin.y)
    }

    /// Dot product with another point (as vectors from origin)
    pub fn dot(&self, other: &Point2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Cross product z-component (for 2D)
    pub fn cross_z(&self, other: &Point2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn norm_squared(&self) -> f64 {
        self.dot(self)
    }
}

/// Coordinate store - maps PointIds to coordinates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoordinateStore {
    coords: FxHashMap<PointId, Point2D>,
}

impl CoordinateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set coordinates for a point
    pub fn set(&mut self, point: PointId, coords: Point2D) {
        self.coords.insert(point, coords);
    }

    /// Get coordinates for a point
    pub fn get(&self, point: PointId) -> Option<Point2D> {
        self.coords.get(&point).copied()
    }

    /// Coordinates for every point in `points`, or `None` if any is missing
    pub fn get_all(&self, points: &[PointId]) -> Option<Vec<Point2D>> {
        points.iter().map(|&p| self.get(p)).collect()
    }

    /// Check if point has coordinates
    pub fn has(&self, point: PointId) -> bool {
        self.coords.contains_key(&point)
    }

    /// Number of points with coordinates
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

/// Numeric helpers shared by the oracle, the rules and the fallback path
pub mod ops {
    use super::*;

    /// Angle at `vertex` formed by p1-vertex-p3, in radians within [0, π]
    pub fn angle(p1: Point2D, vertex: Point2D, p3: Point2D) -> f64 {
        let v1 = p1.minus(&vertex);
        let v2 = p3.minus(&vertex);

        let mag1 = v1.norm_squared().sqrt();
        let mag2 = v2.norm_squared().sqrt();

        if mag1 == 0.0 || mag2 == 0.0 {
            return 0.0;
        }

        (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0).acos()
    }

    /// Unsigned polygon area by the shoelace formula
    pub fn shoelace_area(polygon: &[Point2D]) -> f64 {
        let n = polygon.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice_area = 0.0;
        for i in 0..n {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            twice_area += a.cross_z(&b);
        }
        (twice_area / 2.0).abs()
    }

    /// Round `value` to `places` decimal places
    pub fn round_to(value: f64, places: usize) -> f64 {
        let factor = 10f64.powi(places as i32);
        (value * factor).round() / factor
    }

    /// Format a value for proof text: rounded, without trailing zeros
    pub fn format_value(value: f64, places: usize) -> String {
        let rounded = round_to(value, places);
        let text = format!("{:.*}", places, rounded);
        if text.contains('.') {
            text.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            text
        }
    }

    /// Format an angle given in radians as degrees for proof text
    pub fn format_degrees(radians: f64, places: usize) -> String {
        format!("{}°", format_value(radians.to_degrees(), places))
    }
}
