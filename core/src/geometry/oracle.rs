//! Configuration oracle
//!
//! Resolves the case splits rules cannot decide symbolically (is this point
//! between those two, inside that angle, ...) by looking at concrete
//! coordinates. Every query answers `None` when a point has no coordinates or
//! the configuration is degenerate; callers treat that as "no derivation".

use super::predicates::{self, Containment, SegmentPosition, TrianglePlacement};
use crate::ir::{CoordinateStore, Point2D, PointId};

/// Source of point positions, fixed for the duration of a solve
pub trait CoordinateProvider {
    fn position(&self, point: PointId) -> Option<Point2D>;
}

impl CoordinateProvider for CoordinateStore {
    fn position(&self, point: PointId) -> Option<Point2D> {
        self.get(point)
    }
}

/// Point-id based front end to the geometric predicates
#[derive(Clone, Copy)]
pub struct Oracle<'a> {
    provider: &'a dyn CoordinateProvider,
}

impl<'a> Oracle<'a> {
    pub fn new(provider: &'a dyn CoordinateProvider) -> Self {
        Self { provider }
    }

    fn at(&self, point: PointId) -> Option<Point2D> {
        self.provider.position(point)
    }

    fn polygon(&self, points: &[PointId]) -> Option<Vec<Point2D>> {
        points.iter().map(|&p| self.at(p)).collect()
    }

    pub fn point_on_segment(&self, p: PointId, a: PointId, b: PointId) -> Option<SegmentPosition> {
        Some(predicates::point_on_segment(self.at(p)?, self.at(a)?, self.at(b)?))
    }

    pub fn point_inside_angle(&self, p: PointId, a: PointId, v: PointId, b: PointId) -> Option<bool> {
        predicates::point_inside_angle(self.at(p)?, self.at(a)?, self.at(v)?, self.at(b)?)
    }

    pub fn point_in_polygon(&self, p: PointId, polygon: &[PointId]) -> Option<bool> {
        Some(predicates::point_in_polygon(self.at(p)?, &self.polygon(polygon)?))
    }

    pub fn polygon_contains(
        &self,
        common_a: PointId,
        common_b: PointId,
        poly1: &[PointId],
        poly2: &[PointId],
    ) -> Option<Containment> {
        Some(predicates::polygon_contains(
            self.at(common_a)?,
            self.at(common_b)?,
            &self.polygon(poly1)?,
            &self.polygon(poly2)?,
        ))
    }

    pub fn ccw(&self, a: PointId, b: PointId, c: PointId) -> Option<i8> {
        Some(predicates::ccw(self.at(a)?, self.at(b)?, self.at(c)?))
    }

    pub fn segments_cross(&self, s1: PointId, e1: PointId, s2: PointId, e2: PointId) -> Option<bool> {
        Some(predicates::segments_cross(
            self.at(s1)?,
            self.at(e1)?,
            self.at(s2)?,
            self.at(e2)?,
        ))
    }

    pub fn triangle_vs_polygon(
        &self,
        tip: PointId,
        common_a: PointId,
        common_b: PointId,
        polygon: &[PointId],
    ) -> Option<TrianglePlacement> {
        Some(predicates::triangle_vs_polygon(
            self.at(tip)?,
            self.at(common_a)?,
            self.at(common_b)?,
            &self.polygon(polygon)?,
        ))
    }
}
