//! Qualitative predicates over concrete coordinates
//!
//! Pure functions, no graph access. Callers supply coordinates that already
//! satisfy the relationship being tested (e.g. near-collinear points for the
//! segment test); results for other inputs are meaningless but never panic.

use crate::ir::Point2D;
use serde::{Deserialize, Serialize};

/// Where a point lies relative to segment A-B, assuming it is on line AB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentPosition {
    OnSegment,
    /// Beyond A, on the side away from B
    OutsideNearA,
    /// Beyond B, on the side away from A
    OutsideNearB,
}

/// Relative placement of two polygons sharing one edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Containment {
    Poly1Inside,
    Poly2Inside,
    /// Disjoint, on opposite sides of the shared edge
    Outside,
    Ambiguous,
}

/// Relative placement of a triangle and a polygon sharing one edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrianglePlacement {
    Intersects,
    Inside,
    Outside,
    OutsideContaining,
}

/// Orientation of the turn a→b→c: +1 counter-clockwise, -1 clockwise, 0 collinear
pub fn ccw(a: Point2D, b: Point2D, c: Point2D) -> i8 {
    let area2 = b.minus(&a).cross_z(&c.minus(&a));
    if area2 > 0.0 {
        1
    } else if area2 < 0.0 {
        -1
    } else {
        0
    }
}

pub fn point_on_segment(p: Point2D, a: Point2D, b: Point2D) -> SegmentPosition {
    let ab = b.minus(&a);
    let projection = ab.dot(&p.minus(&a));
    if projection < 0.0 {
        SegmentPosition::OutsideNearA
    } else if projection > ab.norm_squared() {
        SegmentPosition::OutsideNearB
    } else {
        SegmentPosition::OnSegment
    }
}

/// Whether `p` lies strictly inside angle a-v-b
///
/// `p - v` is written in the basis {a - v, b - v}; the point is inside iff
/// both coefficients are positive. Returns `None` when the rays are collinear
/// and the basis is singular.
pub fn point_inside_angle(p: Point2D, a: Point2D, v: Point2D, b: Point2D) -> Option<bool> {
    let r1 = a.minus(&v);
    let r2 = b.minus(&v);
    let rp = p.minus(&v);

    let det = r1.cross_z(&r2);
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let alpha = rp.cross_z(&r2) / det;
    let beta = r1.cross_z(&rp) / det;
    Some(alpha > 0.0 && beta > 0.0)
}

/// Crossing-number point-in-polygon test
///
/// Points exactly on the boundary may be classified either way.
pub fn point_in_polygon(p: Point2D, polygon: &[Point2D]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (polygon[i], polygon[j]);
        if (vi.y > p.y) != (vj.y > p.y) {
            let x_cross = (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Whether segments s1-e1 and s2-e2 cross (touching counts as crossing)
pub fn segments_cross(s1: Point2D, e1: Point2D, s2: Point2D, e2: Point2D) -> bool {
    if ccw(s1, e1, s2) * ccw(s1, e1, e2) > 0 {
        return false;
    }
    if ccw(s2, e2, s1) * ccw(s2, e2, e1) > 0 {
        return false;
    }
    true
}

/// Classify two polygons that share the edge `common_a`-`common_b`
///
/// Each polygon's non-shared vertices must agree unanimously on being inside
/// or outside the other polygon, otherwise the result is ambiguous. When
/// neither polygon is inside the other, they must lie on opposite sides of
/// the shared edge to count as disjoint.
pub fn polygon_contains(
    common_a: Point2D,
    common_b: Point2D,
    poly1: &[Point2D],
    poly2: &[Point2D],
) -> Containment {
    let is_shared = |p: &Point2D| *p == common_a || *p == common_b;

    let unanimous = |own: &[Point2D], other: &[Point2D]| -> Option<Option<bool>> {
        let mut verdict = None;
        for p in own.iter().filter(|p| !is_shared(p)) {
            let inside = point_in_polygon(*p, other);
            match verdict {
                None => verdict = Some(inside),
                Some(v) if v != inside => return None,
                _ => {}
            }
        }
        Some(verdict)
    };

    let Some(poly1_inside) = unanimous(poly1, poly2) else {
        return Containment::Ambiguous;
    };
    let Some(poly2_inside) = unanimous(poly2, poly1) else {
        return Containment::Ambiguous;
    };

    if poly1_inside == Some(true) {
        return Containment::Poly1Inside;
    }
    if poly2_inside == Some(true) {
        return Containment::Poly2Inside;
    }

    let side1 = poly1
        .iter()
        .find(|p| !is_shared(p))
        .map_or(0, |&p| ccw(p, common_a, common_b));
    let same_side = poly2
        .iter()
        .filter(|p| !is_shared(p))
        .any(|&p| ccw(p, common_a, common_b) == side1);
    if same_side {
        Containment::Ambiguous
    } else {
        Containment::Outside
    }
}

/// Classify triangle `tip`-`common_a`-`common_b` against a polygon that
/// contains the edge `common_a`-`common_b`
pub fn triangle_vs_polygon(
    tip: Point2D,
    common_a: Point2D,
    common_b: Point2D,
    polygon: &[Point2D],
) -> TrianglePlacement {
    let is_shared = |p: &Point2D| *p == common_a || *p == common_b;
    let free_edges: Vec<(Point2D, Point2D)> = polygon
        .windows(2)
        .map(|w| (w[0], w[1]))
        .filter(|(a, b)| !is_shared(a) && !is_shared(b))
        .collect();

    let crosses = free_edges.iter().any(|&(a, b)| {
        segments_cross(common_a, tip, a, b) || segments_cross(common_b, tip, a, b)
    });
    if crosses {
        return TrianglePlacement::Intersects;
    }
    if point_in_polygon(tip, polygon) {
        return TrianglePlacement::Inside;
    }
    match free_edges.first() {
        Some(&(probe, _)) if point_in_polygon(probe, &[common_a, common_b, tip]) => {
            TrianglePlacement::OutsideContaining
        }
        _ => TrianglePlacement::Outside,
    }
}
