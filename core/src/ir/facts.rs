//! Geometric facts and their typed role edges
//!
//! A fact is a graph node of one [`Kind`] linked to the points it involves.
//! Each link carries a [`Role`] telling rules which structural position the
//! point occupies (vertex, ray point, polygon corner, ...). The allowed role
//! layout is fixed per kind and checked when the fact is built.

use super::proof::ProofError;
use super::symbols::{FactId, PointId, ProvenanceId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while building or extending the fact graph
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Unknown point: {0}")]
    UnknownPoint(PointId),

    #[error("Unknown fact: {0}")]
    UnknownFact(FactId),

    #[error("Unknown provenance record: {0}")]
    UnknownProvenance(ProvenanceId),

    #[error("Invalid roles for {kind} fact: {reason}")]
    InvalidRoles { kind: Kind, reason: String },

    #[error("{kind} fact {problem}")]
    InvalidValue { kind: Kind, problem: &'static str },

    #[error(transparent)]
    Provenance(#[from] ProofError),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// The kind of relationship a fact states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    Length,
    Angle,
    EqualLength,
    EqualAngle,
    Parallel,
    Collinear,
    PointToLineDistance,
    Area,
    RegularPolygon,
}

impl Kind {
    /// Kinds that carry a numeric value
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Kind::Length | Kind::Angle | Kind::Area | Kind::PointToLineDistance
        )
    }

    /// Check a role layout against this kind
    pub fn validate(self, roles: &[(PointId, Role)]) -> GraphResult<()> {
        let invalid = |reason: String| GraphError::InvalidRoles { kind: self, reason };
        let count = |pred: &dyn Fn(Role) -> bool| roles.iter().filter(|(_, r)| pred(*r)).count();
        let points_of = |pred: &dyn Fn(Role) -> bool| -> Vec<PointId> {
            roles.iter().filter(|(_, r)| pred(*r)).map(|(p, _)| *p).collect()
        };

        let foreign = roles.iter().find(|(_, r)| !r.belongs_to(self));
        if let Some((_, role)) = foreign {
            return Err(invalid(format!("role {:?} is not allowed", role)));
        }

        match self {
            Kind::Length => {
                if roles.len() != 2 {
                    return Err(invalid(format!("expected 2 endpoints, got {}", roles.len())));
                }
                require_distinct(&points_of(&|_| true)).map_err(invalid)
            }
            Kind::Angle => {
                if count(&|r| r == Role::Vertex) != 1 {
                    return Err(invalid("expected exactly one vertex".into()));
                }
                if count(&|r| r == Role::Ray(Side::First)) == 0
                    || count(&|r| r == Role::Ray(Side::Second)) == 0
                {
                    return Err(invalid("each ray needs at least one point".into()));
                }
                require_distinct(&points_of(&|_| true)).map_err(invalid)
            }
            Kind::Area | Kind::RegularPolygon => {
                let n = roles.len();
                if n < 3 {
                    return Err(invalid(format!("a polygon needs 3 corners, got {}", n)));
                }
                for i in 0..n {
                    if count(&|r| r == Role::Corner(i as u16)) != 1 {
                        return Err(invalid(format!("corner {} missing or repeated", i)));
                    }
                }
                require_distinct(&points_of(&|_| true)).map_err(invalid)
            }
            Kind::Collinear => {
                if roles.len() < 3 {
                    return Err(invalid("at least 3 points are required".into()));
                }
                require_distinct(&points_of(&|_| true)).map_err(invalid)
            }
            Kind::EqualLength | Kind::Parallel => {
                for side in [Side::First, Side::Second] {
                    let segment = points_of(&|r| r == Role::Segment(side));
                    if segment.len() != 2 {
                        return Err(invalid(format!("segment {:?} needs 2 endpoints", side)));
                    }
                    require_distinct(&segment).map_err(invalid)?;
                }
                Ok(())
            }
            Kind::EqualAngle => {
                for side in [Side::First, Side::Second] {
                    for slot in 0..3 {
                        if count(&|r| r == Role::AngleSlot { side, slot }) != 1 {
                            return Err(invalid(format!("slot {} of angle {:?} missing", slot, side)));
                        }
                    }
                    let angle = points_of(&|r| matches!(r, Role::AngleSlot { side: s, .. } if s == side));
                    require_distinct(&angle).map_err(invalid)?;
                }
                Ok(())
            }
            Kind::PointToLineDistance => {
                if count(&|r| r == Role::Subject) != 1 || count(&|r| r == Role::LinePoint) != 2 {
                    return Err(invalid("expected one point and two line points".into()));
                }
                require_distinct(&points_of(&|_| true)).map_err(invalid)
            }
        }
    }
}

fn require_distinct(points: &[PointId]) -> Result<(), String> {
    for (i, p) in points.iter().enumerate() {
        if points[..i].contains(p) {
            return Err(format!("point {} appears twice", p));
        }
    }
    Ok(())
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Which of the two halves of a symmetric relationship a point belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// Structural position of a point within a fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Endpoint of a length (unordered)
    Endpoint,
    /// Point on one ray of an angle
    Ray(Side),
    /// Apex of an angle
    Vertex,
    /// Position in the vertex cycle of an area or regular polygon
    Corner(u16),
    /// Member of a collinear set
    OnLine,
    /// Endpoint of one of the two segments of an equal-length or parallel fact
    Segment(Side),
    /// Position (ray, vertex, ray) within one of the two angles of an equal-angle fact
    AngleSlot { side: Side, slot: u8 },
    /// The point of a point-to-line distance
    Subject,
    /// One of the two points spanning the line of a point-to-line distance
    LinePoint,
}

impl Role {
    fn belongs_to(self, kind: Kind) -> bool {
        match self {
            Role::Endpoint => kind == Kind::Length,
            Role::Ray(_) | Role::Vertex => kind == Kind::Angle,
            Role::Corner(_) => matches!(kind, Kind::Area | Kind::RegularPolygon),
            Role::OnLine => kind == Kind::Collinear,
            Role::Segment(_) => matches!(kind, Kind::EqualLength | Kind::Parallel),
            Role::AngleSlot { slot, .. } => kind == Kind::EqualAngle && slot < 3,
            Role::Subject | Role::LinePoint => kind == Kind::PointToLineDistance,
        }
    }

    /// Role layout for a polygon given as an ordered vertex cycle
    pub fn corners(points: &[PointId]) -> Vec<(PointId, Role)> {
        points
            .iter()
            .enumerate()
            .map(|(i, &p)| (p, Role::Corner(i as u16)))
            .collect()
    }

    /// Role layout for a single-point-per-ray angle
    pub fn angle(first: PointId, vertex: PointId, second: PointId) -> Vec<(PointId, Role)> {
        vec![
            (first, Role::Ray(Side::First)),
            (vertex, Role::Vertex),
            (second, Role::Ray(Side::Second)),
        ]
    }

    pub fn segment(a: PointId, b: PointId) -> Vec<(PointId, Role)> {
        vec![(a, Role::Endpoint), (b, Role::Endpoint)]
    }
}

/// A node of the fact graph stating one geometric relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub id: FactId,
    pub kind: Kind,
    roles: Vec<(PointId, Role)>,
    value: Option<f64>,
    pub provenance: ProvenanceId,
}

/// The three parts of an angle fact
///
/// Rays may hold several points once collinear extensions have been merged in.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleView {
    pub vertex: PointId,
    pub first: Vec<PointId>,
    pub second: Vec<PointId>,
    pub value: f64,
}

impl AngleView {
    pub fn ray(&self, side: Side) -> &[PointId] {
        match side {
            Side::First => &self.first,
            Side::Second => &self.second,
        }
    }

    /// Which ray `point` lies on, if any
    pub fn side_of(&self, point: PointId) -> Option<Side> {
        if self.first.contains(&point) {
            Some(Side::First)
        } else if self.second.contains(&point) {
            Some(Side::Second)
        } else {
            None
        }
    }

    /// True if `a` and `b` sit on opposite rays
    pub fn spans(&self, a: PointId, b: PointId) -> bool {
        (self.first.contains(&a) && self.second.contains(&b))
            || (self.first.contains(&b) && self.second.contains(&a))
    }
}

impl Fact {
    pub(crate) fn new(
        id: FactId,
        kind: Kind,
        roles: Vec<(PointId, Role)>,
        value: Option<f64>,
        provenance: ProvenanceId,
    ) -> Self {
        Self {
            id,
            kind,
            roles,
            value,
            provenance,
        }
    }

    pub fn roles(&self) -> &[(PointId, Role)] {
        &self.roles
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Distinct points of this fact in role order
    pub fn points(&self) -> Vec<PointId> {
        let mut points: Vec<PointId> = Vec::with_capacity(self.roles.len());
        for &(p, _) in &self.roles {
            if !points.contains(&p) {
                points.push(p);
            }
        }
        points
    }

    pub fn has_point(&self, point: PointId) -> bool {
        self.roles.iter().any(|&(p, _)| p == point)
    }

    /// First point holding `role`
    pub fn role_point(&self, role: Role) -> Option<PointId> {
        self.roles.iter().find(|&&(_, r)| r == role).map(|&(p, _)| p)
    }

    /// All points holding `role`, in insertion order
    pub fn role_points(&self, role: Role) -> Vec<PointId> {
        self.roles
            .iter()
            .filter(|&&(_, r)| r == role)
            .map(|&(p, _)| p)
            .collect()
    }

    /// The two endpoints of a length
    pub fn endpoints(&self) -> Option<(PointId, PointId)> {
        match (self.kind, self.roles.as_slice()) {
            (Kind::Length, [(a, _), (b, _)]) => Some((*a, *b)),
            _ => None,
        }
    }

    /// The other endpoint of a length
    pub fn opposite_endpoint(&self, point: PointId) -> Option<PointId> {
        let (a, b) = self.endpoints()?;
        if a == point {
            Some(b)
        } else if b == point {
            Some(a)
        } else {
            None
        }
    }

    /// Vertex, rays and value of an angle
    pub fn as_angle(&self) -> Option<AngleView> {
        if self.kind != Kind::Angle {
            return None;
        }
        Some(AngleView {
            vertex: self.role_point(Role::Vertex)?,
            first: self.role_points(Role::Ray(Side::First)),
            second: self.role_points(Role::Ray(Side::Second)),
            value: self.value?,
        })
    }

    /// Vertex cycle of an area or regular polygon, ordered by corner index
    pub fn cycle(&self) -> Vec<PointId> {
        let mut corners: Vec<(u16, PointId)> = self
            .roles
            .iter()
            .filter_map(|&(p, r)| match r {
                Role::Corner(i) => Some((i, p)),
                _ => None,
            })
            .collect();
        corners.sort_unstable();
        corners.into_iter().map(|(_, p)| p).collect()
    }

    /// Role list with one more point appended
    pub(crate) fn push_role(&mut self, point: PointId, role: Role) {
        self.roles.push((point, role));
    }
}
