//! Geometry module - the configuration oracle
//!
//! Pure coordinate predicates plus the id-based oracle the rules consult.
//! NO graph access here.

pub mod oracle;
pub mod predicates;

pub use oracle::{CoordinateProvider, Oracle};
pub use predicates::{Containment, SegmentPosition, TrianglePlacement};
