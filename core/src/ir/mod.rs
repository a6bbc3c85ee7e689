//! Intermediate Representation (IR) module
//!
//! This module provides the core data structures of the deduction engine:
//! - **symbols**: Opaque arena ids and point name interning
//! - **coords**: Point coordinates supplied by the numeric layer
//! - **facts**: Fact kinds, typed role edges and their validation
//! - **graph**: The fact graph and its query layer
//! - **proof**: Provenance records and proof rendering
//! - **query**: Length / angle / area queries
//!
//! # Example
//!
//! ```rust
//! use geometrica_core::ir::*;
//!
//! let mut graph = FactGraph::new();
//! let a = graph.add_point("A", Some(Point2D::new(0.0, 0.0)));
//! let b = graph.add_point("B", Some(Point2D::new(3.0, 4.0)));
//!
//! graph
//!     .add_given(Kind::Length, Role::segment(a, b), Some(5.0), "Given |A-B| = 5")
//!     .unwrap();
//!
//! assert!(Query::Length(b, a).is_resolved(&graph));
//! ```

mod coords;
mod facts;
mod graph;
mod proof;
mod query;
mod symbols;

// Re-export all public items for convenient access
pub use coords::{ops, CoordinateStore, Point2D};
pub use facts::{AngleView, Fact, GraphError, GraphResult, Kind, Role, Side};
pub use graph::FactGraph;
pub use proof::{Proof, ProofError, ProofResult, ProvenanceDag, ProvenanceRecord};
pub use query::Query;
pub use symbols::{FactId, Node, PointId, ProvenanceId, RuleId, SymbolTable};
