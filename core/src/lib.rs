//! Geometrica Core
//!
//! Forward-chaining geometric deduction with provenance-tracked proofs and a
//! coordinate oracle for configuration case splits

pub mod ir;       // Intermediate representation (symbols, coords, facts, graph, proof, query)
pub mod geometry; // Configuration oracle and geometric predicates
pub mod rules;    // Inference rules
pub mod search;   // Fixpoint orchestrator and query answers
pub mod loader;   // JSON problem loader

pub use ir::*;
pub use geometry::*;
pub use rules::{all_rules, Rule, RuleContext};
pub use search::{Answer, Constraint, Phase, SolveReport, SolveStatus, Solver, SolverConfig, SolverError};
pub use loader::{load_problem, load_problems, GivenConstraint, LoadError, LoadResult, Problem};
