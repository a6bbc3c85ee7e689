//! Search module - fixpoint orchestration and query answering

pub mod answer;
pub mod fixpoint;

pub use answer::{answer, Answer};
pub use fixpoint::*;
