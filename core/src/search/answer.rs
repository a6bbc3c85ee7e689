//! Query answers: a proof when the graph has one, a number otherwise

use crate::ir::{FactGraph, FactId, ProvenanceId, Query};
use serde::Serialize;

/// Result for one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    /// Query in proof notation, e.g. `|A-C|`
    pub query: String,

    /// Raw value (radians for angles)
    pub value: Option<f64>,

    /// Value formatted for display (degrees for angles)
    pub display: Option<String>,

    /// True if the value follows from a derivation in the graph
    pub proven: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fact: Option<FactId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<ProvenanceId>,

    /// Rendered proof, or the numeric fallback notice
    pub explanation: String,
}

/// Resolve `query` against the graph, falling back to coordinates
pub fn answer(graph: &FactGraph, query: &Query, precision: usize) -> Answer {
    let name = query.describe(graph);
    let proven = query
        .find(graph)
        .and_then(|id| graph.fact(id))
        .and_then(|fact| fact.value().map(|v| (fact, v)));

    if let Some((fact, value)) = proven {
        let explanation = graph
            .provenance()
            .render(fact.provenance)
            .unwrap_or_else(|e| e.to_string());
        return Answer {
            query: name,
            value: Some(value),
            display: Some(query.format(value, precision)),
            proven: true,
            fact: Some(fact.id),
            provenance: Some(fact.provenance),
            explanation,
        };
    }

    let value = query.measure(graph.coords());
    let display = value.map(|v| query.format(v, precision));
    let explanation = match &display {
        Some(text) => format!("No solution found for {} but numerically the answer is {}", name, text),
        None => format!("No solution found for {} and no coordinates are available", name),
    };
    Answer {
        query: name,
        value,
        display,
        proven: false,
        fact: None,
        provenance: None,
        explanation,
    }
}
