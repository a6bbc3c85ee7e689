//! Provenance records and proof rendering
//!
//! Every fact in the graph points at one provenance record: a line of
//! explanation plus the records it was derived from. Records form a DAG
//! (two facts may cite the same sub-proof) and are stored in an append-only
//! arena, so insertion order is always a topological order.

use super::symbols::ProvenanceId;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during provenance operations
#[derive(Error, Debug)]
pub enum ProofError {
    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Provenance record not found: {0}")]
    RecordNotFound(ProvenanceId),
}

/// Result type for proof operations
pub type ProofResult<T> = Result<T, ProofError>;

/// A single justification step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub id: ProvenanceId,

    /// Human-readable explanation of this step
    pub explanation: String,

    /// Records this step was derived from, in citation order. Empty for givens.
    pub parents: Vec<ProvenanceId>,
}

impl ProvenanceRecord {
    pub fn is_leaf(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Append-only arena of provenance records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvenanceDag {
    records: Vec<ProvenanceRecord>,
}

/// A self-contained proof of one record: all of its ancestors, parents first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proof {
    pub conclusion: ProvenanceId,
    pub steps: Vec<ProvenanceRecord>,
}

impl Proof {
    /// Serialize to pretty JSON
    pub fn to_json(&self) -> ProofResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> ProofResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl ProvenanceDag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for a given fact
    pub fn leaf(&mut self, explanation: impl Into<String>) -> ProvenanceId {
        let id = ProvenanceId(self.records.len() as u32);
        self.records.push(ProvenanceRecord {
            id,
            explanation: explanation.into(),
            parents: Vec::new(),
        });
        id
    }

    /// Record for a derived fact. Every parent must already be in the arena.
    pub fn derived(
        &mut self,
        explanation: impl Into<String>,
        parents: Vec<ProvenanceId>,
    ) -> ProofResult<ProvenanceId> {
        if let Some(&missing) = parents.iter().find(|p| p.index() >= self.records.len()) {
            return Err(ProofError::RecordNotFound(missing));
        }
        let id = ProvenanceId(self.records.len() as u32);
        self.records.push(ProvenanceRecord {
            id,
            explanation: explanation.into(),
            parents,
        });
        Ok(id)
    }

    pub fn get(&self, id: ProvenanceId) -> Option<&ProvenanceRecord> {
        self.records.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All ancestors of `id` and `id` itself, each once, parents before children
    pub fn ancestors(&self, id: ProvenanceId) -> ProofResult<Vec<ProvenanceId>> {
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        self.collect(id, &mut seen, &mut order)?;
        Ok(order)
    }

    fn collect(
        &self,
        id: ProvenanceId,
        seen: &mut FxHashSet<ProvenanceId>,
        order: &mut Vec<ProvenanceId>,
    ) -> ProofResult<()> {
        if !seen.insert(id) {
            return Ok(());
        }
        let record = self.get(id).ok_or(ProofError::RecordNotFound(id))?;
        for &parent in &record.parents {
            self.collect(parent, seen, order)?;
        }
        order.push(id);
        Ok(())
    }

    /// Longest chain of derivations from `id` down to a given record
    ///
    /// Givens have depth 0.
    pub fn depth(&self, id: ProvenanceId) -> ProofResult<usize> {
        let record = self.get(id).ok_or(ProofError::RecordNotFound(id))?;
        let mut deepest = None;
        for &parent in &record.parents {
            let d = self.depth(parent)?;
            deepest = Some(deepest.map_or(d, |best: usize| best.max(d)));
        }
        Ok(deepest.map_or(0, |d| d + 1))
    }

    /// Multi-paragraph proof text, one paragraph per distinct step
    pub fn render(&self, id: ProvenanceId) -> ProofResult<String> {
        let mut paragraphs = Vec::new();
        for step in self.ancestors(id)? {
            if let Some(record) = self.get(step) {
                paragraphs.push(record.explanation.as_str());
            }
        }
        Ok(paragraphs.join("\n\n"))
    }

    /// Extract the proof of `id` as a standalone, serializable value
    pub fn proof(&self, id: ProvenanceId) -> ProofResult<Proof> {
        let steps = self
            .ancestors(id)?
            .into_iter()
            .filter_map(|step| self.get(step).cloned())
            .collect();
        Ok(Proof {
            conclusion: id,
            steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_chain() -> (ProvenanceDag, ProvenanceId) {
        let mut dag = ProvenanceDag::new();
        let bd = dag.leaf("Given |B-D| = 3");
        let ad = dag.leaf("Given |A-D| = 4");
        let adb = dag.leaf("Given ∠A-D-B = 90°");
        let ab = dag.derived("|A-B| = 5", vec![bd, ad, adb]).unwrap();
        let bc = dag.leaf("Given |B-C| = 12");
        let abc = dag.leaf("Given ∠A-B-C = 90°");
        let ac = dag.derived("|A-C| = 13", vec![bc, ab, abc]).unwrap();
        (dag, ac)
    }

    #[test]
    fn test_leaf_has_no_parents() {
        let mut dag = ProvenanceDag::new();
        let id = dag.leaf("Given |A-B| = 1");
        assert!(dag.get(id).unwrap().is_leaf());
        assert_eq!(dag.depth(id).unwrap(), 0);
    }

    #[test]
    fn test_derived_rejects_unknown_parent() {
        let mut dag = ProvenanceDag::new();
        let result = dag.derived("bogus", vec![ProvenanceId(3)]);
        assert!(matches!(result, Err(ProofError::RecordNotFound(ProvenanceId(3)))));
        assert!(dag.is_empty(), "Failed insert must not leave a record behind");
    }

    #[test]
    fn test_render_lists_parents_first() {
        let (dag, ac) = triangle_chain();
        let text = dag.render(ac).unwrap();
        let paragraphs: Vec<&str> = text.split("\n\n").collect();

        // parents in citation order, each one after its own ancestors
        assert_eq!(
            paragraphs,
            vec![
                "Given |B-C| = 12",
                "Given |B-D| = 3",
                "Given |A-D| = 4",
                "Given ∠A-D-B = 90°",
                "|A-B| = 5",
                "Given ∠A-B-C = 90°",
                "|A-C| = 13",
            ]
        );
        assert_eq!(dag.depth(ac).unwrap(), 2);
    }

    #[test]
    fn test_shared_parent_rendered_once() {
        let mut dag = ProvenanceDag::new();
        let given = dag.leaf("Given |A-B| = 2");
        let left = dag.derived("left", vec![given]).unwrap();
        let right = dag.derived("right", vec![given]).unwrap();
        let top = dag.derived("top", vec![left, right]).unwrap();

        let text = dag.render(top).unwrap();
        assert_eq!(text.matches("Given |A-B| = 2").count(), 1);
        assert_eq!(dag.ancestors(top).unwrap().len(), 4);
    }

    #[test]
    fn test_proof_json_roundtrip() {
        let (dag, ac) = triangle_chain();
        let proof = dag.proof(ac).unwrap();
        let json = proof.to_json().unwrap();
        let restored = Proof::from_json(&json).unwrap();

        assert_eq!(restored.conclusion, ac);
        assert_eq!(restored.steps, proof.steps);
    }
}
