//! Identifiers and point-name interning
//!
//! Every node of the fact graph is addressed by an opaque arena index. Points
//! additionally carry a unique name, interned once when the problem is imported.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype wrapper for point identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(pub u32);

/// Newtype wrapper for fact identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactId(pub u32);

/// Newtype wrapper for provenance record identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProvenanceId(pub u32);

impl PointId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FactId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl ProvenanceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

impl fmt::Display for ProvenanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step{}", self.0)
    }
}

/// Identifies an inference rule, for per-rule visited markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleId {
    RegularPolygon,
    AngleAddition,
    AreaAddition,
    LengthAddition,
    AngleExtender,
    CosineTheorem,
    AreaSineFormula,
    InverseCosineTheorem,
}

impl RuleId {
    pub fn name(self) -> &'static str {
        match self {
            RuleId::RegularPolygon => "regular_polygon",
            RuleId::AngleAddition => "angle_addition",
            RuleId::AreaAddition => "area_addition",
            RuleId::LengthAddition => "length_addition",
            RuleId::AngleExtender => "angle_extender",
            RuleId::CosineTheorem => "cosine_theorem",
            RuleId::AreaSineFormula => "area_sine_formula",
            RuleId::InverseCosineTheorem => "inverse_cosine_theorem",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of the fact graph: either a point or a fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    Point(PointId),
    Fact(FactId),
}

/// Bidirectional mapping between point names and their ids
///
/// Ids are handed out densely in interning order, so a `PointId` doubles as
/// an index into the graph's point arena.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    point_map: FxHashMap<String, PointId>,
    point_labels: Vec<String>,
}

impl SymbolTable {
    /// Create a new empty symbol table
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a point label, returning its ID (creates new ID if label not seen before)
    pub fn get_or_intern_point(&mut self, label: &str) -> PointId {
        if let Some(&id) = self.point_map.get(label) {
            return id;
        }
        let id = PointId(self.point_labels.len() as u32);
        self.point_map.insert(label.to_string(), id);
        self.point_labels.push(label.to_string());
        id
    }

    /// Look up a point by label without interning it
    pub fn point(&self, label: &str) -> Option<PointId> {
        self.point_map.get(label).copied()
    }

    /// Label of a point, if the id was handed out by this table
    pub fn point_label(&self, id: PointId) -> Option<&str> {
        self.point_labels.get(id.index()).map(|s| s.as_str())
    }

    pub fn num_points(&self) -> usize {
        self.point_labels.len()
    }

    /// Iterate over all points in interning order
    pub fn points(&self) -> impl Iterator<Item = (PointId, &str)> {
        self.point_labels
            .iter()
            .enumerate()
            .map(|(i, label)| (PointId(i as u32), label.as_str()))
    }
}
