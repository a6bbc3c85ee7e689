//! The fact graph and its query layer
//!
//! Points and facts live in append-only arenas. A fact links to its points
//! through role edges; the reverse adjacency (point to facts) is the join
//! index every rule uses to find facts sharing specific points. All lookups
//! walk the adjacency list of a single point, so they cost O(degree).

use super::coords::{CoordinateStore, Point2D};
use super::facts::{AngleView, Fact, GraphError, GraphResult, Kind, Role, Side};
use super::proof::ProvenanceDag;
use super::symbols::{FactId, Node, PointId, ProvenanceId, RuleId, SymbolTable};
use rustc_hash::{FxHashMap, FxHashSet};

/// Store of points, facts, provenance and per-rule markers for one solve
#[derive(Debug, Clone, Default)]
pub struct FactGraph {
    symbols: SymbolTable,
    coords: CoordinateStore,
    given_points: FxHashSet<PointId>,

    facts: Vec<Fact>,

    /// Facts touching each point, indexed by `PointId`
    adjacency: Vec<Vec<FactId>>,

    /// Facts of each kind in insertion order
    type_index: FxHashMap<Kind, Vec<FactId>>,

    visited: FxHashSet<(FactId, RuleId)>,
    well_determined: FxHashSet<FactId>,

    provenance: ProvenanceDag,
}

impl FactGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- points ----

    /// Add a point (or return the existing one with this name)
    ///
    /// A point keeps the first position it was given; later coordinates for
    /// the same name are ignored.
    pub fn add_point(&mut self, name: &str, coords: Option<Point2D>) -> PointId {
        let id = self.symbols.get_or_intern_point(name);
        if self.adjacency.len() <= id.index() {
            self.adjacency.resize_with(id.index() + 1, Vec::new);
        }
        if let Some(c) = coords {
            if self.coords.get(id).is_none() {
                self.coords.set(id, c);
                self.given_points.insert(id);
            }
        }
        id
    }

    pub fn point(&self, name: &str) -> Option<PointId> {
        self.symbols.point(name)
    }

    /// Display name of a point
    pub fn label(&self, point: PointId) -> String {
        self.symbols
            .point_label(point)
            .map(str::to_string)
            .unwrap_or_else(|| point.to_string())
    }

    /// Labels joined with `-`, as used in proof text
    pub fn path_label(&self, points: &[PointId]) -> String {
        points
            .iter()
            .map(|&p| self.label(p))
            .collect::<Vec<_>>()
            .join("-")
    }

    /// True if the point's position was supplied by the numeric layer
    pub fn is_given_point(&self, point: PointId) -> bool {
        self.given_points.contains(&point)
    }

    pub fn coords(&self) -> &CoordinateStore {
        &self.coords
    }

    pub fn points(&self) -> impl Iterator<Item = PointId> + '_ {
        self.symbols.points().map(|(id, _)| id)
    }

    pub fn num_points(&self) -> usize {
        self.symbols.num_points()
    }

    fn check_point(&self, point: PointId) -> GraphResult<()> {
        if point.index() < self.adjacency.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownPoint(point))
        }
    }

    // ---- facts ----

    pub fn fact(&self, id: FactId) -> Option<&Fact> {
        self.facts.get(id.index())
    }

    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.facts.iter()
    }

    pub fn num_facts(&self) -> usize {
        self.facts.len()
    }

    pub fn facts_of_kind(&self, kind: Kind) -> &[FactId] {
        self.type_index
            .get(&kind)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All nodes in creation order: points first, then facts
    pub fn nodes(&self) -> Vec<Node> {
        self.points()
            .map(Node::Point)
            .chain(self.facts.iter().map(|f| Node::Fact(f.id)))
            .collect()
    }

    /// Value of a numeric fact
    pub fn value(&self, id: FactId) -> Option<f64> {
        self.fact(id).and_then(Fact::value)
    }

    pub fn provenance(&self) -> &ProvenanceDag {
        &self.provenance
    }

    /// Insert a fact unless one with the same kind and points already exists
    ///
    /// Returns the id of the stored fact and whether it was newly created.
    pub fn add_fact(
        &mut self,
        kind: Kind,
        roles: Vec<(PointId, Role)>,
        value: Option<f64>,
        provenance: ProvenanceId,
    ) -> GraphResult<(FactId, bool)> {
        self.check_new_fact(kind, &roles, value)?;
        if self.provenance.get(provenance).is_none() {
            return Err(GraphError::UnknownProvenance(provenance));
        }
        if let Some(existing) = self.find_fact(kind, &roles) {
            return Ok((existing, false));
        }
        Ok((self.insert(kind, roles, value, provenance), true))
    }

    /// Insert a given fact with a leaf justification
    pub fn add_given(
        &mut self,
        kind: Kind,
        roles: Vec<(PointId, Role)>,
        value: Option<f64>,
        explanation: impl Into<String>,
    ) -> GraphResult<(FactId, bool)> {
        self.check_new_fact(kind, &roles, value)?;
        if let Some(existing) = self.find_fact(kind, &roles) {
            return Ok((existing, false));
        }
        let leaf = self.provenance.leaf(explanation);
        Ok((self.insert(kind, roles, value, leaf), true))
    }

    /// Insert a derived fact citing the justifications of `parents`
    ///
    /// Returns `None` if an equivalent fact already exists; no provenance is
    /// recorded in that case.
    pub fn add_derived(
        &mut self,
        kind: Kind,
        roles: Vec<(PointId, Role)>,
        value: f64,
        explanation: impl Into<String>,
        parents: &[FactId],
    ) -> GraphResult<Option<FactId>> {
        self.check_new_fact(kind, &roles, Some(value))?;
        let parent_records = parents
            .iter()
            .map(|&f| {
                self.fact(f)
                    .map(|fact| fact.provenance)
                    .ok_or(GraphError::UnknownFact(f))
            })
            .collect::<GraphResult<Vec<_>>>()?;
        if self.find_fact(kind, &roles).is_some() {
            return Ok(None);
        }
        let record = self.provenance.derived(explanation, parent_records)?;
        Ok(Some(self.insert(kind, roles, Some(value), record)))
    }

    fn check_new_fact(
        &self,
        kind: Kind,
        roles: &[(PointId, Role)],
        value: Option<f64>,
    ) -> GraphResult<()> {
        for &(p, _) in roles {
            self.check_point(p)?;
        }
        kind.validate(roles)?;
        match (kind.is_numeric(), value.is_some()) {
            (true, false) => Err(GraphError::InvalidValue {
                kind,
                problem: "requires a value",
            }),
            (false, true) => Err(GraphError::InvalidValue {
                kind,
                problem: "does not carry a value",
            }),
            _ => Ok(()),
        }
    }

    fn insert(
        &mut self,
        kind: Kind,
        roles: Vec<(PointId, Role)>,
        value: Option<f64>,
        provenance: ProvenanceId,
    ) -> FactId {
        let id = FactId(self.facts.len() as u32);
        let fact = Fact::new(id, kind, roles, value, provenance);
        for p in fact.points() {
            self.adjacency[p.index()].push(id);
        }
        self.type_index.entry(kind).or_default().push(id);
        self.facts.push(fact);
        id
    }

    /// Attach another point to an existing fact under `role`
    ///
    /// Used to record that a point lies on an existing ray of an angle. Returns
    /// `false` when the point is already part of the fact.
    pub fn add_role(&mut self, id: FactId, point: PointId, role: Role) -> GraphResult<bool> {
        self.check_point(point)?;
        let fact = self.fact(id).ok_or(GraphError::UnknownFact(id))?;
        if fact.has_point(point) {
            return Ok(false);
        }
        let mut roles = fact.roles().to_vec();
        roles.push((point, role));
        fact.kind.validate(&roles)?;

        self.facts[id.index()].push_role(point, role);
        self.adjacency[point.index()].push(id);
        Ok(true)
    }

    // ---- neighborhood queries ----

    /// Facts touching `point`
    pub fn facts_at(&self, point: PointId) -> &[FactId] {
        self.adjacency
            .get(point.index())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn neighbors_of(&self, node: Node) -> Vec<Node> {
        match node {
            Node::Point(p) => self.facts_at(p).iter().map(|&f| Node::Fact(f)).collect(),
            Node::Fact(f) => self
                .fact(f)
                .map(|fact| fact.points().into_iter().map(Node::Point).collect())
                .unwrap_or_default(),
        }
    }

    /// Nodes adjacent to every node in `nodes`
    pub fn common_neighbors(&self, nodes: &[Node]) -> Vec<Node> {
        let Some((&first, rest)) = nodes.split_first() else {
            return Vec::new();
        };
        let mut common = self.neighbors_of(first);
        for &node in rest {
            let neighbors = self.neighbors_of(node);
            common.retain(|n| neighbors.contains(n));
        }
        common
    }

    /// Facts touching every point in `points`
    pub fn common_facts(&self, points: &[PointId]) -> Vec<FactId> {
        let Some((&first, rest)) = points.split_first() else {
            return Vec::new();
        };
        self.facts_at(first)
            .iter()
            .copied()
            .filter(|&f| {
                self.fact(f)
                    .map_or(false, |fact| rest.iter().all(|&p| fact.has_point(p)))
            })
            .collect()
    }

    /// Facts of `kind` touching every point in `points`
    pub fn common_facts_of_kind(&self, kind: Kind, points: &[PointId]) -> Vec<FactId> {
        self.common_facts(points)
            .into_iter()
            .filter(|&f| self.fact(f).map_or(false, |fact| fact.kind == kind))
            .collect()
    }

    /// Facts of `kind` touching `point`
    pub fn facts_at_of_kind(&self, point: PointId, kind: Kind) -> Vec<FactId> {
        self.facts_at(point)
            .iter()
            .copied()
            .filter(|&f| self.fact(f).map_or(false, |fact| fact.kind == kind))
            .collect()
    }

    /// Points shared by two facts
    pub fn shared_points(&self, a: FactId, b: FactId) -> Vec<PointId> {
        match (self.fact(a), self.fact(b)) {
            (Some(fa), Some(fb)) => fa
                .points()
                .into_iter()
                .filter(|&p| fb.has_point(p))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The point holding `role` in `fact`
    pub fn role_point(&self, fact: FactId, role: Role) -> Option<PointId> {
        self.fact(fact).and_then(|f| f.role_point(role))
    }

    // ---- existing-fact lookup ----

    /// Find a fact equivalent to one of `kind` over `roles`
    ///
    /// Lengths, areas, polygons and collinear sets match on their point set.
    /// Angles match on vertex plus one point from each ray. Other relational
    /// kinds match on their role layout, with the two halves interchangeable.
    pub fn find_fact(&self, kind: Kind, roles: &[(PointId, Role)]) -> Option<FactId> {
        let &(anchor, _) = roles.first()?;
        let candidates = self.facts_at(anchor).iter().filter_map(|&f| self.fact(f));
        match kind {
            Kind::Angle => {
                let vertex = roles.iter().find(|(_, r)| *r == Role::Vertex)?.0;
                let first = roles.iter().find(|(_, r)| *r == Role::Ray(Side::First))?.0;
                let second = roles.iter().find(|(_, r)| *r == Role::Ray(Side::Second))?.0;
                self.find_angle(first, vertex, second)
            }
            Kind::Length | Kind::Area | Kind::RegularPolygon | Kind::Collinear => {
                let mut wanted: Vec<PointId> = roles.iter().map(|&(p, _)| p).collect();
                wanted.sort_unstable();
                wanted.dedup();
                candidates
                    .filter(|f| f.kind == kind)
                    .find(|f| {
                        let mut have = f.points();
                        have.sort_unstable();
                        have == wanted
                    })
                    .map(|f| f.id)
            }
            Kind::EqualLength | Kind::Parallel | Kind::EqualAngle | Kind::PointToLineDistance => {
                let wanted = sorted_roles(roles.iter().copied());
                let swapped = sorted_roles(roles.iter().map(|&(p, r)| (p, swap_side(r))));
                candidates
                    .filter(|f| f.kind == kind)
                    .find(|f| {
                        let have = sorted_roles(f.roles().iter().copied());
                        have == wanted || have == swapped
                    })
                    .map(|f| f.id)
            }
        }
    }

    /// Length fact between two points
    pub fn find_length(&self, a: PointId, b: PointId) -> Option<FactId> {
        if a == b {
            return None;
        }
        self.facts_at(a)
            .iter()
            .copied()
            .find(|&f| self.fact(f).map_or(false, |fact| fact.kind == Kind::Length && fact.has_point(b)))
    }

    /// Known length between two points with its fact id
    pub fn length(&self, a: PointId, b: PointId) -> Option<(FactId, f64)> {
        let id = self.find_length(a, b)?;
        Some((id, self.value(id)?))
    }

    /// Angle fact at `vertex` with `a` and `b` on opposite rays
    pub fn find_angle(&self, a: PointId, vertex: PointId, b: PointId) -> Option<FactId> {
        self.facts_at(vertex).iter().copied().find(|&f| {
            self.angle_view(f)
                .map_or(false, |view| view.vertex == vertex && view.spans(a, b))
        })
    }

    /// Known angle a-vertex-b with its fact id
    pub fn angle(&self, a: PointId, vertex: PointId, b: PointId) -> Option<(FactId, f64)> {
        let id = self.find_angle(a, vertex, b)?;
        Some((id, self.value(id)?))
    }

    /// Area fact over exactly this point set
    pub fn find_area(&self, points: &[PointId]) -> Option<FactId> {
        self.find_fact(Kind::Area, &Role::corners(points))
    }

    pub fn angle_view(&self, id: FactId) -> Option<AngleView> {
        self.fact(id).and_then(Fact::as_angle)
    }

    /// Angles whose vertex is `vertex` and which have `ray_point` on a ray
    pub fn angles_on_ray(&self, vertex: PointId, ray_point: PointId) -> Vec<FactId> {
        self.facts_at(vertex)
            .iter()
            .copied()
            .filter(|&f| {
                self.angle_view(f).map_or(false, |view| {
                    view.vertex == vertex && view.side_of(ray_point).is_some()
                })
            })
            .collect()
    }

    // ---- markers ----

    pub fn is_visited(&self, fact: FactId, rule: RuleId) -> bool {
        self.visited.contains(&(fact, rule))
    }

    pub fn mark_visited(&mut self, fact: FactId, rule: RuleId) {
        self.visited.insert((fact, rule));
    }

    pub fn clear_visited(&mut self, fact: FactId, rule: RuleId) {
        self.visited.remove(&(fact, rule));
    }

    /// Forget every rule's marker on `fact`, forcing full re-evaluation
    pub fn clear_all_visited(&mut self, fact: FactId) {
        self.visited.retain(|&(f, _)| f != fact);
    }

    pub fn is_well_determined(&self, fact: FactId) -> bool {
        self.well_determined.contains(&fact)
    }

    pub fn mark_well_determined(&mut self, fact: FactId) {
        self.well_determined.insert(fact);
    }

    // ---- descriptions ----

    /// Short notation for a fact, as used in proof text
    pub fn describe(&self, id: FactId) -> String {
        let Some(fact) = self.fact(id) else {
            return id.to_string();
        };
        match fact.kind {
            Kind::Length => format!("|{}|", self.path_label(&fact.points())),
            Kind::Angle => match fact.as_angle() {
                Some(view) => match (view.first.first(), view.second.first()) {
                    (Some(&a), Some(&b)) => format!("∠{}", self.path_label(&[a, view.vertex, b])),
                    _ => id.to_string(),
                },
                None => id.to_string(),
            },
            Kind::Area => format!("A({})", self.path_label(&fact.cycle())),
            Kind::RegularPolygon => format!("regular {}", self.path_label(&fact.cycle())),
            Kind::Collinear => format!("collinear {}", self.path_label(&fact.points())),
            _ => format!("{} {}", fact.kind, self.path_label(&fact.points())),
        }
    }
}

fn swap_side(role: Role) -> Role {
    match role {
        Role::Segment(s) => Role::Segment(s.other()),
        Role::AngleSlot { side, slot } => Role::AngleSlot {
            side: side.other(),
            slot,
        },
        other => other,
    }
}

fn sorted_roles(roles: impl Iterator<Item = (PointId, Role)>) -> Vec<(PointId, Role)> {
    let mut v: Vec<_> = roles.collect();
    v.sort_unstable();
    v
}
