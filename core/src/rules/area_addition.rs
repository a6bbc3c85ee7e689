//! Area addition for polygons sharing an edge

use super::{num, Derivation, Effect, Rule, RuleContext};
use crate::geometry::Containment;
use crate::ir::{Fact, FactId, Kind, Node, PointId, Role, RuleId};

/// Two areas sharing exactly one edge ⇒ the area of their union or difference
pub struct AreaAddition;

impl Rule for AreaAddition {
    fn id(&self) -> RuleId {
        RuleId::AreaAddition
    }

    fn process(&self, ctx: &RuleContext<'_>, node: Node) -> Vec<Effect> {
        let graph = ctx.graph;
        let Some(area) = ctx.fact_of_kind(node, Kind::Area) else {
            return Vec::new();
        };
        if graph.is_visited(area.id, self.id()) {
            return Vec::new();
        }
        let mut effects = vec![Effect::MarkVisited(area.id, self.id())];
        let cycle = area.cycle();
        let n = cycle.len();

        for i in 0..n {
            let (c1, c2) = (cycle[i], cycle[(i + 1) % n]);
            for other_id in graph.common_facts_of_kind(Kind::Area, &[c1, c2]) {
                if other_id == area.id || graph.shared_points(area.id, other_id).len() != 2 {
                    continue;
                }
                let Some(other) = graph.fact(other_id) else {
                    continue;
                };
                let other_cycle = other.cycle();
                if !adjacent(&other_cycle, c1, c2) {
                    continue;
                }
                let merged = match ctx.oracle.polygon_contains(c1, c2, &other_cycle, &cycle) {
                    Some(Containment::Poly1Inside) => merge(ctx, area, other, c1, c2, false),
                    Some(Containment::Poly2Inside) => merge(ctx, other, area, c1, c2, false),
                    Some(Containment::Outside) => merge(ctx, other, area, c1, c2, true),
                    Some(Containment::Ambiguous) | None => None,
                };
                effects.extend(merged.map(Effect::Derive));
            }
        }
        effects
    }
}

fn adjacent(cycle: &[PointId], a: PointId, b: PointId) -> bool {
    let n = cycle.len();
    (0..n).any(|i| {
        let (x, y) = (cycle[i], cycle[(i + 1) % n]);
        (x, y) == (a, b) || (x, y) == (b, a)
    })
}

/// `cycle` rotated to start at `from`, oriented so that it ends at `to`
fn walk(cycle: &[PointId], from: PointId, to: PointId) -> Option<Vec<PointId>> {
    let start = cycle.iter().position(|&p| p == from)?;
    let mut path: Vec<PointId> = cycle[start..].iter().chain(&cycle[..start]).copied().collect();
    if path.get(1) == Some(&to) {
        path[1..].reverse();
    }
    (path.last() == Some(&to)).then_some(path)
}

/// Area of `outer` plus or minus `inner` over the spliced vertex cycle
fn merge(
    ctx: &RuleContext<'_>,
    outer: &Fact,
    inner: &Fact,
    c1: PointId,
    c2: PointId,
    add: bool,
) -> Option<Derivation> {
    let graph = ctx.graph;
    let mut merged = walk(&outer.cycle(), c1, c2)?;
    let inner_path = walk(&inner.cycle(), c2, c1)?;
    merged.extend_from_slice(&inner_path[1..inner_path.len() - 1]);

    if graph.find_area(&merged).is_some() {
        return None;
    }
    let (a1, a2) = (outer.value()?, inner.value()?);
    let (value, sign) = if add { (a1 + a2, "+") } else { (a1 - a2, "-") };
    let parents: Vec<FactId> = vec![outer.id, inner.id];
    Some(Derivation {
        kind: Kind::Area,
        roles: Role::corners(&merged),
        value,
        explanation: format!(
            "A({}) = {} {} {} = {}",
            graph.path_label(&merged),
            graph.describe(outer.id),
            sign,
            graph.describe(inner.id),
            num(value)
        ),
        parents,
    })
}
