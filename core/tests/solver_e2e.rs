//! End-to-end solver integration tests
//!
//! Tests problem loading → fixpoint solving → answers and proofs

use geometrica_core::*;
use std::f64::consts::FRAC_PI_2;

/// Helper to load and solve a problem from fixtures
fn solve(name: &str) -> (Solver, SolveReport) {
    let path = format!("tests/fixtures/problems/{}.json", name);
    let problem = load_problem(&path).expect("Failed to load problem");
    let mut solver = problem.build().expect("Failed to build solver");
    let report = solver.solve();
    (solver, report)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_all_fixtures_load() {
    let problems = load_problems("tests/fixtures/problems").expect("Failed to load fixtures");
    assert!(problems.len() >= 9);
    for problem in &problems {
        assert!(problem.build().is_ok(), "Fixture {} must build", problem.id);
    }
}

#[test]
fn test_right_triangles_chain() {
    let (solver, report) = solve("right_triangles");

    assert_eq!(report.status, SolveStatus::Succeeded);
    let answer = &report.answers[0];
    assert!(answer.proven);
    assert_close(answer.value.unwrap(), 13.0);
    assert_eq!(answer.display.as_deref(), Some("13"));

    // |A-C| cites |B-C|, the derived |A-B| and the right angle at B
    let graph = solver.graph();
    let a = graph.point("A").unwrap();
    let b = graph.point("B").unwrap();
    let c = graph.point("C").unwrap();
    let ac = graph.fact(graph.find_length(a, c).unwrap()).unwrap();
    let ab = graph.fact(graph.find_length(a, b).unwrap()).unwrap();
    let bc = graph.fact(graph.find_length(b, c).unwrap()).unwrap();
    let abc = graph.fact(graph.find_angle(a, b, c).unwrap()).unwrap();

    let record = graph.provenance().get(ac.provenance).unwrap();
    assert_eq!(record.parents, vec![bc.provenance, ab.provenance, abc.provenance]);
    assert_eq!(graph.provenance().depth(ac.provenance).unwrap(), 2);

    let lines: Vec<&str> = answer.explanation.split("\n\n").collect();
    assert!(lines.contains(&"Given |B-D| = 3"));
    assert!(lines.iter().filter(|l| l.contains("Pythagorean theorem")).count() == 2);
    assert!(lines.last().unwrap().starts_with("|A-C| = "), "Conclusion comes last");
}

#[test]
fn test_collinear_split() {
    let (_, report) = solve("collinear_split");
    assert_eq!(report.status, SolveStatus::Succeeded);
    assert_close(report.answers[0].value.unwrap(), 5.0);
}

#[test]
fn test_adjacent_areas_merge() {
    let (_, report) = solve("area_merge");
    assert_eq!(report.status, SolveStatus::Succeeded);
    assert_close(report.answers[0].value.unwrap(), 12.0);
}

#[test]
fn test_nested_areas_subtract() {
    let (_, report) = solve("area_nested");
    assert_eq!(report.status, SolveStatus::Succeeded);
    assert_close(report.answers[0].value.unwrap(), 6.0);
}

#[test]
fn test_angle_sum() {
    let (_, report) = solve("angle_sum");
    assert_eq!(report.status, SolveStatus::Succeeded);
    assert_close(report.answers[0].value.unwrap(), 70f64.to_radians());
    assert_eq!(report.answers[0].display.as_deref(), Some("70°"));
}

#[test]
fn test_regular_square() {
    let (_, report) = solve("regular_square");
    assert_eq!(report.status, SolveStatus::Succeeded);
    assert_close(report.answers[0].value.unwrap(), 4.0);
    assert_close(report.answers[1].value.unwrap(), 2.0);
    assert_close(report.answers[2].value.unwrap(), FRAC_PI_2);
}

#[test]
fn test_impossible_triangle_is_inconsistent() {
    let (_, report) = solve("impossible_triangle");
    assert_eq!(report.status, SolveStatus::Inconsistent);
}

#[test]
fn test_numeric_fallback() {
    let (_, report) = solve("numeric_fallback");
    assert_eq!(report.status, SolveStatus::Unsolved);

    let answer = &report.answers[0];
    assert!(!answer.proven);
    assert_close(answer.value.unwrap(), 5.0);
    assert_eq!(
        answer.explanation,
        "No solution found for |B-C| but numerically the answer is 5"
    );
}

#[test]
fn test_no_queries() {
    let (_, report) = solve("no_queries");
    assert_eq!(report.status, SolveStatus::NoQueries);
    assert_eq!(report.rounds, 0);
}

#[test]
fn test_partial_success() {
    let json = serde_json::json!({
        "id": "partial",
        "points": [
            {"name": "A", "x": 0.0, "y": 0.0},
            {"name": "B", "x": 3.0, "y": 0.0},
            {"name": "C", "x": 0.0, "y": 4.0}
        ],
        "givens": [{"type": "distance", "a": "A", "b": "B", "value": 3}],
        "queries": [
            {"type": "length", "a": "B", "b": "A"},
            {"type": "length", "a": "B", "b": "C"}
        ]
    });
    let problem = Problem::from_json(&json.to_string()).unwrap();
    let report = problem.build().unwrap().solve();

    assert_eq!(report.status, SolveStatus::PartiallySucceeded);
    assert!(report.answers[0].proven);
    assert!(!report.answers[1].proven);
}

#[test]
fn test_law_of_cosines_round_trip() {
    let (a_len, b_len, gamma) = (3.0_f64, 5.0_f64, 1.1_f64);
    let v = Point2D::new(0.0, 0.0);
    let p = Point2D::new(a_len, 0.0);
    let q = Point2D::new(b_len * gamma.cos(), b_len * gamma.sin());

    // forwards: two sides and the included angle give the third side
    let mut solver = Solver::default();
    let [pv, pp, pq] = [("V", v), ("P", p), ("Q", q)].map(|(n, c)| solver.add_point(n, Some(c)).unwrap());
    solver
        .add_constraint(&GivenConstraint::Distance { a: pv, b: pp, value: a_len })
        .unwrap();
    solver
        .add_constraint(&GivenConstraint::Distance { a: pv, b: pq, value: b_len })
        .unwrap();
    solver
        .add_constraint(&GivenConstraint::Angle { a: pp, vertex: pv, b: pq, degrees: gamma.to_degrees() })
        .unwrap();
    solver.add_query(Query::Length(pp, pq)).unwrap();
    let report = solver.solve();
    assert_eq!(report.status, SolveStatus::Succeeded);
    let c_len = report.answers[0].value.unwrap();
    assert_close(c_len, (a_len * a_len + b_len * b_len - 2.0 * a_len * b_len * gamma.cos()).sqrt());

    // backwards: the three sides give the angle back
    let mut solver = Solver::default();
    let [pv, pp, pq] = [("V", v), ("P", p), ("Q", q)].map(|(n, c)| solver.add_point(n, Some(c)).unwrap());
    for (x, y, value) in [(pv, pp, a_len), (pv, pq, b_len), (pp, pq, c_len)] {
        solver
            .add_constraint(&GivenConstraint::Distance { a: x, b: y, value })
            .unwrap();
    }
    solver.add_query(Query::Angle(pp, pv, pq)).unwrap();
    let report = solver.solve();
    assert_eq!(report.status, SolveStatus::Succeeded);
    assert_close(report.answers[0].value.unwrap(), gamma);
}

#[test]
fn test_graph_only_grows() {
    let problem = load_problem("tests/fixtures/problems/right_triangles.json").unwrap();
    let mut solver = problem.build().unwrap();

    let mut snapshot: Vec<(FactId, Option<f64>)> = Vec::new();
    loop {
        let running = solver.step();
        let graph = solver.graph();
        assert!(graph.num_facts() >= snapshot.len(), "Facts are never removed");
        for &(id, value) in &snapshot {
            let now = graph.fact(id).expect("Fact disappeared").value();
            assert_eq!(now.map(f64::to_bits), value.map(f64::to_bits), "Fact {} changed value", id);
        }
        snapshot = graph.facts().map(|f| (f.id, f.value())).collect();
        if !running {
            break;
        }
    }
    assert_eq!(solver.status(), Some(SolveStatus::Succeeded));
}

#[test]
fn test_visited_facts_are_not_reprocessed() {
    let (solver, _) = solve("right_triangles");
    let graph = solver.graph();
    let ctx = RuleContext {
        graph,
        oracle: Oracle::new(graph.coords()),
        right_angle_tolerance: 0.01,
    };

    let mut checked = 0;
    for fact in graph.facts() {
        for rule in all_rules() {
            if graph.is_visited(fact.id, rule.id()) {
                checked += 1;
                assert!(
                    rule.process(&ctx, Node::Fact(fact.id)).is_empty(),
                    "{} reprocessed visited fact {}",
                    rule.name(),
                    graph.describe(fact.id)
                );
            }
        }
    }
    assert!(checked > 0);
}

#[test]
fn test_repeated_derivation_is_recorded_once() {
    let (solver, _) = solve("right_triangles");
    let mut graph = solver.graph().clone();
    for id in graph.facts().map(|f| f.id).collect::<Vec<_>>() {
        graph.clear_all_visited(id);
    }

    let mut proposed = Vec::new();
    for node in graph.nodes() {
        let ctx = RuleContext {
            graph: &graph,
            oracle: Oracle::new(graph.coords()),
            right_angle_tolerance: 0.01,
        };
        for rule in all_rules() {
            for effect in rule.process(&ctx, node) {
                if let rules::Effect::Derive(d) = effect {
                    proposed.push(d);
                }
            }
        }
    }
    assert!(!proposed.is_empty(), "Cleared markers must let rules fire again");

    for d in proposed {
        graph
            .add_derived(d.kind, d.roles.clone(), d.value, d.explanation.clone(), &d.parents)
            .unwrap();
        let facts = graph.num_facts();
        let records = graph.provenance().len();

        let again = graph
            .add_derived(d.kind, d.roles, d.value, d.explanation, &d.parents)
            .unwrap();
        assert!(again.is_none(), "Second insertion must be rejected");
        assert_eq!(graph.num_facts(), facts);
        assert_eq!(graph.provenance().len(), records, "No second provenance record");
    }
}
