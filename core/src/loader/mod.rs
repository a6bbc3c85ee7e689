//! Problem loader
//!
//! Parses problems from JSON (points with coordinates, given constraints,
//! queries and an optional solver config) and builds a ready-to-run solver.

pub mod constraints;

pub use constraints::GivenConstraint;

use crate::ir::{Point2D, PointId, Query};
use crate::search::{Solver, SolverConfig, SolverError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// A geometric problem with givens and queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    /// Problem ID
    pub id: String,

    /// Problem description (natural language)
    #[serde(default)]
    pub description: String,

    pub points: Vec<PointSpec>,

    #[serde(default)]
    pub givens: Vec<GivenSpec>,

    #[serde(default)]
    pub queries: Vec<QuerySpec>,

    /// Optional: overrides for the default solver configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SolverConfig>,
}

/// A named point, with coordinates when the numeric layer supplied them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// Given constraint as written in the problem file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GivenSpec {
    Distance { a: String, b: String, value: f64 },
    Angle { a: String, vertex: String, b: String, degrees: f64 },
    EqualLength { a: String, b: String, c: String, d: String },
    EqualAngle { first: [String; 3], second: [String; 3] },
    Parallel { a: String, b: String, c: String, d: String },
    #[serde(alias = "point_on_segment")]
    PointOnLine { point: String, a: String, b: String },
    PointToLineDistance { point: String, a: String, b: String, value: f64 },
    TriangleArea { a: String, b: String, c: String, value: f64 },
    RegularPolygon { vertices: Vec<String> },
}

/// Query as written in the problem file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuerySpec {
    Length { a: String, b: String },
    Angle { a: String, vertex: String, b: String },
    Area { vertices: Vec<String> },
}

/// Problem loader result
pub type LoadResult<T> = Result<T, LoadError>;

/// Problem loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown point: {0}")]
    UnknownPoint(String),

    #[error("Malformed problem: {0}")]
    Malformed(String),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

impl Problem {
    pub fn from_json(json: &str) -> LoadResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Solver configuration for this problem
    pub fn solver_config(&self) -> SolverConfig {
        self.config.clone().unwrap_or_default()
    }

    /// Build a solver holding this problem's points, givens and queries
    pub fn build(&self) -> LoadResult<Solver> {
        self.build_with(self.solver_config())
    }

    /// Like [`Problem::build`], with an explicit configuration
    pub fn build_with(&self, config: SolverConfig) -> LoadResult<Solver> {
        let mut solver = Solver::new(config);
        for point in &self.points {
            if solver.graph().point(&point.name).is_some() {
                return Err(LoadError::Malformed(format!(
                    "point {} is declared twice",
                    point.name
                )));
            }
            let coords = match (point.x, point.y) {
                (Some(x), Some(y)) => Some(Point2D::new(x, y)),
                (None, None) => None,
                _ => {
                    return Err(LoadError::Malformed(format!(
                        "point {} has only one coordinate",
                        point.name
                    )))
                }
            };
            solver.add_point(&point.name, coords)?;
        }

        for given in &self.givens {
            let constraint = given.resolve(&solver)?;
            solver.add_constraint(&constraint)?;
        }
        for query in &self.queries {
            let query = query.resolve(&solver)?;
            solver.add_query(query)?;
        }
        Ok(solver)
    }
}

fn lookup(solver: &Solver, name: &str) -> LoadResult<PointId> {
    solver
        .graph()
        .point(name)
        .ok_or_else(|| LoadError::UnknownPoint(name.to_string()))
}

fn lookup_all(solver: &Solver, names: &[String]) -> LoadResult<Vec<PointId>> {
    names.iter().map(|n| lookup(solver, n)).collect()
}

fn lookup3(solver: &Solver, names: &[String; 3]) -> LoadResult<[PointId; 3]> {
    Ok([
        lookup(solver, &names[0])?,
        lookup(solver, &names[1])?,
        lookup(solver, &names[2])?,
    ])
}

impl GivenSpec {
    fn resolve(&self, solver: &Solver) -> LoadResult<GivenConstraint> {
        let p = |name: &str| lookup(solver, name);
        Ok(match self {
            GivenSpec::Distance { a, b, value } => GivenConstraint::Distance {
                a: p(a)?,
                b: p(b)?,
                value: *value,
            },
            GivenSpec::Angle { a, vertex, b, degrees } => GivenConstraint::Angle {
                a: p(a)?,
                vertex: p(vertex)?,
                b: p(b)?,
                degrees: *degrees,
            },
            GivenSpec::EqualLength { a, b, c, d } => GivenConstraint::EqualLength {
                a: p(a)?,
                b: p(b)?,
                c: p(c)?,
                d: p(d)?,
            },
            GivenSpec::EqualAngle { first, second } => GivenConstraint::EqualAngle {
                first: lookup3(solver, first)?,
                second: lookup3(solver, second)?,
            },
            GivenSpec::Parallel { a, b, c, d } => GivenConstraint::Parallel {
                a: p(a)?,
                b: p(b)?,
                c: p(c)?,
                d: p(d)?,
            },
            GivenSpec::PointOnLine { point, a, b } => GivenConstraint::PointOnLine {
                point: p(point)?,
                a: p(a)?,
                b: p(b)?,
            },
            GivenSpec::PointToLineDistance { point, a, b, value } => {
                GivenConstraint::PointToLineDistance {
                    point: p(point)?,
                    a: p(a)?,
                    b: p(b)?,
                    value: *value,
                }
            }
            GivenSpec::TriangleArea { a, b, c, value } => GivenConstraint::TriangleArea {
                a: p(a)?,
                b: p(b)?,
                c: p(c)?,
                value: *value,
            },
            GivenSpec::RegularPolygon { vertices } => GivenConstraint::RegularPolygon {
                vertices: lookup_all(solver, vertices)?,
            },
        })
    }
}

impl QuerySpec {
    fn resolve(&self, solver: &Solver) -> LoadResult<Query> {
        let p = |name: &str| lookup(solver, name);
        Ok(match self {
            QuerySpec::Length { a, b } => Query::Length(p(a)?, p(b)?),
            QuerySpec::Angle { a, vertex, b } => Query::Angle(p(a)?, p(vertex)?, p(b)?),
            QuerySpec::Area { vertices } => {
                if vertices.len() < 3 {
                    return Err(LoadError::Malformed(format!(
                        "area query needs at least 3 vertices, got {}",
                        vertices.len()
                    )));
                }
                Query::Area(lookup_all(solver, vertices)?)
            }
        })
    }
}

/// Load a single problem from a JSON file
pub fn load_problem<P: AsRef<Path>>(path: P) -> LoadResult<Problem> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Problem::from_json(&contents)
}

/// Load every `.json` problem in a directory, sorted by file name
pub fn load_problems<P: AsRef<Path>>(dir: P) -> LoadResult<Vec<Problem>> {
    let dir = dir.as_ref();
    let io_error = |source| LoadError::Io {
        path: dir.display().to_string(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();
    paths.iter().map(load_problem).collect()
}
