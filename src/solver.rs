//! # Solver
//!
//! The front door of the crate: takes a loose calculus input string, runs it
//! through the normalizer and the operation tree builder, then walks the
//! tree bottom-up dispatching every node to a symbolic engine. Evaluation is
//! fail-fast: the first node that cannot be computed stops the walk, and
//! nodes above it are never dispatched. Each successful operator application
//! is recorded as a human-readable step, innermost operation first.

use crate::parsing::normalizer::normalize;
use crate::parsing::operation_tree::{build_operation_tree, OperationNode};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_limits::LimitPoint;
use crate::symbolic::symbolic_traits::{NativeEngine, SymbolicEngine};
use log::{debug, info};
use std::fmt;
use strum_macros::{Display, EnumIter};

/// What went wrong, coarsely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum ErrorKind {
    /// The input violates the notation grammar.
    MalformedInput,
    /// A name in call position that neither the grammar nor the engine knows.
    UnknownFunction,
    /// A leaf the symbolic engine could not parse.
    UnparsableExpression,
    /// The engine accepted the node but failed to compute it.
    ComputationFailed,
}

/// An error from any stage of solving, with the offending fragment when one
/// can be pinned down.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverError {
    pub kind: ErrorKind,
    pub message: String,
    pub offending: Option<String>,
}

impl SolverError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        SolverError {
            kind,
            message: message.into(),
            offending: None,
        }
    }
    pub fn malformed(message: impl Into<String>) -> Self {
        SolverError::new(ErrorKind::MalformedInput, message)
    }
    pub fn unknown_function(name: &str) -> Self {
        SolverError {
            kind: ErrorKind::UnknownFunction,
            message: format!("unknown function '{}'", name),
            offending: Some(name.to_string()),
        }
    }
    pub fn unparsable(fragment: &str, reason: impl Into<String>) -> Self {
        SolverError {
            kind: ErrorKind::UnparsableExpression,
            message: format!("cannot parse '{}': {}", fragment, reason.into()),
            offending: Some(fragment.to_string()),
        }
    }
    pub fn computation(message: impl Into<String>) -> Self {
        SolverError::new(ErrorKind::ComputationFailed, message)
    }
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for SolverError {}

/// A solved input: the final rendered result plus the trail of operator
/// applications that produced it, innermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub result: String,
    pub steps: Vec<String>,
}

fn parse_leaf(engine: &dyn SymbolicEngine, text: &str) -> Result<Expr, SolverError> {
    engine
        .parse_expression(text)
        .map_err(|reason| SolverError::unparsable(text, reason))
}

fn limit_point(engine: &dyn SymbolicEngine, text: &str) -> Result<LimitPoint, SolverError> {
    match text {
        "oo" => Ok(LimitPoint::PosInf),
        "-oo" => Ok(LimitPoint::NegInf),
        _ => Ok(LimitPoint::Finite(parse_leaf(engine, text)?)),
    }
}

fn evaluate(
    node: &OperationNode,
    engine: &dyn SymbolicEngine,
    steps: &mut Vec<String>,
) -> Result<Expr, SolverError> {
    match node {
        OperationNode::Leaf(text) => parse_leaf(engine, text),
        OperationNode::Derivative { var, order, child } => {
            let inner = evaluate(child, engine, steps)?;
            let result = engine
                .differentiate(&inner, var, *order)
                .map_err(|e| SolverError::computation(format!("derivative failed: {}", e)))?
                .simplify();
            let head = if *order == 1 {
                format!("d/d{}", var)
            } else {
                format!("d^{}/d{}^{}", order, var, order)
            };
            steps.push(format!(
                "{}({}) = {}",
                head,
                engine.render(&inner),
                engine.render(&result)
            ));
            Ok(result)
        }
        OperationNode::Integral { var, bounds, child } => {
            let inner = evaluate(child, engine, steps)?;
            let result = match bounds {
                None => engine
                    .integrate(&inner, var)
                    .map_err(|e| SolverError::computation(format!("integral failed: {}", e)))?
                    .simplify(),
                Some((lo, hi)) => {
                    let lower = parse_leaf(engine, lo)?;
                    let upper = parse_leaf(engine, hi)?;
                    engine
                        .integrate_definite(&inner, var, &lower, &upper)
                        .map_err(|e| SolverError::computation(format!("integral failed: {}", e)))?
                        .simplify()
                }
            };
            let head = match bounds {
                None => "∫".to_string(),
                Some((lo, hi)) => format!("∫({},{})", lo, hi),
            };
            steps.push(format!(
                "{} {} d{} = {}",
                head,
                engine.render(&inner),
                var,
                engine.render(&result)
            ));
            Ok(result)
        }
        OperationNode::Limit {
            var,
            point,
            side,
            child,
        } => {
            let inner = evaluate(child, engine, steps)?;
            let target = limit_point(engine, point)?;
            let result = engine
                .limit(&inner, var, &target, *side)
                .map_err(|e| SolverError::computation(format!("limit failed: {}", e)))?
                .simplify();
            steps.push(format!(
                "lim({} -> {}) {} = {}",
                var,
                point,
                engine.render(&inner),
                engine.render(&result)
            ));
            Ok(result)
        }
    }
}

/// Solves a loose calculus input with the given engine.
pub fn solve_with_engine(input: &str, engine: &dyn SymbolicEngine) -> Result<Solution, SolverError> {
    info!("solving '{}'", input);
    let strict = normalize(input)?;
    let tree = build_operation_tree(&strict)?;
    debug!("operation tree: {:?}", tree);
    let mut steps = Vec::new();
    let result = evaluate(&tree, engine, &mut steps)?;
    let rendered = engine.render(&result);
    info!("solved '{}' -> {}", input, rendered);
    Ok(Solution {
        result: rendered,
        steps,
    })
}

/// Solves a loose calculus input with the built-in engine.
pub fn solve(input: &str) -> Result<Solution, SolverError> {
    solve_with_engine(input, &NativeEngine)
}
