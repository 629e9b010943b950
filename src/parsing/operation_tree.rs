//! # Operation Tree
//!
//! Builds the tree of calculus operations out of a normalized input string.
//! Operator heads nest through their operands, so `∫(d/dx(x^2)) dx` becomes
//! an `Integral` over a `Derivative` over a `Leaf`. A leaf is the raw text
//! handed to the symbolic engine; multi-letter names in call position that
//! the engine does not know are rejected here with their offending name.

use crate::parsing::operator_grammar::{match_operator, OperatorHead};
use crate::solver::SolverError;
use crate::symbolic::parse_expr::KNOWN_FUNCTIONS;
use crate::symbolic::symbolic_limits::LimitSide;
use crate::symbolic::utils::find_matching_paren;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static CALL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z]{2,})\(").unwrap());

/// One node of the operation tree.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationNode {
    /// Raw expression text for the symbolic engine.
    Leaf(String),
    Derivative {
        var: String,
        order: u32,
        child: Box<OperationNode>,
    },
    Integral {
        var: String,
        /// Lower and upper bound text; `None` means indefinite.
        bounds: Option<(String, String)>,
        child: Box<OperationNode>,
    },
    Limit {
        var: String,
        /// Approach point text; `oo` and `-oo` stand for infinity.
        point: String,
        side: LimitSide,
        child: Box<OperationNode>,
    },
}

impl OperationNode {
    /// Short name of the operation, for step logs and error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            OperationNode::Leaf(_) => "expression",
            OperationNode::Derivative { .. } => "derivative",
            OperationNode::Integral { .. } => "integral",
            OperationNode::Limit { .. } => "limit",
        }
    }
}

/// Removes redundant outer parentheses: `(d/dx(x^2))` and `d/dx(x^2)` build
/// the same tree.
pub fn strip_outer_parens(input: &str) -> &str {
    let mut s = input.trim();
    while s.starts_with('(') {
        match find_matching_paren(s, 0) {
            Some(close) if close == s.len() - 1 => s = s[1..close].trim(),
            _ => break,
        }
    }
    s
}

fn check_leaf(text: &str) -> Result<(), SolverError> {
    for caps in CALL_NAME_RE.captures_iter(text) {
        let name = &caps[1];
        if name == "lim" {
            continue;
        }
        if !KNOWN_FUNCTIONS.contains(&name) {
            return Err(SolverError::unknown_function(name));
        }
    }
    Ok(())
}

/// Recursively builds the operation tree for (already normalized) input.
pub fn build_operation_tree(input: &str) -> Result<OperationNode, SolverError> {
    let text = strip_outer_parens(input);
    if text.is_empty() {
        return Err(SolverError::malformed("empty expression"));
    }
    let Some(matched) = match_operator(text)? else {
        check_leaf(text)?;
        return Ok(OperationNode::Leaf(text.to_string()));
    };
    let child = Box::new(build_operation_tree(&matched.operand)?);
    let node = match matched.head {
        OperatorHead::Derivative { var, order } => OperationNode::Derivative { var, order, child },
        OperatorHead::Integral { var, bounds } => OperationNode::Integral { var, bounds, child },
        OperatorHead::Limit { var, point, side } => OperationNode::Limit {
            var,
            point,
            side,
            child,
        },
    };
    debug!("built {} node from '{}'", node.kind_name(), text);
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(s: &str) -> Box<OperationNode> {
        Box::new(OperationNode::Leaf(s.to_string()))
    }

    #[test]
    fn test_plain_leaf() {
        let tree = build_operation_tree("x^2 + 1").unwrap();
        assert_eq!(tree, OperationNode::Leaf("x^2 + 1".to_string()));
    }

    #[test]
    fn test_derivative_node() {
        let tree = build_operation_tree("d/dx(x^2)").unwrap();
        assert_eq!(
            tree,
            OperationNode::Derivative {
                var: "x".to_string(),
                order: 1,
                child: leaf("x^2"),
            }
        );
    }

    #[test]
    fn test_nested_operators() {
        let tree = build_operation_tree("∫(d/dx(x^2)) dx").unwrap();
        assert_eq!(
            tree,
            OperationNode::Integral {
                var: "x".to_string(),
                bounds: None,
                child: Box::new(OperationNode::Derivative {
                    var: "x".to_string(),
                    order: 1,
                    child: leaf("x^2"),
                }),
            }
        );
    }

    #[test]
    fn test_limit_node() {
        let tree = build_operation_tree("lim(x->0+)(1/x)").unwrap();
        assert_eq!(
            tree,
            OperationNode::Limit {
                var: "x".to_string(),
                point: "0".to_string(),
                side: LimitSide::Right,
                child: leaf("1/x"),
            }
        );
    }

    #[test]
    fn test_outer_parens_are_stripped() {
        let a = build_operation_tree("(d/dx(x^2))").unwrap();
        let b = build_operation_tree("d/dx(x^2)").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_function_in_leaf() {
        let err = build_operation_tree("foo(x) + 1").unwrap_err();
        assert_eq!(err.offending.as_deref(), Some("foo"));
    }

    #[test]
    fn test_known_functions_pass() {
        assert!(build_operation_tree("sin(x) + arctg(x)").is_ok());
    }
}
