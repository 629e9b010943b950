//! # Operator Grammar
//!
//! Recognizes the calculus operator that opens a (normalized) input string
//! and slices out its operand:
//!
//! - derivatives: `d/dx(...)`, `d^2/dx^2(...)`, with `∂` accepted for `d`
//!   and `²` accepted for `^2`,
//! - integrals: `∫ body d<var>`, with an optional bound group `∫(a,b)`,
//! - limits: `lim(x->p)(...)`, where the point is any leaf expression
//!   (parentheses included), may carry a `+` or `-` suffix for a
//!   one-sided limit, and `oo` stands for infinity.
//!
//! An input that opens with an operator head must be consumed completely;
//! anything left over after the operand is malformed. An input that opens
//! with no operator head at all is a leaf for the symbolic engine.

use crate::solver::SolverError;
use crate::symbolic::symbolic_limits::LimitSide;
use crate::symbolic::utils::{find_matching_paren, find_top_level_comma};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static DERIV_HEAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(d|∂)(?:\^(\d+)|(²))?/(d|∂)([a-zA-Z])(?:\^(\d+)|(²))?\s*").unwrap()
});
static LIM_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^lim\s*\(").unwrap());
static DIFF_TAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"d([a-zA-Z])\s*$").unwrap());

/// The operator that opens an input string.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorHead {
    Derivative {
        var: String,
        order: u32,
    },
    Integral {
        var: String,
        bounds: Option<(String, String)>,
    },
    Limit {
        var: String,
        point: String,
        side: LimitSide,
    },
}

/// A recognized operator together with the raw text of its operand.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorMatch {
    pub head: OperatorHead,
    pub operand: String,
}

// d^n, d² or a bare d
fn head_order(digits: Option<&str>, squared: bool) -> Result<u32, SolverError> {
    let order = match digits {
        Some(d) => d
            .parse::<u32>()
            .map_err(|_| SolverError::malformed(format!("bad derivative order '{}'", d)))?,
        None if squared => 2,
        None => 1,
    };
    if order == 0 {
        return Err(SolverError::malformed(
            "derivative order must be at least 1",
        ));
    }
    Ok(order)
}

// the operand is either a single parenthesized group covering the rest of
// the input, or the bare rest; a group with text after it is malformed
fn operand_span(rest: &str) -> Result<String, SolverError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(SolverError::malformed("operator has no operand"));
    }
    if rest.starts_with('(') {
        let close = find_matching_paren(rest, 0)
            .ok_or_else(|| SolverError::malformed(format!("unbalanced operand '{}'", rest)))?;
        let trailing = rest[close + 1..].trim();
        if !trailing.is_empty() {
            return Err(SolverError::malformed(format!(
                "unexpected input after operator operand: '{}'",
                trailing
            )));
        }
    }
    Ok(rest.to_string())
}

fn match_derivative(input: &str) -> Result<Option<OperatorMatch>, SolverError> {
    let Some(caps) = DERIV_HEAD_RE.captures(input) else {
        return Ok(None);
    };
    let num_order = head_order(caps.get(2).map(|m| m.as_str()), caps.get(3).is_some())?;
    let den_order = head_order(caps.get(6).map(|m| m.as_str()), caps.get(7).is_some())?;
    if num_order != den_order {
        return Err(SolverError::malformed(format!(
            "derivative order mismatch: {} vs {}",
            num_order, den_order
        )));
    }
    let var = caps[5].to_string();
    let operand = operand_span(&input[caps[0].len()..])?;
    Ok(Some(OperatorMatch {
        head: OperatorHead::Derivative {
            var,
            order: num_order,
        },
        operand,
    }))
}

fn match_integral(input: &str) -> Result<Option<OperatorMatch>, SolverError> {
    if !input.starts_with('∫') {
        return Ok(None);
    }
    let mut body = input['∫'.len_utf8()..].trim_start();

    // a parenthesized group with a top-level comma right after the sign
    // carries the bounds
    let mut bounds = None;
    if body.starts_with('(') {
        let close = find_matching_paren(body, 0)
            .ok_or_else(|| SolverError::malformed(format!("unbalanced bounds in '{}'", input)))?;
        let inner = &body[1..close];
        if let Some(comma) = find_top_level_comma(inner) {
            let lower = inner[..comma].trim();
            let upper = inner[comma + 1..].trim();
            if lower.is_empty() || upper.is_empty() {
                return Err(SolverError::malformed(format!(
                    "integral bounds must both be present in '{}'",
                    input
                )));
            }
            bounds = Some((lower.to_string(), upper.to_string()));
            body = body[close + 1..].trim_start();
        }
    }

    let Some(tail) = DIFF_TAIL_RE.find(body) else {
        return Err(SolverError::malformed(format!(
            "integral is missing its differential: '{}'",
            input
        )));
    };
    // `dx` must be a standalone trailing token, not the tail of a name
    let glued = body[..tail.start()]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric());
    if glued {
        return Err(SolverError::malformed(format!(
            "integral is missing its differential: '{}'",
            input
        )));
    }
    let var = body[tail.start() + 1..tail.start() + 2].to_string();
    let integrand = body[..tail.start()].trim();
    if integrand.is_empty() {
        return Err(SolverError::malformed(format!(
            "integral has no integrand: '{}'",
            input
        )));
    }
    Ok(Some(OperatorMatch {
        head: OperatorHead::Integral { var, bounds },
        operand: integrand.to_string(),
    }))
}

// the arrow separating variable from point, outside any nested parens;
// the point itself may be a parenthesized expression like (1+2) or sin(1)
fn split_on_arrow(inner: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '-' if depth == 0 && inner[i..].starts_with("->") => {
                return Some((&inner[..i], &inner[i + 2..]));
            }
            '→' if depth == 0 => {
                return Some((&inner[..i], &inner[i + '→'.len_utf8()..]));
            }
            _ => {}
        }
    }
    None
}

fn match_limit(input: &str) -> Result<Option<OperatorMatch>, SolverError> {
    let Some(open) = LIM_START_RE.find(input) else {
        return Ok(None);
    };
    let open_pos = open.end() - 1;
    let close = find_matching_paren(input, open_pos).ok_or_else(|| {
        SolverError::malformed(format!("unbalanced limit head in '{}'", input))
    })?;
    let inner = &input[open_pos + 1..close];
    let Some((var_part, point_part)) = split_on_arrow(inner) else {
        return Err(SolverError::malformed(format!(
            "bad limit head in '{}': expected lim(var -> point)",
            input
        )));
    };
    let var_part = var_part.trim();
    if var_part.len() != 1 || !var_part.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(SolverError::malformed(format!(
            "bad limit variable '{}' in '{}'",
            var_part, input
        )));
    }
    let var = var_part.to_string();
    let raw_point = point_part.trim().to_string();
    if raw_point.is_empty() {
        return Err(SolverError::malformed(format!(
            "limit head has no point in '{}'",
            input
        )));
    }
    let (point, side) = if raw_point.len() > 1 && raw_point.ends_with('+') {
        (raw_point[..raw_point.len() - 1].trim().to_string(), LimitSide::Right)
    } else if raw_point.len() > 1 && raw_point.ends_with('-') {
        (raw_point[..raw_point.len() - 1].trim().to_string(), LimitSide::Left)
    } else {
        (raw_point, LimitSide::Both)
    };
    let operand = operand_span(&input[close + ')'.len_utf8()..])?;
    Ok(Some(OperatorMatch {
        head: OperatorHead::Limit { var, point, side },
        operand,
    }))
}

/// Tries each operator head against the start of `input`. `Ok(None)` means
/// the input is a plain expression leaf.
pub fn match_operator(input: &str) -> Result<Option<OperatorMatch>, SolverError> {
    let trimmed = input.trim();
    let matched = match match_derivative(trimmed)? {
        Some(m) => Some(m),
        None => match match_integral(trimmed)? {
            Some(m) => Some(m),
            None => match_limit(trimmed)?,
        },
    };
    if let Some(ref m) = matched {
        debug!("matched {:?} with operand '{}'", m.head, m.operand);
    }
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_order_derivative() {
        let m = match_operator("d/dx(x^2)").unwrap().unwrap();
        assert_eq!(
            m.head,
            OperatorHead::Derivative {
                var: "x".to_string(),
                order: 1
            }
        );
        assert_eq!(m.operand, "(x^2)");
    }

    #[test]
    fn test_higher_order_and_aliases() {
        let m = match_operator("d^3/dx^3(x^4)").unwrap().unwrap();
        assert_eq!(
            m.head,
            OperatorHead::Derivative {
                var: "x".to_string(),
                order: 3
            }
        );
        let m = match_operator("d²/dx²(x^3)").unwrap().unwrap();
        assert_eq!(
            m.head,
            OperatorHead::Derivative {
                var: "x".to_string(),
                order: 2
            }
        );
        let m = match_operator("∂/∂y(x*y)").unwrap().unwrap();
        assert_eq!(
            m.head,
            OperatorHead::Derivative {
                var: "y".to_string(),
                order: 1
            }
        );
    }

    #[test]
    fn test_derivative_order_mismatch() {
        let err = match_operator("d^2/dx^3(x)").unwrap_err();
        assert!(err.to_string().contains("order mismatch"));
        assert!(match_operator("d^0/dx^0(x)").is_err());
    }

    #[test]
    fn test_trailing_input_rejected() {
        assert!(match_operator("d/dx(x^2) + 1").is_err());
    }

    #[test]
    fn test_indefinite_integral() {
        let m = match_operator("∫x^2 dx").unwrap().unwrap();
        assert_eq!(
            m.head,
            OperatorHead::Integral {
                var: "x".to_string(),
                bounds: None
            }
        );
        assert_eq!(m.operand, "x^2");
    }

    #[test]
    fn test_definite_integral_bounds() {
        let m = match_operator("∫(0,1)(x^2)dx").unwrap().unwrap();
        assert_eq!(
            m.head,
            OperatorHead::Integral {
                var: "x".to_string(),
                bounds: Some(("0".to_string(), "1".to_string()))
            }
        );
        assert_eq!(m.operand, "(x^2)");
    }

    #[test]
    fn test_paren_integrand_without_bounds() {
        let m = match_operator("∫(x+1)dx").unwrap().unwrap();
        assert_eq!(
            m.head,
            OperatorHead::Integral {
                var: "x".to_string(),
                bounds: None
            }
        );
        assert_eq!(m.operand, "(x+1)");
    }

    #[test]
    fn test_integral_missing_differential() {
        let err = match_operator("∫x^2").unwrap_err();
        assert!(err.to_string().contains("differential"));
    }

    #[test]
    fn test_two_sided_limit() {
        let m = match_operator("lim(x->0)(sin(x)/x)").unwrap().unwrap();
        assert_eq!(
            m.head,
            OperatorHead::Limit {
                var: "x".to_string(),
                point: "0".to_string(),
                side: LimitSide::Both
            }
        );
        assert_eq!(m.operand, "(sin(x)/x)");
    }

    #[test]
    fn test_one_sided_limits() {
        let m = match_operator("lim(x->0+)(1/x)").unwrap().unwrap();
        assert_eq!(
            m.head,
            OperatorHead::Limit {
                var: "x".to_string(),
                point: "0".to_string(),
                side: LimitSide::Right
            }
        );
        let m = match_operator("lim(x->2-)(x)").unwrap().unwrap();
        assert_eq!(
            m.head,
            OperatorHead::Limit {
                var: "x".to_string(),
                point: "2".to_string(),
                side: LimitSide::Left
            }
        );
    }

    #[test]
    fn test_parenthesized_limit_point() {
        let m = match_operator("lim(x->(1+2))(x^2)").unwrap().unwrap();
        assert_eq!(
            m.head,
            OperatorHead::Limit {
                var: "x".to_string(),
                point: "(1+2)".to_string(),
                side: LimitSide::Both
            }
        );
        assert_eq!(m.operand, "(x^2)");
        let m = match_operator("lim(t->sin(1))(t)").unwrap().unwrap();
        assert_eq!(
            m.head,
            OperatorHead::Limit {
                var: "t".to_string(),
                point: "sin(1)".to_string(),
                side: LimitSide::Both
            }
        );
    }

    #[test]
    fn test_limit_at_negative_infinity() {
        let m = match_operator("lim(x->-oo)(1/x)").unwrap().unwrap();
        assert_eq!(
            m.head,
            OperatorHead::Limit {
                var: "x".to_string(),
                point: "-oo".to_string(),
                side: LimitSide::Both
            }
        );
    }

    #[test]
    fn test_bad_limit_head() {
        assert!(match_operator("lim(x 0)(x)").is_err());
    }

    #[test]
    fn test_plain_expression_is_no_match() {
        assert!(match_operator("x^2 + 1").unwrap().is_none());
        assert!(match_operator("sin(x)").unwrap().is_none());
    }
}
