//! # Symbolic Limits Module
//!
//! Limit evaluation for `Expr` trees:
//!
//! 1. **Direct substitution** when the expression is defined at the point;
//!    the substituted tree is simplified so exact values (cos(0) = 1)
//!    survive symbolically.
//! 2. **L'Hôpital's rule** for 0/0 and ∞/∞ quotients, applied repeatedly
//!    with a depth cap.
//! 3. **Numeric probing** from the requested side(s) as a last resort,
//!    with divergence detection; a two-sided mismatch means the limit
//!    does not exist.
//!
//! Limits at ±∞ are reduced to one-sided limits at zero through the
//! reciprocal substitution x -> 1/x. A point that is itself a symbolic
//! expression (lim t->x) is handled by pure substitution.

use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use std::fmt;
use strum_macros::Display;

const LHOPITAL_DEPTH: usize = 6;
const PROBE_STEPS: [f64; 8] = [1e-2, 1e-3, 1e-4, 1e-5, 1e-6, 1e-7, 1e-8, 1e-9];

/// Which side the variable approaches the point from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LimitSide {
    Left,
    Right,
    Both,
}

/// The approach point of a limit.
#[derive(Debug, Clone, PartialEq)]
pub enum LimitPoint {
    Finite(Expr),
    PosInf,
    NegInf,
}

impl fmt::Display for LimitPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LimitPoint::Finite(expr) => write!(f, "{}", expr),
            LimitPoint::PosInf => write!(f, "oo"),
            LimitPoint::NegInf => write!(f, "-oo"),
        }
    }
}

// a Div whose denominator simplifies to exactly zero; such trees are left
// unfolded by simplify and must not be returned as a limit value
fn contains_division_by_zero(expr: &Expr) -> bool {
    match expr {
        Expr::Var(_) | Expr::Const(_) => false,
        Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Pow(a, b) => {
            contains_division_by_zero(a) || contains_division_by_zero(b)
        }
        Expr::Div(a, b) => {
            b.simplify().is_zero()
                || contains_division_by_zero(a)
                || contains_division_by_zero(b)
        }
        Expr::Exp(e)
        | Expr::Ln(e)
        | Expr::sin(e)
        | Expr::cos(e)
        | Expr::tg(e)
        | Expr::ctg(e)
        | Expr::arcsin(e)
        | Expr::arccos(e)
        | Expr::arctg(e)
        | Expr::arcctg(e) => contains_division_by_zero(e),
    }
}

// snap probe estimates to the nearest integer when they are within noise
fn snap(value: f64) -> f64 {
    if (value - value.round()).abs() < 1e-6 * (1.0 + value.abs()) {
        value.round()
    } else {
        value
    }
}

enum Probe {
    Value(f64),
    Diverges(f64),
    Unknown,
}

impl Expr {
    /// Computes the limit of the expression as `var` approaches `point`.
    pub fn limit(&self, var: &str, point: &LimitPoint, side: LimitSide) -> Result<Expr, String> {
        debug!("limit of {} as {} -> {} ({})", self, var, point, side);
        match point {
            // x -> +oo becomes 1/x -> 0+ after the reciprocal substitution
            LimitPoint::PosInf => {
                let reciprocal = Expr::Const(1.0) / Expr::Var(var.to_string());
                self.substitute_variable(var, &reciprocal)
                    .limit_at(var, 0.0, LimitSide::Right, 0)
            }
            LimitPoint::NegInf => {
                let reciprocal = Expr::Const(1.0) / Expr::Var(var.to_string());
                self.substitute_variable(var, &reciprocal)
                    .limit_at(var, 0.0, LimitSide::Left, 0)
            }
            LimitPoint::Finite(p) => {
                let p_val = p.eval_expression(&[], &[]);
                if p_val.is_nan() {
                    // symbolic approach point, e.g. lim t->x: substitution only
                    return Ok(self.substitute_variable(var, p).simplify());
                }
                self.limit_at(var, p_val, side, 0)
            }
        }
    }

    fn limit_at(&self, var: &str, p: f64, side: LimitSide, depth: usize) -> Result<Expr, String> {
        // direct substitution
        let value = self.eval_expression(&[var], &[p]);
        if value.is_finite() {
            let substituted = self.substitute_variable(var, &Expr::Const(p)).simplify();
            if contains_division_by_zero(&substituted) {
                return Ok(Expr::Const(snap(value)));
            }
            return Ok(substituted);
        }

        // L'Hôpital for indeterminate quotients
        if let Expr::Div(num, den) = self {
            let nv = num.eval_expression(&[var], &[p]);
            let dv = den.eval_expression(&[var], &[p]);
            let zero_over_zero = nv.abs() < 1e-12 && dv.abs() < 1e-12;
            let inf_over_inf = nv.is_infinite() && dv.is_infinite();
            if (zero_over_zero || inf_over_inf) && depth < LHOPITAL_DEPTH {
                debug!("applying L'Hôpital to {} at depth {}", self, depth);
                let ratio = Expr::Div(
                    num.diff(var).simplify().boxed(),
                    den.diff(var).simplify().boxed(),
                );
                return ratio.simplify().limit_at(var, p, side, depth + 1);
            }
        }

        // numeric probing from the requested side(s)
        match side {
            LimitSide::Right => self.probe_result(var, p, 1.0),
            LimitSide::Left => self.probe_result(var, p, -1.0),
            LimitSide::Both => {
                let right = self.probe(var, p, 1.0);
                let left = self.probe(var, p, -1.0);
                match (left, right) {
                    (Probe::Value(l), Probe::Value(r))
                        if (l - r).abs() <= 1e-4 * (1.0 + l.abs()) =>
                    {
                        Ok(Expr::Const(snap((l + r) / 2.0)))
                    }
                    (Probe::Diverges(l), Probe::Diverges(r)) if l.signum() == r.signum() => {
                        Ok(Expr::Const(l.signum() * f64::INFINITY))
                    }
                    (Probe::Unknown, _) | (_, Probe::Unknown) => Err(format!(
                        "could not determine the limit of {} as {} -> {}",
                        self, var, p
                    )),
                    _ => Err(format!(
                        "limit of {} as {} -> {} does not exist (sides disagree)",
                        self, var, p
                    )),
                }
            }
        }
    }

    fn probe_result(&self, var: &str, p: f64, direction: f64) -> Result<Expr, String> {
        match self.probe(var, p, direction) {
            Probe::Value(v) => Ok(Expr::Const(snap(v))),
            Probe::Diverges(sign) => Ok(Expr::Const(sign * f64::INFINITY)),
            Probe::Unknown => Err(format!(
                "could not determine the one-sided limit of {} as {} -> {}",
                self, var, p
            )),
        }
    }

    fn probe(&self, var: &str, p: f64, direction: f64) -> Probe {
        let values: Vec<f64> = PROBE_STEPS
            .iter()
            .map(|h| self.eval_expression(&[var], &[p + direction * h]))
            .filter(|v| !v.is_nan())
            .collect();
        if values.len() < 2 {
            return Probe::Unknown;
        }
        let a = values[values.len() - 2];
        let b = values[values.len() - 1];
        if a.is_infinite() || b.is_infinite() || b.abs() > 1e8 {
            if a.signum() == b.signum() {
                return Probe::Diverges(b.signum());
            }
            return Probe::Unknown;
        }
        if (a - b).abs() <= 1e-4 * (1.0 + b.abs()) {
            return Probe::Value(b);
        }
        Probe::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    fn finite(v: f64) -> LimitPoint {
        LimitPoint::Finite(Expr::Const(v))
    }

    #[test]
    fn test_limit_by_substitution() {
        let f = x().pow(Expr::Const(2.0));
        let result = f.limit("x", &finite(2.0), LimitSide::Both).unwrap();
        assert_eq!(result, Expr::Const(4.0));
    }

    #[test]
    fn test_limit_sin_x_over_x() {
        let f = Expr::sin(x().boxed()) / x();
        let result = f.limit("x", &finite(0.0), LimitSide::Both).unwrap();
        assert_eq!(result, Expr::Const(1.0));
    }

    #[test]
    fn test_limit_one_over_x_at_infinity() {
        let f = Expr::Const(1.0) / x();
        let result = f.limit("x", &LimitPoint::PosInf, LimitSide::Both).unwrap();
        assert_eq!(result, Expr::Const(0.0));
    }

    #[test]
    fn test_limit_one_over_x_one_sided() {
        let f = Expr::Const(1.0) / x();
        let right = f.limit("x", &finite(0.0), LimitSide::Right).unwrap();
        assert_eq!(right, Expr::Const(f64::INFINITY));
        let left = f.limit("x", &finite(0.0), LimitSide::Left).unwrap();
        assert_eq!(left, Expr::Const(f64::NEG_INFINITY));
    }

    #[test]
    fn test_limit_two_sided_mismatch_fails() {
        let f = Expr::Const(1.0) / x();
        let err = f.limit("x", &finite(0.0), LimitSide::Both).unwrap_err();
        assert!(err.contains("does not exist"));
    }

    #[test]
    fn test_limit_symbolic_point_is_substitution() {
        let f = Expr::Var("t".to_string()).pow(Expr::Const(2.0));
        let point = LimitPoint::Finite(x());
        let result = f.limit("t", &point, LimitSide::Both).unwrap();
        assert_eq!(result, x().pow(Expr::Const(2.0)));
    }

    #[test]
    fn test_limit_repeated_lhopital() {
        // (1 - cos(x)) / x^2 -> 1/2 needs two rounds
        let f = (Expr::Const(1.0) - Expr::cos(x().boxed())) / x().pow(Expr::Const(2.0));
        let result = f.limit("x", &finite(0.0), LimitSide::Both).unwrap();
        match result {
            Expr::Const(v) => assert_relative_eq!(v, 0.5, epsilon = 1e-6),
            other => panic!("expected a constant, got {}", other),
        }
    }

    #[test]
    fn test_limit_x_squared_at_infinity_diverges() {
        let f = x().pow(Expr::Const(2.0));
        let result = f.limit("x", &LimitPoint::PosInf, LimitSide::Both).unwrap();
        assert_eq!(result, Expr::Const(f64::INFINITY));
    }
}
