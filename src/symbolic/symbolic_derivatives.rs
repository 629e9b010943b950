//! # Symbolic Derivatives Module
//!
//! Analytical differentiation for `Expr` trees, plus the string/number
//! conversions the dispatcher needs:
//!
//! - `diff(var)` - single analytical derivative
//! - `nth_derivative(var, n)` - repeated diff + simplify
//! - `sym_to_str(var)` - fully parenthesized string form
//! - `eval_expression(vars, values)` - direct numerical evaluation
//!
//! The rule set implements the power, product, quotient and chain rules for
//! all supported functions. Evaluation of a variable that is not bound
//! yields NaN rather than a panic, so probing code can detect it.

use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// - Power rule: d/dx(x^n) = n*x^(n-1)
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - f*g')/g^2
    /// - Chain rule: d/dx(f(g(x))) = f'(g(x))*g'(x)
    ///
    /// For multivariable expressions this is the partial derivative.
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Mul(rhs.clone(), rhs.clone())),
            ),
            // general power rule for constant exponents; the exponent's own
            // derivative is dropped, matching the supported surface syntax
            Expr::Pow(base, exp) => Expr::Mul(
                Box::new(Expr::Mul(
                    exp.clone(),
                    Box::new(Expr::Pow(
                        base.clone(),
                        Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                    )),
                )),
                Box::new(base.diff(var)),
            ),
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::tg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::cos(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::ctg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::sin(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::arcsin(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arccos(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arctg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
            Expr::arcctg(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
        }
    } // end of diff

    /// Computes the nth derivative by repeated diff + simplify.
    pub fn nth_derivative(&self, var: &str, n: usize) -> Expr {
        let mut expr = self.clone();
        for _ in 0..n {
            expr = expr.diff(var).simplify();
        }
        expr.simplify()
    }

    /// Converts symbolic expression to a fully parenthesized string.
    pub fn sym_to_str(&self, var: &str) -> String {
        match self {
            Expr::Var(name) => name.clone(),
            Expr::Const(val) => val.to_string(),
            Expr::Add(lhs, rhs) => format!("({}) + ({})", lhs.sym_to_str(var), rhs.sym_to_str(var)),
            Expr::Sub(lhs, rhs) => format!("({}) - ({})", lhs.sym_to_str(var), rhs.sym_to_str(var)),
            Expr::Mul(lhs, rhs) => format!("({}) * ({})", lhs.sym_to_str(var), rhs.sym_to_str(var)),
            Expr::Div(lhs, rhs) => format!("({}) / ({})", lhs.sym_to_str(var), rhs.sym_to_str(var)),
            Expr::Pow(base, exp) => format!("({}^{})", base.sym_to_str(var), exp.sym_to_str(var)),
            Expr::Exp(expr) => format!("exp({})", expr.sym_to_str(var)),
            Expr::Ln(expr) => format!("ln({})", expr.sym_to_str(var)),
            Expr::sin(expr) => format!("sin({})", expr.sym_to_str(var)),
            Expr::cos(expr) => format!("cos({})", expr.sym_to_str(var)),
            Expr::tg(expr) => format!("tg({})", expr.sym_to_str(var)),
            Expr::ctg(expr) => format!("ctg({})", expr.sym_to_str(var)),
            Expr::arcsin(expr) => format!("arcsin({})", expr.sym_to_str(var)),
            Expr::arccos(expr) => format!("arccos({})", expr.sym_to_str(var)),
            Expr::arctg(expr) => format!("arctg({})", expr.sym_to_str(var)),
            Expr::arcctg(expr) => format!("arcctg({})", expr.sym_to_str(var)),
        }
    }

    /// Direct numerical evaluation. Unbound variables evaluate to NaN.
    pub fn eval_expression(&self, vars: &[&str], values: &[f64]) -> f64 {
        match self {
            Expr::Var(name) => vars
                .iter()
                .position(|v| v == name)
                .and_then(|i| values.get(i).copied())
                .unwrap_or(f64::NAN),
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => {
                lhs.eval_expression(vars, values) + rhs.eval_expression(vars, values)
            }
            Expr::Sub(lhs, rhs) => {
                lhs.eval_expression(vars, values) - rhs.eval_expression(vars, values)
            }
            Expr::Mul(lhs, rhs) => {
                lhs.eval_expression(vars, values) * rhs.eval_expression(vars, values)
            }
            Expr::Div(lhs, rhs) => {
                lhs.eval_expression(vars, values) / rhs.eval_expression(vars, values)
            }
            Expr::Pow(base, exp) => base
                .eval_expression(vars, values)
                .powf(exp.eval_expression(vars, values)),
            Expr::Exp(expr) => expr.eval_expression(vars, values).exp(),
            Expr::Ln(expr) => expr.eval_expression(vars, values).ln(),
            Expr::sin(expr) => expr.eval_expression(vars, values).sin(),
            Expr::cos(expr) => expr.eval_expression(vars, values).cos(),
            Expr::tg(expr) => expr.eval_expression(vars, values).tan(),
            Expr::ctg(expr) => 1.0 / expr.eval_expression(vars, values).tan(),
            Expr::arcsin(expr) => expr.eval_expression(vars, values).asin(),
            Expr::arccos(expr) => expr.eval_expression(vars, values).acos(),
            Expr::arctg(expr) => expr.eval_expression(vars, values).atan(),
            Expr::arcctg(expr) => {
                std::f64::consts::FRAC_PI_2 - expr.eval_expression(vars, values).atan()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_diff_power_rule() {
        let f = x().pow(Expr::Const(2.0));
        let df = f.diff("x").simplify();
        // 2*x at x = 3
        assert_relative_eq!(df.eval_expression(&["x"], &[3.0]), 6.0);
    }

    #[test]
    fn test_diff_sin_chain() {
        let f = Expr::sin(x().pow(Expr::Const(2.0)).boxed());
        let df = f.diff("x");
        // 2x * cos(x^2) at x = 1.3
        let expected = 2.0 * 1.3 * (1.3f64 * 1.3).cos();
        assert_relative_eq!(
            df.eval_expression(&["x"], &[1.3]),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_diff_quotient_rule() {
        let f = Expr::sin(x().boxed()) / x();
        let df = f.diff("x");
        let v = 0.7f64;
        let expected = (v.cos() * v - v.sin()) / (v * v);
        assert_relative_eq!(df.eval_expression(&["x"], &[v]), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_diff_partial() {
        let f = x() * Expr::Var("y".to_string());
        let df = f.diff("y").simplify();
        assert_eq!(df, x());
    }

    #[test]
    fn test_nth_derivative_sin() {
        let f = Expr::sin(x().boxed());
        let d2 = f.nth_derivative("x", 2);
        // -sin(x) at x = 0.5
        assert_relative_eq!(
            d2.eval_expression(&["x"], &[0.5]),
            -(0.5f64.sin()),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_eval_unbound_variable_is_nan() {
        assert!(x().eval_expression(&[], &[]).is_nan());
    }
}
