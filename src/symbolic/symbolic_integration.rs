//! # Symbolic Integration Module
//!
//! Antiderivative search for `Expr` trees. The strategy is table-driven:
//! linearity, constant factoring, the power rule with a linear inner
//! function, the standard function table (exp, ln, trig, inverse trig) and
//! one-level integration by parts for polynomial * integrable products.
//! Anything outside the table fails with a descriptive message, which the
//! dispatcher reports as a computation failure; there is no numerical
//! fallback here.
//!
//! Definite integration substitutes the bound expressions into the
//! antiderivative symbolically, so bounds may themselves contain variables.

use crate::symbolic::symbolic_engine::Expr;
use log::debug;

fn var_expr(var: &str) -> Expr {
    Expr::Var(var.to_string())
}

// derivative of the inner function when it is a constant, i.e. inner is
// linear in `var`; this is what makes sin(2x+1), exp(3x) etc. integrable
fn linear_coefficient(inner: &Expr, var: &str) -> Option<f64> {
    match inner.diff(var).simplify() {
        Expr::Const(c) if c != 0.0 => Some(c),
        _ => None,
    }
}

impl Expr {
    /// Computes the indefinite integral with respect to `var` (without the
    /// integration constant).
    pub fn integrate(&self, var: &str) -> Result<Expr, String> {
        debug!("integrating {} over {}", self, var);
        // constants with respect to var, including other variables
        if !self.contains_variable(var) {
            return Ok((self.clone() * var_expr(var)).simplify());
        }
        match self {
            Expr::Var(_) => {
                // the contains check above guarantees this is `var` itself
                Ok(var_expr(var).pow(Expr::Const(2.0)) / Expr::Const(2.0))
            }
            Expr::Add(lhs, rhs) => Ok(lhs.integrate(var)? + rhs.integrate(var)?),
            Expr::Sub(lhs, rhs) => Ok(lhs.integrate(var)? - rhs.integrate(var)?),
            Expr::Mul(lhs, rhs) => self.integrate_multiplication(lhs, rhs, var),
            Expr::Div(lhs, rhs) => self.integrate_division(lhs, rhs, var),
            Expr::Pow(base, exp) => self.integrate_power(base, exp, var),
            Expr::Exp(inner) => match linear_coefficient(inner, var) {
                Some(c) => Ok(Expr::Exp(inner.clone()) / Expr::Const(c)),
                None => Err(format!("cannot integrate exp({})", inner)),
            },
            Expr::Ln(inner) => {
                if **inner == var_expr(var) {
                    Ok(var_expr(var) * Expr::Ln(inner.clone()) - var_expr(var))
                } else {
                    Err(format!("cannot integrate ln({})", inner))
                }
            }
            Expr::sin(inner) => match linear_coefficient(inner, var) {
                Some(c) => Ok(-Expr::cos(inner.clone()) / Expr::Const(c)),
                None => Err(format!("cannot integrate sin({})", inner)),
            },
            Expr::cos(inner) => match linear_coefficient(inner, var) {
                Some(c) => Ok(Expr::sin(inner.clone()) / Expr::Const(c)),
                None => Err(format!("cannot integrate cos({})", inner)),
            },
            Expr::tg(inner) => match linear_coefficient(inner, var) {
                Some(c) => Ok(-Expr::Ln(Expr::cos(inner.clone()).boxed()) / Expr::Const(c)),
                None => Err(format!("cannot integrate tg({})", inner)),
            },
            Expr::ctg(inner) => match linear_coefficient(inner, var) {
                Some(c) => Ok(Expr::Ln(Expr::sin(inner.clone()).boxed()) / Expr::Const(c)),
                None => Err(format!("cannot integrate ctg({})", inner)),
            },
            Expr::arcsin(inner) => {
                if **inner == var_expr(var) {
                    let x = var_expr(var);
                    Ok(x.clone() * Expr::arcsin(inner.clone())
                        + (Expr::Const(1.0) - x.pow(Expr::Const(2.0))).pow(Expr::Const(0.5)))
                } else {
                    Err(format!("cannot integrate arcsin({})", inner))
                }
            }
            Expr::arccos(inner) => {
                if **inner == var_expr(var) {
                    let x = var_expr(var);
                    Ok(x.clone() * Expr::arccos(inner.clone())
                        - (Expr::Const(1.0) - x.pow(Expr::Const(2.0))).pow(Expr::Const(0.5)))
                } else {
                    Err(format!("cannot integrate arccos({})", inner))
                }
            }
            Expr::arctg(inner) => {
                if **inner == var_expr(var) {
                    let x = var_expr(var);
                    Ok(x.clone() * Expr::arctg(inner.clone())
                        - Expr::Ln((Expr::Const(1.0) + x.pow(Expr::Const(2.0))).boxed())
                            / Expr::Const(2.0))
                } else {
                    Err(format!("cannot integrate arctg({})", inner))
                }
            }
            Expr::arcctg(inner) => {
                if **inner == var_expr(var) {
                    let x = var_expr(var);
                    Ok(x.clone() * Expr::arcctg(inner.clone())
                        + Expr::Ln((Expr::Const(1.0) + x.pow(Expr::Const(2.0))).boxed())
                            / Expr::Const(2.0))
                } else {
                    Err(format!("cannot integrate arcctg({})", inner))
                }
            }
            // already covered by the contains check, kept for exhaustiveness
            Expr::Const(_) => Ok((self.clone() * var_expr(var)).simplify()),
        }
    }

    fn integrate_multiplication(&self, lhs: &Expr, rhs: &Expr, var: &str) -> Result<Expr, String> {
        if !lhs.contains_variable(var) {
            return Ok((lhs.clone() * rhs.integrate(var)?).simplify());
        }
        if !rhs.contains_variable(var) {
            return Ok((rhs.clone() * lhs.integrate(var)?).simplify());
        }
        self.try_integration_by_parts(lhs, rhs, var)
            .or_else(|_| self.try_integration_by_parts(rhs, lhs, var))
            .map_err(|_| format!("cannot integrate product: {} * {}", lhs, rhs))
    }

    /// ∫ u dv = u*V - ∫ u' V, restricted to u = x or u = x^n so the
    /// recursion strictly reduces the polynomial degree and terminates.
    fn try_integration_by_parts(&self, u: &Expr, dv: &Expr, var: &str) -> Result<Expr, String> {
        let n = match u {
            Expr::Var(name) if name == var => 1.0,
            Expr::Pow(base, exp) => match (base.as_ref(), exp.as_ref()) {
                (Expr::Var(name), Expr::Const(n))
                    if name == var && *n > 0.0 && n.fract() == 0.0 && *n <= 16.0 =>
                {
                    *n
                }
                _ => return Err(format!("by parts not applicable to u = {}", u)),
            },
            _ => return Err(format!("by parts not applicable to u = {}", u)),
        };
        let v = dv.integrate(var)?;
        let reduced = (var_expr(var).pow(Expr::Const(n - 1.0)) * v.clone()).simplify();
        let rest = reduced.integrate(var)?;
        Ok((u.clone() * v - Expr::Const(n) * rest).simplify())
    }

    fn integrate_division(&self, lhs: &Expr, rhs: &Expr, var: &str) -> Result<Expr, String> {
        if !rhs.contains_variable(var) {
            return Ok(lhs.integrate(var)? / rhs.clone());
        }
        if !lhs.contains_variable(var) && *rhs == var_expr(var) {
            return Ok((lhs.clone() * Expr::Ln(rhs.clone().boxed())).simplify());
        }
        // u'/u = (ln u)'
        if lhs.simplify() == rhs.diff(var).simplify() {
            return Ok(Expr::Ln(rhs.clone().boxed()));
        }
        Err(format!("cannot integrate division: {} / {}", lhs, rhs))
    }

    fn integrate_power(&self, base: &Expr, exp: &Expr, var: &str) -> Result<Expr, String> {
        if let Expr::Const(n) = exp {
            if let Some(c) = linear_coefficient(base, var) {
                if *n == -1.0 {
                    return Ok(Expr::Ln(base.clone().boxed()) / Expr::Const(c));
                }
                return Ok(base.clone().pow(Expr::Const(n + 1.0))
                    / (Expr::Const((n + 1.0) * c)));
            }
            return Err(format!("cannot integrate power: ({})^({})", base, exp));
        }
        // a^u with constant base and linear exponent: a^u / (u' * ln a)
        if !base.contains_variable(var) {
            if let Some(c) = linear_coefficient(exp, var) {
                return Ok(base.clone().pow(exp.clone())
                    / (Expr::Const(c) * Expr::Ln(base.clone().boxed())));
            }
        }
        Err(format!("cannot integrate power: ({})^({})", base, exp))
    }

    /// Definite integral over [lower, upper]; the bounds are substituted
    /// into the antiderivative symbolically, so they may contain variables.
    pub fn definite_integrate(
        &self,
        var: &str,
        lower: &Expr,
        upper: &Expr,
    ) -> Result<Expr, String> {
        let antiderivative = self.integrate(var)?.simplify();
        let at_upper = antiderivative.substitute_variable(var, upper).simplify();
        let at_lower = antiderivative.substitute_variable(var, lower).simplify();
        Ok((at_upper - at_lower).simplify())
    }
}
