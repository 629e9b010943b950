//! # Symbolic Expression Simplification Module
//!
//! Algebraic simplification for `Expr` trees, layered as:
//!
//! 1. **Constant Folding**: arithmetic on numerical constants
//! 2. **Algebraic Identities**: x + 0 = x, x * 1 = x, 0 * x = 0, x^1 = x,
//!    x - x = 0, ln(1) = 0, exp(0) = 1, ln(exp(u)) = u
//! 3. **Exact Function Values**: sin(0), cos(0), tg(0), arcsin(0), arctg(0)
//!
//! One pass (`simplify_once`) rewrites the tree bottom-up; `simplify`
//! repeats passes until a fixpoint, with an iteration cap so pathological
//! trees still terminate. Transcendental functions of non-zero constants
//! are left symbolic; numerical evaluation is `eval_expression`'s job.

use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// Simplifies the expression to a fixpoint of the rewrite rules.
    pub fn simplify(&self) -> Expr {
        let mut current = self.clone();
        for _ in 0..32 {
            let next = current.simplify_once();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn simplify_once(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                let (a, b) = (lhs.simplify_once(), rhs.simplify_once());
                match (&a, &b) {
                    (Expr::Const(x), Expr::Const(y)) => Expr::Const(x + y),
                    _ if a.is_zero() => b,
                    _ if b.is_zero() => a,
                    _ => Expr::Add(a.boxed(), b.boxed()),
                }
            }
            Expr::Sub(lhs, rhs) => {
                let (a, b) = (lhs.simplify_once(), rhs.simplify_once());
                match (&a, &b) {
                    (Expr::Const(x), Expr::Const(y)) => Expr::Const(x - y),
                    _ if b.is_zero() => a,
                    _ if a == b => Expr::Const(0.0),
                    _ if a.is_zero() => {
                        Expr::Mul(Expr::Const(-1.0).boxed(), b.boxed())
                    }
                    _ => Expr::Sub(a.boxed(), b.boxed()),
                }
            }
            Expr::Mul(lhs, rhs) => {
                let (a, b) = (lhs.simplify_once(), rhs.simplify_once());
                match (&a, &b) {
                    (Expr::Const(x), Expr::Const(y)) => Expr::Const(x * y),
                    _ if a.is_zero() || b.is_zero() => Expr::Const(0.0),
                    (Expr::Const(x), _) if *x == 1.0 => b,
                    (_, Expr::Const(y)) if *y == 1.0 => a,
                    // collapse nested constant factors: a * (b * e) = (a*b) * e
                    (Expr::Const(x), Expr::Mul(inner_l, inner_r)) => {
                        if let Expr::Const(y) = inner_l.as_ref() {
                            Expr::Mul(Expr::Const(x * y).boxed(), inner_r.clone())
                        } else {
                            Expr::Mul(a.boxed(), b.boxed())
                        }
                    }
                    (Expr::Mul(inner_l, inner_r), Expr::Const(y)) => {
                        if let Expr::Const(x) = inner_l.as_ref() {
                            Expr::Mul(Expr::Const(x * y).boxed(), inner_r.clone())
                        } else {
                            Expr::Mul(a.boxed(), b.boxed())
                        }
                    }
                    // fold a constant factor into a constant denominator:
                    // a * (e / b) = (a/b) * e
                    (Expr::Const(x), Expr::Div(num, den)) => match den.as_ref() {
                        Expr::Const(y) if *y != 0.0 => {
                            Expr::Mul(Expr::Const(x / y).boxed(), num.clone())
                        }
                        _ => Expr::Mul(a.boxed(), b.boxed()),
                    },
                    (Expr::Div(num, den), Expr::Const(y)) => match den.as_ref() {
                        Expr::Const(x) if *x != 0.0 => {
                            Expr::Mul(Expr::Const(y / x).boxed(), num.clone())
                        }
                        _ => Expr::Mul(a.boxed(), b.boxed()),
                    },
                    _ => Expr::Mul(a.boxed(), b.boxed()),
                }
            }
            Expr::Div(lhs, rhs) => {
                let (a, b) = (lhs.simplify_once(), rhs.simplify_once());
                match (&a, &b) {
                    (Expr::Const(x), Expr::Const(y)) if *y != 0.0 => Expr::Const(x / y),
                    _ if a.is_zero() && !b.is_zero() => Expr::Const(0.0),
                    (_, Expr::Const(y)) if *y == 1.0 => a,
                    // fold a constant factor in the numerator against a
                    // constant denominator: (x * e) / y = (x/y) * e
                    (Expr::Mul(l, r), Expr::Const(y)) if *y != 0.0 => {
                        match (l.as_ref(), r.as_ref()) {
                            (Expr::Const(x), _) => {
                                Expr::Mul(Expr::Const(x / y).boxed(), r.clone())
                            }
                            (_, Expr::Const(x)) => {
                                Expr::Mul(Expr::Const(x / y).boxed(), l.clone())
                            }
                            _ => Expr::Div(a.boxed(), b.boxed()),
                        }
                    }
                    _ => Expr::Div(a.boxed(), b.boxed()),
                }
            }
            Expr::Pow(base, exp) => {
                let (a, b) = (base.simplify_once(), exp.simplify_once());
                match (&a, &b) {
                    (Expr::Const(x), Expr::Const(y)) => {
                        let v = x.powf(*y);
                        if v.is_finite() {
                            Expr::Const(v)
                        } else {
                            Expr::Pow(a.boxed(), b.boxed())
                        }
                    }
                    (_, Expr::Const(y)) if *y == 1.0 => a,
                    (_, Expr::Const(y)) if *y == 0.0 => Expr::Const(1.0),
                    _ => Expr::Pow(a.boxed(), b.boxed()),
                }
            }
            Expr::Exp(inner) => {
                let e = inner.simplify_once();
                if e.is_zero() {
                    Expr::Const(1.0)
                } else {
                    Expr::Exp(e.boxed())
                }
            }
            Expr::Ln(inner) => {
                let e = inner.simplify_once();
                match &e {
                    Expr::Const(v) if *v == 1.0 => Expr::Const(0.0),
                    Expr::Exp(u) => u.as_ref().clone(),
                    _ => Expr::Ln(e.boxed()),
                }
            }
            Expr::sin(inner) => {
                let e = inner.simplify_once();
                if e.is_zero() {
                    Expr::Const(0.0)
                } else {
                    Expr::sin(e.boxed())
                }
            }
            Expr::cos(inner) => {
                let e = inner.simplify_once();
                if e.is_zero() {
                    Expr::Const(1.0)
                } else {
                    Expr::cos(e.boxed())
                }
            }
            Expr::tg(inner) => {
                let e = inner.simplify_once();
                if e.is_zero() {
                    Expr::Const(0.0)
                } else {
                    Expr::tg(e.boxed())
                }
            }
            Expr::ctg(inner) => Expr::ctg(inner.simplify_once().boxed()),
            Expr::arcsin(inner) => {
                let e = inner.simplify_once();
                if e.is_zero() {
                    Expr::Const(0.0)
                } else {
                    Expr::arcsin(e.boxed())
                }
            }
            Expr::arccos(inner) => Expr::arccos(inner.simplify_once().boxed()),
            Expr::arctg(inner) => {
                let e = inner.simplify_once();
                if e.is_zero() {
                    Expr::Const(0.0)
                } else {
                    Expr::arctg(e.boxed())
                }
            }
            Expr::arcctg(inner) => Expr::arcctg(inner.simplify_once().boxed()),
        }
    }
}
