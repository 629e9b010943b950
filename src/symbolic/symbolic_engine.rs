//! # Symbolic Engine Module
//!
//! Core symbolic expression type for the calculus solver. Expressions are
//! represented as an abstract syntax tree built from `Box<Expr>` nodes, which
//! the other symbolic modules extend with differentiation
//! (`symbolic_derivatives`), simplification (`symbolic_simplify`),
//! integration (`symbolic_integration`) and limit evaluation
//! (`symbolic_limits`).
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - symbolic variables like "x", "y"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, etc. - mathematical functions
//!
//! ### Key Methods
//! - `substitute_variable()` - replace a variable with another expression
//! - `set_variable()` - replace a variable with a constant value
//! - `contains_variable()` - check whether a variable occurs in the tree
//!
//! Non-standard mathematical notation (tg, ctg, arctg, arcctg) is used for
//! the tangent family; the string parser accepts the tan/cot spellings as
//! aliases.

use std::fmt;

/// Core symbolic expression enum representing mathematical expressions as an
/// abstract syntax tree. Uses Box<Expr> for recursive structures, allowing
/// arbitrarily deep expression trees.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x", "y")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function - mathematical notation 'tg'
    tg(Box<Expr>),
    /// Cotangent function - mathematical notation 'ctg'
    ctg(Box<Expr>),
    /// Arcsine function: arcsin(x)
    arcsin(Box<Expr>),
    /// Arccosine function: arccos(x)
    arccos(Box<Expr>),
    /// Arctangent function - mathematical notation 'arctg'
    arctg(Box<Expr>),
    /// Arccotangent function - mathematical notation 'arcctg'
    arcctg(Box<Expr>),
}

/// Display implementation for pretty printing symbolic expressions.
///
/// Converts expressions to human-readable mathematical notation with
/// parentheses for proper precedence.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::ctg(expr) => write!(f, "ctg({})", expr),
            Expr::arcsin(expr) => write!(f, "arcsin({})", expr),
            Expr::arccos(expr) => write!(f, "arccos({})", expr),
            Expr::arctg(expr) => write!(f, "arctg({})", expr),
            Expr::arcctg(expr) => write!(f, "arcctg({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        match self {
            Expr::Const(val) => *val == 0.0,
            _ => false,
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::ctg(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctg(expr)
            | Expr::arcctg(expr) => expr.contains_variable(var_name),
        }
    }

    /// substitute a variable with an expression
    pub fn substitute_variable(&self, var: &str, replacement: &Expr) -> Expr {
        let sub = |e: &Expr| Box::new(e.substitute_variable(var, replacement));
        match self {
            Expr::Var(name) if name == var => replacement.clone(),
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(sub(lhs), sub(rhs)),
            Expr::Sub(lhs, rhs) => Expr::Sub(sub(lhs), sub(rhs)),
            Expr::Mul(lhs, rhs) => Expr::Mul(sub(lhs), sub(rhs)),
            Expr::Div(lhs, rhs) => Expr::Div(sub(lhs), sub(rhs)),
            Expr::Pow(base, exp) => Expr::Pow(sub(base), sub(exp)),
            Expr::Exp(expr) => Expr::Exp(sub(expr)),
            Expr::Ln(expr) => Expr::Ln(sub(expr)),
            Expr::sin(expr) => Expr::sin(sub(expr)),
            Expr::cos(expr) => Expr::cos(sub(expr)),
            Expr::tg(expr) => Expr::tg(sub(expr)),
            Expr::ctg(expr) => Expr::ctg(sub(expr)),
            Expr::arcsin(expr) => Expr::arcsin(sub(expr)),
            Expr::arccos(expr) => Expr::arccos(sub(expr)),
            Expr::arctg(expr) => Expr::arctg(sub(expr)),
            Expr::arcctg(expr) => Expr::arcctg(sub(expr)),
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        self.substitute_variable(var, &Expr::Const(value))
    }
}
