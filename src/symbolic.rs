/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedCalcSolver::symbolic::symbolic_engine::Expr;
/// let input = "x^2 + sin(x)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// the expression tree itself: variants for variables, constants, the four
/// arithmetic operations, powers and the elementary functions, with operator
/// overloads and variable substitution
///# Example#
/// ```
/// use RustedCalcSolver::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let f = x.clone() * x + Expr::Const(1.0);
/// println!("f = {}", f);
/// ```
pub mod symbolic_engine;
///____________________________________________________________________________________________________________________________
/// # Symbolic derivatives
/// analytic differentiation of the expression tree, plus numeric evaluation
///# Example#
/// ```
/// use RustedCalcSolver::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("x^3").unwrap();
/// let df = f.diff("x").simplify();
/// println!("df/dx = {}", df);
/// ```
pub mod symbolic_derivatives;
///____________________________________________________________________________________________________________________________
/// # Symbolic integration
/// table-and-rule based antiderivatives and definite integrals with
/// possibly symbolic bounds
pub mod symbolic_integration;
///____________________________________________________________________________________________________________________________
/// # Symbolic limits
/// limit evaluation: substitution, L'Hôpital's rule and one-sided
/// numeric probing, including limits at plus or minus infinity
pub mod symbolic_limits;
///____________________________________________________________________________________________________________________________
/// # Symbolic simplify
/// constant folding and algebraic identities, applied to a fixpoint
pub mod symbolic_simplify;
///____________________________________________________________________________________________________________________________
/// # Symbolic traits
/// the `SymbolicEngine` trait the solver dispatches through, and the
/// native implementation backed by this crate's `Expr`
pub mod symbolic_traits;
///____________________________________________________________________________________________________________________________
/// small helpers for scanning parenthesized text
pub mod utils;
