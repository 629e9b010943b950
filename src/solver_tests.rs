use crate::solver::{solve, solve_with_engine, ErrorKind, SolverError};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_limits::{LimitPoint, LimitSide};
use crate::symbolic::symbolic_traits::{NativeEngine, SymbolicEngine};
use simplelog::{Config, LevelFilter, SimpleLogger};
use std::cell::Cell;
use strum::IntoEnumIterator;

// the expected strings below are rendered the same way the solver renders,
// so the assertions do not depend on the exact display format
fn rendered(input: &str) -> String {
    Expr::parse_expression(input).unwrap().simplify().to_string()
}

#[test]
fn test_plain_expression_has_no_steps() {
    let solution = solve("2x + 1").unwrap();
    assert_eq!(solution.result, rendered("2*x + 1"));
    assert!(solution.steps.is_empty());
}

#[test]
fn test_derivative_of_loose_notation() {
    let _ = SimpleLogger::init(LevelFilter::Debug, Config::default());
    let solution = solve("d/dx(x^2)").unwrap();
    assert_eq!(solution.result, rendered("2*x"));
    assert_eq!(solution.steps.len(), 1);
    assert!(solution.steps[0].starts_with("d/dx"));
}

#[test]
fn test_second_derivative() {
    let solution = solve("d^2/dx^2(x^3)").unwrap();
    assert_eq!(solution.result, rendered("6*x"));
}

#[test]
fn test_squared_shorthand() {
    let a = solve("d²/dx²(x^3)").unwrap();
    let b = solve("d^2/dx^2(x^3)").unwrap();
    assert_eq!(a.result, b.result);
}

#[test]
fn test_indefinite_integral() {
    let solution = solve("∫x^2 dx").unwrap();
    assert_eq!(solution.result, rendered("x^3/3"));
}

#[test]
fn test_definite_integral() {
    let solution = solve("∫(0,3)(2x)dx").unwrap();
    assert_eq!(solution.result, "9");
}

#[test]
fn test_limit_two_sided() {
    let solution = solve("lim(x->0)(sin(x)/x)").unwrap();
    assert_eq!(solution.result, "1");
}

#[test]
fn test_limit_at_infinity() {
    let solution = solve("lim(x->oo)(1/x)").unwrap();
    assert_eq!(solution.result, "0");
}

#[test]
fn test_nested_operators_report_steps_innermost_first() {
    let solution = solve("∫(d/dx(x^2)) dx").unwrap();
    assert_eq!(solution.steps.len(), 2);
    assert!(solution.steps[0].starts_with("d/dx"));
    assert!(solution.steps[1].starts_with("∫"));
    assert_eq!(solution.result, rendered("x^2"));
}

#[test]
fn test_derivative_of_integral() {
    let solution = solve("d/dx(∫x^2 dx)").unwrap();
    assert_eq!(solution.steps.len(), 2);
    assert!(solution.steps[0].starts_with("∫"));
    assert!(solution.steps[1].starts_with("d/dx"));
    assert_eq!(solution.result, rendered("x^2"));
}

#[test]
fn test_limit_point_as_expression() {
    let solution = solve("lim(x->(1+2))(x^2)").unwrap();
    assert_eq!(solution.result, "9");
}

#[test]
fn test_limit_of_derivative() {
    let solution = solve("lim(x->0)(d/dx(x^3))").unwrap();
    assert_eq!(solution.result, "0");
}

#[test]
fn test_unbalanced_parens() {
    let err = solve("2x + (").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedInput);
}

#[test]
fn test_order_mismatch() {
    let err = solve("d^2/dx^3(x)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedInput);
}

#[test]
fn test_missing_differential() {
    let err = solve("∫x^2").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedInput);
}

#[test]
fn test_unknown_function() {
    let err = solve("foo(x)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownFunction);
    assert_eq!(err.offending.as_deref(), Some("foo"));
}

#[test]
fn test_unparsable_leaf() {
    let err = solve("x + * 2").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnparsableExpression);
}

#[test]
fn test_error_display_names_the_kind() {
    let err = solve("2x + (").unwrap_err();
    assert!(format!("{}", err).starts_with("MalformedInput"));
}

#[test]
fn test_error_kinds_are_exhaustive() {
    assert_eq!(ErrorKind::iter().count(), 4);
}

// an engine whose derivative always fails, to show that evaluation stops at
// the first failing node and never dispatches the nodes above it
struct FailingDerivativeEngine {
    limit_calls: Cell<u32>,
}

impl SymbolicEngine for FailingDerivativeEngine {
    fn parse_expression(&self, input: &str) -> Result<Expr, String> {
        NativeEngine.parse_expression(input)
    }
    fn differentiate(&self, _expr: &Expr, _var: &str, _order: u32) -> Result<Expr, String> {
        Err("derivative backend unavailable".to_string())
    }
    fn integrate(&self, expr: &Expr, var: &str) -> Result<Expr, String> {
        NativeEngine.integrate(expr, var)
    }
    fn integrate_definite(
        &self,
        expr: &Expr,
        var: &str,
        lower: &Expr,
        upper: &Expr,
    ) -> Result<Expr, String> {
        NativeEngine.integrate_definite(expr, var, lower, upper)
    }
    fn limit(
        &self,
        expr: &Expr,
        var: &str,
        point: &LimitPoint,
        side: LimitSide,
    ) -> Result<Expr, String> {
        self.limit_calls.set(self.limit_calls.get() + 1);
        NativeEngine.limit(expr, var, point, side)
    }
    fn render(&self, expr: &Expr) -> String {
        NativeEngine.render(expr)
    }
}

#[test]
fn test_evaluation_is_fail_fast() {
    let engine = FailingDerivativeEngine {
        limit_calls: Cell::new(0),
    };
    let err = solve_with_engine("lim(x->0)(d/dx(x^2))", &engine).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ComputationFailed);
    assert_eq!(engine.limit_calls.get(), 0);
}

#[test]
fn test_solver_error_carries_message() {
    let err = SolverError::unparsable("@@", "invalid expression");
    assert!(err.message.contains("@@"));
    assert_eq!(err.offending.as_deref(), Some("@@"));
}
