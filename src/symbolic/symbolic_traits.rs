// SYMBOLIC TRAITS //////////////////////////////////////////////////////////////////
// This module contains the engine trait the solver dispatches through.
// The trait is implemented for the native engine below;
// add other engines here as needed

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_limits::{LimitPoint, LimitSide};

/// A black-box calculus backend. The solver only talks to this trait,
/// so the native engine can be swapped out for an external CAS.
pub trait SymbolicEngine {
    /// Parses a plain arithmetic expression (no calculus operators) into
    /// the engine's internal form.
    fn parse_expression(&self, input: &str) -> Result<Expr, String>;
    /// d^order/d{var}^order of `expr`.
    fn differentiate(&self, expr: &Expr, var: &str, order: u32) -> Result<Expr, String>;
    /// Indefinite integral of `expr` with respect to `var`.
    fn integrate(&self, expr: &Expr, var: &str) -> Result<Expr, String>;
    /// Definite integral of `expr` over [lower, upper]; the bounds may be
    /// symbolic expressions themselves.
    fn integrate_definite(
        &self,
        expr: &Expr,
        var: &str,
        lower: &Expr,
        upper: &Expr,
    ) -> Result<Expr, String>;
    /// Limit of `expr` as `var` approaches `point` from `side`.
    fn limit(
        &self,
        expr: &Expr,
        var: &str,
        point: &LimitPoint,
        side: LimitSide,
    ) -> Result<Expr, String>;
    /// Renders an engine expression back into display notation.
    fn render(&self, expr: &Expr) -> String;
}

///////////////// IMPLEMENTATION OF THE TRAIT FOR THE NATIVE ENGINE /////////////////////////

/// The built-in engine backed by the `Expr` tree in this crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeEngine;

impl SymbolicEngine for NativeEngine {
    fn parse_expression(&self, input: &str) -> Result<Expr, String> {
        Expr::parse_expression(input)
    }
    fn differentiate(&self, expr: &Expr, var: &str, order: u32) -> Result<Expr, String> {
        if order == 0 {
            return Err("derivative order must be at least 1".to_string());
        }
        Ok(expr.nth_derivative(var, order as usize))
    }
    fn integrate(&self, expr: &Expr, var: &str) -> Result<Expr, String> {
        expr.integrate(var)
    }
    fn integrate_definite(
        &self,
        expr: &Expr,
        var: &str,
        lower: &Expr,
        upper: &Expr,
    ) -> Result<Expr, String> {
        expr.definite_integrate(var, lower, upper)
    }
    fn limit(
        &self,
        expr: &Expr,
        var: &str,
        point: &LimitPoint,
        side: LimitSide,
    ) -> Result<Expr, String> {
        expr.limit(var, point, side)
    }
    fn render(&self, expr: &Expr) -> String {
        expr.to_string()
    }
}
