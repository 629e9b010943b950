use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{
    find_char_outside_parens, find_matching_paren, find_rightmost_outside_parens, parens_balanced,
};
use log::debug;
use std::f64::consts::PI;

/// a module turns a normalized leaf string into a symbolic expression
///
/// The search splits at the rightmost +/- outside brackets, then at
/// multiplicative operators, then at ^, and finally matches function calls
/// and atoms:
//
//                  search recursion diagram
//                "y^2+exp(x)+ln(x)/y"              |
//                |       left  | right             |
//                |_________________________________|
//                |           div by last +         |
//                |_________________________________|
//                | y^2+exp(x)  |     ln(x)/y       |
//                |     |       |        |          |
//                |    \|/      |       \|/         |
//                |  div by +   |     div by /      |
//                |  etc...     |     etc...        |
//
/// Reserved names: the function table below plus the constant `pi`.
/// The set is ordered by length descending so that the longest
/// known-function-name match always wins over a shorter prefix.
pub const KNOWN_FUNCTIONS: &[&str] = &[
    "arcsin", "arccos", "arctan", "arcctg", "arccot", "arctg", "sqrt", "asin", "acos", "atan",
    "acot", "sin", "cos", "tan", "cot", "ctg", "exp", "log", "ln", "tg",
];

impl Expr {
    /// Parses a strict-notation expression string into an expression tree.
    pub fn parse_expression(input: &str) -> Result<Expr, String> {
        parse_leaf_expression(input)
    }
}

fn build_function_call(name: &str, inner: Expr) -> Result<Expr, String> {
    let inner = inner.boxed();
    let expr = match name {
        "sin" => Expr::sin(inner),
        "cos" => Expr::cos(inner),
        "tan" | "tg" => Expr::tg(inner),
        "cot" | "ctg" => Expr::ctg(inner),
        "arcsin" | "asin" => Expr::arcsin(inner),
        "arccos" | "acos" => Expr::arccos(inner),
        "arctan" | "arctg" | "atan" => Expr::arctg(inner),
        "arcctg" | "arccot" | "acot" => Expr::arcctg(inner),
        "exp" => Expr::Exp(inner),
        "ln" | "log" => Expr::Ln(inner),
        "sqrt" => Expr::Pow(inner, Expr::Const(0.5).boxed()),
        other => return Err(format!("unknown function: {}", other)),
    };
    Ok(expr)
}

// rightmost depth-zero + or - that acts as a binary operator; signs that
// directly follow another operator (or start the string) are unary
fn find_rightmost_add_sub(input: &str) -> Option<(usize, char)> {
    let mut depth = 0;
    let mut prev_significant: Option<char> = None;
    let mut found = None;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '+' | '-' if depth == 0 => {
                let binary = matches!(
                    prev_significant,
                    Some(p) if !matches!(p, '+' | '-' | '*' | '/' | '^' | '(' | ',')
                );
                if binary {
                    found = Some((i, c));
                }
            }
            _ => {}
        }
        if !c.is_whitespace() {
            prev_significant = Some(c);
        }
    }
    found
}

pub fn parse_leaf_expression(input: &str) -> Result<Expr, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty expression".to_string());
    }
    if !parens_balanced(input) {
        return Err(format!("unbalanced parentheses in: {}", input));
    }

    // addition and subtraction
    if let Some((pos, op)) = find_rightmost_add_sub(input) {
        let left = input[..pos].trim();
        let right = input[pos + 1..].trim();
        debug!("split '{}' at '{}': '{}' | '{}'", input, op, left, right);
        if right.is_empty() {
            return Err(format!("dangling '{}' in: {}", op, input));
        }
        let lhs = parse_leaf_expression(left)?;
        let rhs = parse_leaf_expression(right)?;
        return Ok(if op == '+' { lhs + rhs } else { lhs - rhs });
    }

    // constants, including signed ones
    if let Ok(value) = input.parse::<f64>() {
        return Ok(Expr::Const(value));
    }

    // unary sign over a non-constant operand
    if let Some(rest) = input.strip_prefix('-') {
        return Ok(-parse_leaf_expression(rest)?);
    }
    if let Some(rest) = input.strip_prefix('+') {
        return parse_leaf_expression(rest);
    }

    // multiplication and division
    if let Some(pos) = find_char_outside_parens(input, '*') {
        let lhs = parse_leaf_expression(&input[..pos])?;
        let rhs = parse_leaf_expression(&input[pos + 1..])?;
        return Ok(lhs * rhs);
    }
    if let Some((pos, _)) = find_rightmost_outside_parens(input, &['/']) {
        let lhs = parse_leaf_expression(&input[..pos])?;
        let rhs = parse_leaf_expression(&input[pos + 1..])?;
        return Ok(lhs / rhs);
    }

    // power, right-associative
    if let Some(pos) = find_char_outside_parens(input, '^') {
        let base = parse_leaf_expression(&input[..pos])?;
        let exponent = parse_leaf_expression(&input[pos + 1..])?;
        return Ok(base.pow(exponent));
    }

    // function calls covering the whole input, e.g. sin(...), sqrt(...)
    for &name in KNOWN_FUNCTIONS {
        if let Some(rest) = input.strip_prefix(name) {
            if rest.starts_with('(') && find_matching_paren(input, name.len()) == Some(input.len() - 1)
            {
                let inner = parse_leaf_expression(&input[name.len() + 1..input.len() - 1])?;
                return build_function_call(name, inner);
            }
        }
    }

    // reserved constants and variables
    if input == "pi" {
        return Ok(Expr::Const(PI));
    }
    if input.chars().all(char::is_alphanumeric) {
        if input.starts_with(char::is_alphabetic) {
            return Ok(Expr::Var(input.to_string()));
        }
        return Err(format!("invalid expression: {}", input));
    }

    // expression that is all in brackets
    if input.starts_with('(') && find_matching_paren(input, 0) == Some(input.len() - 1) {
        return parse_leaf_expression(&input[1..input.len() - 1]);
    }

    // name(...) heads that survived to this point are not in the table
    if input.ends_with(')') {
        if let Some(k) = input.find('(') {
            let head = &input[..k];
            if !head.is_empty() && head.chars().all(char::is_alphabetic) {
                return Err(format!("unknown function: {}", head));
            }
        }
    }

    Err(format!("invalid expression: {}", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_constant() {
        let expr = parse_leaf_expression("42").unwrap();
        assert_eq!(expr, Expr::Const(42.0));
    }

    #[test]
    fn test_parse_variable() {
        let expr = parse_leaf_expression("x").unwrap();
        assert_eq!(expr, Expr::Var("x".to_string()));
    }

    #[test]
    fn test_parse_addition() {
        let expr = parse_leaf_expression("x + 2").unwrap();
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_subtraction_left_associative() {
        let expr = parse_leaf_expression("x - 1 - 2").unwrap();
        let x = Expr::Var("x".to_string());
        assert_eq!(expr, (x - Expr::Const(1.0)) - Expr::Const(2.0));
    }

    #[test]
    fn test_parse_multiplication() {
        let expr = parse_leaf_expression("x * 2").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_power() {
        let expr = parse_leaf_expression("x^2").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_negative_exponent() {
        let expr = parse_leaf_expression("x^-2").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(-2.0))
            )
        );
    }

    #[test]
    fn test_parse_unary_minus() {
        let expr = parse_leaf_expression("-x").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Var("x".to_string()))
            )
        );
    }

    #[test]
    fn test_parse_sin() {
        let expr = parse_leaf_expression("sin(x)").unwrap();
        assert_eq!(expr, Expr::sin(Box::new(Expr::Var("x".to_string()))));
    }

    #[test]
    fn test_parse_tan_alias() {
        let expr = parse_leaf_expression("tan(x)").unwrap();
        assert_eq!(expr, Expr::tg(Box::new(Expr::Var("x".to_string()))));
    }

    #[test]
    fn test_parse_sqrt_as_power() {
        let expr = parse_leaf_expression("sqrt(x)").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(0.5))
            )
        );
    }

    #[test]
    fn test_parse_nested_trig() {
        let expr = parse_leaf_expression("sin(cos(x))").unwrap();
        assert_eq!(
            expr,
            Expr::sin(Box::new(Expr::cos(Box::new(Expr::Var("x".to_string())))))
        );
    }

    #[test]
    fn test_parse_expression_with_brackets() {
        let expr = parse_leaf_expression("(x + y) * z").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Add(
                    Box::new(Expr::Var("x".to_string())),
                    Box::new(Expr::Var("y".to_string()))
                )),
                Box::new(Expr::Var("z".to_string()))
            )
        );
    }

    #[test]
    fn test_parse_pi() {
        let expr = parse_leaf_expression("pi").unwrap();
        assert_eq!(expr, Expr::Const(std::f64::consts::PI));
    }

    #[test]
    fn test_unmatched_brackets() {
        assert!(parse_leaf_expression("(x + y").is_err());
    }

    #[test]
    fn test_unknown_function() {
        let err = parse_leaf_expression("foo(x)").unwrap_err();
        assert!(err.contains("unknown function"));
    }

    #[test]
    fn test_invalid_expression() {
        assert!(parse_leaf_expression("(x +").is_err());
    }
}
