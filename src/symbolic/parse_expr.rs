//! Recursive-descent parser turning an expression string into an `Expr` tree.
//!
//! The grammar is intentionally small: binary `+ - * / **` (the surface `**`
//! is normalized to `^` internally), parentheses, unary sign, float literals
//! (including scientific notation), identifiers, and the fixed function set
//! `sin cos tan arcsin arccos arctan sqrt`. Anything else is a syntax error.
//!
//! Splitting strategy: each fragment is split at the rightmost depth-zero
//! binary `+`/`-`, then at the rightmost `*`/`/`, then at the leftmost `^`,
//! which yields left-associative addition and multiplication and a
//! right-associative power.

use crate::symbolic::errors::EnvError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{
    find_leftmost_operator_outside_brackets, find_pair_to_this_bracket,
    find_rightmost_binary_operator,
};

/// Allow-list of named functions, longest prefix first so that `arcsin(x)`
/// does not parse as `sin` applied to garbage.
const FUNCTIONS: [(&str, fn(Box<Expr>) -> Expr); 7] = [
    ("arcsin", Expr::arcsin),
    ("arccos", Expr::arccos),
    ("arctan", Expr::arctan),
    ("sqrt", Expr::sqrt),
    ("sin", Expr::sin),
    ("cos", Expr::cos),
    ("tan", Expr::tan),
];

/// Parses an expression string into an `Expr` tree.
pub fn parse_expression_str(input: &str) -> Result<Expr, EnvError> {
    let normalized = input.replace("**", "^");
    parse_fragment(&normalized).map_err(EnvError::ExpressionSyntax)
}

fn parse_fragment(input: &str) -> Result<Expr, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty (sub)expression".to_string());
    }

    // additive level, rightmost split keeps left associativity
    if let Some((pos, op)) = find_rightmost_binary_operator(input, &['+', '-']) {
        let left = parse_fragment(&input[..pos])?;
        let right = parse_fragment(&input[pos + 1..])?;
        return Ok(match op {
            '+' => Expr::Add(left.boxed(), right.boxed()),
            _ => Expr::Sub(left.boxed(), right.boxed()),
        });
    }

    // unary sign prefix
    if let Some(rest) = input.strip_prefix('-') {
        let inner = parse_fragment(rest)?;
        return Ok(Expr::Mul(Expr::Const(-1.0).boxed(), inner.boxed()));
    }
    if let Some(rest) = input.strip_prefix('+') {
        return parse_fragment(rest);
    }

    // multiplicative level
    if let Some((pos, op)) = find_rightmost_binary_operator(input, &['*', '/']) {
        let left = parse_fragment(&input[..pos])?;
        let right = parse_fragment(&input[pos + 1..])?;
        return Ok(match op {
            '*' => Expr::Mul(left.boxed(), right.boxed()),
            _ => Expr::Div(left.boxed(), right.boxed()),
        });
    }

    // power level, leftmost split keeps right associativity
    if let Some(pos) = find_leftmost_operator_outside_brackets(input, '^') {
        let base = parse_fragment(&input[..pos])?;
        let exp = parse_fragment(&input[pos + 1..])?;
        return Ok(Expr::Pow(base.boxed(), exp.boxed()));
    }

    // named functions
    for (name, constructor) in FUNCTIONS {
        if let Some(rest) = input.strip_prefix(name) {
            if rest.starts_with('(') {
                let open = name.len();
                match find_pair_to_this_bracket(input, open) {
                    Some(close) if close == input.len() - 1 => {
                        let inner = parse_fragment(&input[open + 1..close])?;
                        return Ok(constructor(inner.boxed()));
                    }
                    _ => return Err(format!("unbalanced brackets in '{}'", input)),
                }
            }
        }
    }

    // numeric literal
    if let Ok(value) = input.parse::<f64>() {
        return Ok(Expr::Const(value));
    }

    // identifier
    if is_identifier(input) {
        return Ok(Expr::Var(input.to_string()));
    }

    // fully bracketed subexpression
    if input.starts_with('(') {
        match find_pair_to_this_bracket(input, 0) {
            Some(close) if close == input.len() - 1 => {
                return parse_fragment(&input[1..close]);
            }
            _ => return Err(format!("unbalanced brackets in '{}'", input)),
        }
    }

    Err(format!("unrecognized token '{}'", input))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_constant() {
        assert_eq!(parse_expression_str("42").unwrap(), Expr::Const(42.0));
        assert_eq!(parse_expression_str("1e-3").unwrap(), Expr::Const(1e-3));
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(
            parse_expression_str("OMEGA_0").unwrap(),
            Expr::Var("OMEGA_0".to_string())
        );
    }

    #[test]
    fn test_precedence() {
        let expr = parse_expression_str("a + b*c").unwrap();
        assert_eq!(format!("{}", expr), "(a + (b * c))");

        let expr = parse_expression_str("a - b - c").unwrap();
        assert_eq!(format!("{}", expr), "((a - b) - c)");
    }

    #[test]
    fn test_double_star_power() {
        let expr = parse_expression_str("x**2 + 1").unwrap();
        assert_eq!(format!("{}", expr), "((x ^ 2) + 1)");
    }

    #[test]
    fn test_power_right_associative() {
        let expr = parse_expression_str("2^3^2").unwrap();
        assert_eq!(format!("{}", expr), "(2 ^ (3 ^ 2))");
    }

    #[test]
    fn test_unary_minus() {
        // the sign binds the whole multiplicative fragment
        let expr = parse_expression_str("-F0*sin(t)").unwrap();
        assert_eq!(format!("{}", expr), "(-1 * (F0 * sin(t)))");

        let expr = parse_expression_str("a + -b").unwrap();
        assert_eq!(format!("{}", expr), "(a + (-1 * b))");
    }

    #[test]
    fn test_functions() {
        let expr = parse_expression_str("arctan(c/sqrt(m*k))").unwrap();
        assert_eq!(format!("{}", expr), "arctan((c / sqrt((m * k))))");
    }

    #[test]
    fn test_brackets() {
        let expr = parse_expression_str("(a + b) * c").unwrap();
        assert_eq!(format!("{}", expr), "((a + b) * c)");
    }

    #[test]
    fn test_multibyte_identifiers() {
        let expr = parse_expression_str("θ*t").unwrap();
        assert_eq!(format!("{}", expr), "(θ * t)");

        let expr = parse_expression_str("sin(ω*t) + φ").unwrap();
        assert_eq!(format!("{}", expr), "(sin((ω * t)) + φ)");
    }

    #[test]
    fn test_unknown_function_rejected() {
        // "log" is not in the function set, and "log(x)" is not an identifier
        assert!(matches!(
            parse_expression_str("log(x)"),
            Err(EnvError::ExpressionSyntax(_))
        ));
    }

    #[test]
    fn test_unbalanced_brackets() {
        assert!(matches!(
            parse_expression_str("sin(x"),
            Err(EnvError::ExpressionSyntax(_))
        ));
        assert!(matches!(
            parse_expression_str("(a+b"),
            Err(EnvError::ExpressionSyntax(_))
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_expression_str("").is_err());
        assert!(parse_expression_str("a + ").is_err());
    }
}
