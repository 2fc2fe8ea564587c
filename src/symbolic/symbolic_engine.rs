//! # Symbolic Engine Module
//!
//! The core symbolic expression type of the crate. An expression string such
//! as `F0*cos(theta*t)/sqrt(m)` is parsed once into an `Expr` tree and then
//! evaluated against a scope of resolved constant values (see
//! `symbolic_eval`). The tree is deliberately restricted to the arithmetic
//! operators `+ - * / **`, parentheses, unary minus and a fixed allow-list of
//! named functions: `sin, cos, tan, arcsin, arccos, arctan, sqrt`. There is no
//! runtime code execution anywhere.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - named constants and the independent variable
//! - **Constants**: `Const(f64)` - numerical literals
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow`
//! - **Functions**: `sin`, `cos`, `tan`, `arcsin`, `arccos`, `arctan`, `sqrt`
//!
//! ### Key Methods
//! - `parse_expression(input)` - parse a string into a tree
//! - `extract_variables()` - free identifiers in first-appearance order
//! - `eval_vectorized(scope)` - broadcastable numeric evaluation

#![allow(non_camel_case_types)]

use crate::symbolic::errors::EnvError;
use crate::symbolic::parse_expr::parse_expression_str;
use std::fmt;

/// Symbolic expression tree. Uses Box<Expr> for nested expressions, enabling
/// arbitrarily deep structures.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Named identifier, bound at evaluation time
    Var(String),
    /// Numerical literal
    Const(f64),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    /// Power operation, written `**` in the surface syntax
    Pow(Box<Expr>, Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    tan(Box<Expr>),
    arcsin(Box<Expr>),
    arccos(Box<Expr>),
    arctan(Box<Expr>),
    sqrt(Box<Expr>),
}

/// Pretty printing with explicit parentheses for precedence.
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
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tan(expr) => write!(f, "tan({})", expr),
            Expr::arcsin(expr) => write!(f, "arcsin({})", expr),
            Expr::arccos(expr) => write!(f, "arccos({})", expr),
            Expr::arctan(expr) => write!(f, "arctan({})", expr),
            Expr::sqrt(expr) => write!(f, "sqrt({})", expr),
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
    /// Parses an expression string into a tree.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("F0*cos(theta*t)/sqrt(m)").unwrap();
    /// println!("parsed: {}", expr);
    /// ```
    pub fn parse_expression(input: &str) -> Result<Expr, EnvError> {
        parse_expression_str(input)
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
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
            Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tan(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctan(expr)
            | Expr::sqrt(expr) => expr.contains_variable(var_name),
        }
    }

    /// Free identifiers of the expression, in first-appearance order and
    /// without duplicates.
    pub fn extract_variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, out: &mut Vec<String>) {
        match self {
            Expr::Var(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Expr::Const(_) => {}
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.collect_variables(out);
                right.collect_variables(out);
            }
            Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tan(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctan(expr)
            | Expr::sqrt(expr) => expr.collect_variables(out),
        }
    }
}
