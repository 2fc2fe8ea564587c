//! Vectorized numeric evaluation of `Expr` trees.
//!
//! A `Value` is either a scalar or a column vector; every binary operation
//! broadcasts a scalar against a vector elementwise, and two vectors combine
//! elementwise when their lengths agree. All arithmetic is plain IEEE double
//! precision, so division by zero yields inf/nan rather than an error.

use crate::symbolic::errors::EnvError;
use crate::symbolic::symbolic_engine::Expr;
use nalgebra::DVector;
use std::collections::HashMap;

/// Scalar-or-vector numeric value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Vector(DVector<f64>),
}

impl Value {
    /// Applies a unary function elementwise.
    pub fn map(&self, f: fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(x) => Value::Scalar(f(*x)),
            Value::Vector(v) => Value::Vector(v.map(f)),
        }
    }

    fn zip_with(&self, rhs: &Value, f: fn(f64, f64) -> f64) -> Result<Value, EnvError> {
        match (self, rhs) {
            (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(f(*a, *b))),
            (Value::Scalar(a), Value::Vector(b)) => Ok(Value::Vector(b.map(|x| f(*a, x)))),
            (Value::Vector(a), Value::Scalar(b)) => Ok(Value::Vector(a.map(|x| f(x, *b)))),
            (Value::Vector(a), Value::Vector(b)) => {
                if a.len() != b.len() {
                    return Err(EnvError::ShapeMismatch {
                        expected: a.len(),
                        found: b.len(),
                    });
                }
                Ok(Value::Vector(a.zip_map(b, f)))
            }
        }
    }

    pub fn add(&self, rhs: &Value) -> Result<Value, EnvError> {
        self.zip_with(rhs, |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Value) -> Result<Value, EnvError> {
        self.zip_with(rhs, |a, b| a - b)
    }

    pub fn mul(&self, rhs: &Value) -> Result<Value, EnvError> {
        self.zip_with(rhs, |a, b| a * b)
    }

    pub fn div(&self, rhs: &Value) -> Result<Value, EnvError> {
        self.zip_with(rhs, |a, b| a / b)
    }

    pub fn pow(&self, rhs: &Value) -> Result<Value, EnvError> {
        self.zip_with(rhs, f64::powf)
    }

    /// Materializes the value as a vector of length `len`. A scalar is
    /// repeated; a vector must already have that length.
    pub fn broadcast_to(&self, len: usize) -> Result<DVector<f64>, EnvError> {
        match self {
            Value::Scalar(x) => Ok(DVector::from_element(len, *x)),
            Value::Vector(v) => {
                if v.len() != len {
                    return Err(EnvError::ShapeMismatch {
                        expected: len,
                        found: v.len(),
                    });
                }
                Ok(v.clone())
            }
        }
    }

    /// First element, for results known to be effectively scalar.
    pub fn first(&self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(*x),
            Value::Vector(v) => v.iter().next().copied(),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(x)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Vector(DVector::from_vec(v))
    }
}

impl From<DVector<f64>> for Value {
    fn from(v: DVector<f64>) -> Self {
        Value::Vector(v)
    }
}

impl Expr {
    /// Evaluates the tree against a scope of named values. Every identifier
    /// must be present in the scope; an absent one fails with
    /// `UnresolvedReference`.
    pub fn eval_vectorized(&self, scope: &HashMap<String, Value>) -> Result<Value, EnvError> {
        match self {
            Expr::Var(name) => scope
                .get(name)
                .cloned()
                .ok_or_else(|| EnvError::UnresolvedReference(name.clone())),
            Expr::Const(x) => Ok(Value::Scalar(*x)),
            Expr::Add(lhs, rhs) => lhs.eval_vectorized(scope)?.add(&rhs.eval_vectorized(scope)?),
            Expr::Sub(lhs, rhs) => lhs.eval_vectorized(scope)?.sub(&rhs.eval_vectorized(scope)?),
            Expr::Mul(lhs, rhs) => lhs.eval_vectorized(scope)?.mul(&rhs.eval_vectorized(scope)?),
            Expr::Div(lhs, rhs) => lhs.eval_vectorized(scope)?.div(&rhs.eval_vectorized(scope)?),
            Expr::Pow(base, exp) => base
                .eval_vectorized(scope)?
                .pow(&exp.eval_vectorized(scope)?),
            Expr::sin(e) => Ok(e.eval_vectorized(scope)?.map(f64::sin)),
            Expr::cos(e) => Ok(e.eval_vectorized(scope)?.map(f64::cos)),
            Expr::tan(e) => Ok(e.eval_vectorized(scope)?.map(f64::tan)),
            Expr::arcsin(e) => Ok(e.eval_vectorized(scope)?.map(f64::asin)),
            Expr::arccos(e) => Ok(e.eval_vectorized(scope)?.map(f64::acos)),
            Expr::arctan(e) => Ok(e.eval_vectorized(scope)?.map(f64::atan)),
            Expr::sqrt(e) => Ok(e.eval_vectorized(scope)?.map(f64::sqrt)),
        }
    }
}
