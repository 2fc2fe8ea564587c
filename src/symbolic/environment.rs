//! # Environment Module
//!
//! A shared, insertion-ordered store of named constants plus a registry of
//! symbolic functions defined over those constants. This is the heart of the
//! crate: a model is written as a handful of constants (some literal, some
//! expression strings over earlier constants) and a set of functions of the
//! independent variable `t`, all looking at the same live store.
//!
//! ## Main Structures
//! - `ConstValue` - a constant's payload: scalar, array, or expression string
//! - `ConstantStore` - insertion-ordered name -> `ConstValue` mapping
//! - `Environment` - one shared `ConstantStore` plus named `Func`s
//! - `Func` - a parsed expression with a private snapshot and a live handle
//!   back to the environment's constants
//!
//! ## Usage
//! ```rust, ignore
//! let mut env = Environment::named("oscillator");
//! env.set_constants(constants![m = 1.0, k = 4.0, OMEGA = "sqrt(k/m)"]);
//! let x = env.new_function("cos(OMEGA*t)", Some("x")).unwrap();
//! let result = x.eval(&DVector::from_vec(vec![0.0, 0.1, 0.2])).unwrap();
//! ```
//!
//! Constants declared as expression strings are resolved in insertion order
//! on every call, so `OMEGA` above tracks later changes to `k` and `m`.

use crate::symbolic::errors::EnvError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_eval::Value;
use log::warn;
use nalgebra::DVector;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Payload of a named constant.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Scalar(f64),
    Array(DVector<f64>),
    /// An expression over constants declared earlier, resolved at call time.
    Expr(String),
}

impl From<f64> for ConstValue {
    fn from(x: f64) -> Self {
        ConstValue::Scalar(x)
    }
}

impl From<i32> for ConstValue {
    fn from(x: i32) -> Self {
        ConstValue::Scalar(x as f64)
    }
}

impl From<&str> for ConstValue {
    fn from(s: &str) -> Self {
        ConstValue::Expr(s.to_string())
    }
}

impl From<String> for ConstValue {
    fn from(s: String) -> Self {
        ConstValue::Expr(s)
    }
}

impl From<Vec<f64>> for ConstValue {
    fn from(v: Vec<f64>) -> Self {
        ConstValue::Array(DVector::from_vec(v))
    }
}

impl From<DVector<f64>> for ConstValue {
    fn from(v: DVector<f64>) -> Self {
        ConstValue::Array(v)
    }
}

/// Keyword-argument style construction of constant lists:
/// `constants![m = 1.0, k = 4.0, OMEGA = "sqrt(k/m)"]`.
#[macro_export]
macro_rules! constants {
    ($($name:ident = $value:expr),* $(,)?) => {
        vec![$((
            stringify!($name).to_string(),
            $crate::symbolic::environment::ConstValue::from($value)
        )),*]
    };
}

/// Insertion-ordered mapping from constant names to values. Overwriting an
/// existing name keeps its original position; new names append at the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantStore {
    order: Vec<String>,
    values: HashMap<String, ConstValue>,
}

impl ConstantStore {
    pub fn new() -> Self {
        ConstantStore {
            order: Vec::new(),
            values: HashMap::new(),
        }
    }

    pub fn set(&mut self, name: &str, value: ConstValue) {
        if !self.values.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.values.insert(name.to_string(), value);
    }

    pub fn set_many(&mut self, pairs: Vec<(String, ConstValue)>) {
        for (name, value) in pairs {
            self.set(&name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&ConstValue> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Result<ConstValue, EnvError> {
        let value = self
            .values
            .remove(name)
            .ok_or_else(|| EnvError::KeyNotFound(name.to_string()))?;
        self.order.retain(|n| n != name);
        Ok(value)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.values.clear();
    }

    /// Merges every entry of `other` into `self`, in `other`'s order.
    pub fn merge_from(&mut self, other: &ConstantStore) {
        for (name, value) in other.iter() {
            self.set(name, value.clone());
        }
    }

    /// Iterates the constants in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConstValue)> {
        self.order.iter().map(move |name| (name, &self.values[name]))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Resolves every constant in insertion order into an evaluation scope.
    /// Expression-string constants are parsed and evaluated against the scope
    /// built so far, so they may only reference names declared earlier.
    fn resolve(&self) -> Result<HashMap<String, Value>, EnvError> {
        let mut scope: HashMap<String, Value> = HashMap::new();
        for (name, value) in self.iter() {
            let resolved = match value {
                ConstValue::Scalar(x) => Value::Scalar(*x),
                ConstValue::Array(v) => Value::Vector(v.clone()),
                ConstValue::Expr(body) => {
                    let parsed = Expr::parse_expression(body)?;
                    parsed.eval_vectorized(&scope)?
                }
            };
            scope.insert(name.clone(), resolved);
        }
        Ok(scope)
    }
}

/// The live handle handed out by `Environment::get_constants`. Mutations made
/// through any clone of the handle are visible to every holder.
pub type SharedConstants = Rc<RefCell<ConstantStore>>;

/// A named set of shared constants plus a registry of symbolic functions.
pub struct Environment {
    pub name: Option<String>,
    constants: SharedConstants,
    functions: HashMap<String, Rc<Func>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            name: None,
            constants: Rc::new(RefCell::new(ConstantStore::new())),
            functions: HashMap::new(),
        }
    }

    pub fn named(name: &str) -> Self {
        let mut env = Environment::new();
        env.name = Some(name.to_string());
        env
    }

    pub fn with_constants(pairs: Vec<(String, ConstValue)>) -> Self {
        let mut env = Environment::new();
        env.set_constants(pairs);
        env
    }

    /// Builds an environment around an existing store snapshot. Together with
    /// `constants_snapshot` this gives the copy-construction idiom: a new
    /// environment seeded with another's current constants, sharing nothing.
    pub fn from_store(store: &ConstantStore) -> Self {
        let env = Environment::new();
        env.constants.borrow_mut().merge_from(store);
        env
    }

    /// Merges `pairs` into the shared store. Overwriting keeps the original
    /// position; expression strings are not validated here, only at call time.
    pub fn set_constants(&mut self, pairs: Vec<(String, ConstValue)>) {
        self.constants.borrow_mut().set_many(pairs);
    }

    /// The live store handle. Every function created from this environment
    /// holds a clone of it, which is how later `set_constants` calls reach
    /// functions constructed earlier.
    pub fn get_constants(&self) -> SharedConstants {
        Rc::clone(&self.constants)
    }

    /// Deep copy of the current constants, for the save/sweep/restore idiom.
    pub fn constants_snapshot(&self) -> ConstantStore {
        self.constants.borrow().clone()
    }

    /// Replaces the contents of the shared store. The store itself stays the
    /// same allocation, so functions holding the handle see the restored
    /// values immediately.
    pub fn restore_constants(&mut self, store: ConstantStore) {
        *self.constants.borrow_mut() = store;
    }

    pub fn clear_constants(&mut self) {
        self.constants.borrow_mut().clear();
    }

    /// Removes the named constants. Fails with `KeyNotFound` at the first
    /// absent name; names removed before the failure stay removed.
    pub fn pop_constants(&mut self, names: &[&str]) -> Result<(), EnvError> {
        let mut store = self.constants.borrow_mut();
        for name in names {
            store.remove(name)?;
        }
        Ok(())
    }

    /// Creates a function over this environment's constants. A `Some(name)`
    /// registers it in the function registry; `None` returns it untracked.
    /// Registering the same expression body under a second name is legal but
    /// logged, since it usually means a copy-paste slip.
    pub fn new_function(
        &mut self,
        expression: &str,
        name: Option<&str>,
    ) -> Result<Rc<Func>, EnvError> {
        if let Some(existing) = self.find_duplicate(expression) {
            warn!(
                "expression '{}' is already registered as '{}'",
                expression, existing
            );
        }
        let func = Rc::new(Func::new(expression, self.get_constants())?);
        if let Some(name) = name {
            self.functions.insert(name.to_string(), Rc::clone(&func));
        }
        Ok(func)
    }

    pub fn get_function(&self, name: &str) -> Result<Rc<Func>, EnvError> {
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| EnvError::KeyNotFound(name.to_string()))
    }

    pub fn functions(&self) -> &HashMap<String, Rc<Func>> {
        &self.functions
    }

    /// Name of an already registered function with the same expression body.
    pub fn find_duplicate(&self, expression: &str) -> Option<&str> {
        self.functions
            .iter()
            .find(|(_, func)| func.expression() == expression)
            .map(|(name, _)| name.as_str())
    }

    pub fn print_functions(&self) {
        for (name, func) in &self.functions {
            println!("{}: {}", name, func);
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

/// A symbolic function of the independent variable `t`.
///
/// Holds the expression body parsed once at construction, a private snapshot
/// of the constants it was built with, and a live handle to its environment's
/// store. Every call refreshes the snapshot from the environment first, so
/// environment-level changes always win over stale construction-time values;
/// call-time overrides in turn win over everything.
pub struct Func {
    expression: String,
    parsed: Expr,
    local: RefCell<ConstantStore>,
    env: SharedConstants,
}

impl Func {
    /// Parses `expression` and snapshots the current environment constants.
    /// Malformed bodies fail here, not at call time.
    pub fn new(expression: &str, env: SharedConstants) -> Result<Self, EnvError> {
        let parsed = Expr::parse_expression(expression)?;
        let local = env.borrow().clone();
        Ok(Func {
            expression: expression.to_string(),
            parsed,
            local: RefCell::new(local),
            env,
        })
    }

    /// A function over a fresh, empty private environment.
    pub fn standalone(expression: &str) -> Result<Self, EnvError> {
        Func::new(expression, Rc::new(RefCell::new(ConstantStore::new())))
    }

    /// A standalone function with construction-time constants.
    pub fn with_constants(
        expression: &str,
        pairs: Vec<(String, ConstValue)>,
    ) -> Result<Self, EnvError> {
        let func = Func::standalone(expression)?;
        func.local.borrow_mut().set_many(pairs);
        Ok(func)
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Free identifiers of the body, in first-appearance order.
    pub fn free_variables(&self) -> Vec<String> {
        self.parsed.extract_variables()
    }

    /// Evaluates over the sample vector `t`.
    pub fn eval(&self, t: &DVector<f64>) -> Result<Value, EnvError> {
        self.eval_with(t, &[])
    }

    /// Evaluates over `t` with per-call constant overrides. Three phases:
    /// refresh the snapshot from the environment, resolve the snapshot in
    /// insertion order, then bind `t` and the overrides on top of the scope.
    pub fn eval_with(&self, t: &DVector<f64>, overrides: &[(&str, Value)]) -> Result<Value, EnvError> {
        self.local.borrow_mut().merge_from(&self.env.borrow());
        let mut scope = self.local.borrow().resolve()?;
        scope.insert("t".to_string(), Value::Vector(t.clone()));
        for (name, value) in overrides {
            scope.insert(name.to_string(), value.clone());
        }
        self.parsed.eval_vectorized(&scope)
    }

    /// Evaluates at `t = 0`, for reading off initial conditions.
    pub fn eval_at_origin(&self) -> Result<f64, EnvError> {
        let result = self.eval(&DVector::from_vec(vec![0.0]))?;
        result.first().ok_or(EnvError::ShapeMismatch {
            expected: 1,
            found: 0,
        })
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}
