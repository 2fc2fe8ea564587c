//! Symbolic core: expression trees, the parser, vectorized evaluation, and
//! the shared constant environment with its function registry.

/// Shared constant store, `Environment`, and `Func`.
pub mod environment;
/// Error surface of the engine.
pub mod errors;
/// String to `Expr` parser.
pub mod parse_expr;
/// The `Expr` tree type.
pub mod symbolic_engine;
/// Scalar/vector values and broadcastable evaluation.
pub mod symbolic_eval;
/// Bracket scanning helpers and sample grids.
pub mod utils;

#[cfg(test)]
mod environment_tests;
