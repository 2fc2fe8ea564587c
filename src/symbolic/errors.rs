use std::error::Error;
use std::fmt;

/// Error surface of the environment/function engine.
///
/// Everything propagates to the immediate caller; the engine is deterministic
/// and pure, so there is nothing to retry internally.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvError {
    /// Lookup of a constant or function name that was never declared.
    KeyNotFound(String),
    /// An expression referenced an identifier that is not resolvable at that
    /// point of the declaration order (or does not exist at all).
    UnresolvedReference(String),
    /// The expression text is not a well-formed arithmetic expression over
    /// the supported operator and function set.
    ExpressionSyntax(String),
    /// Two vectors of different lengths met in an elementwise operation.
    ShapeMismatch { expected: usize, found: usize },
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvError::KeyNotFound(name) => {
                write!(f, "no constant or function named '{}'", name)
            }
            EnvError::UnresolvedReference(name) => {
                write!(
                    f,
                    "identifier '{}' cannot be resolved; constants must be declared in dependency order",
                    name
                )
            }
            EnvError::ExpressionSyntax(detail) => {
                write!(f, "malformed expression: {}", detail)
            }
            EnvError::ShapeMismatch { expected, found } => {
                write!(
                    f,
                    "vector length mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl Error for EnvError {}
