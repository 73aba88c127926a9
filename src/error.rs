//! Error definitions for page-object compilation.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Structured compilation diagnostic: a numeric code plus ordered
/// interpolation arguments.
///
/// Human-readable text is produced by a [`crate::diagnostics::MessageCatalog`],
/// never by the compiler itself.
#[error("compilation error {code}: [{}]", .args.join(", "))]
pub struct CompilationError {
    /// Numeric diagnostic code, see [`crate::diagnostics`].
    pub code: u16,
    /// Ordered arguments interpolated into the catalog message.
    pub args: Vec<String>,
}

impl CompilationError {
    pub fn new<I, S>(code: u16, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            code,
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Error)]
/// Top-level error type returned by page-level public APIs.
pub enum PageObjectError {
    /// Validation failure carrying a diagnostic code.
    #[error(transparent)]
    Compilation(#[from] CompilationError),
    /// Input text is not well-formed JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Invalid compiler configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl PageObjectError {
    /// Returns the diagnostic code when this is a compilation failure.
    pub fn code(&self) -> Option<u16> {
        match self {
            PageObjectError::Compilation(err) => Some(err.code),
            _ => None,
        }
    }
}
