//! Tool-level error type for the Lexa toolchain.
//!
//! Analysis findings are never errors: they are [`Diagnostic`](crate::Diagnostic)
//! values carried in the analysis result. This type covers the failures around
//! the engine instead, such as an unreadable input file or a report that cannot
//! be written.
//!
//! # Examples
//!
//! ```rust
//! use lexa_syntax::error::{error, Error, Result};
//!
//! fn read_limit(s: &str) -> Result<usize> {
//!     s.parse().map_err(|_| Error::new(format!("Invalid nesting limit: {}", s)))
//! }
//!
//! fn checked(s: &str) -> Result<usize> {
//!     let n = read_limit(s)?;
//!     if n == 0 {
//!         error("Nesting limit must be positive")
//!     } else {
//!         Ok(n)
//!     }
//! }
//!
//! assert!(checked("0").is_err());
//! assert_eq!(checked("16").unwrap(), 16);
//! ```

use std::fmt;

/// An error with a message and an optional source position.
#[derive(Debug, Clone)]
pub struct Error {
    /// Human-readable error message
    pub msg: String,

    /// Optional line number in the source file (1-based)
    pub line: Option<usize>,

    /// Optional column number in the source file (1-based)
    pub col: Option<usize>,
}

impl Error {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            line: None,
            col: None,
        }
    }

    /// Creates an error pointing at `line:col` in the source.
    ///
    /// ```rust
    /// use lexa_syntax::Error;
    ///
    /// let e = Error::with_span("Input is not valid UTF-8", 5, 12);
    /// assert_eq!(e.to_string(), "Input is not valid UTF-8 at 5:12");
    /// ```
    pub fn with_span(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            msg: msg.into(),
            line: Some(line),
            col: Some(col),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(l), Some(c)) = (self.line, self.col) {
            write!(f, "{} at {}:{}", self.msg, l, c)
        } else {
            write!(f, "{}", self.msg)
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::new(s)
    }
}
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::new(s)
    }
}
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::new(e.to_string())
    }
}

/// A specialized `Result` type for Lexa tooling.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::new(msg))`.
pub fn error<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::new(msg))
}

/// Shorthand for `Err(Error::with_span(msg, line, col))`.
pub fn error_at<T>(line: usize, col: usize, msg: impl Into<String>) -> Result<T> {
    Err(Error::with_span(msg, line, col))
}
