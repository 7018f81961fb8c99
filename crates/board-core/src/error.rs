//! Error types for `board-core`.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(#[from] ValidationError),

  #[error("invalid message id: {0:?}")]
  InvalidId(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A single broken field rule. The display strings are user-facing and end
/// up in the `details` array of a 400 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
  #[error("Message text is required")]
  TextRequired,

  #[error("Author name is required")]
  AuthorRequired,

  #[error("Message cannot exceed 500 characters")]
  TextTooLong,

  #[error("Author name cannot exceed 100 characters")]
  AuthorTooLong,
}

impl Violation {
  pub fn is_missing_field(self) -> bool {
    matches!(self, Self::TextRequired | Self::AuthorRequired)
  }
}

/// Every rule a request broke, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
  violations: Vec<Violation>,
}

impl ValidationError {
  pub fn new(violations: Vec<Violation>) -> Self { Self { violations } }

  pub fn violations(&self) -> &[Violation] { &self.violations }

  /// `true` when at least one required field was absent or blank.
  pub fn has_missing_field(&self) -> bool {
    self.violations.iter().any(|v| v.is_missing_field())
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, v) in self.violations.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{v}")?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationError {}
