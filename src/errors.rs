use std::fmt;

pub type Result<T, E = FreqDictError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum FreqDictError {
  #[error(transparent)]
  InvalidFormat(InvalidFormatError),

  #[error(transparent)]
  InvalidArgument(InvalidArgumentError),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),

  #[error(transparent)]
  Zip(#[from] zip::result::ZipError),

  #[error(transparent)]
  Persist(#[from] tempfile::PersistError),
}

impl FreqDictError {
  pub(crate) fn invalid_format<L, M>(location: L, msg: M) -> Self
  where
    L: Into<String>,
    M: Into<String>,
  {
    Self::InvalidFormat(InvalidFormatError {
      location: location.into(),
      msg: msg.into(),
    })
  }

  pub(crate) fn invalid_argument<M>(arg: &'static str, msg: M) -> Self
  where
    M: Into<String>,
  {
    Self::InvalidArgument(InvalidArgumentError {
      arg,
      msg: msg.into(),
    })
  }
}

/// Malformed input: wrong column count, non-integer frequency, bad package entries.
#[derive(Debug)]
pub struct InvalidFormatError {
  /// Where the problem was found, e.g. `corpus.tsv:12` or `term_meta_bank_1.json`.
  pub location: String,
  pub msg: String,
}

impl fmt::Display for InvalidFormatError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "InvalidFormatError: {}: {}", self.location, self.msg)
  }
}

impl std::error::Error for InvalidFormatError {}

#[derive(Debug)]
pub struct InvalidArgumentError {
  pub arg: &'static str,
  pub msg: String,
}

impl fmt::Display for InvalidArgumentError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
  }
}

impl std::error::Error for InvalidArgumentError {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display_includes_location() {
    let e = FreqDictError::invalid_format("lex.tsv:3", "expected 17 fields, found 2");
    assert_eq!(e.to_string(), "InvalidFormatError: lex.tsv:3: expected 17 fields, found 2");
  }
}
