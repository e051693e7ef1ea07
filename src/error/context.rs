//! Extension traits for attaching context to errors.

use super::{ReportError, Result};
use std::path::Path;

/// Context helpers for `Result` values.
pub trait ResultExt<T> {
    /// Wrap the error with a message.
    ///
    /// # Errors
    ///
    /// Returns the wrapped error if `self` is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Wrap the error with the path it relates to.
    ///
    /// # Errors
    ///
    /// Returns the wrapped error if `self` is `Err`.
    fn with_path_context(self, path: &Path) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|err| ReportError::WithContext {
            context: context.into(),
            source: Box::new(err),
        })
    }

    fn with_path_context(self, path: &Path) -> Result<T> {
        self.map_err(|err| ReportError::WithContext {
            context: path.display().to_string(),
            source: Box::new(err),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_path_context() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let err = res.with_path_context(Path::new("in/UT/a.xml")).unwrap_err();
        assert_eq!(err.to_string(), "in/UT/a.xml: missing");
    }

    #[test]
    fn test_context_message() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("broken pipe"));
        let err = res.context("writing CSV").unwrap_err();
        assert_eq!(err.to_string(), "writing CSV: broken pipe");
    }
}
