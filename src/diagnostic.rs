use std::fmt;

use crate::error::Error;

/// Every error reported while running one unit of source text.
///
/// Callers decide what to do with them (print, pick an exit code); nothing
/// here is global, so independent sessions never see each other's errors.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: impl Into<Error>) {
        self.errors.push(error.into());
    }

    /// True when scanning or parsing failed, i.e. the unit never ran.
    pub fn had_error(&self) -> bool {
        self.errors
            .iter()
            .any(|error| matches!(error, Error::Scan(_) | Error::Parse(_)))
    }

    /// True when execution stopped on a runtime error.
    pub fn had_runtime_error(&self) -> bool {
        self.errors
            .iter()
            .any(|error| matches!(error, Error::Runtime(_)))
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.errors.iter()
    }
}

impl<E: Into<Error>> Extend<E> for Diagnostics {
    fn extend<T: IntoIterator<Item = E>>(&mut self, iter: T) {
        self.errors.extend(iter.into_iter().map(Into::into));
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}
