use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// A wrapped underlying error, shared so that failures stay cheap to clone.
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

const UNKNOWN: &str = "unknown error";

/// A single validation failure.
///
/// `path` names the field the failure relates to. Inside a [`crate::Validate`]
/// impl it is usually a field name of the value being validated (or empty for
/// the value itself); in the errors returned by [`crate::Validator`] it is the
/// full path relative to the root value.
#[derive(Debug, Clone, Default)]
pub struct Error {
    pub path: String,
    pub message: String,
    pub cause: Option<Cause>,
}

impl Error {
    /// A failure about the value itself.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: String::new(),
            message: message.into(),
            cause: None,
        }
    }

    /// A failure about the named field.
    pub fn field(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Lifts an arbitrary error into a failure.
    ///
    /// When `err`, or anything in its source chain, is already an [`Error`],
    /// that failure is returned as-is. Otherwise the result has an empty path
    /// and message and wraps `err` as its cause.
    pub fn wrap<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_cause(Arc::new(err))
    }

    /// Same as [`Error::wrap`] for an already shared cause.
    pub fn from_cause(cause: Cause) -> Self {
        if let Some(found) = find_failure(cause.as_ref()) {
            return found.clone();
        }
        Self {
            path: String::new(),
            message: String::new(),
            cause: Some(cause),
        }
    }

    pub fn with_cause<E>(mut self, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(err));
        self
    }

    /// Returns true if the cause chain contains an error of type `E`.
    pub fn is<E>(&self) -> bool
    where
        E: StdError + 'static,
    {
        self.find_cause::<E>().is_some()
    }

    /// First error of type `E` in the cause chain.
    pub fn find_cause<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        let mut current = self.source();
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<E>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }

    /// A copy of this failure reported at `path`.
    pub(crate) fn rehome(&self, path: String) -> Self {
        Self {
            path,
            message: self.message.clone(),
            cause: self.cause.clone(),
        }
    }
}

fn find_failure<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a Error> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(found) = err.downcast_ref::<Error>() {
            return Some(found);
        }
        current = err.source();
    }
    None
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.path.is_empty() {
            write!(f, "{}: ", self.path)?;
        }
        if !self.message.is_empty() {
            return f.write_str(&self.message);
        }
        match &self.cause {
            Some(cause) => {
                let text = cause.to_string();
                if text.is_empty() {
                    f.write_str(UNKNOWN)
                } else {
                    f.write_str(&text)
                }
            }
            None => f.write_str(UNKNOWN),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

// Causes compare by their rendered text.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.message == other.message
            && match (&self.cause, &other.cause) {
                (None, None) => true,
                (Some(a), Some(b)) => a.to_string() == b.to_string(),
                _ => false,
            }
    }
}

/// A flat, insertion-ordered collection of failures.
///
/// An `Errors` returned inside `Err` is never empty; "no failures" is `Ok(())`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Errors {
    inner: Vec<Error>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: Error) {
        self.inner.push(err);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.inner.iter()
    }

    pub fn as_slice(&self) -> &[Error] {
        &self.inner
    }

    pub fn into_vec(self) -> Vec<Error> {
        self.inner
    }

    /// `Ok(())` when empty, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Errors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Error> for Errors {
    fn from(err: Error) -> Self {
        Self { inner: vec![err] }
    }
}

impl From<Vec<Error>> for Errors {
    fn from(inner: Vec<Error>) -> Self {
        Self { inner }
    }
}

impl FromIterator<Error> for Errors {
    fn from_iter<I: IntoIterator<Item = Error>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl Extend<Error> for Errors {
    fn extend<I: IntoIterator<Item = Error>>(&mut self, iter: I) {
        self.inner.extend(iter);
    }
}

impl IntoIterator for Errors {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.inner.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl StdError for Errors {}

/// Appends `next` to `errs`, flattening both sides.
///
/// `next` may be a single [`Error`] or an [`Errors`] aggregate. The result is
/// `Ok(())` only when both sides are.
pub fn append<E>(errs: Result<(), Errors>, next: Result<(), E>) -> Result<(), Errors>
where
    E: Into<Errors>,
{
    let mut merged = errs.err().unwrap_or_default();
    if let Err(next) = next {
        merged.extend(next.into());
    }
    merged.into_result()
}

/// Appends a failure about the value itself.
pub fn append_error(errs: Result<(), Errors>, message: impl Into<String>) -> Result<(), Errors> {
    append(errs, Err(Error::new(message)))
}

/// Appends a failure about the named field.
pub fn append_field_error(
    errs: Result<(), Errors>,
    field: impl Into<String>,
    message: impl Into<String>,
) -> Result<(), Errors> {
    append(errs, Err(Error::field(field, message)))
}

/// All failures in `result`, in the order they were appended.
pub fn errors(result: Result<(), Errors>) -> Vec<Error> {
    match result {
        Ok(()) => Vec::new(),
        Err(errs) => errs.into_vec(),
    }
}
