//! Errors produced while ticking a tree.
//!
//! Tick errors are values: every consumer treats an `Err` as a failure, and
//! stateful wrappers may hand the same error back more than once, so the type
//! is cheap to clone.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("cannot tick a node with a nil tick")]
    MissingTick,

    #[error("{tick} encountered error with child at index {index}: {source}")]
    Child {
        tick: &'static str,
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("{0}")]
    Message(Arc<str>),

    #[error(transparent)]
    Custom(Arc<dyn StdError + Send + Sync>),

    /// Several errors collected from concurrently evaluated children, in the
    /// order they were observed.
    #[error("{}", JoinedDisplay(.0))]
    Joined(Vec<Error>),
}

impl Error {
    /// Creates an error carrying only a message.
    pub fn msg(message: impl Into<Arc<str>>) -> Self {
        Error::Message(message.into())
    }

    /// Wraps an arbitrary error so it can travel through the tree.
    pub fn custom<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Error::Custom(Arc::new(err))
    }

    /// Appends `next` to `prev`, producing a flat [`Error::Joined`].
    pub fn join(prev: Option<Error>, next: Error) -> Error {
        match prev {
            None => next,
            Some(Error::Joined(mut errs)) => {
                errs.push(next);
                Error::Joined(errs)
            }
            Some(first) => Error::Joined(vec![first, next]),
        }
    }

    /// Returns the wrapped custom error as `E`, if it is one.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Error::Custom(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Iterates over this error and, for joined errors, every constituent.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Error> + '_> {
        match self {
            Error::Joined(errs) => Box::new(errs.iter().flat_map(Error::iter)),
            other => Box::new(std::iter::once(other)),
        }
    }
}

struct JoinedDisplay<'a>(&'a [Error]);

impl fmt::Display for JoinedDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}
