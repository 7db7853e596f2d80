//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from ticked trees, driver tasks, and manager coordination so
//! clients can bubble them up with consistent context.
use std::any::Any;
use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Tick(#[from] behavior_tree::Error),

    #[error("ticker cancelled")]
    Cancelled,

    #[error("tick panicked: {0}")]
    Panicked(String),

    /// Returned by [`Manager::add`](crate::Manager::add) once the manager has
    /// begun to stop. `cause` holds the errors accumulated so far, if any.
    #[error("{}", StoppedDisplay(.cause.as_deref()))]
    ManagerStopped { cause: Option<Box<RuntimeError>> },

    /// Errors of several tickers, in the order they were observed.
    #[error("{}", CombinedDisplay(.0))]
    Combined(Vec<RuntimeError>),
}

impl RuntimeError {
    /// Returns `true` if `pred` holds for this error or any error it
    /// aggregates, walking combined lists and stopped causes.
    pub fn any<P>(&self, pred: P) -> bool
    where
        P: Fn(&RuntimeError) -> bool + Copy,
    {
        if pred(self) {
            return true;
        }
        match self {
            RuntimeError::Combined(errs) => errs.iter().any(|err| err.any(pred)),
            RuntimeError::ManagerStopped { cause: Some(cause) } => cause.any(pred),
            _ => false,
        }
    }

    /// Returns `true` if this error reports an add on a stopped manager.
    pub fn is_manager_stopped(&self) -> bool {
        self.any(|err| matches!(err, RuntimeError::ManagerStopped { .. }))
    }

    /// Returns `true` if this error, or any error it aggregates, is a tick
    /// error for which `pred` holds.
    pub fn any_tick<P>(&self, pred: P) -> bool
    where
        P: Fn(&behavior_tree::Error) -> bool + Copy,
    {
        self.any(|err| match err {
            RuntimeError::Tick(tick) => tick.iter().any(pred),
            _ => false,
        })
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_owned(),
                Err(_) => "unknown panic payload".to_owned(),
            },
        };
        RuntimeError::Panicked(message)
    }
}

struct StoppedDisplay<'a>(Option<&'a RuntimeError>);

impl fmt::Display for StoppedDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("manager already stopped")?;
        if let Some(cause) = self.0 {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

struct CombinedDisplay<'a>(&'a [RuntimeError]);

impl fmt::Display for CombinedDisplay<'_> {
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
