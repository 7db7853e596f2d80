//! Status returned by behavior nodes.

use std::fmt;

/// The result of evaluating a behavior node.
///
/// Unlike a purely turn-based tree, a tick may not be able to finish within a
/// single call. Such nodes report [`Status::Running`] and are polled again on
/// the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The behavior has not finished yet and should be ticked again.
    Running,

    /// The behavior completed successfully.
    ///
    /// For conditions: The condition was met.
    /// For actions: The action executed without errors.
    Success,

    /// The behavior failed.
    ///
    /// For conditions: The condition was not met.
    /// For actions: The action could not be executed.
    Failure,
}

impl Status {
    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Returns `true` for any status other than `Running`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }

    /// Inverts a terminal status: Success becomes Failure and vice versa.
    ///
    /// `Running` is left untouched: a node that is still working has no
    /// outcome to negate yet.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Running => Status::Running,
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
        }
    }

    /// Raw status code (`1` running, `2` success, `3` failure).
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Status::Running => 1,
            Status::Success => 2,
            Status::Failure => 3,
        }
    }
}

/// Normalizes a raw status code. Anything that is not a known running or
/// success code is a failure.
impl From<u8> for Status {
    fn from(code: u8) -> Self {
        match code {
            1 => Status::Running,
            2 => Status::Success,
            _ => Status::Failure,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Running => "running",
            Status::Success => "success",
            Status::Failure => "failure",
        };
        f.write_str(label)
    }
}
