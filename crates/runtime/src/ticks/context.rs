use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use behavior_tree::{Error, Node, Status, TickRef, TickResult, tick_fn};

use super::lock;

/// Cancellation scope shared by the ticks of one tree.
///
/// Place [`Context::init`] at the start of a sequence to open a fresh scope,
/// bind long-running logic with [`Context::bind`] so it can observe the scope,
/// and end it with [`Context::cancel`]. Opening a new scope cancels the
/// previous one.
///
/// Scopes may also expire on their own, see [`Context::with_timeout`] and
/// [`Context::with_deadline`]. Expiry timers run on the tokio runtime that is
/// current when the scope is opened.
#[derive(Debug, Default)]
pub struct Context {
    parent: Option<CancellationToken>,
    expiry: Option<Expiry>,
    scope: Mutex<Option<Scope>>,
}

#[derive(Debug, Clone, Copy)]
enum Expiry {
    /// Relative to the moment each scope is opened.
    Timeout(Duration),
    Deadline(Instant),
}

impl Expiry {
    fn deadline(self) -> Instant {
        match self {
            Expiry::Timeout(timeout) => Instant::now() + timeout,
            Expiry::Deadline(deadline) => deadline,
        }
    }
}

#[derive(Debug)]
struct Scope {
    token: CancellationToken,
    handle: Option<Handle>,
}

impl Context {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates a context whose scopes are also cancelled with `parent`.
    pub fn with_parent(parent: CancellationToken) -> Arc<Self> {
        Self::build(Some(parent), None)
    }

    /// Creates a context whose scopes are cancelled with `parent`, or
    /// `timeout` after they were opened, whichever comes first.
    pub fn with_timeout(parent: CancellationToken, timeout: Duration) -> Arc<Self> {
        Self::build(Some(parent), Some(Expiry::Timeout(timeout)))
    }

    /// Creates a context whose scopes are cancelled with `parent`, or at
    /// `deadline`, whichever comes first. Scopes opened after the deadline
    /// start out cancelled.
    pub fn with_deadline(parent: CancellationToken, deadline: Instant) -> Arc<Self> {
        Self::build(Some(parent), Some(Expiry::Deadline(deadline)))
    }

    fn build(parent: Option<CancellationToken>, expiry: Option<Expiry>) -> Arc<Self> {
        Arc::new(Self {
            parent,
            expiry,
            scope: Mutex::new(None),
        })
    }

    /// Token of the current scope, if one has been opened.
    pub fn token(&self) -> Option<CancellationToken> {
        lock(&self.scope).as_ref().map(|scope| scope.token.clone())
    }

    /// Tick that cancels the current scope and opens a new one. Always
    /// succeeds, unless the scope must expire and no tokio runtime is
    /// available to time it.
    pub fn init(self: &Arc<Self>) -> TickRef {
        let context = self.clone();
        Arc::new(tick_fn(move |_| {
            let mut scope = lock(&context.scope);
            if let Some(previous) = scope.take() {
                previous.token.cancel();
            }
            *scope = Some(context.open()?);
            Ok(Status::Success)
        }))
    }

    fn open(&self) -> Result<Scope, Error> {
        let token = match &self.parent {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        let handle = Handle::try_current().ok();

        if let Some(expiry) = self.expiry {
            let deadline = expiry.deadline();
            if deadline <= Instant::now() {
                token.cancel();
            } else {
                let handle = handle
                    .as_ref()
                    .ok_or_else(|| Error::msg("tick context expiry needs a tokio runtime"))?;
                let timer = token.clone();
                handle.spawn(async move {
                    tokio::select! {
                        _ = tokio::time::sleep_until(deadline) => {
                            tracing::trace!("tick context expired");
                            timer.cancel();
                        }
                        _ = timer.cancelled() => {}
                    }
                });
            }
        }

        Ok(Scope { token, handle })
    }

    /// Tick that cancels the current scope, if any. Always succeeds.
    pub fn cancel(self: &Arc<Self>) -> TickRef {
        let context = self.clone();
        Arc::new(tick_fn(move |_| {
            if let Some(scope) = lock(&context.scope).as_ref() {
                scope.token.cancel();
            }
            Ok(Status::Success)
        }))
    }

    /// Tick that succeeds once the scope is cancelled, or if none was ever
    /// opened, and fails while it is live.
    pub fn err(self: &Arc<Self>) -> TickRef {
        let context = self.clone();
        Arc::new(tick_fn(move |_| match context.token() {
            Some(scope) if !scope.is_cancelled() => Ok(Status::Failure),
            _ => Ok(Status::Success),
        }))
    }

    /// Tick that **blocks** until the current scope is cancelled, then
    /// succeeds. Succeeds at once if no scope was ever opened.
    ///
    /// Like [`Fork`](crate::Fork), it must be ticked off the async executor,
    /// for example from a [`TreeTicker`](crate::TreeTicker).
    pub fn done(self: &Arc<Self>) -> TickRef {
        let context = self.clone();
        Arc::new(tick_fn(move |_| {
            let (token, handle) = match lock(&context.scope).as_ref() {
                Some(scope) => (scope.token.clone(), scope.handle.clone()),
                None => return Ok(Status::Success),
            };
            if !token.is_cancelled() {
                let handle = match handle {
                    Some(handle) => handle,
                    None => Handle::try_current().map_err(Error::custom)?,
                };
                handle.block_on(token.cancelled());
            }
            Ok(Status::Success)
        }))
    }

    /// Binds `f` to the current scope.
    ///
    /// The returned tick fails with an error if no scope has been opened yet.
    pub fn bind<F>(self: &Arc<Self>, f: F) -> TickRef
    where
        F: Fn(&CancellationToken, &[Node]) -> TickResult + Send + Sync + 'static,
    {
        let context = self.clone();
        Arc::new(tick_fn(move |children| match context.token() {
            Some(scope) => f(&scope, children),
            None => Err(Error::msg("tick context used before init")),
        }))
    }
}
