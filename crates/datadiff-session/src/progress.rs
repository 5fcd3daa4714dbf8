//! Cooperative progress reporting and cancellation.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

/// The phase a session is in when it reports progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStage {
    Left,
    Right,
    Compare,
}

/// Receives progress ticks from a running session.
///
/// Returning `ControlFlow::Break(())` cancels the session; it then returns
/// [`SessionError::Cancelled`](crate::SessionError::Cancelled) and drops
/// everything loaded so far.
pub trait Progress {
    fn tick(&mut self, stage: LoadStage, done: usize, total: usize) -> ControlFlow<()>;
}

/// Ignores progress and never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn tick(&mut self, _stage: LoadStage, _done: usize, _total: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl<F> Progress for F
where
    F: FnMut(LoadStage, usize, usize) -> ControlFlow<()>,
{
    fn tick(&mut self, stage: LoadStage, done: usize, total: usize) -> ControlFlow<()> {
        self(stage, done, total)
    }
}
