//! Views bound to client-side routes.
//!
//! A view owns a snapshot of its state behind a [`watch`] channel. Every
//! mutation replaces the snapshot and wakes subscribers, so a renderer only
//! has to redraw whatever it last received. Each view also owns a
//! [`CancellationToken`] for its lifetime: requests race it, and nothing that
//! resolves after [`teardown`](ViewCore::teardown) touches the state.

mod topic_detail;
mod topic_list;

pub use topic_detail::{CategoryForm, SuggestionForm, TopicDetailRetry, TopicDetailState, TopicDetailView};
pub use topic_list::{TopicForm, TopicListRetry, TopicListState, TopicListView};

use std::future::Future;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, ViewError};

/// Where the initial read of a view stands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
}

/// What a renderer should show, derived from [`Activity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Idle,
    Loading,
    Ready,
    /// Loaded, with at least one write in flight
    Saving,
    /// The initial read failed; a retry is offered
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Transient,
    Rejected,
    NotFound,
    ReferentialMismatch,
}

/// A dismissible message, with the action to re-run when it is retryable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice<R> {
    pub kind: NoticeKind,
    pub message: String,
    pub retry: Option<R>,
}

impl<R> Notice<R> {
    /// Notice for `err`, or `None` for errors nobody needs to see
    ///
    /// Only transient failures keep their retry action.
    pub fn from_error(err: &ViewError, retry: R) -> Option<Self> {
        let (kind, retry) = match err {
            ViewError::Transient(_) => (NoticeKind::Transient, Some(retry)),
            ViewError::Rejected(_) | ViewError::Validation(_) => (NoticeKind::Rejected, None),
            ViewError::NotFound(_) => (NoticeKind::NotFound, None),
            ViewError::ReferentialMismatch(_) => (NoticeKind::ReferentialMismatch, None),
            ViewError::Cancelled | ViewError::Stale => return None,
        };

        Some(Self {
            kind,
            message: err.to_string(),
            retry,
        })
    }
}

/// Load phase, write counter and notice shared by every view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity<R> {
    pub phase: Phase,
    pub pending_writes: usize,
    pub notice: Option<Notice<R>>,
}

impl<R> Default for Activity<R> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            pending_writes: 0,
            notice: None,
        }
    }
}

impl<R> Activity<R> {
    pub fn status(&self) -> ViewStatus {
        match self.phase {
            Phase::Loading => ViewStatus::Loading,
            Phase::Ready if self.pending_writes > 0 => ViewStatus::Saving,
            Phase::Ready => ViewStatus::Ready,
            Phase::Idle
                if self
                    .notice
                    .as_ref()
                    .is_some_and(|n| n.kind == NoticeKind::Transient) =>
            {
                ViewStatus::Failed
            }
            Phase::Idle => ViewStatus::Idle,
        }
    }

    pub const fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready)
    }

    /// Loaded with no write in flight; create actions wait for this
    pub const fn is_settled(&self) -> bool {
        self.is_ready() && self.pending_writes == 0
    }

    fn begin_write(&mut self) {
        self.pending_writes += 1;
    }

    fn end_write(&mut self) {
        self.pending_writes = self.pending_writes.saturating_sub(1);
    }

    fn raise(&mut self, err: &ViewError, retry: R) {
        if let Some(notice) = Notice::from_error(err, retry) {
            tracing::warn!(kind = ?notice.kind, message = %notice.message, "view notice raised");
            self.notice = Some(notice);
        }
    }
}

/// View states carry an [`Activity`]
pub trait Tracked {
    type Retry;

    fn activity(&self) -> &Activity<Self::Retry>;

    fn activity_mut(&mut self) -> &mut Activity<Self::Retry>;
}

/// State channel plus lifetime token, shared plumbing of the views
#[derive(Debug)]
pub(crate) struct ViewCore<S> {
    state: watch::Sender<S>,
    lifetime: CancellationToken,
}

impl<S: Tracked> ViewCore<S> {
    pub(crate) fn new(initial: S) -> Self {
        Self {
            state: watch::Sender::new(initial),
            lifetime: CancellationToken::new(),
        }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.state.subscribe()
    }

    pub(crate) fn snapshot(&self) -> S
    where
        S: Clone,
    {
        self.state.borrow().clone()
    }

    pub(crate) fn read<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        f(&self.state.borrow())
    }

    pub(crate) fn teardown(&self) {
        if !self.lifetime.is_cancelled() {
            tracing::debug!("view torn down");
        }
        self.lifetime.cancel();
    }

    pub(crate) fn is_torn_down(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    pub(crate) fn ensure_alive(&self) -> Result<(), ViewError> {
        if self.is_torn_down() {
            return Err(ViewError::Cancelled);
        }
        Ok(())
    }

    /// Replace the snapshot, unless the view is gone
    pub(crate) fn update(&self, f: impl FnOnce(&mut S)) -> Result<(), ViewError> {
        self.ensure_alive()?;
        self.state.send_modify(f);
        Ok(())
    }

    /// Like [`update`](Self::update), but subscribers only wake when `f` returns `true`
    pub(crate) fn update_if(&self, f: impl FnOnce(&mut S) -> bool) -> Result<bool, ViewError> {
        self.ensure_alive()?;
        Ok(self.state.send_if_modified(f))
    }

    /// Await `request` unless the view is torn down first
    pub(crate) async fn guard<T>(
        &self,
        request: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, ViewError> {
        tokio::select! {
            biased;
            () = self.lifetime.cancelled() => Err(ViewError::Cancelled),
            result = request => {
                // A response racing teardown is dropped as well
                self.ensure_alive()?;
                result.map_err(ViewError::from)
            }
        }
    }

    pub(crate) fn begin_write(&self) -> Result<(), ViewError> {
        self.update(|s| s.activity_mut().begin_write())
    }

    /// Settle a write that failed with `err`, offering `retry` when it makes sense
    pub(crate) fn fail_write(&self, err: &ViewError, retry: S::Retry) {
        // Torn down, or the write belongs to state that was replaced
        if matches!(err, ViewError::Cancelled | ViewError::Stale) {
            return;
        }
        let _ = self.update(|s| {
            let activity = s.activity_mut();
            activity.end_write();
            activity.raise(err, retry);
        });
    }

    pub(crate) fn dismiss_notice(&self) {
        let _ = self.update(|s| s.activity_mut().notice = None);
    }

    /// Take the pending retry action, clearing the notice
    pub(crate) fn take_retry(&self) -> Option<S::Retry> {
        let mut retry = None;
        let _ = self.update(|s| {
            if let Some(notice) = s.activity_mut().notice.take() {
                retry = notice.retry;
            }
        });
        retry
    }
}

impl<S> Drop for ViewCore<S> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Retry {
        Load,
    }

    #[test]
    fn test_status_derivation() {
        let mut activity = Activity::<Retry>::default();
        assert_eq!(activity.status(), ViewStatus::Idle);

        activity.phase = Phase::Loading;
        assert_eq!(activity.status(), ViewStatus::Loading);

        activity.phase = Phase::Ready;
        activity.begin_write();
        assert_eq!(activity.status(), ViewStatus::Saving);
        activity.end_write();
        assert_eq!(activity.status(), ViewStatus::Ready);

        activity.phase = Phase::Idle;
        activity.raise(&ViewError::Transient("timed out".to_string()), Retry::Load);
        assert_eq!(activity.status(), ViewStatus::Failed);
    }

    #[test]
    fn test_only_transient_notices_are_retryable() {
        let transient =
            Notice::from_error(&ViewError::Transient("reset".to_string()), Retry::Load).unwrap();
        assert_eq!(transient.kind, NoticeKind::Transient);
        assert_eq!(transient.retry, Some(Retry::Load));

        let gone =
            Notice::from_error(&ViewError::NotFound("Topic 7 not found".to_string()), Retry::Load)
                .unwrap();
        assert_eq!(gone.kind, NoticeKind::NotFound);
        assert_eq!(gone.retry, None);
        assert_eq!(gone.message, "Topic 7 not found");

        assert!(Notice::from_error(&ViewError::Cancelled, Retry::Load).is_none());
        assert!(Notice::from_error(&ViewError::Stale, Retry::Load).is_none());
    }

    #[test]
    fn test_end_write_never_underflows() {
        let mut activity = Activity::<Retry>::default();
        activity.end_write();
        assert_eq!(activity.pending_writes, 0);
    }
}
