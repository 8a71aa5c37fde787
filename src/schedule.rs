//! Periodic tick registration with explicit cancellation.
//!
//! A [`TickHandle`] represents one registration of the periodic tick. It owns
//! a [`CancelToken`] shared with every command it produces: each command
//! sleeps for one period and then yields a [`TickMsg`] only if the token is
//! still live. Dropping the handle cancels it, so an owner that lets the
//! handle go out of scope can never receive another tick from it.
//!
//! Only one command is ever outstanding per handle. The receiver asks for the
//! next one after it has processed the current tick, which keeps ticks
//! strictly sequential.

use bubbletea_rs::{Cmd, Msg};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Message delivered once per period while a countdown is running.
///
/// `id` identifies the engine that registered the tick; `tag` identifies the
/// registration. Engines ignore ticks whose tag is not their current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickMsg {
    /// Id of the engine the tick belongs to.
    pub id: i64,
    pub(crate) tag: u64,
}

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Marks the token cancelled. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Owned registration of a periodic tick.
#[derive(Debug)]
pub struct TickHandle {
    tag: u64,
    period: Duration,
    token: CancelToken,
}

impl TickHandle {
    /// Creates a live registration.
    pub fn new(tag: u64, period: Duration) -> Self {
        Self {
            tag,
            period,
            token: CancelToken::default(),
        }
    }

    /// Registration tag carried by every tick from this handle.
    pub fn tag(&self) -> u64 {
        self.tag
    }

    /// A clone of the cancellation token.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Cancels the registration. Commands already handed to the runtime
    /// resolve to nothing.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the registration has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns a command that waits one period and then delivers a
    /// [`TickMsg`] for engine `id`, unless the handle was cancelled meanwhile.
    pub fn next_tick(&self, id: i64) -> Cmd {
        let tag = self.tag;
        let period = self.period;
        let token = self.token.clone();
        Box::pin(async move {
            tokio::time::sleep(period).await;
            if token.is_cancelled() {
                tracing::trace!(id, tag, "tick dropped after cancellation");
                return None;
            }
            Some(Box::new(TickMsg { id, tag }) as Msg)
        })
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_live_handle_delivers_tick() {
        let handle = TickHandle::new(3, Duration::from_secs(1));
        let msg = handle.next_tick(7).await.expect("tick expected");
        let tick = msg.downcast_ref::<TickMsg>().expect("TickMsg expected");
        assert_eq!(tick.id, 7);
        assert_eq!(tick.tag, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_handle_delivers_nothing() {
        let handle = TickHandle::new(1, Duration::from_secs(1));
        let cmd = handle.next_tick(1);
        handle.cancel();
        assert!(cmd.await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_waits_one_period() {
        let handle = TickHandle::new(1, Duration::from_secs(1));
        let start = tokio::time::Instant::now();
        let _ = handle.next_tick(1).await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_outstanding_command() {
        let handle = TickHandle::new(1, Duration::from_secs(1));
        let token = handle.token();
        let cmd = handle.next_tick(1);
        drop(handle);
        assert!(token.is_cancelled());
        assert!(cmd.await.is_none());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let handle = TickHandle::new(1, Duration::from_millis(10));
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
    }
}
