//! Capture sessions and cancellation
//!
//! A retake supersedes whatever analysis is still running. Each capture gets
//! a generation-stamped [`CaptureTicket`]; starting a new capture cancels the
//! previous ticket's token, and only the newest generation may publish its
//! result, so a stale aggregate never replaces a newer one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::{AnalysisError, Result};

/// Shared abort flag checked between pipeline stages and per zone.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once the token has been cancelled
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(AnalysisError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Handle for one capture attempt
#[derive(Debug, Clone)]
pub struct CaptureTicket {
    generation: u64,
    token: CancellationToken,
}

impl CaptureTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

#[derive(Debug)]
struct SessionState<T> {
    generation: u64,
    active: Option<CancellationToken>,
    latest: Option<(u64, Arc<T>)>,
}

/// Hands out capture tickets and keeps the newest published result.
#[derive(Debug)]
pub struct CaptureSession<T> {
    state: Mutex<SessionState<T>>,
}

impl<T> Default for CaptureSession<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(SessionState {
                generation: 0,
                active: None,
                latest: None,
            }),
        }
    }
}

impl<T> CaptureSession<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState<T>> {
        // state stays consistent even if a holder panicked
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start a new capture, cancelling the one in flight
    pub fn begin(&self) -> CaptureTicket {
        let mut state = self.lock();
        if let Some(previous) = state.active.take() {
            previous.cancel();
            debug!(generation = state.generation, "previous capture cancelled");
        }
        state.generation += 1;
        let token = CancellationToken::new();
        state.active = Some(token.clone());
        CaptureTicket {
            generation: state.generation,
            token,
        }
    }

    /// Whether `ticket` still belongs to the newest capture
    pub fn is_current(&self, ticket: &CaptureTicket) -> bool {
        let state = self.lock();
        ticket.generation == state.generation && !ticket.token.is_cancelled()
    }

    /// Store a finished result. Returns `false` and drops the value when the
    /// ticket has been superseded.
    pub fn publish(&self, ticket: &CaptureTicket, value: T) -> bool {
        let mut state = self.lock();
        if ticket.generation != state.generation || ticket.token.is_cancelled() {
            warn!(
                stale = ticket.generation,
                current = state.generation,
                "discarding stale capture result"
            );
            return false;
        }
        state.latest = Some((ticket.generation, Arc::new(value)));
        state.active = None;
        true
    }

    /// Newest published result
    pub fn latest(&self) -> Option<Arc<T>> {
        self.lock().latest.as_ref().map(|(_, value)| Arc::clone(value))
    }

    /// Generation of the newest published result
    pub fn latest_generation(&self) -> Option<u64> {
        self.lock().latest.as_ref().map(|(generation, _)| *generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_token() {
        let token = CancellationToken::new();
        assert!(token.check().is_ok());
        let shared = token.clone();
        shared.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(AnalysisError::Cancelled)));
    }

    #[test]
    fn test_begin_cancels_previous() {
        let session: CaptureSession<&str> = CaptureSession::new();
        let first = session.begin();
        let second = session.begin();
        assert!(first.token().is_cancelled());
        assert!(!second.token().is_cancelled());
        assert!(!session.is_current(&first));
        assert!(session.is_current(&second));
        assert_eq!(second.generation(), first.generation() + 1);
    }

    #[test]
    fn test_stale_result_never_overwrites() {
        let session = CaptureSession::new();
        let old = session.begin();
        let new = session.begin();

        assert!(session.publish(&new, "new"));
        // the superseded capture finishes later
        assert!(!session.publish(&old, "old"));
        assert_eq!(session.latest().as_deref(), Some(&"new"));
        assert_eq!(session.latest_generation(), Some(new.generation()));
    }

    #[test]
    fn test_stale_result_before_newer_finishes() {
        let session = CaptureSession::new();
        let old = session.begin();
        let new = session.begin();
        assert!(!session.publish(&old, 1));
        assert!(session.latest().is_none());
        assert!(session.publish(&new, 2));
        assert_eq!(session.latest().as_deref(), Some(&2));
    }

    #[test]
    fn test_concurrent_captures_keep_newest() {
        let session = Arc::new(CaptureSession::new());
        let tickets: Vec<_> = (0..8).map(|_| session.begin()).collect();
        let newest = tickets[7].generation();

        let handles: Vec<_> = tickets
            .into_iter()
            .map(|ticket| {
                let session = Arc::clone(&session);
                thread::spawn(move || session.publish(&ticket, ticket.generation()))
            })
            .collect();
        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(accepted, 1);
        assert_eq!(session.latest().as_deref(), Some(&newest));
    }
}
