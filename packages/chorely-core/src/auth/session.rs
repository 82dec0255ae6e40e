//! In-memory session store.
//!
//! The store is a single-writer state container: every mutation goes through
//! a `watch` channel write, so a reader building an `Authorization` header
//! always sees a complete session, never a half-applied update.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Current tokens and user identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Opaque user record returned by the login endpoint
    pub user: Option<serde_json::Value>,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}

/// Shared handle to the session. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    tx: watch::Sender<Session>,
    // Only written inside `send_modify`, so it moves together with the session.
    revision: AtomicU64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Empty (logged out) store.
    pub fn new() -> Self {
        Self::with_session(Session::default())
    }

    /// Store seeded with a previously persisted session.
    pub fn with_session(session: Session) -> Self {
        let (tx, _rx) = watch::channel(session);
        Self {
            inner: Arc::new(Inner {
                tx,
                revision: AtomicU64::new(0),
            }),
        }
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.inner.tx.borrow().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.tx.borrow().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner.tx.borrow().refresh_token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.tx.borrow().access_token.is_some()
    }

    /// Monotonic counter bumped by every mutation.
    pub fn revision(&self) -> u64 {
        let _guard = self.inner.tx.borrow();
        self.inner.revision.load(Ordering::Acquire)
    }

    /// Access token together with the revision it belongs to.
    pub(crate) fn access_token_at(&self) -> (Option<String>, u64) {
        let guard = self.inner.tx.borrow();
        (
            guard.access_token.clone(),
            self.inner.revision.load(Ordering::Acquire),
        )
    }

    /// Login: replace the whole session.
    pub fn set_session(
        &self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        user: Option<serde_json::Value>,
    ) {
        let session = Session {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
            user,
        };
        self.modify(|s| *s = session);
        tracing::debug!("Session replaced after login");
    }

    /// Refresh: replace the access token only.
    pub fn set_access_token(&self, access_token: impl Into<String>) {
        let token = access_token.into();
        self.modify(|s| s.access_token = Some(token));
        tracing::debug!("Access token updated");
    }

    /// Logout: drop tokens and user.
    pub fn clear(&self) {
        self.modify(|s| *s = Session::default());
        tracing::debug!("Session cleared");
    }

    /// Receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.tx.subscribe()
    }

    fn modify(&self, f: impl FnOnce(&mut Session)) {
        self.inner.tx.send_modify(|session| {
            f(session);
            self.inner.revision.fetch_add(1, Ordering::AcqRel);
        });
    }
}
