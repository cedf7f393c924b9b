use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use super::{transition, Session, Transition};

/// Owner of the current session snapshot.
///
/// All writes go through [`SessionStore::dispatch`], which applies a transition
/// under the channel's write lock and publishes the result. Readers only ever
/// see whole snapshots. Clone is cheap and every clone shares the same cell.
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Arc<Session>>>,
}

impl SessionStore {
    /// Create a store seeded with the signed-out session
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Session::default()));
        Self { tx: Arc::new(tx) }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<Session> {
        Arc::clone(&self.tx.borrow())
    }

    /// Observe every snapshot published after this call
    pub fn subscribe(&self) -> watch::Receiver<Arc<Session>> {
        self.tx.subscribe()
    }

    /// Apply a transition and publish the new snapshot.
    ///
    /// Concurrent dispatches are applied one at a time in the order they reach
    /// the lock. Subscribers are only notified when the snapshot changed.
    pub fn dispatch(&self, action: &Transition) -> Arc<Session> {
        let mut published = None;

        let changed = self.tx.send_if_modified(|current| {
            let next = transition(current, action);
            if next == **current {
                published = Some(Arc::clone(current));
                return false;
            }
            let next = Arc::new(next);
            *current = Arc::clone(&next);
            published = Some(next);
            true
        });

        let snapshot = published.unwrap_or_else(|| self.snapshot());
        if changed {
            info!(
                transition = %action.kind,
                authenticated = snapshot.is_authenticated(),
                "Session transition applied"
            );
        } else {
            debug!(transition = %action.kind, "Transition left session unchanged");
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionPatch;

    fn login(token: &str) -> Transition {
        Transition::login(SessionPatch {
            email: Some("a@b.com".to_string()),
            token: Some(token.to_string()),
            ..SessionPatch::default()
        })
    }

    #[test]
    fn test_starts_signed_out() {
        let store = SessionStore::new();
        assert_eq!(*store.snapshot(), Session::default());
    }

    #[test]
    fn test_dispatch_publishes_to_subscribers() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        let snapshot = store.dispatch(&login("T1"));
        assert_eq!(snapshot.token, "T1");
        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(rx.borrow_and_update().token, "T1");
    }

    #[test]
    fn test_clones_share_one_cell() {
        let store = SessionStore::new();
        let other = store.clone();
        other.dispatch(&login("T1"));
        assert_eq!(store.snapshot().token, "T1");
    }

    #[test]
    fn test_unchanged_snapshot_is_not_republished() {
        let store = SessionStore::new();
        store.dispatch(&login("T1"));
        let before = store.snapshot();
        let rx = store.subscribe();

        let after = store.dispatch(&Transition::new("NOPE", None));
        assert!(Arc::ptr_eq(&before, &after));
        assert!(!rx.has_changed().expect("sender alive"));
    }

    #[test]
    fn test_logout_clears_session() {
        let store = SessionStore::new();
        store.dispatch(&login("T1"));
        let snapshot = store.dispatch(&Transition::logout());
        assert!(!snapshot.is_authenticated());
        assert_eq!(*snapshot, Session::default());
    }
}
