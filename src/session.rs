//! Sign-in state shared between the controller, API client, and background jobs.
//!
//! The store is observable: consumers register callbacks and are notified on
//! sign-in and sign-out. Signing out drops every subscription after the
//! sign-out notification; long-lived consumers re-subscribe on the next
//! sign-in.

mod token_store;

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

pub use token_store::{SessionTokenStore, SessionTokenStoreError};

/// Backend role attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "user")]
    Doctor,
}

impl UserRole {
    pub fn is_admin(self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Human-readable role label for the session box and user table.
    pub fn label(self) -> &'static str {
        match self {
            UserRole::Admin => "Administrator",
            UserRole::Doctor => "Doctor",
        }
    }

    /// The value the backend uses for this role in bodies and query strings.
    pub fn wire_name(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Doctor => "user",
        }
    }
}

/// Identity details of the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// An authenticated session: bearer token plus the owning profile.
///
/// The token is never serialized; persistence goes through
/// [`SessionTokenStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub profile: Profile,
}

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Profile),
    SignedOut,
}

/// Handle returned by [`SessionStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&SessionEvent) + Send>;

#[derive(Default)]
struct StoreInner {
    session: Option<Session>,
    next_subscription: u64,
    subscribers: Vec<(u64, Subscriber)>,
}

/// Shared, observable holder of the active session.
///
/// Clones share state; the store is cheap to hand to background jobs.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session, if signed in.
    pub fn snapshot(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    /// Bearer token of the active session.
    pub fn token(&self) -> Option<String> {
        self.lock().session.as_ref().map(|s| s.token.clone())
    }

    /// Profile of the active session.
    pub fn profile(&self) -> Option<Profile> {
        self.lock().session.as_ref().map(|s| s.profile.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.lock().session.is_some()
    }

    /// Register a change callback. Callbacks run on the thread that mutates
    /// the store, so they must not block.
    pub fn subscribe(&self, callback: impl Fn(&SessionEvent) + Send + 'static) -> SubscriptionId {
        let mut inner = self.lock();
        let id = inner.next_subscription;
        inner.next_subscription += 1;
        inner.subscribers.push((id, Box::new(callback)));
        SubscriptionId(id)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().subscribers.retain(|(sub, _)| *sub != id.0);
    }

    /// Install a session and notify subscribers.
    pub fn sign_in(&self, session: Session) {
        let profile = session.profile.clone();
        {
            let mut inner = self.lock();
            inner.session = Some(session);
        }
        self.notify(&SessionEvent::SignedIn(profile));
    }

    /// Clear the session, notify subscribers, and tear the subscriptions down.
    pub fn sign_out(&self) {
        let subscribers = {
            let mut inner = self.lock();
            if inner.session.take().is_none() {
                return;
            }
            std::mem::take(&mut inner.subscribers)
        };
        let event = SessionEvent::SignedOut;
        for (_, callback) in &subscribers {
            callback(&event);
        }
    }

    fn notify(&self, event: &SessionEvent) {
        // Callbacks run outside the lock so they may re-enter the store.
        let subscribers = std::mem::take(&mut self.lock().subscribers);
        for (_, callback) in &subscribers {
            callback(event);
        }
        let mut inner = self.lock();
        let added = std::mem::take(&mut inner.subscribers);
        inner.subscribers = subscribers;
        inner.subscribers.extend(added);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(|err| err.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn sample_session(name: &str) -> Session {
        Session {
            token: format!("tok_{name}"),
            profile: Profile {
                user_id: "u-1".into(),
                name: name.into(),
                email: format!("{name}@clinic.test"),
                role: UserRole::Admin,
            },
        }
    }

    #[test]
    fn sign_in_notifies_subscribers() {
        let store = SessionStore::new();
        let (tx, rx) = mpsc::channel();
        store.subscribe(move |event| {
            let _ = tx.send(event.clone());
        });

        store.sign_in(sample_session("ada"));

        assert!(store.is_signed_in());
        match rx.try_recv().unwrap() {
            SessionEvent::SignedIn(profile) => assert_eq!(profile.name, "ada"),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let store = SessionStore::new();
        let (tx, rx) = mpsc::channel();
        let id = store.subscribe(move |event| {
            let _ = tx.send(event.clone());
        });
        store.unsubscribe(id);

        store.sign_in(sample_session("ada"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn sign_out_notifies_then_tears_down() {
        let store = SessionStore::new();
        let (tx, rx) = mpsc::channel();
        store.subscribe(move |event| {
            let _ = tx.send(event.clone());
        });

        store.sign_in(sample_session("ada"));
        store.sign_out();

        assert!(!store.is_signed_in());
        let first = rx.try_recv().unwrap();
        assert_eq!(first, SessionEvent::SignedIn(sample_session("ada").profile));
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::SignedOut);

        // The old subscription is gone after sign-out.
        store.sign_in(sample_session("grace"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn sign_out_without_session_is_a_no_op() {
        let store = SessionStore::new();
        let (tx, rx) = mpsc::channel();
        store.subscribe(move |event| {
            let _ = tx.send(event.clone());
        });

        store.sign_out();
        assert!(rx.try_recv().is_err());
        assert!(!store.is_signed_in());
    }

    #[test]
    fn subscribing_from_a_callback_does_not_deadlock() {
        let store = SessionStore::new();
        let nested = store.clone();
        store.subscribe(move |_| {
            nested.subscribe(|_| {});
        });
        store.sign_in(sample_session("ada"));
        assert!(store.is_signed_in());
    }

    #[test]
    fn role_labels_and_admin_check() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Doctor.is_admin());
        assert_eq!(UserRole::Doctor.label(), "Doctor");
    }
}
