// User accounts and sessions
//
// In-memory user registry keyed by email, and the cookie sessions that point
// at those users. Shared between server workers behind an async RwLock.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::defaults;
use crate::identity::GoogleProfile;

/// Account holder
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CustomUser {
    pub username: String,
    pub email: String,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl fmt::Display for CustomUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

#[derive(Debug, Clone)]
struct Session {
    email: String,
    created_at: DateTime<Utc>,
}

impl Session {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= Duration::seconds(defaults::SESSION_MAX_AGE_SECS)
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    users: HashMap<String, CustomUser>,
    sessions: HashMap<String, Session>,
}

impl StoreInner {
    /// Drop every session past its maximum age
    fn purge_expired(&mut self, now: DateTime<Utc>) {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(now));
        let purged = before - self.sessions.len();
        if purged > 0 {
            debug!("Purged {} expired session(s)", purged);
        }
    }

    /// Email local part, suffixed with a counter until no other user has it
    fn unique_username(&self, email: &str) -> String {
        let base = email.split('@').next().unwrap_or_default();
        let base = if base.is_empty() { "user" } else { base };
        let taken = |name: &str| self.users.values().any(|u| u.username == name);

        if !taken(base) {
            return base.to_string();
        }
        let mut counter = 1;
        loop {
            let candidate = format!("{}{}", base, counter);
            if !taken(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }
}

/// Users and their active sessions
#[derive(Debug, Clone, Default)]
pub struct AccountStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign in the profile's user, creating it on first login
    ///
    /// Returns the new session id and the user.
    pub async fn login(&self, profile: &GoogleProfile) -> (String, CustomUser) {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let email = profile.email.to_lowercase();

        // Expired sessions are only ever cleaned up here
        inner.purge_expired(now);

        let new_username = if inner.users.contains_key(&email) {
            None
        } else {
            Some(inner.unique_username(&email))
        };

        let session_id = Uuid::new_v4().simple().to_string();
        inner.sessions.insert(
            session_id.clone(),
            Session {
                email: email.clone(),
                created_at: now,
            },
        );

        let user = inner.users.entry(email.clone()).or_insert_with(|| {
            let username = new_username.unwrap_or_default();
            info!("Creating user {} for {}", username, email);
            CustomUser {
                username,
                email: email.clone(),
                date_joined: now,
                last_login: None,
            }
        });
        user.last_login = Some(now);
        let user = user.clone();
        debug!("Session started for {}", user);
        (session_id, user)
    }

    /// User behind a session id, if the session is still active
    ///
    /// Sessions older than `SESSION_MAX_AGE_SECS` count as logged out.
    pub async fn user_for_session(&self, session_id: &str) -> Option<CustomUser> {
        let inner = self.inner.read().await;
        let now = Utc::now();
        inner
            .sessions
            .get(session_id)
            .filter(|session| !session.is_expired(now))
            .and_then(|session| inner.users.get(&session.email))
            .cloned()
    }

    /// End a session, returning whether it existed
    pub async fn logout(&self, session_id: &str) -> bool {
        let removed = self.inner.write().await.sessions.remove(session_id);
        if let Some(session) = &removed {
            debug!("Session ended for {}", session.email);
        }
        removed.is_some()
    }

    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }

    /// Number of stored sessions, expired or not
    pub async fn session_count(&self) -> usize {
        self.inner.read().await.sessions.len()
    }
}
