// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process registry of signed-in sessions.
//!
//! Sessions are keyed by an opaque random token handed to the browser as a
//! cookie. The provider's access token never leaves the server.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::RngCore;
use tracing::debug;

use promptdeck_core::AuthSession;

/// Length in bytes of a session token before hex encoding.
const TOKEN_BYTES: usize = 32;

/// Maps session tokens to authenticated sessions.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<String, AuthSession>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Store `session` and return the token identifying it.
    ///
    /// The session expires at the earlier of the provider's expiry and the registry TTL.
    pub fn register(&self, mut session: AuthSession) -> String {
        if let Some(cap) = Utc::now().checked_add_signed(self.ttl) {
            session.expires_at = session.expires_at.min(cap);
        }
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        debug!(user_id = %session.user_id, "session registered");
        self.sessions.insert(token.clone(), session);
        token
    }

    /// Session for `token` if it exists and has not expired at `now`.
    pub fn lookup_at(&self, token: &str, now: DateTime<Utc>) -> Option<AuthSession> {
        let session = self.sessions.get(token)?.clone();
        if session.is_expired_at(now) {
            self.sessions.remove(token);
            return None;
        }
        Some(session)
    }

    pub fn lookup(&self, token: &str) -> Option<AuthSession> {
        self.lookup_at(token, Utc::now())
    }

    /// Remove and return the session for `token`.
    pub fn revoke(&self, token: &str) -> Option<AuthSession> {
        self.sessions.remove(token).map(|(_, session)| session)
    }

    /// Drop every session expired at `now`; returns how many were dropped.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired_at(now));
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_in: i64) -> AuthSession {
        AuthSession {
            user_id: "u1".into(),
            email: "dev@shopos.ai".into(),
            access_token: "provider-token".into(),
            expires_at: Utc::now() + Duration::seconds(expires_in),
        }
    }

    #[test]
    fn registered_session_is_found_by_token() {
        let registry = SessionRegistry::new(Duration::days(7));
        let token = registry.register(session(3600));
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert_eq!(registry.lookup(&token).unwrap().email, "dev@shopos.ai");
        assert!(registry.lookup("unknown").is_none());
    }

    #[test]
    fn tokens_are_unique() {
        let registry = SessionRegistry::new(Duration::days(7));
        let a = registry.register(session(3600));
        let b = registry.register(session(3600));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn expiry_is_capped_by_ttl() {
        let registry = SessionRegistry::new(Duration::seconds(60));
        let token = registry.register(session(86_400));
        let stored = registry.lookup(&token).unwrap();
        assert!(stored.expires_at <= Utc::now() + Duration::seconds(60));
    }

    #[test]
    fn expired_session_is_dropped_on_lookup() {
        let registry = SessionRegistry::new(Duration::days(7));
        let token = registry.register(session(60));
        let later = Utc::now() + Duration::seconds(120);
        assert!(registry.lookup_at(&token, later).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn revoke_and_purge() {
        let registry = SessionRegistry::new(Duration::days(7));
        let short = registry.register(session(60));
        let long = registry.register(session(7200));
        assert_eq!(registry.purge_expired(Utc::now() + Duration::seconds(600)), 1);
        assert!(registry.lookup(&short).is_none());
        assert!(registry.revoke(&long).is_some());
        assert!(registry.revoke(&long).is_none());
    }
}
