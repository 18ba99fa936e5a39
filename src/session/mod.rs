//! Session/auth subsystem.
//!
//! # Data Flow
//! ```text
//! AuthService (login/logout/verify) ─┐
//! ApiClient (any 401) ───────────────┼─▶ Session::dispatch(event)
//!                                    │      → state.rs reduce (pure)
//!                                    │      → atomic swap of Arc<SessionState>
//!                                    │      → side effects, once per change:
//!                                    │          enter Authenticated: persist token
//!                                    │          enter Anonymous: clear token + user cache
//!                                    │          token replaced: evict user cache
//! ApiClient (every request) ─────────┴─▶ Session::access_token()
//! ```
//!
//! # Design Decisions
//! - Reads are lock-free snapshots (`ArcSwap`)
//! - Only the client's 401 path and the auth facade dispatch events
//! - Persistence failures are logged, never surfaced

pub mod navigation;
pub mod state;
pub mod store;

use arc_swap::ArcSwap;
use serde_json::Value;
use std::sync::Arc;

pub use navigation::{login_redirect, Navigator, NoopNavigator};
pub use state::{AuthPhase, SessionEvent, SessionState, Transition};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};

use crate::cache::ResponseCache;
use crate::client::ApiResponse;
use crate::models::UserProfile;

/// Cache key prefixes holding data that belongs to the logged-in user.
pub const USER_SCOPED_PREFIXES: &[&str] = &["/bookings", "/payments", "/users"];

/// Process-wide holder of the current user and access token.
#[derive(Clone)]
pub struct Session {
    state: Arc<ArcSwap<SessionState>>,
    tokens: Arc<dyn TokenStore>,
    cache: ResponseCache<ApiResponse<Value>>,
}

impl Session {
    pub fn new(tokens: Arc<dyn TokenStore>, cache: ResponseCache<ApiResponse<Value>>) -> Self {
        Self {
            state: Arc::new(ArcSwap::from_pointee(SessionState::default())),
            tokens,
            cache,
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<SessionState> {
        self.state.load_full()
    }

    pub fn phase(&self) -> AuthPhase {
        self.state.load().phase
    }

    pub fn access_token(&self) -> Option<String> {
        self.state.load().access_token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.load().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.load().is_authenticated()
    }

    /// Token persisted by a previous run, if any.
    pub fn persisted_token(&self) -> Option<String> {
        match self.tokens.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted session token");
                None
            }
        }
    }

    /// Apply `event` atomically and run the side effects of the resulting
    /// phase change. Concurrent dispatches of the same event change the
    /// phase at most once.
    pub fn dispatch(&self, event: SessionEvent) -> Transition {
        let prev = self.state.rcu(|current| Arc::new(current.reduce(&event)));
        // `rcu` returned the state our update was applied to, so this is the
        // state we installed.
        let next = prev.reduce(&event);
        let transition = Transition {
            from: prev.phase,
            to: next.phase,
        };

        if transition.changed() {
            tracing::info!(
                from = ?transition.from,
                to = ?transition.to,
                "Session transition"
            );
        }

        let token_changed = prev.access_token != next.access_token;

        match transition.to {
            AuthPhase::Authenticated if transition.changed() || token_changed => {
                if let Some(token) = next.access_token.as_deref() {
                    if let Err(e) = self.tokens.save(token) {
                        tracing::warn!(error = %e, "Failed to persist session token");
                    }
                }
            }
            AuthPhase::Anonymous if transition.changed() => {
                if let Err(e) = self.tokens.clear() {
                    tracing::warn!(error = %e, "Failed to clear persisted session token");
                }
            }
            _ => {}
        }

        // Cached user data belongs to whoever held the previous token.
        if token_changed || transition.entered(AuthPhase::Anonymous) {
            self.evict_user_data();
        }

        transition
    }
}

impl Session {
    fn evict_user_data(&self) {
        let evicted: usize = USER_SCOPED_PREFIXES
            .iter()
            .map(|prefix| self.cache.invalidate_prefix(prefix))
            .sum();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted cached user data");
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.load();
        // The token itself is never printed.
        f.debug_struct("Session")
            .field("phase", &state.phase)
            .field("user", &state.user.as_ref().map(|u| u.user_id))
            .field("has_token", &state.access_token.is_some())
            .finish()
    }
}
