//! Session state and its pure transition function.
//!
//! # States
//! - Unknown: a persisted token may exist but has not been verified
//! - Authenticated: token verified, user known
//! - Anonymous: no usable token
//!
//! # State Transitions
//! ```text
//! Unknown → Authenticated: token verified, or login succeeded
//! Unknown → Anonymous: no persisted token, or verification failed
//! Authenticated → Anonymous: logout, or any call answered 401
//! Anonymous → Authenticated: login succeeded
//! ```

use crate::models::UserProfile;

/// Coarse authentication phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthPhase {
    Unknown,
    Authenticated,
    Anonymous,
}

/// Inputs to the session state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A token was found in persistent storage at startup.
    TokenRestored(String),
    /// Startup found no persisted token.
    NoPersistedToken,
    /// The backend accepted the current token and returned the user.
    Verified(UserProfile),
    /// Verifying the restored token failed.
    VerificationFailed,
    /// Login returned a fresh token and user.
    LoggedIn {
        user: UserProfile,
        access_token: String,
    },
    /// The profile was re-fetched or edited.
    ProfileUpdated(UserProfile),
    /// The user logged out.
    LoggedOut,
    /// A call was answered with 401.
    Unauthorized,
}

/// Snapshot of who is logged in.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub phase: AuthPhase,
    pub user: Option<UserProfile>,
    pub access_token: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: AuthPhase::Unknown,
            user: None,
            access_token: None,
        }
    }
}

impl SessionState {
    fn anonymous() -> Self {
        Self {
            phase: AuthPhase::Anonymous,
            user: None,
            access_token: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated
    }

    /// Apply `event`, returning the next state. Events that do not apply to
    /// the current phase leave the state unchanged.
    pub fn reduce(&self, event: &SessionEvent) -> SessionState {
        use AuthPhase::*;

        match (self.phase, event) {
            (Unknown, SessionEvent::TokenRestored(token)) => Self {
                phase: Unknown,
                user: None,
                access_token: Some(token.clone()),
            },
            (Unknown, SessionEvent::NoPersistedToken) => Self::anonymous(),
            (Unknown, SessionEvent::Verified(user)) if self.access_token.is_some() => Self {
                phase: Authenticated,
                user: Some(user.clone()),
                access_token: self.access_token.clone(),
            },
            (Unknown, SessionEvent::VerificationFailed) => Self::anonymous(),
            (Authenticated, SessionEvent::Verified(user) | SessionEvent::ProfileUpdated(user)) => {
                let mut next = self.clone();
                match next.user.as_mut() {
                    Some(current) => current.merge(user.clone()),
                    None => next.user = Some(user.clone()),
                }
                next
            }
            (_, SessionEvent::LoggedIn { user, access_token }) => Self {
                phase: Authenticated,
                user: Some(user.clone()),
                access_token: Some(access_token.clone()),
            },
            (Unknown | Authenticated, SessionEvent::LoggedOut | SessionEvent::Unauthorized) => {
                Self::anonymous()
            }
            _ => self.clone(),
        }
    }
}

/// The phase change caused by one dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: AuthPhase,
    pub to: AuthPhase,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    pub fn entered(&self, phase: AuthPhase) -> bool {
        self.changed() && self.to == phase
    }
}
