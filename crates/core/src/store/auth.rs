use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{config::AdminAccount, error::AuthError};

/// A signed-in admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Account email.
    pub email: String,
    /// When the session was opened.
    pub signed_in_at: DateTime<Utc>,
}

/// Admin authentication with observable session state.
pub trait AuthProvider: Send + Sync {
    /// Open a session for valid credentials.
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    /// Close the current session, if any.
    fn sign_out(&self);
    /// Receiver notified on every session change; holds the current session.
    fn watch(&self) -> watch::Receiver<Option<Session>>;
}

/// Checks credentials against the configured admin accounts.
pub struct LocalAuth {
    admins: Vec<AdminAccount>,
    state: watch::Sender<Option<Session>>,
}

impl LocalAuth {
    /// Provider accepting the given accounts.
    pub fn new(admins: Vec<AdminAccount>) -> Self {
        let (state, _) = watch::channel(None);
        Self { admins, state }
    }

    /// Currently signed-in session.
    pub fn current(&self) -> Option<Session> {
        self.state.borrow().clone()
    }
}

impl AuthProvider for LocalAuth {
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim();
        let matched = self
            .admins
            .iter()
            .any(|admin| admin.email.eq_ignore_ascii_case(email) && admin.password == password);
        if !matched {
            warn!("rejected admin sign-in attempt");
            return Err(AuthError::NotAdmin);
        }

        let session = Session {
            email: email.to_string(),
            signed_in_at: Utc::now(),
        };
        self.state.send_replace(Some(session.clone()));
        info!(email = %session.email, "admin signed in");
        Ok(session)
    }

    fn sign_out(&self) {
        if self.state.send_replace(None).is_some() {
            info!("admin signed out");
        }
    }

    fn watch(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }
}
