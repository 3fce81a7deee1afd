//! Application-scoped session context.
//!
//! The session (auth token, signed-in user, company id) has exactly one
//! owner: [`SessionContext`]. Everything that needs auth is handed a clone of
//! the context instead of reading the session file on its own. Writes go
//! through the context, which persists them to `session.json` in the
//! issuedesk home directory.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};

use crate::config::home_dir;
use crate::error::{DeskError, Result};
use crate::types::User;

/// On-disk form of the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    company_id: Option<String>,
}

/// In-memory session. The token never appears in `Debug` output.
#[derive(Default)]
pub struct Session {
    token: Option<SecretBox<String>>,
    user: Option<User>,
    company_id: Option<String>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .field("company_id", &self.company_id)
            .finish()
    }
}

impl Session {
    fn from_stored(stored: StoredSession) -> Self {
        Self {
            token: stored.token.map(|t| SecretBox::new(Box::new(t))),
            user: stored.user,
            company_id: stored.company_id,
        }
    }

    fn to_stored(&self) -> StoredSession {
        StoredSession {
            token: self.token.as_ref().map(|t| t.expose_secret().clone()),
            user: self.user.clone(),
            company_id: self.company_id.clone(),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn company_id(&self) -> Option<&str> {
        self.company_id.as_deref()
    }
}

/// Shared handle to the session. Cloning shares the same state.
#[derive(Clone, Debug)]
pub struct SessionContext {
    inner: Arc<RwLock<Session>>,
    path: Option<PathBuf>,
}

impl SessionContext {
    /// Load the session from the issuedesk home directory.
    pub fn load() -> Result<Self> {
        Self::load_from(home_dir()?.join("session.json"))
    }

    /// Load the session from an explicit file. A missing file is an empty
    /// session.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let stored = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            StoredSession::default()
        };

        Ok(Self {
            inner: Arc::new(RwLock::new(Session::from_stored(stored))),
            path: Some(path),
        })
    }

    /// A session that lives only in memory.
    pub fn ephemeral() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Session::default())),
            path: None,
        }
    }

    /// The bearer token, if signed in.
    pub fn token(&self) -> Option<String> {
        self.inner
            .read()
            .token
            .as_ref()
            .map(|t| t.expose_secret().clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.inner.read().is_signed_in()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.read().user.clone()
    }

    /// Company id, preferring the explicit value over the user's own.
    pub fn company_id(&self) -> Option<String> {
        let session = self.inner.read();
        session
            .company_id
            .clone()
            .or_else(|| session.user.as_ref().and_then(|u| u.company_id.clone()))
    }

    /// Fail with [`DeskError::NotLoggedIn`] unless a token is present.
    pub fn require_signed_in(&self) -> Result<()> {
        if self.is_signed_in() {
            Ok(())
        } else {
            Err(DeskError::NotLoggedIn)
        }
    }

    /// Record a successful login or registration and persist it.
    pub fn sign_in(&self, token: String, user: User) -> Result<()> {
        {
            let mut session = self.inner.write();
            session.company_id = user.company_id.clone().or(session.company_id.take());
            session.token = Some(SecretBox::new(Box::new(token)));
            session.user = Some(user);
        }
        self.persist()
    }

    pub fn set_company_id(&self, company_id: Option<String>) -> Result<()> {
        self.inner.write().company_id = company_id;
        self.persist()
    }

    /// Forget everything and persist the empty session.
    pub fn sign_out(&self) -> Result<()> {
        *self.inner.write() = Session::default();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let stored = self.inner.read().to_stored();
        if stored.token.is_none() && stored.user.is_none() && stored.company_id.is_none() {
            if path.exists() {
                fs::remove_file(path)?;
            }
            return Ok(());
        }

        fs::write(path, serde_json::to_string_pretty(&stored)?)?;
        tracing::debug!(path = %path.display(), "session saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HOME_ENV;
    use crate::test_guards::EnvGuard;
    use serial_test::serial;
    use tempfile::TempDir;

    fn user(company: Option<&str>) -> User {
        User {
            id: "u1".to_string(),
            fullname: "Ada".to_string(),
            email: "a@b.com".to_string(),
            company_id: company.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_sign_in_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let session = SessionContext::load_from(path.clone()).unwrap();
        assert!(!session.is_signed_in());
        session.sign_in("t1".to_string(), user(Some("c1"))).unwrap();

        let reloaded = SessionContext::load_from(path).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("t1"));
        assert_eq!(reloaded.user().map(|u| u.email), Some("a@b.com".to_string()));
        assert_eq!(reloaded.company_id().as_deref(), Some("c1"));
    }

    #[test]
    #[serial]
    fn test_load_reads_from_home() {
        let dir = TempDir::new().unwrap();
        let _home = unsafe { EnvGuard::set(HOME_ENV, dir.path()) };

        SessionContext::load()
            .unwrap()
            .sign_in("t9".to_string(), user(None))
            .unwrap();
        assert!(dir.path().join("session.json").exists());
        assert_eq!(SessionContext::load().unwrap().token().as_deref(), Some("t9"));
    }

    #[test]
    fn test_sign_out_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let session = SessionContext::load_from(path.clone()).unwrap();
        session.sign_in("t1".to_string(), user(None)).unwrap();
        assert!(path.exists());

        session.sign_out().unwrap();
        assert!(!path.exists());
        assert!(session.token().is_none());
        assert!(matches!(session.require_signed_in(), Err(DeskError::NotLoggedIn)));
    }

    #[test]
    fn test_clones_share_state() {
        let session = SessionContext::ephemeral();
        let other = session.clone();
        session.sign_in("shared".to_string(), user(None)).unwrap();
        assert_eq!(other.token().as_deref(), Some("shared"));
    }

    #[test]
    fn test_explicit_company_id_survives_login_without_one() {
        let session = SessionContext::ephemeral();
        session.set_company_id(Some("c7".to_string())).unwrap();
        session.sign_in("t".to_string(), user(None)).unwrap();
        assert_eq!(session.company_id().as_deref(), Some("c7"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = SessionContext::ephemeral();
        session.sign_in("super-secret".to_string(), user(None)).unwrap();
        let debug = format!("{:?}", session);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
