//! Sign-in, registration and company membership.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{User, UserRole};
use crate::validate::{self, FormCheck};

use super::ApiClient;

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(&self) -> Result<()> {
        FormCheck::new()
            .check("email", validate::email(&self.email))
            .check("password", validate::login_password(&self.password))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
}

impl Registration {
    pub fn validate(&self) -> Result<()> {
        FormCheck::new()
            .check("fullname", validate::fullname(&self.fullname))
            .check("email", validate::email(&self.email))
            .check("password", validate::new_password(&self.password))
            .check(
                "role",
                self.role.is_none().then(|| "Please select a role".to_string()),
            )
            .finish()
    }
}

/// `data` of a successful login or registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

impl ApiClient {
    /// Validate, sign in, and store the session.
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        credentials.validate()?;
        let payload: AuthPayload = self.post(&["auth", "login"], credentials).await?;
        tracing::info!(user = %payload.user.id, "signed in");
        self.session()
            .sign_in(payload.token, payload.user.clone())?;
        Ok(payload.user)
    }

    /// Validate, register, and store the new session.
    pub async fn register(&self, registration: &Registration) -> Result<User> {
        registration.validate()?;
        let payload: AuthPayload = self.post(&["auth", "register"], registration).await?;
        tracing::info!(user = %payload.user.id, "registered");
        self.session()
            .sign_in(payload.token, payload.user.clone())?;
        Ok(payload.user)
    }

    /// Members of a company, for assignee and lead selection.
    pub async fn company_members(&self, company_id: &str) -> Result<Vec<User>> {
        self.get(&["auth", "company", company_id]).await
    }
}
