//! Login Form

use std::fmt;

use crate::api::ApiClient;
use crate::types::User;
use crate::validation::validate_login;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    error: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sign in and establish the session. Returns the signed-in user.
    pub async fn submit(&mut self, api: &ApiClient) -> Option<User> {
        self.error = None;

        let (email, password) = match validate_login(&self.email, &self.password) {
            Ok(credentials) => credentials,
            Err(e) => {
                self.error = Some(e.to_string());
                return None;
            }
        };

        let session = match api.login(&email, &password).await {
            Ok(session) => session,
            Err(e) => {
                self.error = Some(e.to_string());
                return None;
            }
        };

        let user = session.user.clone();
        if let Err(e) = api.session().establish(session).await {
            tracing::error!(error = %e, "Failed to persist session");
            self.error = Some(e.to_string());
            return None;
        }

        tracing::info!(user = %user.id, "Signed in");
        self.password.clear();
        Some(user)
    }
}

impl fmt::Display for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Login")?;
        if let Some(error) = &self.error {
            writeln!(f, "Error: {}", error)?;
        }
        writeln!(f, "  Email: {}", self.email)?;
        writeln!(f, "  Password: {}", "*".repeat(self.password.chars().count()))
    }
}
