//! Register Form

use std::fmt;

use crate::api::dto::RegisterRequest;
use crate::api::ApiClient;
use crate::validation::validate_registration;

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    error: Option<String>,
    success: Option<String>,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Create the account. Registration does not sign in.
    pub async fn submit(&mut self, api: &ApiClient) -> bool {
        self.error = None;
        self.success = None;

        let registration = match validate_registration(
            &self.name,
            &self.email,
            &self.password,
            &self.confirm_password,
        ) {
            Ok(registration) => registration,
            Err(e) => {
                self.error = Some(e.to_string());
                return false;
            }
        };

        let request = RegisterRequest {
            name: registration.name,
            email: registration.email,
            password: registration.password,
        };
        match api.register(&request).await {
            Ok(_) => {
                self.success = Some("Registration successful! You can now log in.".to_string());
                self.name.clear();
                self.email.clear();
                self.password.clear();
                self.confirm_password.clear();
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }
}

impl fmt::Display for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Register")?;
        if let Some(error) = &self.error {
            writeln!(f, "Error: {}", error)?;
        }
        if let Some(success) = &self.success {
            writeln!(f, "{}", success)?;
        }
        writeln!(f, "  Name: {}", self.name)?;
        writeln!(f, "  Email: {}", self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, MockBackend, TAKEN_EMAIL};

    fn form(email: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            ..RegisterForm::default()
        }
    }

    #[tokio::test]
    async fn test_register_clears_form() {
        let backend = MockBackend::spawn().await;
        let (api, _) = testing::signed_out_client(&backend);

        let mut register = form("ada@example.com", "secret123", "secret123");
        assert!(register.submit(&api).await);

        assert_eq!(
            register.success(),
            Some("Registration successful! You can now log in.")
        );
        assert!(register.name.is_empty());
        assert!(register.email.is_empty());
        assert!(register.password.is_empty());
        assert!(register.confirm_password.is_empty());
        assert!(!api.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_mismatched_passwords_send_nothing() {
        let backend = MockBackend::spawn().await;
        let (api, _) = testing::signed_out_client(&backend);

        let mut register = form("ada@example.com", "secret123", "secret124");
        assert!(!register.submit(&api).await);
        assert_eq!(register.error(), Some("Passwords do not match"));
        assert_eq!(backend.state.requests(), 0);
    }

    #[tokio::test]
    async fn test_existing_email() {
        let backend = MockBackend::spawn().await;
        let (api, _) = testing::signed_out_client(&backend);

        let mut register = form(TAKEN_EMAIL, "secret123", "secret123");
        assert!(!register.submit(&api).await);
        assert_eq!(register.error(), Some("User already exists"));
        assert_eq!(register.email, TAKEN_EMAIL);
    }
}
