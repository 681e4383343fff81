//! Request and response bodies for the Fit_Gy REST API

use serde::{Deserialize, Serialize};

use crate::types::{Activity, User};

/// `POST /api/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// `POST /api/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Bodies that only carry a human-readable message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Successful `POST /api/activities`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActivityResponse {
    pub activity: Activity,
}

/// Error body, `{ "message": "..." }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
