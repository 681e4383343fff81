//! Fit_Gy REST API Client
//!
//! A configured reqwest client that attaches the current bearer token to
//! every request and intercepts 401 responses.

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::dto::{
    AuthResponse, CreateActivityResponse, ErrorBody, LoginRequest, MessageResponse,
    RegisterRequest,
};
use super::error::{ClientError, ClientResult};
use crate::config::ApiConfig;
use crate::session::{Session, SessionContext};
use crate::types::{Activity, Goal, NewActivity};

/// Reacts to the backend rejecting the session token
pub trait UnauthorizedHandler: Send + Sync {
    /// Called once per 401 response, after the session has been cleared
    fn on_unauthorized(&self);
}

/// HTTP client for the Fit_Gy backend
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionContext,
    on_unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// No request timeout is set; calls wait for the server.
    pub fn new(config: &ApiConfig, session: SessionContext) -> ClientResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("fitgy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            on_unauthorized: None,
        })
    }

    /// Register the handler invoked when a response is 401
    pub fn with_unauthorized_handler(mut self, handler: Arc<dyn UnauthorizedHandler>) -> Self {
        self.on_unauthorized = Some(handler);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    // ============ Auth ============

    /// Create an account, returning the server's confirmation message
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<Option<String>> {
        let response = self
            .send_credentials(Method::POST, "/api/register", Some(request), "Registration failed.")
            .await?;
        let body: MessageResponse = decode_or_default(response).await;
        Ok(body.message)
    }

    /// Exchange credentials for a session. The caller decides whether to
    /// establish it.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .send_credentials(
                Method::POST,
                "/api/login",
                Some(&request),
                "Login failed. Please check credentials.",
            )
            .await?;
        let auth: AuthResponse = decode(response).await?;
        Ok(Session {
            token: auth.token,
            user: auth.user,
        })
    }

    // ============ Activities ============

    /// All activities of the signed-in user, newest first
    pub async fn list_activities(&self) -> ClientResult<Vec<Activity>> {
        let response = self
            .send(
                Method::GET,
                "/api/activities",
                None::<&()>,
                "Failed to fetch activities.",
            )
            .await?;
        decode(response).await
    }

    pub async fn get_activity(&self, id: &str) -> ClientResult<Activity> {
        let response = self
            .send(
                Method::GET,
                &activity_path(id),
                None::<&()>,
                "Activity not found or unauthorized.",
            )
            .await?;
        decode(response).await
    }

    pub async fn create_activity(&self, activity: &NewActivity) -> ClientResult<Activity> {
        let response = self
            .send(
                Method::POST,
                "/api/activities",
                Some(activity),
                "Failed to add activity",
            )
            .await?;
        let created: CreateActivityResponse = decode(response).await?;
        Ok(created.activity)
    }

    pub async fn delete_activity(&self, id: &str) -> ClientResult<()> {
        self.send(
            Method::DELETE,
            &activity_path(id),
            None::<&()>,
            "Failed to delete activity.",
        )
        .await?;
        Ok(())
    }

    // ============ Goals ============

    /// The user's goal, `None` when none has been set
    pub async fn get_goal(&self) -> ClientResult<Option<Goal>> {
        let response = self
            .send(Method::GET, "/api/goals", None::<&()>, "Failed to fetch goals")
            .await?;
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Create or replace the user's goal
    pub async fn save_goal(&self, goal: &Goal) -> ClientResult<Option<String>> {
        let response = self
            .send(Method::POST, "/api/goals", Some(goal), "Failed to save goals")
            .await?;
        let body: MessageResponse = decode_or_default(response).await;
        Ok(body.message)
    }

    // ============ Request pipeline ============

    /// Send a request through the auth pipeline.
    ///
    /// `fallback` is the error text used when a failed response carries no
    /// message of its own.
    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        fallback: &str,
    ) -> ClientResult<Response>
    where
        B: Serialize + ?Sized,
    {
        self.dispatch(method, path, body, fallback, Auth::Session).await
    }

    /// Send a login or registration request. These carry credentials
    /// rather than the token, so a 401 is a rejected login and leaves the
    /// current session alone.
    async fn send_credentials<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        fallback: &str,
    ) -> ClientResult<Response>
    where
        B: Serialize + ?Sized,
    {
        self.dispatch(method, path, body, fallback, Auth::Credentials).await
    }

    async fn dispatch<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        fallback: &str,
        auth: Auth,
    ) -> ClientResult<Response>
    where
        B: Serialize + ?Sized,
    {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::debug_span!(
            "api_request",
            method = %method,
            path = %path,
            request_id = %request_id,
        );

        async move {
            let mut request = self
                .http
                .request(method, format!("{}{}", self.base_url, path))
                .header("x-request-id", &request_id);

            if auth == Auth::Session {
                if let Some(token) = self.session.token() {
                    request = request.bearer_auth(token);
                }
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await.map_err(|e| {
                tracing::warn!(error = %e, "Request failed");
                ClientError::Network(e)
            })?;

            let status = response.status();
            tracing::debug!(status = status.as_u16(), "Response received");

            if status == StatusCode::UNAUTHORIZED && auth == Auth::Session {
                let message = error_message(response, "Unauthorized. Please log in again.").await;
                self.handle_unauthorized().await;
                return Err(ClientError::Unauthorized { message });
            }

            if !status.is_success() {
                let message = error_message(response, fallback).await;
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            Ok(response)
        }
        .instrument(span)
        .await
    }

    async fn handle_unauthorized(&self) {
        tracing::warn!("Token expired or unauthorized, clearing session");

        if let Err(e) = self.session.invalidate().await {
            tracing::error!(error = %e, "Failed to clear stored session");
        }
        if let Some(handler) = &self.on_unauthorized {
            handler.on_unauthorized();
        }
    }
}

/// What authenticates a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    /// The stored bearer token; a 401 invalidates the session
    Session,
    /// Credentials in the body; a 401 is an ordinary failure
    Credentials,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

fn activity_path(id: &str) -> String {
    format!("/api/activities/{}", urlencoding::encode(id))
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    response
        .json()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

async fn decode_or_default<T: DeserializeOwned + Default>(response: Response) -> T {
    response.json().await.unwrap_or_default()
}

async fn error_message(response: Response, fallback: &str) -> String {
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
