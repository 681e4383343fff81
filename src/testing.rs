//! In-process mock of the Fit_Gy backend for tests.
//!
//! Serves the same routes as the real API from an axum router bound to an
//! ephemeral loopback port, and records every request it sees.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::api::dto::{LoginRequest, RegisterRequest};
use crate::api::{ApiClient, UnauthorizedHandler};
use crate::config::ApiConfig;
use crate::session::{MemorySessionStore, Session, SessionContext};
use crate::types::{Activity, Goal, NewActivity, User};

pub const MOCK_TOKEN: &str = "mock-token";
pub const MOCK_PASSWORD: &str = "secret123";
pub const TAKEN_EMAIL: &str = "taken@example.com";

pub fn mock_user() -> User {
    User {
        id: "u1".to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
    }
}

pub fn mock_session() -> Session {
    Session {
        token: MOCK_TOKEN.to_string(),
        user: mock_user(),
    }
}

pub fn new_activity(name: &str) -> NewActivity {
    NewActivity {
        activity_name: name.to_string(),
        duration: 30.0,
        calories_burned: 250.0,
        date: "2024-01-01".to_string(),
    }
}

pub fn activity(id: &str, name: &str, calories: f64, date: &str) -> Activity {
    Activity {
        id: id.to_string(),
        activity_name: name.to_string(),
        duration: 30.0,
        calories_burned: calories,
        date: date.to_string(),
    }
}

/// Counts unauthorized notifications
#[derive(Debug, Default)]
pub struct CountingHandler {
    calls: AtomicUsize,
}

impl CountingHandler {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl UnauthorizedHandler for CountingHandler {
    fn on_unauthorized(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Client against `backend` holding a valid session
pub fn signed_in_client(backend: &MockBackend) -> (ApiClient, Arc<CountingHandler>) {
    client_with(backend, Some(mock_session()))
}

/// Client against `backend` with no session
pub fn signed_out_client(backend: &MockBackend) -> (ApiClient, Arc<CountingHandler>) {
    client_with(backend, None)
}

fn client_with(backend: &MockBackend, session: Option<Session>) -> (ApiClient, Arc<CountingHandler>) {
    let store = match &session {
        Some(s) => MemorySessionStore::with_session(s.clone()),
        None => MemorySessionStore::new(),
    };
    let context = SessionContext::new(Arc::new(store), session);
    let handler = Arc::new(CountingHandler::default());
    let client = ApiClient::new(&backend.config(), context)
        .unwrap()
        .with_unauthorized_handler(handler.clone());
    (client, handler)
}

/// Backend state shared with the handlers
#[derive(Default)]
pub struct MockState {
    requests: AtomicUsize,
    auth_headers: Mutex<Vec<Option<String>>>,
    activities: Mutex<Vec<Activity>>,
    goal: Mutex<Option<Goal>>,
    next_id: AtomicUsize,
    expired: AtomicBool,
    fail_deletes: AtomicBool,
    reject_logins: AtomicBool,
    list_delay_ms: AtomicU64,
}

impl MockState {
    /// Total requests received
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// `Authorization` header of each request, in arrival order
    pub fn auth_headers(&self) -> Vec<Option<String>> {
        self.auth_headers.lock().unwrap().clone()
    }

    /// Stored activities, newest first
    pub fn activities(&self) -> Vec<Activity> {
        self.activities.lock().unwrap().clone()
    }

    pub fn set_activities(&self, activities: Vec<Activity>) {
        *self.activities.lock().unwrap() = activities;
    }

    pub fn set_goal(&self, goal: Option<Goal>) {
        *self.goal.lock().unwrap() = goal;
    }

    pub fn goal(&self) -> Option<Goal> {
        *self.goal.lock().unwrap()
    }

    /// Reject every token from now on
    pub fn expire_tokens(&self) {
        self.expired.store(true, Ordering::SeqCst);
    }

    /// Make deletes fail with a 500 and an empty body
    pub fn fail_deletes_silently(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    /// Answer every login with a 401
    pub fn reject_logins(&self) {
        self.reject_logins.store(true, Ordering::SeqCst);
    }

    /// Delay `GET /api/activities` responses
    pub fn delay_list(&self, delay: Duration) {
        self.list_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    fn record(&self, headers: &HeaderMap) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.auth_headers.lock().unwrap().push(auth);
    }

    fn authorized(&self, headers: &HeaderMap) -> Result<(), Response> {
        self.record(headers);
        let expected = format!("Bearer {}", MOCK_TOKEN);
        let presented = headers.get("authorization").and_then(|v| v.to_str().ok());
        if self.expired.load(Ordering::SeqCst) || presented != Some(expected.as_str()) {
            return Err(message(StatusCode::UNAUTHORIZED, "Token is not valid"));
        }
        Ok(())
    }
}

/// Running mock server
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(MockState::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(Arc::clone(&state));

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    pub fn config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
        }
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/activities", get(list_activities).post(create_activity))
        .route(
            "/api/activities/:id",
            get(get_activity).delete(delete_activity),
        )
        .route("/api/goals", get(get_goal).post(save_goal))
        .with_state(state)
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

async fn register(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<RegisterRequest>,
) -> Response {
    state.record(&headers);
    if body.email == TAKEN_EMAIL {
        return message(StatusCode::BAD_REQUEST, "User already exists");
    }
    message(StatusCode::CREATED, "User registered successfully")
}

async fn login(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Response {
    state.record(&headers);
    if state.reject_logins.load(Ordering::SeqCst) {
        return message(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    if body.password != MOCK_PASSWORD {
        return message(StatusCode::BAD_REQUEST, "Invalid email or password");
    }
    let user = User {
        email: body.email,
        ..mock_user()
    };
    Json(json!({ "token": MOCK_TOKEN, "user": user })).into_response()
}

async fn list_activities(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(resp) = state.authorized(&headers) {
        return resp;
    }
    let delay = state.list_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    Json(state.activities()).into_response()
}

async fn get_activity(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = state.authorized(&headers) {
        return resp;
    }
    match state.activities().into_iter().find(|a| a.id == id) {
        Some(activity) => Json(activity).into_response(),
        None => message(StatusCode::NOT_FOUND, "Activity not found"),
    }
}

async fn create_activity(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<NewActivity>,
) -> Response {
    if let Err(resp) = state.authorized(&headers) {
        return resp;
    }
    let id = format!("new{}", state.next_id.fetch_add(1, Ordering::SeqCst) + 1);
    let activity = Activity {
        id,
        activity_name: body.activity_name,
        duration: body.duration,
        calories_burned: body.calories_burned,
        date: body.date,
    };
    state.activities.lock().unwrap().insert(0, activity.clone());
    (StatusCode::CREATED, Json(json!({ "activity": activity }))).into_response()
}

async fn delete_activity(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = state.authorized(&headers) {
        return resp;
    }
    if state.fail_deletes.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let removed = {
        let mut activities = state.activities.lock().unwrap();
        let before = activities.len();
        activities.retain(|a| a.id != id);
        activities.len() != before
    };
    if !removed {
        return message(StatusCode::NOT_FOUND, "Activity not found");
    }
    message(StatusCode::OK, "Activity removed")
}

async fn get_goal(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(resp) = state.authorized(&headers) {
        return resp;
    }
    Json(state.goal()).into_response()
}

async fn save_goal(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(goal): Json<Goal>,
) -> Response {
    if let Err(resp) = state.authorized(&headers) {
        return resp;
    }
    state.set_goal(Some(goal));
    message(StatusCode::OK, "Goals updated successfully")
}
