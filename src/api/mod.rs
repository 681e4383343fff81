//! Fit_Gy REST API Client
//!
//! Typed access to the backend, with the session pipeline built in.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /api/register` - Create an account
//! - `POST /api/login` - Exchange credentials for a token
//!
//! ## Activities (token required)
//! - `GET /api/activities` - List activities, newest first
//! - `GET /api/activities/:id` - Get one activity
//! - `POST /api/activities` - Log an activity
//! - `DELETE /api/activities/:id` - Delete an activity
//!
//! ## Goals (token required)
//! - `GET /api/goals` - Current goal or `null`
//! - `POST /api/goals` - Create or replace the goal
//!
//! # Example
//!
//! ```rust,no_run
//! use fitgy::api::ApiClient;
//! use fitgy::config::ApiConfig;
//! use fitgy::session::{FileSessionStore, SessionContext};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FileSessionStore::new("/tmp/fitgy-session"));
//!     let session = SessionContext::restore(store).await?;
//!     let client = ApiClient::new(&ApiConfig::default(), session)?;
//!
//!     for activity in client.list_activities().await? {
//!         println!("{} ({} kcal)", activity.activity_name, activity.calories_burned);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod dto;
pub mod error;

pub use client::{ApiClient, UnauthorizedHandler};
pub use error::{ClientError, ClientResult};
