//! # Fit_Gy
//!
//! Client for the Fit_Gy fitness tracker: log workouts, set goals and
//! follow your progress against the Fit_Gy REST backend.
//!
//! ## Modules
//!
//! - [`session`]: persisted bearer token and user profile
//! - [`api`]: REST client with the 401 interceptor
//! - [`panels`]: the feature panels (dashboard, activities, goals, forms)
//! - [`nav`]: the page the user is looking at
//! - [`app`]: wiring of the above
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fitgy::{App, Config};
//! use fitgy::panels::ActivityListPanel;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::start(Config::load_default()).await?;
//!
//!     let mut list = ActivityListPanel::new();
//!     list.load(app.api()).await;
//!     print!("{}", list);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod nav;
pub mod panels;
pub mod session;
pub mod types;
pub mod validation;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, ClientError, ClientResult, UnauthorizedHandler};
pub use app::App;
pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, SessionConfig};
pub use nav::{Navigator, Page};
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionContext, SessionError, SessionStore,
};
pub use types::{Activity, ActivityId, Goal, NewActivity, User};
pub use validation::ValidationError;
