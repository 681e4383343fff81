//! Application root
//!
//! Wires the session, the API client and the navigator together. The
//! navigator is registered as the client's unauthorized handler, so any
//! 401 lands the user on the login page.

use std::sync::Arc;

use crate::api::{ApiClient, ClientResult};
use crate::config::Config;
use crate::nav::{header_links, Command, HeaderLink, Navigator, Page};
use crate::session::{FileSessionStore, SessionContext, SessionStore};
use crate::types::User;

pub struct App {
    config: Config,
    api: ApiClient,
    navigator: Arc<Navigator>,
}

impl App {
    /// Restore the persisted session from the configured directory
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let store = Arc::new(FileSessionStore::new(config.session.path()));
        Self::with_store(config, store).await
    }

    pub async fn with_store(config: Config, store: Arc<dyn SessionStore>) -> anyhow::Result<Self> {
        let session = SessionContext::restore(store).await?;
        let navigator = Arc::new(Navigator::new());
        let api = ApiClient::new(&config.api, session)?
            .with_unauthorized_handler(navigator.clone());

        tracing::debug!(
            api_url = %api.base_url(),
            signed_in = api.session().is_authenticated(),
            "App started"
        );

        Ok(Self {
            config,
            api,
            navigator,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionContext {
        self.api.session()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn user(&self) -> Option<User> {
        self.session().user()
    }

    pub fn header(&self) -> Vec<HeaderLink> {
        header_links(self.session().is_authenticated())
    }

    /// After a successful login
    pub fn on_logged_in(&self) {
        self.navigator.home();
    }

    /// After the detail page deleted its activity
    pub fn on_activity_deleted(&self) {
        self.navigator.home();
    }

    /// Clear the session everywhere and return home.
    ///
    /// The in-memory session is gone and the page is Home even when the
    /// store fails to clear; the store error is still returned.
    pub async fn logout(&self) -> ClientResult<()> {
        let cleared = self.session().invalidate().await;
        self.navigator.home();
        match cleared {
            Ok(true) => {
                tracing::info!("Signed out");
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, "Failed to remove stored session");
                Err(e.into())
            }
        }
    }

    /// Go to `page`, or to login if it needs a session we don't have
    pub fn open(&self, page: Page) {
        if page.requires_session() && !self.session().is_authenticated() {
            self.navigator.navigate(Page::Login);
        } else {
            self.navigator.navigate(page);
        }
    }

    /// Apply a command that means the same on every page.
    ///
    /// Returns `false` for commands the current page handles itself. A
    /// logout error is returned after the page has moved home.
    pub async fn follow(&self, command: &Command) -> ClientResult<bool> {
        match command {
            Command::Go(page) => {
                self.open(page.clone());
                Ok(true)
            }
            Command::Logout => {
                self.logout().await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
