//! Root Navigator
//!
//! The page the user is looking at. Pages form a closed set; the activity
//! id only exists on the detail page. There is no URL routing.

use tokio::sync::watch;

use crate::api::UnauthorizedHandler;
use crate::types::ActivityId;

/// A top-level page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Login,
    Register,
    AddActivity,
    SetGoals,
    ActivityDetail { id: ActivityId },
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Login => "Login",
            Page::Register => "Register",
            Page::AddActivity => "Add Activity",
            Page::SetGoals => "Set Goals",
            Page::ActivityDetail { .. } => "Activity Detail",
        }
    }

    /// Pages that are only reachable with a session
    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            Page::AddActivity | Page::SetGoals | Page::ActivityDetail { .. }
        )
    }
}

/// Entry in the page header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLink {
    Go { label: &'static str, page: Page },
    Logout,
}

impl HeaderLink {
    pub fn label(&self) -> &'static str {
        match self {
            HeaderLink::Go { label, .. } => *label,
            HeaderLink::Logout => "Logout",
        }
    }
}

/// Header entries for the signed-in or signed-out state
pub fn header_links(signed_in: bool) -> Vec<HeaderLink> {
    if signed_in {
        vec![
            HeaderLink::Go {
                label: "Home",
                page: Page::Home,
            },
            HeaderLink::Logout,
        ]
    } else {
        vec![
            HeaderLink::Go {
                label: "Login",
                page: Page::Login,
            },
            HeaderLink::Go {
                label: "Register",
                page: Page::Register,
            },
        ]
    }
}

/// Holds the current page and notifies subscribers of transitions
#[derive(Debug)]
pub struct Navigator {
    tx: watch::Sender<Page>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Start on the home page
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Page::Home);
        Self { tx }
    }

    pub fn current(&self) -> Page {
        self.tx.borrow().clone()
    }

    pub fn navigate(&self, page: Page) {
        tracing::debug!(from = ?*self.tx.borrow(), to = ?page, "Navigate");
        self.tx.send_replace(page);
    }

    pub fn home(&self) {
        self.navigate(Page::Home);
    }

    /// Show the detail page of one activity
    pub fn open_activity(&self, id: impl Into<ActivityId>) {
        self.navigate(Page::ActivityDetail { id: id.into() });
    }

    /// Receiver that observes every page change
    pub fn subscribe(&self) -> watch::Receiver<Page> {
        self.tx.subscribe()
    }
}

/// A line typed at the interactive prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move to another page
    Go(Page),
    /// Open the n-th recent activity on the dashboard, 1-based
    View(usize),
    List,
    Delete,
    Logout,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// An empty line means home.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, arg.trim()),
            None => (line, ""),
        };

        match (word, arg) {
            ("" | "home", "") => Command::Go(Page::Home),
            ("login", "") => Command::Go(Page::Login),
            ("register", "") => Command::Go(Page::Register),
            ("add", "") => Command::Go(Page::AddActivity),
            ("goals", "") => Command::Go(Page::SetGoals),
            ("show", id) if !id.is_empty() => Command::Go(Page::ActivityDetail {
                id: id.to_string(),
            }),
            ("view", n) => match n.parse::<usize>() {
                Ok(position) if position > 0 => Command::View(position),
                _ => Command::Unknown(line.to_string()),
            },
            ("list", "") => Command::List,
            ("delete", "") => Command::Delete,
            ("logout", "") => Command::Logout,
            ("help", "") => Command::Help,
            ("quit" | "exit", "") => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

impl UnauthorizedHandler for Navigator {
    fn on_unauthorized(&self) {
        self.navigate(Page::Login);
    }
}
