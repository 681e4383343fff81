//! Recent Activity Panel
//!
//! The few newest activities on the dashboard. Selecting one opens its
//! detail page.

use std::fmt;

use super::{format_day, format_number, LoadState};
use crate::api::ApiClient;
use crate::nav::Page;
use crate::types::Activity;

/// How many activities the summary shows
pub const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone)]
pub struct ActivitySummaryPanel {
    state: LoadState<Vec<Activity>>,
}

impl Default for ActivitySummaryPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivitySummaryPanel {
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
        }
    }

    /// Newest activities. The backend returns them newest first.
    pub async fn fetch(api: &ApiClient) -> LoadState<Vec<Activity>> {
        if !api.session().is_authenticated() {
            return LoadState::Empty;
        }

        match api.list_activities().await {
            Ok(activities) if activities.is_empty() => LoadState::Empty,
            Ok(mut activities) => {
                activities.truncate(RECENT_LIMIT);
                LoadState::Ready(activities)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch recent activities");
                LoadState::Failed(e.to_string())
            }
        }
    }

    pub fn apply(&mut self, state: LoadState<Vec<Activity>>) {
        self.state = state;
    }

    pub async fn load(&mut self, api: &ApiClient) {
        self.apply(Self::fetch(api).await);
    }

    pub fn state(&self) -> &LoadState<Vec<Activity>> {
        &self.state
    }

    pub fn activities(&self) -> &[Activity] {
        self.state.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Detail page for the entry at 1-based `position`
    pub fn select(&self, position: usize) -> Option<Page> {
        let activity = self.activities().get(position.checked_sub(1)?)?;
        Some(Page::ActivityDetail {
            id: activity.id.clone(),
        })
    }
}

impl fmt::Display for ActivitySummaryPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recent Activity")?;
        match &self.state {
            LoadState::Loading => writeln!(f, "Loading activities..."),
            LoadState::Failed(message) => writeln!(f, "Error: {}", message),
            LoadState::Empty => writeln!(
                f,
                "You haven't logged any activities yet. Choose \"Add New Activity\" to start!"
            ),
            LoadState::Ready(activities) => {
                for (i, activity) in activities.iter().enumerate() {
                    writeln!(
                        f,
                        "  {}. {:<20} {:<12} {:>6} kcal",
                        i + 1,
                        activity.activity_name,
                        format_day(&activity.date),
                        format_number(activity.calories_burned)
                    )?;
                }
                Ok(())
            }
        }
    }
}
