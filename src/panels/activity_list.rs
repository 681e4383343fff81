//! Activity List Panel
//!
//! Every activity of the user, with delete.

use std::fmt;

use super::{format_day, format_number, Confirm, DeleteOutcome, LoadState, DELETE_PROMPT};
use crate::api::ApiClient;
use crate::types::Activity;

#[derive(Debug, Clone)]
pub struct ActivityListPanel {
    state: LoadState<Vec<Activity>>,
    error: Option<String>,
}

impl Default for ActivityListPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityListPanel {
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
            error: None,
        }
    }

    pub async fn fetch(api: &ApiClient) -> LoadState<Vec<Activity>> {
        if !api.session().is_authenticated() {
            return LoadState::Failed("Please log in to see your activities.".to_string());
        }

        match api.list_activities().await {
            Ok(activities) if activities.is_empty() => LoadState::Empty,
            Ok(activities) => LoadState::Ready(activities),
            Err(e) => LoadState::Failed(e.to_string()),
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

    /// Error from the last delete, shown above the list
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Delete one activity after confirmation.
    ///
    /// Only a successful response removes it from the list.
    pub async fn delete(&mut self, api: &ApiClient, id: &str, confirm: &dyn Confirm) -> DeleteOutcome {
        if !confirm.confirm(DELETE_PROMPT) {
            return DeleteOutcome::Cancelled;
        }

        self.error = None;
        match api.delete_activity(id).await {
            Ok(()) => {
                self.remove(id);
                DeleteOutcome::Deleted
            }
            Err(e) => {
                tracing::warn!(activity = %id, error = %e, "Delete failed");
                self.error = Some(e.to_string());
                DeleteOutcome::Failed
            }
        }
    }

    fn remove(&mut self, id: &str) {
        let now_empty = match &mut self.state {
            LoadState::Ready(activities) => {
                activities.retain(|a| a.id != id);
                activities.is_empty()
            }
            _ => false,
        };
        if now_empty {
            self.state = LoadState::Empty;
        }
    }
}

impl fmt::Display for ActivityListPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            LoadState::Loading => return writeln!(f, "Loading activities..."),
            LoadState::Failed(message) => return writeln!(f, "Error: {}", message),
            LoadState::Empty => {
                if let Some(error) = &self.error {
                    writeln!(f, "Error: {}", error)?;
                }
                return writeln!(f, "No activities found. Go add one!");
            }
            LoadState::Ready(_) => {}
        }

        writeln!(f, "Your Activities")?;
        if let Some(error) = &self.error {
            writeln!(f, "Error: {}", error)?;
        }
        for activity in self.activities() {
            writeln!(f)?;
            writeln!(f, "  {}  [{}]", activity.activity_name, activity.id)?;
            writeln!(f, "    Duration: {} minutes", format_number(activity.duration))?;
            writeln!(f, "    Calories: {} kcal", format_number(activity.calories_burned))?;
            writeln!(f, "    Date: {}", format_day(&activity.date))?;
        }
        Ok(())
    }
}
