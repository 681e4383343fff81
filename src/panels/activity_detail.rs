//! Activity Detail Panel

use std::fmt;

use super::{format_day, format_number, Confirm, DeleteOutcome, LoadState, DELETE_PROMPT};
use crate::api::ApiClient;
use crate::types::{Activity, ActivityId};

#[derive(Debug, Clone)]
pub struct ActivityDetailPanel {
    id: ActivityId,
    state: LoadState<Activity>,
    error: Option<String>,
}

impl ActivityDetailPanel {
    pub fn new(id: impl Into<ActivityId>) -> Self {
        Self {
            id: id.into(),
            state: LoadState::Loading,
            error: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &LoadState<Activity> {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn fetch(api: &ApiClient, id: &str) -> LoadState<Activity> {
        if !api.session().is_authenticated() {
            return LoadState::Failed("Please log in.".to_string());
        }

        match api.get_activity(id).await {
            Ok(activity) => LoadState::Ready(activity),
            Err(e) if e.is_not_found() => LoadState::Empty,
            Err(e) => LoadState::Failed(e.to_string()),
        }
    }

    pub async fn load(&mut self, api: &ApiClient) {
        self.state = Self::fetch(api, &self.id).await;
    }

    /// Delete the shown activity after confirmation.
    ///
    /// On `Deleted` the caller leaves the page.
    pub async fn delete(&mut self, api: &ApiClient, confirm: &dyn Confirm) -> DeleteOutcome {
        if !confirm.confirm(DELETE_PROMPT) {
            return DeleteOutcome::Cancelled;
        }

        self.error = None;
        match api.delete_activity(&self.id).await {
            Ok(()) => DeleteOutcome::Deleted,
            Err(e) => {
                tracing::warn!(activity = %self.id, error = %e, "Delete failed");
                self.error = Some(e.to_string());
                DeleteOutcome::Failed
            }
        }
    }
}

impl fmt::Display for ActivityDetailPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let activity = match &self.state {
            LoadState::Loading => return writeln!(f, "Loading activity details..."),
            LoadState::Failed(message) => return writeln!(f, "Error: {}", message),
            LoadState::Empty => return writeln!(f, "Activity not found."),
            LoadState::Ready(activity) => activity,
        };

        writeln!(f, "{}", activity.activity_name)?;
        writeln!(f)?;
        writeln!(f, "Duration: {} minutes", format_number(activity.duration))?;
        writeln!(f, "Calories Burned: {} kcal", format_number(activity.calories_burned))?;
        writeln!(f, "Date: {}", format_day(&activity.date))?;
        if let Some(error) = &self.error {
            writeln!(f)?;
            writeln!(f, "Error: {}", error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, MockBackend};

    #[tokio::test]
    async fn test_load_and_render() {
        let backend = MockBackend::spawn().await;
        backend
            .state
            .set_activities(vec![testing::activity("a1", "Run", 250.0, "2024-01-01")]);
        let (api, _) = testing::signed_in_client(&backend);

        let mut panel = ActivityDetailPanel::new("a1");
        panel.load(&api).await;

        let text = panel.to_string();
        assert!(text.starts_with("Run\n"));
        assert!(text.contains("Duration: 30 minutes"));
        assert!(text.contains("Calories Burned: 250 kcal"));
        assert!(text.contains("Date: 01/01/2024"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let backend = MockBackend::spawn().await;
        let (api, handler) = testing::signed_in_client(&backend);

        let mut panel = ActivityDetailPanel::new("missing");
        panel.load(&api).await;

        assert_eq!(panel.state(), &LoadState::Empty);
        assert_eq!(panel.to_string(), "Activity not found.\n");
        // 404 is a resource error, the session survives
        assert!(api.session().is_authenticated());
        assert_eq!(handler.count(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let backend = MockBackend::spawn().await;
        backend
            .state
            .set_activities(vec![testing::activity("a1", "Run", 250.0, "2024-01-01")]);
        let (api, _) = testing::signed_in_client(&backend);

        let mut panel = ActivityDetailPanel::new("a1");
        panel.load(&api).await;

        assert_eq!(panel.delete(&api, &|_: &str| true).await, DeleteOutcome::Deleted);
        assert!(backend.state.activities().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_shows_error() {
        let backend = MockBackend::spawn().await;
        backend
            .state
            .set_activities(vec![testing::activity("a1", "Run", 250.0, "2024-01-01")]);
        backend.state.fail_deletes_silently();
        let (api, _) = testing::signed_in_client(&backend);

        let mut panel = ActivityDetailPanel::new("a1");
        panel.load(&api).await;

        assert_eq!(panel.delete(&api, &|_: &str| true).await, DeleteOutcome::Failed);
        assert_eq!(panel.error(), Some("Failed to delete activity."));
        assert!(panel.to_string().starts_with("Run\n"));
    }
}
