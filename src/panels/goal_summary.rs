//! Goal Summary Panel

use std::fmt;

use super::{group_thousands, LoadState};
use crate::api::ApiClient;
use crate::types::Goal;

#[derive(Debug, Clone)]
pub struct GoalSummaryPanel {
    state: LoadState<Goal>,
}

impl Default for GoalSummaryPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl GoalSummaryPanel {
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
        }
    }

    pub async fn fetch(api: &ApiClient) -> LoadState<Goal> {
        if !api.session().is_authenticated() {
            return LoadState::Empty;
        }

        match api.get_goal().await {
            Ok(Some(goal)) => LoadState::Ready(goal),
            Ok(None) => LoadState::Empty,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch goals");
                LoadState::Failed(e.to_string())
            }
        }
    }

    pub fn apply(&mut self, state: LoadState<Goal>) {
        self.state = state;
    }

    pub async fn load(&mut self, api: &ApiClient) {
        self.apply(Self::fetch(api).await);
    }

    pub fn state(&self) -> &LoadState<Goal> {
        &self.state
    }
}

impl fmt::Display for GoalSummaryPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Your Goals")?;
        match &self.state {
            LoadState::Loading => writeln!(f, "Loading goals..."),
            LoadState::Failed(message) => writeln!(f, "Error: {}", message),
            LoadState::Empty => writeln!(
                f,
                "You haven't set any goals yet. Choose \"Set Goals\" to define them!"
            ),
            LoadState::Ready(goal) => {
                writeln!(
                    f,
                    "  Daily Calories: {} kcal",
                    group_thousands(goal.daily_calories)
                )?;
                writeln!(
                    f,
                    "  Weekly Workouts: {}",
                    group_thousands(goal.weekly_workouts)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, MockBackend};

    #[tokio::test]
    async fn test_shows_grouped_values() {
        let backend = MockBackend::spawn().await;
        backend.state.set_goal(Some(Goal {
            daily_calories: 2500.0,
            weekly_workouts: 4.0,
        }));
        let (api, _) = testing::signed_in_client(&backend);

        let mut panel = GoalSummaryPanel::new();
        panel.load(&api).await;

        let text = panel.to_string();
        assert!(text.contains("Daily Calories: 2,500 kcal"));
        assert!(text.contains("Weekly Workouts: 4"));
    }

    #[tokio::test]
    async fn test_no_goal_yet() {
        let backend = MockBackend::spawn().await;
        let (api, _) = testing::signed_in_client(&backend);

        let mut panel = GoalSummaryPanel::new();
        panel.load(&api).await;

        assert_eq!(panel.state(), &LoadState::Empty);
        assert!(panel.to_string().contains("You haven't set any goals yet."));
    }

    #[tokio::test]
    async fn test_expired_token_shows_error() {
        let backend = MockBackend::spawn().await;
        backend.state.expire_tokens();
        let (api, handler) = testing::signed_in_client(&backend);

        let mut panel = GoalSummaryPanel::new();
        panel.load(&api).await;

        assert_eq!(panel.state().error(), Some("Token is not valid"));
        assert_eq!(handler.count(), 1);
        assert!(!api.session().is_authenticated());
    }
}
