//! Goal Editor
//!
//! Form for the daily calorie and weekly workout targets. Loads the saved
//! goal into the fields on mount.

use std::fmt;

use crate::api::ApiClient;
use crate::types::{Goal, DEFAULT_DAILY_CALORIES, DEFAULT_WEEKLY_WORKOUTS};
use crate::validation::validate_goal;

#[derive(Debug, Clone)]
pub struct GoalEditor {
    pub daily_calories: String,
    pub weekly_workouts: String,
    loading: bool,
    message: Option<String>,
    error: Option<String>,
}

impl Default for GoalEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl GoalEditor {
    pub fn new() -> Self {
        Self {
            daily_calories: DEFAULT_DAILY_CALORIES.to_string(),
            weekly_workouts: DEFAULT_WEEKLY_WORKOUTS.to_string(),
            loading: true,
            message: None,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fill the fields from the saved goal. Without one the defaults stay.
    pub async fn load(&mut self, api: &ApiClient) {
        self.loading = true;
        self.error = None;

        if !api.session().is_authenticated() {
            self.error = Some("Please log in to manage goals.".to_string());
            self.loading = false;
            return;
        }

        match api.get_goal().await {
            // Shortest round-trip form
            Ok(Some(goal)) => {
                self.daily_calories = goal.daily_calories.to_string();
                self.weekly_workouts = goal.weekly_workouts.to_string();
            }
            Ok(None) => {}
            Err(e) => self.error = Some(e.to_string()),
        }
        self.loading = false;
    }

    /// Validate and save. Returns the saved goal on success.
    pub async fn submit(&mut self, api: &ApiClient) -> Option<Goal> {
        self.message = None;
        self.error = None;

        let goal = match validate_goal(&self.daily_calories, &self.weekly_workouts) {
            Ok(goal) => goal,
            Err(e) => {
                self.error = Some(e.to_string());
                return None;
            }
        };

        if !api.session().is_authenticated() {
            self.error = Some("You must be logged in.".to_string());
            return None;
        }

        match api.save_goal(&goal).await {
            Ok(message) => {
                self.message =
                    Some(message.unwrap_or_else(|| "Goals saved successfully!".to_string()));
                tracing::info!(
                    daily_calories = goal.daily_calories,
                    weekly_workouts = goal.weekly_workouts,
                    "Goals saved"
                );
                Some(goal)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

impl fmt::Display for GoalEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Set Your Fitness Goals")?;
        if self.loading {
            return writeln!(f, "Loading goals...");
        }
        if let Some(error) = &self.error {
            writeln!(f, "Error: {}", error)?;
        }
        if let Some(message) = &self.message {
            writeln!(f, "{}", message)?;
        }
        writeln!(f, "  Daily Calorie Target (kcal): {}", self.daily_calories)?;
        writeln!(f, "  Weekly Workout Target: {}", self.weekly_workouts)
    }
}
