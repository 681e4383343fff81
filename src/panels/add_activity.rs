//! Add Activity Form

use std::fmt;

use chrono::Utc;

use crate::api::ApiClient;
use crate::types::Activity;
use crate::validation::validate_activity;

/// Called with every activity the form creates
pub type OnAdded = Box<dyn FnMut(&Activity) + Send>;

pub struct AddActivityForm {
    pub activity_name: String,
    pub duration: String,
    pub calories_burned: String,
    /// `YYYY-MM-DD`, today by default
    pub date: String,
    error: Option<String>,
    success: Option<String>,
    on_added: Option<OnAdded>,
}

impl Default for AddActivityForm {
    fn default() -> Self {
        Self::new()
    }
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

impl AddActivityForm {
    pub fn new() -> Self {
        Self {
            activity_name: String::new(),
            duration: String::new(),
            calories_burned: String::new(),
            date: today(),
            error: None,
            success: None,
            on_added: None,
        }
    }

    pub fn on_added(mut self, callback: OnAdded) -> Self {
        self.on_added = Some(callback);
        self
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Validate and create the activity.
    ///
    /// Validation failures and a missing session never reach the network.
    pub async fn submit(&mut self, api: &ApiClient) -> Option<Activity> {
        self.error = None;
        self.success = None;

        let activity = match validate_activity(
            &self.activity_name,
            &self.duration,
            &self.calories_burned,
            &self.date,
        ) {
            Ok(activity) => activity,
            Err(e) => {
                self.error = Some(e.to_string());
                return None;
            }
        };

        if !api.session().is_authenticated() {
            self.error = Some("You must be logged in to add an activity.".to_string());
            return None;
        }

        match api.create_activity(&activity).await {
            Ok(created) => {
                tracing::info!(activity = %created.id, "Activity added");
                self.success = Some("Activity added successfully!".to_string());
                self.reset();
                if let Some(callback) = self.on_added.as_mut() {
                    callback(&created);
                }
                Some(created)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    fn reset(&mut self) {
        self.activity_name.clear();
        self.duration.clear();
        self.calories_burned.clear();
        self.date = today();
    }
}

impl fmt::Debug for AddActivityForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddActivityForm")
            .field("activity_name", &self.activity_name)
            .field("duration", &self.duration)
            .field("calories_burned", &self.calories_burned)
            .field("date", &self.date)
            .field("error", &self.error)
            .field("success", &self.success)
            .finish()
    }
}

impl fmt::Display for AddActivityForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Add New Activity")?;
        if let Some(error) = &self.error {
            writeln!(f, "Error: {}", error)?;
        }
        if let Some(success) = &self.success {
            writeln!(f, "{}", success)?;
        }
        writeln!(f, "  Activity Name: {}", self.activity_name)?;
        writeln!(f, "  Duration (minutes): {}", self.duration)?;
        writeln!(f, "  Calories Burned: {}", self.calories_burned)?;
        writeln!(f, "  Date: {}", self.date)
    }
}
