//! Form validation
//!
//! Synchronous checks run before any mutating request. A failed check
//! produces the inline message shown to the user and no network call.

use thiserror::Error;

use crate::types::{parse_day, Goal, NewActivity};

/// Shortest password accepted at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// A user-editable form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ActivityName,
    Duration,
    CaloriesBurned,
    Date,
    DailyCalories,
    WeeklyWorkouts,
    Name,
    Email,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::ActivityName => "Activity Name",
            Field::Duration => "Duration",
            Field::CaloriesBurned => "Calories Burned",
            Field::Date => "Date",
            Field::DailyCalories => "Target Daily Calories",
            Field::WeeklyWorkouts => "Target Workouts Per Week",
            Field::Name => "Name",
            Field::Email => "Email",
        }
    }

    fn unit_hint(self) -> &'static str {
        match self {
            Field::Duration => " (in minutes)",
            _ => "",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{} is required.", .0.label())]
    Required(Field),

    #[error("{} must be a positive number{}.", .0.label(), .0.unit_hint())]
    NotPositive(Field),

    #[error("{} must be a valid date (YYYY-MM-DD).", .0.label())]
    InvalidDate(Field),

    #[error("Please enter both email and password.")]
    MissingCredentials,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {} characters long.", MIN_PASSWORD_LEN)]
    PasswordTooShort,
}

/// Trimmed, non-empty text
pub fn require_text(field: Field, input: &str) -> Result<String, ValidationError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(value.to_string())
}

/// A finite number strictly greater than zero
pub fn positive_number(field: Field, input: &str) -> Result<f64, ValidationError> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotPositive(field))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::NotPositive(field));
    }
    Ok(value)
}

/// Validate the add-activity form, in field order
pub fn validate_activity(
    activity_name: &str,
    duration: &str,
    calories_burned: &str,
    date: &str,
) -> Result<NewActivity, ValidationError> {
    let activity_name = require_text(Field::ActivityName, activity_name)?;
    let duration = positive_number(Field::Duration, duration)?;
    let calories_burned = positive_number(Field::CaloriesBurned, calories_burned)?;
    let date = require_text(Field::Date, date)?;
    if parse_day(&date).is_none() {
        return Err(ValidationError::InvalidDate(Field::Date));
    }

    Ok(NewActivity {
        activity_name,
        duration,
        calories_burned,
        date,
    })
}

/// Validate the goal editor
pub fn validate_goal(daily_calories: &str, weekly_workouts: &str) -> Result<Goal, ValidationError> {
    Ok(Goal {
        daily_calories: positive_number(Field::DailyCalories, daily_calories)?,
        weekly_workouts: positive_number(Field::WeeklyWorkouts, weekly_workouts)?,
    })
}

/// Validate login credentials. The password is not trimmed.
pub fn validate_login(email: &str, password: &str) -> Result<(String, String), ValidationError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok((email.to_string(), password.to_string()))
}

/// Validated registration fields
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<Registration, ValidationError> {
    let name = require_text(Field::Name, name)?;
    let email = require_text(Field::Email, email)?;
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(Registration {
        name,
        email,
        password: password.to_string(),
    })
}
