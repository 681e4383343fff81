//! Core Data Types
//!
//! Records exchanged with the Fit_Gy backend: users, activities and goals.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Backend identifier of an activity record
pub type ActivityId = String;

/// Default daily calorie target shown before a goal is loaded
pub const DEFAULT_DAILY_CALORIES: f64 = 2000.0;

/// Default weekly workout target shown before a goal is loaded
pub const DEFAULT_WEEKLY_WORKOUTS: f64 = 3.0;

/// Public profile of the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UserRecord")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A logged workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ActivityRecord")]
pub struct Activity {
    #[serde(rename(serialize = "_id"))]
    pub id: ActivityId,
    pub activity_name: String,
    /// Minutes
    pub duration: f64,
    pub calories_burned: f64,
    /// ISO date (`2024-01-01`) or RFC 3339 timestamp
    pub date: String,
}

impl Activity {
    /// Calendar day of the activity, if the date parses
    pub fn day(&self) -> Option<NaiveDate> {
        parse_day(&self.date)
    }
}

/// Body of `POST /api/activities`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub activity_name: String,
    pub duration: f64,
    pub calories_burned: f64,
    pub date: String,
}

/// Per-user fitness targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(deserialize_with = "lenient_number")]
    pub daily_calories: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub weekly_workouts: f64,
}

impl Default for Goal {
    fn default() -> Self {
        Self {
            daily_calories: DEFAULT_DAILY_CALORIES,
            weekly_workouts: DEFAULT_WEEKLY_WORKOUTS,
        }
    }
}

/// Records may carry `_id`, `id` or both; `_id` wins
fn record_id(mongo_id: Option<String>, id: Option<String>) -> Result<String, String> {
    mongo_id
        .or(id)
        .ok_or_else(|| "missing field `_id`".to_string())
}

#[derive(Deserialize)]
struct UserRecord {
    #[serde(rename = "_id")]
    mongo_id: Option<String>,
    id: Option<String>,
    name: String,
    email: String,
}

impl TryFrom<UserRecord> for User {
    type Error = String;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record_id(record.mongo_id, record.id)?,
            name: record.name,
            email: record.email,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityRecord {
    #[serde(rename = "_id")]
    mongo_id: Option<String>,
    id: Option<String>,
    activity_name: String,
    #[serde(deserialize_with = "lenient_number")]
    duration: f64,
    #[serde(deserialize_with = "lenient_number")]
    calories_burned: f64,
    date: String,
}

impl TryFrom<ActivityRecord> for Activity {
    type Error = String;

    fn try_from(record: ActivityRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record_id(record.mongo_id, record.id)?,
            activity_name: record.activity_name,
            duration: record.duration,
            calories_burned: record.calories_burned,
            date: record.date,
        })
    }
}

/// Parse a date that is either a plain ISO date or a full timestamp
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Accept numbers the backend may send as JSON strings
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
