//! Feature Panels
//!
//! Self-contained UI units, each bound to one or two REST endpoints. A
//! panel holds its own view state, talks to the backend through an
//! [`ApiClient`](crate::api::ApiClient), and renders itself as text via
//! `Display`.
//!
//! Panels never share data. Every panel fetches on its own, so two panels
//! showing activities can disagree until each reloads.

pub mod activity_chart;
pub mod activity_detail;
pub mod activity_list;
pub mod activity_summary;
pub mod add_activity;
pub mod goal_editor;
pub mod goal_summary;
pub mod home;
pub mod login;
pub mod register;
pub mod scope;

pub use activity_chart::{ActivityChartPanel, ChartPoint};
pub use activity_detail::ActivityDetailPanel;
pub use activity_list::ActivityListPanel;
pub use activity_summary::ActivitySummaryPanel;
pub use add_activity::AddActivityForm;
pub use goal_editor::GoalEditor;
pub use goal_summary::GoalSummaryPanel;
pub use home::{Dashboard, HomePage};
pub use login::LoginForm;
pub use register::RegisterForm;
pub use scope::{shared, PanelScope, Shared};

/// Prompt shown before any delete
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this activity?";

/// State of a panel's mount-time fetch
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Empty,
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Interactive yes/no step before destructive actions
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a delete action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; nothing was sent
    Cancelled,
    Deleted,
    /// The request failed; the panel shows the error
    Failed,
}

/// Whole numbers without a fractional part, others to two places
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.2}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// `2000` → `2,000`
pub fn group_thousands(value: f64) -> String {
    let text = format_number(value);
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest.to_string()),
        None => ("", int_part),
    };

    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Activity date as `MM/DD/YYYY`, or the raw text if it does not parse
pub fn format_day(raw: &str) -> String {
    crate::types::parse_day(raw)
        .map(|d| d.format("%m/%d/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(30.0), "30");
        assert_eq!(format_number(30.5), "30.5");
        assert_eq!(format_number(0.126), "0.13");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(2000.0), "2,000");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1234567.5), "1,234,567.5");
        assert_eq!(group_thousands(-1500.0), "-1,500");
    }

    #[test]
    fn test_format_day() {
        assert_eq!(format_day("2024-01-05"), "01/05/2024");
        assert_eq!(format_day("2024-01-05T10:00:00Z"), "01/05/2024");
        assert_eq!(format_day("someday"), "someday");
    }

    #[test]
    fn test_closure_confirm() {
        let yes = |_: &str| true;
        assert!(yes.confirm(DELETE_PROMPT));
    }
}
