//! Calories Chart Panel
//!
//! Calories burned per activity over time, drawn as horizontal text bars.

use std::fmt;

use super::{format_number, LoadState};
use crate::api::ApiClient;
use crate::types::Activity;

/// Widest bar, in characters
const BAR_WIDTH: usize = 40;

/// One bar of the chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// `MM/DD`
    pub label: String,
    pub calories: f64,
}

#[derive(Debug, Clone)]
pub struct ActivityChartPanel {
    state: LoadState<Vec<ChartPoint>>,
}

impl Default for ActivityChartPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityChartPanel {
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
        }
    }

    pub async fn fetch(api: &ApiClient) -> LoadState<Vec<ChartPoint>> {
        if !api.session().is_authenticated() {
            return LoadState::Empty;
        }

        match api.list_activities().await {
            Ok(activities) if activities.is_empty() => LoadState::Empty,
            Ok(activities) => LoadState::Ready(points(activities)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch chart data");
                LoadState::Failed(e.to_string())
            }
        }
    }

    pub fn apply(&mut self, state: LoadState<Vec<ChartPoint>>) {
        self.state = state;
    }

    pub async fn load(&mut self, api: &ApiClient) {
        self.apply(Self::fetch(api).await);
    }

    pub fn state(&self) -> &LoadState<Vec<ChartPoint>> {
        &self.state
    }

    pub fn points(&self) -> &[ChartPoint] {
        self.state.ready().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Chart points, oldest first. Activities with an unreadable date keep
/// their relative order at the end.
pub fn points(mut activities: Vec<Activity>) -> Vec<ChartPoint> {
    activities.reverse();
    activities.sort_by_key(|a| {
        let day = a.day();
        (day.is_none(), day)
    });

    activities
        .into_iter()
        .map(|a| ChartPoint {
            label: a
                .day()
                .map(|d| d.format("%m/%d").to_string())
                .unwrap_or_else(|| a.date.clone()),
            calories: a.calories_burned,
        })
        .collect()
}

impl fmt::Display for ActivityChartPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Calories Burned Over Time")?;
        let points = match &self.state {
            LoadState::Loading => return writeln!(f, "Loading chart data..."),
            LoadState::Failed(message) => return writeln!(f, "Error: {}", message),
            LoadState::Empty => {
                return writeln!(f, "Log some activities to see your progress chart!")
            }
            LoadState::Ready(points) => points,
        };

        let max = points.iter().map(|p| p.calories).fold(0.0_f64, f64::max);
        for point in points {
            let len = if max > 0.0 {
                ((point.calories / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            writeln!(
                f,
                "  {:>5} | {:<width$} {}",
                point.label,
                "#".repeat(len.max(1)),
                format_number(point.calories),
                width = BAR_WIDTH
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, MockBackend};

    #[test]
    fn test_points_oldest_first() {
        let points = points(vec![
            testing::activity("a3", "Swim", 400.0, "2024-02-03"),
            testing::activity("a2", "Bike", 300.0, "2024-01-20T08:00:00Z"),
            testing::activity("a1", "Run", 250.0, "2024-01-05"),
        ]);

        let labels: Vec<_> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["01/05", "01/20", "02/03"]);
        assert_eq!(points[2].calories, 400.0);
    }

    #[test]
    fn test_unparsed_dates_go_last() {
        let points = points(vec![
            testing::activity("a2", "Bike", 300.0, "sometime"),
            testing::activity("a1", "Run", 250.0, "2024-01-05"),
        ]);

        assert_eq!(points[0].label, "01/05");
        assert_eq!(points[1].label, "sometime");
    }

    #[tokio::test]
    async fn test_render() {
        let backend = MockBackend::spawn().await;
        backend.state.set_activities(vec![
            testing::activity("a2", "Bike", 400.0, "2024-01-02"),
            testing::activity("a1", "Run", 200.0, "2024-01-01"),
        ]);
        let (api, _) = testing::signed_in_client(&backend);

        let mut panel = ActivityChartPanel::new();
        panel.load(&api).await;

        let text = panel.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Calories Burned Over Time");
        assert!(lines[1].contains("01/01"));
        assert!(lines[1].contains(&"#".repeat(20)));
        assert!(lines[2].contains(&"#".repeat(BAR_WIDTH)));
    }

    #[tokio::test]
    async fn test_signed_out_is_empty() {
        let backend = MockBackend::spawn().await;
        let (api, _) = testing::signed_out_client(&backend);

        let mut panel = ActivityChartPanel::new();
        panel.load(&api).await;

        assert_eq!(panel.state(), &LoadState::Empty);
        assert!(panel
            .to_string()
            .contains("Log some activities to see your progress chart!"));
        assert_eq!(backend.state.requests(), 0);
    }
}
