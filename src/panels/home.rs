//! Home Page
//!
//! Signed out, a landing page. Signed in, the dashboard: chart, recent
//! activity and goal summary, each loading on its own.

use std::fmt;
use std::sync::Arc;

use super::scope::{shared, PanelScope, Shared};
use super::{ActivityChartPanel, ActivitySummaryPanel, GoalSummaryPanel};
use crate::api::ApiClient;
use crate::nav::Page;
use crate::types::User;

const LANDING: &str = "\
Welcome to Fit_Gy
Your ultimate fitness companion. Track workouts, monitor progress, and crush your goals.

  Track Workouts     Log exercises, sets, and weights to see your strength grow.
  Monitor Progress   Visualize your journey with charts and performance stats.
  Set Goals          Stay motivated by defining clear fitness milestones.

Get Started: register an account, or log in.
";

pub enum HomePage {
    Landing,
    Dashboard(Dashboard),
}

impl HomePage {
    /// Mount the page for the current session
    pub fn mount(api: &ApiClient) -> Self {
        match api.session().user() {
            Some(user) => HomePage::Dashboard(Dashboard::mount(api, &user)),
            None => HomePage::Landing,
        }
    }

    /// Wait for any dashboard fetches
    pub async fn settle(&mut self) {
        if let HomePage::Dashboard(dashboard) = self {
            dashboard.settle().await;
        }
    }

    pub async fn render(&self) -> String {
        match self {
            HomePage::Landing => LANDING.to_string(),
            HomePage::Dashboard(dashboard) => dashboard.render().await,
        }
    }
}

/// The signed-in dashboard.
///
/// Dropping it aborts fetches still in flight.
pub struct Dashboard {
    user_name: String,
    pub chart: Shared<ActivityChartPanel>,
    pub summary: Shared<ActivitySummaryPanel>,
    pub goals: Shared<GoalSummaryPanel>,
    scope: PanelScope,
}

impl Dashboard {
    pub fn mount(api: &ApiClient, user: &User) -> Self {
        let chart = shared(ActivityChartPanel::new());
        let summary = shared(ActivitySummaryPanel::new());
        let goals = shared(GoalSummaryPanel::new());
        let mut scope = PanelScope::new("dashboard");

        {
            let api = api.clone();
            let panel = Arc::clone(&chart);
            scope.spawn(async move {
                let state = ActivityChartPanel::fetch(&api).await;
                panel.lock().await.apply(state);
            });
        }
        {
            let api = api.clone();
            let panel = Arc::clone(&summary);
            scope.spawn(async move {
                let state = ActivitySummaryPanel::fetch(&api).await;
                panel.lock().await.apply(state);
            });
        }
        {
            let api = api.clone();
            let panel = Arc::clone(&goals);
            scope.spawn(async move {
                let state = GoalSummaryPanel::fetch(&api).await;
                panel.lock().await.apply(state);
            });
        }

        Self {
            user_name: user.name.clone(),
            chart,
            summary,
            goals,
            scope,
        }
    }

    pub fn pending(&self) -> usize {
        self.scope.pending()
    }

    pub async fn settle(&mut self) {
        self.scope.settle().await;
    }

    /// Detail page of the n-th recent activity
    pub async fn select(&self, position: usize) -> Option<Page> {
        self.summary.lock().await.select(position)
    }

    pub async fn render(&self) -> String {
        let chart = self.chart.lock().await;
        let summary = self.summary.lock().await;
        let goals = self.goals.lock().await;
        DashboardView {
            user_name: &self.user_name,
            chart: &chart,
            summary: &summary,
            goals: &goals,
        }
        .to_string()
    }
}

/// Dashboard contents with every panel lock held
struct DashboardView<'a> {
    user_name: &'a str,
    chart: &'a ActivityChartPanel,
    summary: &'a ActivitySummaryPanel,
    goals: &'a GoalSummaryPanel,
}

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Welcome back, {}!", self.user_name)?;
        writeln!(f)?;
        writeln!(f, "  [Add New Activity]   [Manage Your Goals]")?;
        writeln!(f)?;
        write!(f, "{}", self.chart)?;
        writeln!(f)?;
        write!(f, "{}", self.summary)?;
        writeln!(f)?;
        write!(f, "{}", self.goals)
    }
}
