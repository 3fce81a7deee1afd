//! Dashboard and report statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::ApiClient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Overview {
    pub total_projects: u64,
    pub open_issues: u64,
    pub resolved_issues: u64,
    pub team_members: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentIssue {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub project: String,
    pub assignee: String,
    pub priority: String,
    pub status: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectProgress {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    /// Percent complete, 0 to 100.
    pub progress: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    #[serde(alias = "_id")]
    pub id: String,
    pub user: String,
    pub action: String,
    pub target: String,
    pub time: String,
}

/// `GET /dashboard/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub stats: Overview,
    pub recent_issues: Vec<RecentIssue>,
    pub projects: Vec<ProjectProgress>,
    pub activities: Vec<Activity>,
}

/// One grouped count, e.g. `{ "_id": "open", "count": 4 }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(rename = "_id", default)]
    pub key: Option<String>,
    #[serde(default)]
    pub count: u64,
}

impl Bucket {
    pub fn label(&self) -> String {
        match self.key.as_deref() {
            Some(key) if !key.is_empty() => key.replace('_', " "),
            _ => "none".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamStat {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimePoint {
    #[serde(rename = "_id")]
    pub date: String,
    pub created: u64,
    pub resolved: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSeries {
    pub created: Vec<TimePoint>,
    pub resolved: Vec<TimePoint>,
}

/// `GET /reports/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportStats {
    pub status_stats: Vec<Bucket>,
    pub type_stats: Vec<Bucket>,
    pub priority_stats: Vec<Bucket>,
    pub team_stats: Vec<TeamStat>,
    pub time_series: TimeSeries,
}

/// Headline numbers derived from a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportTotals {
    pub total: u64,
    pub open: u64,
    /// Resolved plus closed.
    pub done: u64,
    /// Critical plus high priority.
    pub urgent: u64,
}

/// Created and resolved counts for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    pub date: String,
    pub created: u64,
    pub resolved: u64,
}

fn count_of(buckets: &[Bucket], keys: &[&str]) -> u64 {
    buckets
        .iter()
        .filter(|b| b.key.as_deref().is_some_and(|k| keys.contains(&k)))
        .map(|b| b.count)
        .sum()
}

impl ReportStats {
    pub fn totals(&self) -> ReportTotals {
        ReportTotals {
            total: self.status_stats.iter().map(|b| b.count).sum(),
            open: count_of(&self.status_stats, &["open"]),
            done: count_of(&self.status_stats, &["resolved", "closed"]),
            urgent: count_of(&self.priority_stats, &["critical", "high"]),
        }
    }

    /// Merge the created and resolved series into one ascending series.
    /// A day missing from either side counts as zero there.
    pub fn trend(&self) -> Vec<TrendPoint> {
        let mut days: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
        for point in &self.time_series.created {
            days.entry(point.date.as_str()).or_default().0 += point.created;
        }
        for point in &self.time_series.resolved {
            days.entry(point.date.as_str()).or_default().1 += point.resolved;
        }
        days.into_iter()
            .map(|(date, (created, resolved))| TrendPoint {
                date: date.to_string(),
                created,
                resolved,
            })
            .collect()
    }
}

impl ApiClient {
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.get(&["dashboard", "stats"]).await
    }

    pub async fn report_stats(&self) -> Result<ReportStats> {
        self.get(&["reports", "stats"]).await
    }
}
