//! Board and backlog grouping.
//!
//! The board shows the active sprint's issues in four fixed columns; the
//! backlog shows planned sprints with their issues plus the unplanned
//! remainder. Both are pure reshapes of what the server sends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Issue, IssueStatus, Sprint};

/// Raw `GET /issues/board/:projectId` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardData {
    #[serde(default)]
    pub sprint: Option<Sprint>,
    #[serde(default)]
    pub columns: BTreeMap<String, Vec<Issue>>,
}

/// Raw `GET /issues/backlog/:projectId` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BacklogData {
    #[serde(default)]
    pub planned_sprints: Vec<Sprint>,
    #[serde(default)]
    pub backlog_issues: Vec<Issue>,
    #[serde(default)]
    pub sprint_issues: Vec<Issue>,
}

/// A board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Open,
        Column::InProgress,
        Column::Resolved,
        Column::Closed,
    ];

    /// Reopened work goes back into the open column.
    pub fn for_status(status: IssueStatus) -> Self {
        match status {
            IssueStatus::Open | IssueStatus::Reopened => Column::Open,
            IssueStatus::InProgress => Column::InProgress,
            IssueStatus::Resolved => Column::Resolved,
            IssueStatus::Closed => Column::Closed,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Column::Open => "To Do",
            Column::InProgress => "In Progress",
            Column::Resolved => "Resolved",
            Column::Closed => "Closed",
        }
    }

    /// The status an issue gets when moved into this column.
    pub fn status(&self) -> IssueStatus {
        match self {
            Column::Open => IssueStatus::Open,
            Column::InProgress => IssueStatus::InProgress,
            Column::Resolved => IssueStatus::Resolved,
            Column::Closed => IssueStatus::Closed,
        }
    }
}

/// The board, partitioned by column.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub sprint: Option<Sprint>,
    columns: BTreeMap<Column, Vec<Issue>>,
}

impl Board {
    /// Re-partition the server's columns by each issue's own status, so an
    /// issue sits in exactly one column whatever bucket the server used.
    /// Buckets are read in board order, then any unknown ones by name.
    pub fn from_data(data: BoardData) -> Self {
        let mut buckets = data.columns;
        let mut issues = Vec::new();
        for column in Column::ALL {
            if let Some(bucket) = buckets.remove(column.status().as_str()) {
                issues.extend(bucket);
            }
        }
        issues.extend(buckets.into_values().flatten());

        let mut columns: BTreeMap<Column, Vec<Issue>> =
            Column::ALL.iter().map(|c| (*c, Vec::new())).collect();
        for issue in issues {
            columns
                .entry(Column::for_status(issue.status))
                .or_default()
                .push(issue);
        }
        Self {
            sprint: data.sprint,
            columns,
        }
    }

    pub fn column(&self, column: Column) -> &[Issue] {
        self.columns.get(&column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Issues of `column` whose title or key contains `query`,
    /// case-insensitively. A blank query keeps everything.
    pub fn filtered(&self, column: Column, query: &str) -> Vec<&Issue> {
        let needle = query.trim().to_lowercase();
        self.column(column)
            .iter()
            .filter(|issue| needle.is_empty() || matches_query(issue, &needle))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }
}

fn matches_query(issue: &Issue, needle: &str) -> bool {
    issue.title.to_lowercase().contains(needle)
        || issue
            .key
            .as_deref()
            .is_some_and(|key| key.to_lowercase().contains(needle))
}

/// One planned sprint with the issues assigned to it.
#[derive(Debug, Clone)]
pub struct SprintLane {
    pub sprint: Sprint,
    pub issues: Vec<Issue>,
}

/// The backlog, grouped by planned sprint.
#[derive(Debug, Clone, Default)]
pub struct Backlog {
    pub lanes: Vec<SprintLane>,
    pub unplanned: Vec<Issue>,
}

impl Backlog {
    /// Group sprint issues under the planned sprint whose id matches their
    /// `sprint_id`. Sprint issues matching no planned sprint are dropped.
    pub fn from_data(data: BacklogData) -> Self {
        let mut by_sprint: BTreeMap<String, Vec<Issue>> = BTreeMap::new();
        for issue in data.sprint_issues {
            if let Some(sprint_id) = issue.sprint().map(str::to_string) {
                by_sprint.entry(sprint_id).or_default().push(issue);
            }
        }

        let lanes = data
            .planned_sprints
            .into_iter()
            .map(|sprint| SprintLane {
                issues: by_sprint.remove(&sprint.id).unwrap_or_default(),
                sprint,
            })
            .collect();

        if !by_sprint.is_empty() {
            tracing::debug!(
                sprints = by_sprint.len(),
                "backlog issues reference sprints that are not planned"
            );
        }

        Self {
            lanes,
            unplanned: data.backlog_issues,
        }
    }

    /// Resolve a move target: `backlog` (or `none`) means no sprint,
    /// anything else is a planned sprint's id or name.
    pub fn resolve_target(&self, target: &str) -> Option<Option<String>> {
        let target = target.trim();
        if target.eq_ignore_ascii_case("backlog") || target.eq_ignore_ascii_case("none") {
            return Some(None);
        }
        self.lanes
            .iter()
            .find(|lane| lane.sprint.id == target || lane.sprint.name.eq_ignore_ascii_case(target))
            .map(|lane| Some(lane.sprint.id.clone()))
    }
}
