//! Workspace entities as the API sends them.
//!
//! The server owns these shapes. Fields the client does not always receive
//! default to empty so a partially populated document still deserializes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
    Reopened,
}

enum_display_fromstr!(IssueStatus, "status", {
    Open => "open",
    InProgress => "in_progress",
    Resolved => "resolved",
    Closed => "closed",
    Reopened => "reopened",
});

impl IssueStatus {
    /// Human label, e.g. "in progress".
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn is_done(&self) -> bool {
        matches!(self, IssueStatus::Resolved | IssueStatus::Closed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Bug,
    #[default]
    Task,
    Story,
    Epic,
}

enum_display_fromstr!(IssueType, "issue type", {
    Bug => "bug",
    Task => "task",
    Story => "story",
    Epic => "epic",
});

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum IssuePriority {
    Lowest,
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

enum_display_fromstr!(IssuePriority, "priority", {
    Lowest => "lowest",
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

impl IssuePriority {
    pub fn is_urgent(&self) -> bool {
        matches!(self, IssuePriority::High | IssuePriority::Critical)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Inactive,
    Completed,
    Archived,
}

enum_display_fromstr!(ProjectStatus, "project status", {
    Active => "active",
    Inactive => "inactive",
    Completed => "completed",
    Archived => "archived",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SprintStatus {
    #[default]
    Planned,
    Active,
    Completed,
}

enum_display_fromstr!(SprintStatus, "sprint status", {
    Planned => "planned",
    Active => "active",
    Completed => "completed",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Developer,
    Organization,
}

enum_display_fromstr!(UserRole, "role", {
    Developer => "developer",
    Organization => "organization",
});

/// Anything addressable by a server id.
pub trait HasId {
    fn id(&self) -> &str;
}

/// A reference the server may send either as a bare id or populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Id(String),
    Expanded(T),
}

impl<T: HasId> Ref<T> {
    pub fn id(&self) -> &str {
        match self {
            Ref::Id(id) => id,
            Ref::Expanded(value) => value.id(),
        }
    }

    pub fn expanded(&self) -> Option<&T> {
        match self {
            Ref::Id(_) => None,
            Ref::Expanded(value) => Some(value),
        }
    }
}

pub type UserRef = Ref<User>;
pub type ProjectRef = Ref<ProjectSummary>;
pub type SprintRef = Ref<SprintSummary>;

impl UserRef {
    /// Best available display name: full name, then email, then id.
    pub fn display_name(&self) -> &str {
        match self {
            Ref::Id(id) => id,
            Ref::Expanded(user) => user.display_name(),
        }
    }
}

impl ProjectRef {
    pub fn display_name(&self) -> &str {
        match self {
            Ref::Id(id) => id,
            Ref::Expanded(project) => &project.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        if !self.fullname.is_empty() {
            &self.fullname
        } else if !self.email.is_empty() {
            &self.email
        } else {
            &self.id
        }
    }
}

impl HasId for User {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl HasId for ProjectSummary {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SprintSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl HasId for SprintSummary {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: IssueStatus,
    #[serde(default)]
    pub assignee_id: Option<UserRef>,
    #[serde(default)]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<UserRef>,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub file_name: String,
    pub file_path: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, rename = "issue_key", alias = "key")]
    pub key: Option<String>,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub issue_type: IssueType,
    #[serde(default)]
    pub status: IssueStatus,
    #[serde(default)]
    pub priority: IssuePriority,
    #[serde(default)]
    pub assignee_id: Option<UserRef>,
    #[serde(default)]
    pub reporter_id: Option<UserRef>,
    #[serde(default)]
    pub project_id: Option<ProjectRef>,
    #[serde(default)]
    pub sprint_id: Option<SprintRef>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub story_points: Option<f64>,
    #[serde(default)]
    pub estimated_time: Option<f64>,
    #[serde(default)]
    pub actual_time: Option<f64>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default)]
    pub blocked_reason: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Issue {
    /// Short handle for display: the issue key when present, else the id.
    pub fn handle(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.id)
    }

    pub fn sprint(&self) -> Option<&str> {
        self.sprint_id.as_ref().map(|s| s.id())
    }
}

impl HasId for Issue {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub project_lead: Option<UserRef>,
    #[serde(default)]
    pub team_members: Vec<UserRef>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl HasId for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: SprintStatus,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub project_id: Option<ProjectRef>,
}

impl HasId for Sprint {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_issue_status_parses_labels() {
        assert_eq!(
            "In Progress".parse::<IssueStatus>().unwrap(),
            IssueStatus::InProgress
        );
        assert_eq!(IssueStatus::InProgress.label(), "in progress");
        assert!("done".parse::<IssueStatus>().is_err());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(IssuePriority::Critical > IssuePriority::High);
        assert!(IssuePriority::Lowest < IssuePriority::Low);
        assert!(IssuePriority::High.is_urgent());
        assert!(!IssuePriority::Medium.is_urgent());
    }

    #[test]
    fn test_issue_with_populated_refs() {
        let issue: Issue = serde_json::from_value(json!({
            "_id": "i1",
            "issue_key": "WEB-4",
            "title": "Broken login",
            "issue_type": "bug",
            "status": "in_progress",
            "priority": "high",
            "assignee_id": { "_id": "u1", "fullname": "Ada Lovelace", "email": "ada@x.io" },
            "project_id": "p1",
            "sprint_id": { "_id": "s1", "name": "Sprint 1" },
            "labels": ["auth"]
        }))
        .unwrap();

        assert_eq!(issue.handle(), "WEB-4");
        assert_eq!(issue.issue_type, IssueType::Bug);
        assert_eq!(issue.status, IssueStatus::InProgress);
        assert_eq!(
            issue.assignee_id.as_ref().map(|a| a.display_name()),
            Some("Ada Lovelace")
        );
        assert_eq!(issue.project_id.as_ref().map(|p| p.id()), Some("p1"));
        assert_eq!(issue.sprint(), Some("s1"));
    }

    #[test]
    fn test_issue_minimal_document() {
        let issue: Issue = serde_json::from_value(json!({ "_id": "i2", "title": "Bare" })).unwrap();
        assert_eq!(issue.handle(), "i2");
        assert_eq!(issue.status, IssueStatus::Open);
        assert_eq!(issue.priority, IssuePriority::Medium);
        assert!(issue.labels.is_empty());
        assert!(issue.sprint().is_none());
    }

    #[test]
    fn test_user_display_name_fallbacks() {
        let mut user = User {
            id: "u9".to_string(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "u9");
        user.email = "x@y.z".to_string();
        assert_eq!(user.display_name(), "x@y.z");
        user.fullname = "Grace".to_string();
        assert_eq!(user.display_name(), "Grace");
    }
}
