//! Issue endpoints: detail, mutations, comments, subtasks, board and backlog.

use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use crate::board::{Backlog, BacklogData, Board, BoardData};
use crate::error::Result;
use crate::types::{Issue, IssuePriority, IssueStatus, IssueType};
use crate::validate::{self, FormCheck};

use super::ApiClient;

/// Trim labels, drop blanks and keep the first occurrence of each.
pub fn normalize_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        let label = label.as_ref().trim();
        if !label.is_empty() && !out.iter().any(|l| l == label) {
            out.push(label.to_string());
        }
    }
    out
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewSubtask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: IssueStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl NewSubtask {
    pub fn validate(&self) -> Result<()> {
        FormCheck::new()
            .check("title", validate::required(&self.title, "Subtask title"))
            .check(
                "due_date",
                validate::parse_date(self.due_date.as_deref().unwrap_or_default()).err(),
            )
            .finish()
    }
}

/// Body of `POST /issues`. Unset numbers go out as `null`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub issue_type: IssueType,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub story_points: Option<f64>,
    pub estimated_time: Option<f64>,
    pub actual_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    pub is_blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    pub labels: Vec<String>,
    pub subtasks: Vec<NewSubtask>,
}

impl IssueDraft {
    pub fn validate(&self) -> Result<()> {
        let mut form = FormCheck::new();
        form.check("title", validate::required(&self.title, "Title"))
            .check("project_id", validate::required(&self.project_id, "Project"))
            .check(
                "due_date",
                validate::parse_date(self.due_date.as_deref().unwrap_or_default()).err(),
            );
        for (i, subtask) in self.subtasks.iter().enumerate() {
            form.check(
                &format!("subtasks.{i}.title"),
                validate::required(&subtask.title, "Subtask title"),
            );
        }
        form.finish()
    }

    fn normalized(&self) -> Self {
        let mut draft = self.clone();
        draft.title = draft.title.trim().to_string();
        draft.project_id = draft.project_id.trim().to_string();
        draft.labels = normalize_labels(&draft.labels);
        draft
    }
}

/// Body of `PATCH /issues/:id`. Only set fields are sent; an inner `None`
/// clears the field on the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<IssueType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IssueStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<IssuePriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_points: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_time: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_blocked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl IssueUpdate {
    pub fn is_empty(&self) -> bool {
        serde_json::to_value(self)
            .map(|v| v.as_object().is_none_or(|o| o.is_empty()))
            .unwrap_or(true)
    }

    pub fn validate(&self) -> Result<()> {
        let due = self.due_date.clone().flatten().unwrap_or_default();
        FormCheck::new()
            .check(
                "title",
                self.title
                    .as_deref()
                    .and_then(|t| validate::required(t, "Title")),
            )
            .check("due_date", validate::parse_date(&due).err())
            .finish()
    }
}

impl ApiClient {
    pub async fn issue(&self, id: &str) -> Result<Issue> {
        self.get(&["issues", id]).await
    }

    pub async fn create_issue(&self, draft: &IssueDraft) -> Result<Issue> {
        draft.validate()?;
        self.post(&["issues"], &draft.normalized()).await
    }

    pub async fn update_issue(&self, id: &str, update: &IssueUpdate) -> Result<Issue> {
        update.validate()?;
        let mut update = update.clone();
        if let Some(labels) = update.labels.take() {
            update.labels = Some(normalize_labels(labels));
        }
        self.patch(&["issues", id], &update).await
    }

    pub async fn delete_issue(&self, id: &str) -> Result<Option<String>> {
        self.send_ack(self.request(Method::DELETE, &["issues", id]))
            .await
    }

    pub async fn add_comment(&self, id: &str, content: &str) -> Result<Option<String>> {
        FormCheck::new()
            .check("content", validate::required(content, "Comment"))
            .finish()?;
        self.send_ack(
            self.request(Method::POST, &["issues", id, "comments"])
                .json(&json!({ "content": content.trim() })),
        )
        .await
    }

    pub async fn add_subtask(&self, id: &str, subtask: &NewSubtask) -> Result<Option<String>> {
        subtask.validate()?;
        self.send_ack(
            self.request(Method::POST, &["issues", id, "subtasks"])
                .json(subtask),
        )
        .await
    }

    pub async fn board(&self, project_id: &str) -> Result<Board> {
        let data: BoardData = self.get(&["issues", "board", project_id]).await?;
        Ok(Board::from_data(data))
    }

    pub async fn backlog(&self, project_id: &str) -> Result<Backlog> {
        let data: BacklogData = self.get(&["issues", "backlog", project_id]).await?;
        Ok(Backlog::from_data(data))
    }

    /// Move an issue to another board column.
    pub async fn set_issue_status(&self, id: &str, status: IssueStatus) -> Result<Option<String>> {
        self.send_ack(
            self.request(Method::PATCH, &["issues", id])
                .json(&json!({ "status": status })),
        )
        .await
    }

    /// Move an issue into a sprint, or back to the backlog with `None`.
    pub async fn set_issue_sprint(&self, id: &str, sprint_id: Option<&str>) -> Result<Option<String>> {
        self.send_ack(
            self.request(Method::PATCH, &["issues", id])
                .json(&json!({ "sprint_id": sprint_id })),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_labels() {
        assert_eq!(
            normalize_labels([" ui ", "ui", "", "backend", "UI"]),
            vec!["ui", "backend", "UI"]
        );
    }

    #[test]
    fn test_draft_requires_title_and_project() {
        let err = IssueDraft::default().validate().unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields["title"], "Title is required");
        assert_eq!(fields["project_id"], "Project is required");
    }

    #[test]
    fn test_draft_sends_empty_numbers_as_null() {
        let draft = IssueDraft {
            title: "Crash".to_string(),
            project_id: "p1".to_string(),
            story_points: Some(3.0),
            ..Default::default()
        };
        let body = serde_json::to_value(draft.normalized()).unwrap();
        assert_eq!(body["story_points"], 3.0);
        assert!(body["estimated_time"].is_null());
        assert!(body.as_object().unwrap().contains_key("actual_time"));
        assert!(!body.as_object().unwrap().contains_key("sprint_id"));
    }

    #[test]
    fn test_update_sends_only_set_fields() {
        let update = IssueUpdate {
            status: Some(IssueStatus::Resolved),
            sprint_id: Some(None),
            ..Default::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, json!({ "status": "resolved", "sprint_id": null }));
        assert!(!update.is_empty());
        assert!(IssueUpdate::default().is_empty());
    }

    #[test]
    fn test_update_rejects_blank_title() {
        let update = IssueUpdate {
            title: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_subtask_requires_title() {
        assert!(NewSubtask::default().validate().is_err());
    }
}
