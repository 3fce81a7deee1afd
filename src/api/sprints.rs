//! Sprint endpoints.

use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use crate::error::Result;
use crate::types::Sprint;
use crate::validate::{self, FormCheck};

use super::ApiClient;

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewSprint {
    pub project_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl NewSprint {
    pub fn validate(&self) -> Result<()> {
        FormCheck::new()
            .check("name", validate::required(&self.name, "Sprint name"))
            .check("project_id", validate::required(&self.project_id, "Project"))
            .check(
                "end_date",
                validate::date_range(
                    self.start_date.as_deref().unwrap_or_default(),
                    self.end_date.as_deref().unwrap_or_default(),
                ),
            )
            .finish()
    }
}

impl ApiClient {
    pub async fn create_sprint(&self, sprint: &NewSprint) -> Result<Sprint> {
        sprint.validate()?;
        let mut body = sprint.clone();
        body.name = body.name.trim().to_string();
        self.post(&["sprints"], &body).await
    }

    pub async fn project_sprints(&self, project_id: &str) -> Result<Vec<Sprint>> {
        self.get(&["sprints", "project", project_id]).await
    }

    pub async fn start_sprint(&self, id: &str) -> Result<Option<String>> {
        self.send_ack(
            self.request(Method::PATCH, &["sprints", id, "start"])
                .json(&json!({})),
        )
        .await
    }

    pub async fn complete_sprint(&self, id: &str) -> Result<Option<String>> {
        self.send_ack(
            self.request(Method::PATCH, &["sprints", id, "complete"])
                .json(&json!({})),
        )
        .await
    }
}
