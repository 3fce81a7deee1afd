//! Project endpoints. Listing goes through the `ListSource` impl in the
//! parent module.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{HasId, Project, ProjectStatus};
use crate::validate::{self, FormCheck};

use super::ApiClient;

/// Entry of `GET /projects/project-names`, used for filter options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectName {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub key: Option<String>,
}

impl HasId for ProjectName {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Split a comma-separated category list, dropping blanks.
pub fn parse_categories(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Body of `POST /projects` and `PATCH /projects/:id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectForm {
    pub name: String,
    pub key: String,
    pub description: String,
    pub project_lead: String,
    pub team_members: Vec<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub status: ProjectStatus,
    pub categories: Vec<String>,
}

impl ProjectForm {
    /// Pre-fill the form from an existing project for editing.
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            key: project.key.clone(),
            description: project.description.clone().unwrap_or_default(),
            project_lead: project
                .project_lead
                .as_ref()
                .map(|l| l.id().to_string())
                .unwrap_or_default(),
            team_members: project
                .team_members
                .iter()
                .map(|m| m.id().to_string())
                .collect(),
            start_date: project
                .start_date
                .as_deref()
                .map(date_part)
                .unwrap_or_default(),
            end_date: project.end_date.as_deref().map(date_part),
            status: project.status,
            categories: project.categories.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let end = self.end_date.as_deref().unwrap_or_default();
        let members = self.team_members.iter().filter(|m| !m.trim().is_empty());
        FormCheck::new()
            .check("name", validate::required(&self.name, "Project name"))
            .check("key", validate::project_key(&self.key))
            .check(
                "project_lead",
                validate::required(&self.project_lead, "Project lead"),
            )
            .check(
                "team_members",
                (members.count() == 0)
                    .then(|| "At least one team member is required".to_string()),
            )
            .check("end_date", validate::date_range(&self.start_date, end))
            .finish()
    }

    /// The body as sent: trimmed, key uppercased, members deduplicated, and
    /// an empty end date as `null`.
    pub fn normalized(&self) -> Self {
        let mut members: Vec<String> = Vec::new();
        for member in &self.team_members {
            let member = member.trim();
            if !member.is_empty() && !members.iter().any(|m| m == member) {
                members.push(member.to_string());
            }
        }
        Self {
            name: self.name.trim().to_string(),
            key: self.key.trim().to_uppercase(),
            description: self.description.trim().to_string(),
            project_lead: self.project_lead.trim().to_string(),
            team_members: members,
            start_date: self.start_date.trim().to_string(),
            end_date: self
                .end_date
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            status: self.status,
            categories: self
                .categories
                .iter()
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// `2024-03-01T00:00:00.000Z` -> `2024-03-01`
fn date_part(value: &str) -> String {
    value.split('T').next().unwrap_or(value).to_string()
}

impl ApiClient {
    pub async fn project_names(&self) -> Result<Vec<ProjectName>> {
        self.get(&["projects", "project-names"]).await
    }

    pub async fn create_project(&self, form: &ProjectForm) -> Result<Project> {
        form.validate()?;
        self.post(&["projects"], &form.normalized()).await
    }

    pub async fn update_project(&self, id: &str, form: &ProjectForm) -> Result<Project> {
        form.validate()?;
        self.patch(&["projects", id], &form.normalized())
            .await
    }

    pub async fn delete_project(&self, id: &str) -> Result<Option<String>> {
        self.send_ack(self.request(Method::DELETE, &["projects", id]))
            .await
    }
}
