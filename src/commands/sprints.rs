use serde_json::json;

use super::projects::resolve_project_id;
use super::{CommandOutput, Workspace, ack_text};
use crate::api::sprints::NewSprint;
use crate::cli::OutputOptions;
use crate::display::{sprint_status_badge, tables};
use crate::error::Result;

pub async fn cmd_sprints_ls(project: &str, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let project_id = resolve_project_id(&workspace.client, project).await?;
    let sprints = workspace.client.project_sprints(&project_id).await?;

    let text = if sprints.is_empty() {
        "No sprints yet. Create one with `issuedesk sprints create <project> <name>`.".to_string()
    } else {
        tables::sprint_table(&sprints)
    };
    CommandOutput::new(json!({ "project_id": project_id, "sprints": sprints }))
        .with_text(text)
        .print(output)
}

pub async fn cmd_sprint_create(
    project: &str,
    name: String,
    start: Option<String>,
    end: Option<String>,
    output: OutputOptions,
) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let project_id = resolve_project_id(&workspace.client, project).await?;
    let sprint = workspace
        .client
        .create_sprint(&NewSprint {
            project_id,
            name,
            start_date: start,
            end_date: end,
        })
        .await?;

    CommandOutput::new(json!({ "sprint": sprint, "action": "created" }))
        .with_text(format!(
            "Created sprint {} {} ({})",
            sprint.name,
            sprint_status_badge(sprint.status),
            sprint.id
        ))
        .print(output)
}

pub async fn cmd_sprint_start(id: &str, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let message = workspace.client.start_sprint(id).await?;
    CommandOutput::new(json!({ "id": id, "action": "started", "message": message }))
        .with_text(ack_text(message, format!("Started sprint {id}")))
        .print(output)
}

pub async fn cmd_sprint_complete(id: &str, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let message = workspace.client.complete_sprint(id).await?;
    CommandOutput::new(json!({ "id": id, "action": "completed", "message": message }))
        .with_text(ack_text(message, format!("Completed sprint {id}")))
        .print(output)
}
