use owo_colors::{OwoColorize, Stream::Stdout};
use serde_json::json;

use super::projects::resolve_project_id;
use super::{CommandOutput, Workspace, ack_text};
use crate::board::Backlog;
use crate::cli::OutputOptions;
use crate::display::{issue_bullet, sprint_status_badge};
use crate::error::{DeskError, Result};

fn backlog_text(backlog: &Backlog) -> String {
    let mut text = String::new();
    for lane in &backlog.lanes {
        text.push_str(&format!(
            "{} {} ({})\n",
            lane.sprint.name.if_supports_color(Stdout, |s| s.bold()),
            sprint_status_badge(lane.sprint.status),
            lane.issues.len()
        ));
        if lane.issues.is_empty() {
            text.push_str(&format!(
                "  {}\n",
                "No issues planned, add one with --move <issue> <sprint>"
                    .if_supports_color(Stdout, |s| s.dimmed())
            ));
        }
        for issue in &lane.issues {
            text.push_str(&format!("  {}\n", issue_bullet(issue)));
        }
        text.push('\n');
    }

    text.push_str(&format!(
        "{} ({})\n",
        "Backlog".if_supports_color(Stdout, |s| s.bold()),
        backlog.unplanned.len()
    ));
    if backlog.unplanned.is_empty() {
        text.push_str("  No issues in the backlog\n");
    }
    for issue in &backlog.unplanned {
        text.push_str(&format!("  {}\n", issue_bullet(issue)));
    }
    text.trim_end().to_string()
}

/// Show the backlog, optionally moving one issue into a planned sprint or
/// back to the backlog first.
pub async fn cmd_backlog(
    project: &str,
    move_to: Option<(String, String)>,
    output: OutputOptions,
) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let project_id = resolve_project_id(&workspace.client, project).await?;
    let mut backlog = workspace.client.backlog(&project_id).await?;

    let mut moved = None;
    if let Some((issue_id, target)) = move_to {
        let sprint_id = backlog.resolve_target(&target).ok_or_else(|| {
            DeskError::Other(format!(
                "'{target}' is not a planned sprint of this project, use a sprint id, a sprint name or `backlog`"
            ))
        })?;
        let message = workspace
            .client
            .set_issue_sprint(&issue_id, sprint_id.as_deref())
            .await?;
        tracing::info!(issue = %issue_id, sprint = ?sprint_id, "issue moved in backlog");
        let destination = match &sprint_id {
            Some(id) => backlog
                .lanes
                .iter()
                .find(|lane| &lane.sprint.id == id)
                .map(|lane| lane.sprint.name.clone())
                .unwrap_or_else(|| id.clone()),
            None => "the backlog".to_string(),
        };
        moved = Some(ack_text(message, format!("Moved {issue_id} to {destination}")));
        backlog = workspace.client.backlog(&project_id).await?;
    }

    let mut text = String::new();
    if let Some(moved) = &moved {
        text.push_str(moved);
        text.push_str("\n\n");
    }
    text.push_str(&backlog_text(&backlog));

    let lanes: Vec<_> = backlog
        .lanes
        .iter()
        .map(|lane| json!({ "sprint": lane.sprint, "issues": lane.issues }))
        .collect();
    CommandOutput::new(json!({
        "project_id": project_id,
        "sprints": lanes,
        "backlog": backlog.unplanned,
        "moved": moved,
    }))
    .with_text(text)
    .print(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BacklogData;

    #[test]
    fn test_backlog_text() {
        owo_colors::set_override(false);
        let data: BacklogData = serde_json::from_value(json!({
            "planned_sprints": [
                { "_id": "s1", "name": "Sprint 1" },
                { "_id": "s2", "name": "Sprint 2" }
            ],
            "sprint_issues": [
                { "_id": "i1", "title": "Search", "sprint_id": "s1" }
            ],
            "backlog_issues": []
        }))
        .unwrap();
        let text = backlog_text(&Backlog::from_data(data));
        assert!(text.contains("Sprint 1 [planned] (1)\n  - i1 [open] Search"));
        assert!(text.contains("Sprint 2 [planned] (0)"));
        assert!(text.ends_with("No issues in the backlog"));
    }
}
