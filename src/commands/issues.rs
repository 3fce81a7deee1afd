//! Issue commands.

use owo_colors::{OwoColorize, Stream::Stdout};
use serde_json::json;

use super::browse::run_browse;
use super::projects::resolve_project_id;
use super::{
    CommandOutput, Workspace, ack_text, fetch_page, meta_json, parse_sort, render_list,
    value_or_stdin,
};
use crate::api::issues::{IssueDraft, IssueUpdate, NewSubtask};
use crate::cli::{IssueCreateArgs, IssueListArgs, IssueUpdateArgs, OutputOptions, SubtaskArgs};
use crate::display::{
    format_date, format_hours, issue_line, priority_badge, status_badge, tables, type_label,
};
use crate::error::{DeskError, Result};
use crate::list::{FilterSet, IssueDimension, IssueFilters, ListController, ListQuery, LiveList};
use crate::types::Issue;
use crate::validate;

const CREATE_COMMAND: &str = "issues create";

fn issue_query(args: &IssueListArgs, default_limit: u32) -> Result<ListQuery<IssueFilters>> {
    let mut query = ListQuery::<IssueFilters>::new(args.limit.unwrap_or(default_limit));
    if let Some(search) = &args.search {
        query.search = search.trim().to_string();
    }
    let dimensions = [
        (IssueDimension::Status, &args.status),
        (IssueDimension::Priority, &args.priority),
        (IssueDimension::Type, &args.issue_type),
        (IssueDimension::Project, &args.project),
    ];
    for (dimension, value) in dimensions {
        if let Some(value) = value {
            query.filters.set(dimension, value)?;
        }
    }
    if let Some(sort) = &args.sort {
        query.sort = Some(parse_sort::<IssueFilters>(sort)?);
    }
    query.page = args.page.max(1);
    Ok(query)
}

/// [`issue_query`] with `--project` resolved from a key or name to an id.
async fn resolved_issue_query(
    workspace: &Workspace,
    args: &IssueListArgs,
) -> Result<ListQuery<IssueFilters>> {
    let mut query = issue_query(args, workspace.page_size())?;
    if let Some(project) = query.filters.project.value().cloned() {
        let id = resolve_project_id(&workspace.client, &project).await?;
        query.filters.set(IssueDimension::Project, &id)?;
    }
    Ok(query)
}

pub async fn cmd_issues_ls(args: IssueListArgs, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let query = resolved_issue_query(&workspace, &args).await?;
    let controller: ListController<Issue, IssueFilters> =
        fetch_page(&workspace.client, "issues", query).await?;

    CommandOutput::new(json!({
        "issues": controller.items(),
        "meta": meta_json(controller.meta()),
    }))
    .with_text(render_list(&controller, tables::issue_table, CREATE_COMMAND))
    .print(output)
}

pub async fn cmd_issues_browse(args: IssueListArgs) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let query = resolved_issue_query(&workspace, &args).await?;
    let list = LiveList::new(
        workspace.client.clone(),
        ListController::<Issue, IssueFilters>::with_query("issues", query),
    );
    run_browse(list, tables::issue_table, CREATE_COMMAND).await
}

fn detail_text(issue: &Issue) -> String {
    let mut text = format!(
        "{} {}\n",
        issue.handle().if_supports_color(Stdout, |s| s.cyan()),
        issue.title.if_supports_color(Stdout, |s| s.bold())
    );
    text.push_str(&format!(
        "{} {} {}",
        type_label(issue.issue_type),
        status_badge(issue.status),
        priority_badge(issue.priority)
    ));
    if issue.is_blocked {
        let reason = issue.blocked_reason.as_deref().unwrap_or("no reason given");
        text.push_str(&format!(
            " {}",
            format!("[blocked: {reason}]").if_supports_color(Stdout, |s| s.red())
        ));
    }
    text.push('\n');

    let mut field = |label: &str, value: String| {
        text.push_str(&format!("{:10} {value}\n", format!("{label}:")));
    };
    if let Some(project) = &issue.project_id {
        field("project", project.display_name().to_string());
    }
    field(
        "assignee",
        issue
            .assignee_id
            .as_ref()
            .map(|a| a.display_name().to_string())
            .unwrap_or_else(|| "Unassigned".to_string()),
    );
    if let Some(reporter) = &issue.reporter_id {
        field("reporter", reporter.display_name().to_string());
    }
    if let Some(sprint) = &issue.sprint_id {
        let name = sprint
            .expanded()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| sprint.id().to_string());
        field("sprint", name);
    }
    if let Some(due) = &issue.due_date {
        field("due", format_date(due));
    }
    if let Some(points) = issue.story_points {
        field("points", points.to_string());
    }
    if issue.estimated_time.is_some() || issue.actual_time.is_some() {
        field(
            "time",
            format!(
                "{} spent of {} estimated",
                format_hours(issue.actual_time),
                format_hours(issue.estimated_time)
            ),
        );
    }
    if let Some(environment) = &issue.environment {
        field("env", environment.clone());
    }
    if !issue.labels.is_empty() {
        field("labels", issue.labels.join(", "));
    }
    if let Some(updated) = &issue.updated_at {
        field("updated", format_date(updated));
    }

    if let Some(summary) = issue.summary.as_deref().filter(|s| !s.is_empty()) {
        text.push_str(&format!("\n{summary}\n"));
    }
    if let Some(description) = issue.description.as_deref().filter(|s| !s.is_empty()) {
        text.push_str(&format!("\n{description}\n"));
    }

    if !issue.subtasks.is_empty() {
        text.push_str(&format!(
            "\n{}\n",
            "Subtasks".if_supports_color(Stdout, |s| s.bold())
        ));
        for subtask in &issue.subtasks {
            text.push_str(&format!("- {} {}\n", status_badge(subtask.status), subtask.title));
        }
    }

    if !issue.comments.is_empty() {
        text.push_str(&format!(
            "\n{}\n",
            "Comments".if_supports_color(Stdout, |s| s.bold())
        ));
        for comment in &issue.comments {
            let author = comment
                .user_id
                .as_ref()
                .map(|u| u.display_name().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let when = comment.created_at.as_deref().map(format_date).unwrap_or_default();
            text.push_str(&format!(
                "{} {}\n  {}\n",
                author.if_supports_color(Stdout, |s| s.cyan()),
                when.if_supports_color(Stdout, |s| s.dimmed()),
                comment.content
            ));
        }
    }

    if !issue.attachments.is_empty() {
        text.push_str(&format!(
            "\n{}\n",
            "Attachments".if_supports_color(Stdout, |s| s.bold())
        ));
        for attachment in &issue.attachments {
            text.push_str(&format!("- {}\n", attachment.file_name));
        }
    }

    text.trim_end().to_string()
}

pub async fn cmd_issue_show(id: &str, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let issue = workspace.client.issue(id).await?;
    CommandOutput::new(json!({ "issue": issue }))
        .with_text(detail_text(&issue))
        .print(output)
}

fn number(value: Option<&str>, label: &str) -> Result<Option<f64>> {
    validate::optional_number(value.unwrap_or_default(), label)
}

pub async fn cmd_issue_create(args: IssueCreateArgs, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let project_id = resolve_project_id(&workspace.client, &args.project).await?;

    let draft = IssueDraft {
        story_points: number(args.story_points.as_deref(), "story_points")?,
        estimated_time: number(args.estimate.as_deref(), "estimated_time")?,
        actual_time: number(args.actual.as_deref(), "actual_time")?,
        title: args.title,
        summary: args.summary,
        description: args.description,
        issue_type: args.issue_type,
        status: args.status,
        priority: args.priority,
        project_id,
        assignee_id: args.assignee,
        reporter_id: workspace.session().user().map(|u| u.id),
        sprint_id: args.sprint,
        due_date: args.due,
        environment: args.environment,
        is_blocked: args.blocked.is_some(),
        blocked_reason: args.blocked,
        labels: args.labels,
        subtasks: args
            .subtasks
            .into_iter()
            .map(|title| NewSubtask {
                title,
                ..Default::default()
            })
            .collect(),
    };

    let issue = workspace.client.create_issue(&draft).await?;
    CommandOutput::new(json!({ "issue": issue, "action": "created" }))
        .with_text(format!("Created {}", issue_line(&issue)))
        .print(output)
}

/// `none` clears an optional field.
fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| (!v.trim().eq_ignore_ascii_case("none")).then_some(v))
}

fn clearable_number(value: Option<String>, label: &str) -> Result<Option<Option<f64>>> {
    match clearable(value) {
        None => Ok(None),
        Some(None) => Ok(Some(None)),
        Some(Some(v)) => Ok(Some(validate::optional_number(&v, label)?)),
    }
}

fn build_update(args: IssueUpdateArgs) -> Result<IssueUpdate> {
    let (is_blocked, blocked_reason) = match (args.blocked, args.unblock) {
        (Some(reason), _) => (Some(true), Some(reason)),
        (None, true) => (Some(false), Some(String::new())),
        (None, false) => (None, None),
    };
    Ok(IssueUpdate {
        story_points: clearable_number(args.story_points, "story_points")?,
        estimated_time: clearable_number(args.estimate, "estimated_time")?,
        actual_time: clearable_number(args.actual, "actual_time")?,
        title: args.title,
        summary: args.summary,
        description: args.description,
        issue_type: args.issue_type,
        status: args.status,
        priority: args.priority,
        assignee_id: clearable(args.assignee),
        sprint_id: clearable(args.sprint),
        due_date: clearable(args.due),
        environment: args.environment,
        is_blocked,
        blocked_reason,
        labels: args.labels,
    })
}

pub async fn cmd_issue_update(args: IssueUpdateArgs, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let id = args.id.clone();
    let update = build_update(args)?;
    if update.is_empty() {
        return Err(DeskError::Other(
            "nothing to update, pass at least one field flag".to_string(),
        ));
    }

    let issue = workspace.client.update_issue(&id, &update).await?;
    CommandOutput::new(json!({ "issue": issue, "action": "updated" }))
        .with_text(format!("Updated {}", issue_line(&issue)))
        .print(output)
}

pub async fn cmd_issue_delete(id: &str, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let message = workspace.client.delete_issue(id).await?;
    CommandOutput::new(json!({ "id": id, "action": "deleted", "message": message }))
        .with_text(ack_text(message, format!("Deleted issue {id}")))
        .print(output)
}

pub async fn cmd_issue_comment(id: &str, text: Option<String>, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let content = value_or_stdin(text, "comment text")?;
    let message = workspace.client.add_comment(id, &content).await?;
    CommandOutput::new(json!({ "id": id, "action": "commented", "message": message }))
        .with_text(ack_text(message, format!("Comment added to {id}")))
        .print(output)
}

pub async fn cmd_issue_subtask(args: SubtaskArgs, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let subtask = NewSubtask {
        title: args.title,
        description: args.description,
        assignee_id: args.assignee,
        due_date: args.due,
        ..Default::default()
    };
    let message = workspace.client.add_subtask(&args.id, &subtask).await?;
    CommandOutput::new(json!({ "id": args.id, "action": "subtask_added", "message": message }))
        .with_text(ack_text(message, format!("Subtask added to {}", args.id)))
        .print(output)
}
