//! Tabular renderings of lists for `ls` style commands.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::types::{Issue, Project, Sprint, User};

use super::format_date;

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Type")]
    issue_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Project")]
    project: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Issue> for IssueRow {
    fn from(issue: &Issue) -> Self {
        Self {
            key: issue.handle().to_string(),
            title: truncate(&issue.title, 48),
            issue_type: issue.issue_type.to_string(),
            status: issue.status.label(),
            priority: issue.priority.to_string(),
            assignee: issue
                .assignee_id
                .as_ref()
                .map(|a| a.display_name().to_string())
                .unwrap_or_else(|| "Unassigned".to_string()),
            project: issue
                .project_id
                .as_ref()
                .map(|p| p.display_name().to_string())
                .unwrap_or_default(),
            updated: issue
                .updated_at
                .as_deref()
                .map(format_date)
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Lead")]
    lead: String,
    #[tabled(rename = "Members")]
    members: usize,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
}

impl From<&Project> for ProjectRow {
    fn from(project: &Project) -> Self {
        Self {
            key: project.key.clone(),
            name: truncate(&project.name, 40),
            status: project.status.to_string(),
            lead: project
                .project_lead
                .as_ref()
                .map(|l| l.display_name().to_string())
                .unwrap_or_default(),
            members: project.team_members.len(),
            start: project
                .start_date
                .as_deref()
                .map(format_date)
                .unwrap_or_default(),
            end: project
                .end_date
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
}

#[derive(Tabled)]
struct SprintRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}

fn render<R: Tabled>(rows: Vec<R>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

pub fn issue_table(issues: &[Issue]) -> String {
    render(issues.iter().map(IssueRow::from).collect())
}

pub fn project_table(projects: &[Project]) -> String {
    render(projects.iter().map(ProjectRow::from).collect())
}

pub fn member_table(members: &[User]) -> String {
    render(
        members
            .iter()
            .map(|user| MemberRow {
                id: user.id.clone(),
                name: user.fullname.clone(),
                email: user.email.clone(),
                role: user.role.map(|r| r.to_string()).unwrap_or_default(),
            })
            .collect(),
    )
}

pub fn sprint_table(sprints: &[Sprint]) -> String {
    render(
        sprints
            .iter()
            .map(|sprint| SprintRow {
                id: sprint.id.clone(),
                name: sprint.name.clone(),
                status: sprint.status.to_string(),
                start: sprint
                    .start_date
                    .as_deref()
                    .map(format_date)
                    .unwrap_or_else(|| "-".to_string()),
                end: sprint
                    .end_date
                    .as_deref()
                    .map(format_date)
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect(),
    )
}
