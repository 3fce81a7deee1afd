//! Dashboard and report views.

use owo_colors::{OwoColorize, Stream::Stdout};
use serde_json::json;

use super::{CommandOutput, Workspace};
use crate::api::stats::{Bucket, DashboardStats, ReportStats};
use crate::cli::OutputOptions;
use crate::display::{bar, format_date, format_day};
use crate::error::Result;

const BAR_WIDTH: usize = 20;

fn heading(title: &str) -> String {
    format!("{}\n", title.if_supports_color(Stdout, |s| s.bold()))
}

fn dashboard_text(stats: &DashboardStats) -> String {
    let overview = &stats.stats;
    let mut text = heading("Overview");
    text.push_str(&format!(
        "  projects: {}  open: {}  resolved: {}  members: {}\n",
        overview.total_projects, overview.open_issues, overview.resolved_issues, overview.team_members
    ));

    text.push('\n');
    text.push_str(&heading("Recent issues"));
    if stats.recent_issues.is_empty() {
        text.push_str("  No recent issues\n");
    }
    for issue in &stats.recent_issues {
        text.push_str(&format!(
            "  {} [{}] [{}] {} ({}, {})\n",
            format_date(&issue.date),
            issue.status.replace('_', " "),
            issue.priority,
            issue.title,
            issue.project,
            if issue.assignee.is_empty() {
                "Unassigned"
            } else {
                issue.assignee.as_str()
            }
        ));
    }

    text.push('\n');
    text.push_str(&heading("Project progress"));
    if stats.projects.is_empty() {
        text.push_str("  No projects yet\n");
    }
    for project in &stats.projects {
        text.push_str(&format!(
            "  {:24} {} {:>3.0}%\n",
            project.name,
            bar(project.progress, 100.0, BAR_WIDTH),
            project.progress
        ));
    }

    text.push('\n');
    text.push_str(&heading("Activity"));
    if stats.activities.is_empty() {
        text.push_str("  No recent activity\n");
    }
    for activity in &stats.activities {
        text.push_str(&format!(
            "  {} {} {} ({})\n",
            activity.user, activity.action, activity.target, activity.time
        ));
    }
    text.trim_end().to_string()
}

fn bucket_lines(text: &mut String, title: &str, buckets: &[Bucket]) {
    text.push_str(&heading(title));
    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    for bucket in buckets {
        text.push_str(&format!(
            "  {:12} {} {}\n",
            bucket.label(),
            bar(bucket.count as f64, max, BAR_WIDTH),
            bucket.count
        ));
    }
    text.push('\n');
}

fn report_text(report: &ReportStats) -> String {
    let totals = report.totals();
    let mut text = heading("Totals");
    text.push_str(&format!(
        "  total: {}  open: {}  done: {}  critical+high: {}\n\n",
        totals.total, totals.open, totals.done, totals.urgent
    ));

    bucket_lines(&mut text, "By status", &report.status_stats);
    bucket_lines(&mut text, "By type", &report.type_stats);
    bucket_lines(&mut text, "By priority", &report.priority_stats);

    text.push_str(&heading("By assignee"));
    for member in &report.team_stats {
        text.push_str(&format!("  {:20} {}\n", member.name, member.count));
    }
    text.push('\n');

    text.push_str(&heading("Created vs resolved"));
    let trend = report.trend();
    if trend.is_empty() {
        text.push_str("  No activity in this period\n");
    }
    for point in trend {
        text.push_str(&format!(
            "  {:6} +{} created  -{} resolved\n",
            format_day(&point.date),
            point.created,
            point.resolved
        ));
    }
    text.trim_end().to_string()
}

pub async fn cmd_dashboard(output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let stats = workspace.client.dashboard_stats().await?;
    CommandOutput::new(json!(stats))
        .with_text(dashboard_text(&stats))
        .print(output)
}

pub async fn cmd_reports(output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let report = workspace.client.report_stats().await?;
    let totals = report.totals();
    let trend: Vec<_> = report
        .trend()
        .into_iter()
        .map(|p| json!({ "date": p.date, "created": p.created, "resolved": p.resolved }))
        .collect();

    CommandOutput::new(json!({
        "totals": {
            "total": totals.total,
            "open": totals.open,
            "done": totals.done,
            "urgent": totals.urgent,
        },
        "status": report.status_stats,
        "type": report.type_stats,
        "priority": report.priority_stats,
        "team": report.team_stats,
        "trend": trend,
    }))
    .with_text(report_text(&report))
    .print(output)
}
