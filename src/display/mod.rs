//! Terminal presentation: badges, one-line summaries, paging footers,
//! notices and dates.
//!
//! Colors are only applied when stdout supports them, so piped output and
//! tests see plain text.

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr, Stdout};

use crate::list::{EmptyState, PageMeta};
use crate::notice::{Notice, NoticeLevel};
use crate::types::{Issue, IssuePriority, IssueStatus, IssueType, ProjectStatus, SprintStatus};

pub mod avatar;
pub mod tables;

pub use avatar::{initials, resolve_avatar};

pub fn status_badge(status: IssueStatus) -> String {
    let badge = format!("[{}]", status.label());
    match status {
        IssueStatus::Open => badge.if_supports_color(Stdout, |s| s.blue()).to_string(),
        IssueStatus::InProgress => badge.if_supports_color(Stdout, |s| s.cyan()).to_string(),
        IssueStatus::Resolved => badge.if_supports_color(Stdout, |s| s.green()).to_string(),
        IssueStatus::Closed => badge.if_supports_color(Stdout, |s| s.dimmed()).to_string(),
        IssueStatus::Reopened => badge.if_supports_color(Stdout, |s| s.magenta()).to_string(),
    }
}

pub fn priority_badge(priority: IssuePriority) -> String {
    let badge = format!("[{priority}]");
    match priority {
        IssuePriority::Critical => badge.if_supports_color(Stdout, |s| s.bright_red()).to_string(),
        IssuePriority::High => badge.if_supports_color(Stdout, |s| s.red()).to_string(),
        IssuePriority::Medium => badge.if_supports_color(Stdout, |s| s.yellow()).to_string(),
        IssuePriority::Low => badge.if_supports_color(Stdout, |s| s.green()).to_string(),
        IssuePriority::Lowest => badge.if_supports_color(Stdout, |s| s.dimmed()).to_string(),
    }
}

pub fn type_label(issue_type: IssueType) -> String {
    let label = issue_type.to_string();
    match issue_type {
        IssueType::Bug => label.if_supports_color(Stdout, |s| s.red()).to_string(),
        IssueType::Story => label.if_supports_color(Stdout, |s| s.green()).to_string(),
        IssueType::Epic => label.if_supports_color(Stdout, |s| s.magenta()).to_string(),
        IssueType::Task => label.if_supports_color(Stdout, |s| s.blue()).to_string(),
    }
}

pub fn project_status_badge(status: ProjectStatus) -> String {
    let badge = format!("[{status}]");
    match status {
        ProjectStatus::Active => badge.if_supports_color(Stdout, |s| s.green()).to_string(),
        ProjectStatus::Completed => badge.if_supports_color(Stdout, |s| s.blue()).to_string(),
        ProjectStatus::Inactive | ProjectStatus::Archived => {
            badge.if_supports_color(Stdout, |s| s.dimmed()).to_string()
        }
    }
}

pub fn sprint_status_badge(status: SprintStatus) -> String {
    let badge = format!("[{status}]");
    match status {
        SprintStatus::Active => badge.if_supports_color(Stdout, |s| s.green()).to_string(),
        SprintStatus::Planned => badge.if_supports_color(Stdout, |s| s.yellow()).to_string(),
        SprintStatus::Completed => badge.if_supports_color(Stdout, |s| s.dimmed()).to_string(),
    }
}

/// `WEB-12     [open] [high] Login fails on Safari`
pub fn issue_line(issue: &Issue) -> String {
    let handle = format!("{:10}", issue.handle());
    format!(
        "{} {} {} {}",
        handle.if_supports_color(Stdout, |s| s.cyan()),
        status_badge(issue.status),
        priority_badge(issue.priority),
        issue.title
    )
}

/// `- WEB-12 [open] Login fails on Safari`
pub fn issue_bullet(issue: &Issue) -> String {
    format!(
        "- {} {} {}",
        issue.handle().if_supports_color(Stdout, |s| s.cyan()),
        status_badge(issue.status),
        issue.title
    )
}

/// A notice as one stderr line, e.g. `error: Failed to fetch issues: ...`.
pub fn notice_line(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Warning => "warning:".if_supports_color(Stderr, |s| s.yellow()).to_string(),
        NoticeLevel::Error => "error:".if_supports_color(Stderr, |s| s.red()).to_string(),
    };
    format!("{tag} {}", notice.message)
}

/// Footer under a page of results, e.g. `Page 2 of 3 (25 issues) | prev | next`.
pub fn page_footer(meta: &PageMeta, noun: &str) -> String {
    let mut footer = format!(
        "Page {} of {} ({} {})",
        meta.page,
        meta.total_pages.max(1),
        meta.total_docs,
        noun
    );
    let mut moves = Vec::new();
    if meta.has_prev_page {
        moves.push("prev");
    }
    if meta.has_next_page {
        moves.push("next");
    }
    if !moves.is_empty() {
        footer.push_str(" | ");
        footer.push_str(&moves.join(" | "));
    }
    footer
}

/// Window of page numbers around the current page, current one bracketed:
/// `1 [2] 3 4 5`.
pub fn page_numbers(meta: &PageMeta, width: u32) -> String {
    if meta.total_pages == 0 {
        return String::new();
    }
    let width = width.max(1).min(meta.total_pages);
    let half = width / 2;
    let start = meta
        .page
        .saturating_sub(half)
        .max(1)
        .min(meta.total_pages - width + 1);
    (start..start + width)
        .map(|n| {
            if n == meta.page {
                format!("[{n}]")
            } else {
                n.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// What to tell the user when a list came back empty. `command` is the
/// subcommand that creates one, e.g. `issues create`.
pub fn empty_state_message(state: EmptyState, noun: &str, command: &str) -> String {
    match state {
        EmptyState::NoMatches => format!(
            "No {noun} match your search or filters. Clear them, or create one with `issuedesk {command}`."
        ),
        EmptyState::NothingYet => {
            format!("No {noun} yet. Create the first one with `issuedesk {command}`.")
        }
    }
}

/// Render an API timestamp or date as `May 01, 2024`. Unparseable input is
/// returned unchanged.
pub fn format_date(value: &str) -> String {
    parse_day(value)
        .map(|date| date.strftime("%b %d, %Y").to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Render a day as `May 01`, for trend charts.
pub fn format_day(value: &str) -> String {
    parse_day(value)
        .map(|date| date.strftime("%b %d").to_string())
        .unwrap_or_else(|| value.to_string())
}

fn parse_day(value: &str) -> Option<Date> {
    let value = value.trim();
    if let Ok(ts) = value.parse::<Timestamp>() {
        return Some(ts.to_zoned(TimeZone::UTC).date());
    }
    value.parse::<Date>().ok()
}

/// `3h` style hours, trimming a trailing `.0`.
pub fn format_hours(hours: Option<f64>) -> String {
    match hours {
        Some(h) if h.fract() == 0.0 => format!("{h:.0}h"),
        Some(h) => format!("{h:.1}h"),
        None => "-".to_string(),
    }
}

/// A fixed-width bar for percentages and counts, e.g. `#####.....`.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || width == 0 {
        return ".".repeat(width);
    }
    let filled = ((value / max).clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(page: u32, total_docs: u64) -> PageMeta {
        crate::list::PaginatedList::<()>::new(vec![], page, 10, total_docs).meta()
    }

    #[test]
    fn test_page_footer() {
        insta::assert_snapshot!(page_footer(&meta(2, 25), "issues"), @"Page 2 of 3 (25 issues) | prev | next");
        insta::assert_snapshot!(page_footer(&meta(1, 8), "issues"), @"Page 1 of 1 (8 issues)");
        insta::assert_snapshot!(page_footer(&meta(1, 0), "projects"), @"Page 1 of 1 (0 projects)");
    }

    #[test]
    fn test_page_numbers_window() {
        assert_eq!(page_numbers(&meta(1, 25), 5), "[1] 2 3");
        assert_eq!(page_numbers(&meta(5, 100), 5), "3 4 [5] 6 7");
        assert_eq!(page_numbers(&meta(10, 100), 5), "6 7 8 9 [10]");
        assert_eq!(page_numbers(&meta(1, 0), 5), "");
    }

    #[test]
    fn test_empty_state_messages() {
        let none = empty_state_message(EmptyState::NothingYet, "issues", "issues create");
        assert!(none.starts_with("No issues yet."));
        let filtered = empty_state_message(EmptyState::NoMatches, "issues", "issues create");
        assert!(filtered.contains("match your search or filters"));
        assert!(filtered.contains("issuedesk issues create"));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-05-01T10:30:00.000Z"), "May 01, 2024");
        assert_eq!(format_date("2024-05-01"), "May 01, 2024");
        assert_eq!(format_date("soon"), "soon");
        assert_eq!(format_day("2024-12-24"), "Dec 24");
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(Some(3.0)), "3h");
        assert_eq!(format_hours(Some(1.5)), "1.5h");
        assert_eq!(format_hours(None), "-");
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(50.0, 100.0, 10), "#####.....");
        assert_eq!(bar(150.0, 100.0, 4), "####");
        assert_eq!(bar(1.0, 0.0, 3), "...");
    }

    #[test]
    fn test_plain_badges_without_color() {
        owo_colors::set_override(false);
        assert_eq!(status_badge(IssueStatus::InProgress), "[in progress]");
        assert_eq!(priority_badge(IssuePriority::High), "[high]");
    }
}
