use owo_colors::{OwoColorize, Stream::Stdout};
use serde_json::{Map, Value, json};

use super::projects::resolve_project_id;
use super::{CommandOutput, Workspace, ack_text};
use crate::board::{Board, Column};
use crate::cli::OutputOptions;
use crate::display::{format_date, issue_bullet};
use crate::error::Result;
use crate::types::IssueStatus;

fn board_text(board: &Board, search: &str) -> String {
    let mut text = match &board.sprint {
        Some(sprint) => {
            let mut header = format!(
                "{}",
                sprint.name.if_supports_color(Stdout, |s| s.bold())
            );
            if let (Some(start), Some(end)) = (&sprint.start_date, &sprint.end_date) {
                header.push_str(&format!(" ({} to {})", format_date(start), format_date(end)));
            }
            header
        }
        None => "No active sprint".to_string(),
    };
    text.push('\n');

    for column in Column::ALL {
        let issues = board.filtered(column, search);
        text.push_str(&format!(
            "\n{} ({})\n",
            column.title().if_supports_color(Stdout, |s| s.bold()),
            issues.len()
        ));
        if issues.is_empty() {
            text.push_str(&format!(
                "  {}\n",
                "(empty)".if_supports_color(Stdout, |s| s.dimmed())
            ));
        }
        for issue in issues {
            text.push_str(&format!("  {}\n", issue_bullet(issue)));
        }
    }
    text.trim_end().to_string()
}

fn board_json(board: &Board, search: &str) -> Value {
    let mut columns = Map::new();
    for column in Column::ALL {
        columns.insert(
            column.status().to_string(),
            json!(board.filtered(column, search)),
        );
    }
    json!({ "sprint": board.sprint, "columns": columns })
}

/// Show the board, optionally moving one issue first. The board is fetched
/// after the move so it reflects the server's state.
pub async fn cmd_board(
    project: &str,
    search: Option<&str>,
    move_to: Option<(String, String)>,
    output: OutputOptions,
) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let project_id = resolve_project_id(&workspace.client, project).await?;

    let mut moved = None;
    if let Some((issue_id, target)) = move_to {
        let status: IssueStatus = target.parse()?;
        let message = workspace.client.set_issue_status(&issue_id, status).await?;
        tracing::info!(issue = %issue_id, %status, "issue moved on board");
        moved = Some(ack_text(
            message,
            format!("Moved {issue_id} to {}", Column::for_status(status).title()),
        ));
    }

    let board = workspace.client.board(&project_id).await?;
    let search = search.unwrap_or_default();

    let mut text = String::new();
    if let Some(moved) = &moved {
        text.push_str(moved);
        text.push_str("\n\n");
    }
    text.push_str(&board_text(&board, search));

    let mut value = board_json(&board, search);
    value["project_id"] = json!(project_id);
    value["moved"] = json!(moved);
    CommandOutput::new(value).with_text(text).print(output)
}
