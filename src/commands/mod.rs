//! Command implementations behind the `issuedesk` CLI.
//!
//! Each command loads a [`Workspace`] (config, session and API client),
//! performs its requests and reports through [`CommandOutput`], which prints
//! either human text or JSON depending on `--json`.

mod auth;
mod backlog;
mod board;
mod browse;
mod company;
mod config;
mod dashboard;
mod issues;
mod projects;
mod sprints;

pub use auth::{cmd_login, cmd_logout, cmd_members, cmd_register, cmd_whoami};
pub use backlog::cmd_backlog;
pub use board::cmd_board;
pub use browse::{BrowseCommand, parse_browse_command};
pub use company::{cmd_company_create, cmd_company_lookup};
pub use config::{cmd_config_get, cmd_config_path, cmd_config_set, cmd_config_show};
pub use dashboard::{cmd_dashboard, cmd_reports};
pub use issues::{
    cmd_issue_comment, cmd_issue_create, cmd_issue_delete, cmd_issue_show, cmd_issue_subtask,
    cmd_issue_update, cmd_issues_browse, cmd_issues_ls,
};
pub use projects::{
    cmd_project_create, cmd_project_delete, cmd_project_names, cmd_project_update,
    cmd_projects_browse, cmd_projects_ls,
};
pub use sprints::{cmd_sprint_complete, cmd_sprint_create, cmd_sprint_start, cmd_sprints_ls};

use std::io::{self, BufRead, IsTerminal};

use serde_json::{Value, json};

use crate::api::ApiClient;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::display::{self, empty_state_message, page_footer};
use crate::error::{DeskError, Result};
use crate::list::{
    FilterSet, ListController, ListQuery, ListSource, ListView, PageMeta, Sort, SortDirection,
};
use crate::session::SessionContext;

/// Output of a command: a JSON value plus an optional human rendering.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}

/// Everything a command needs to talk to the API.
pub struct Workspace {
    pub config: Config,
    pub client: ApiClient,
}

impl Workspace {
    pub fn load() -> Result<Self> {
        let config = Config::load()?;
        let session = SessionContext::load()?;
        let client = ApiClient::new(&config.api, session)?;
        Ok(Self { config, client })
    }

    /// Load, failing early when there is no session token.
    pub fn signed_in() -> Result<Self> {
        let workspace = Self::load()?;
        workspace.session().require_signed_in()?;
        Ok(workspace)
    }

    pub fn session(&self) -> &SessionContext {
        self.client.session()
    }

    pub fn page_size(&self) -> u32 {
        self.config.list.page_size
    }

    pub fn company_id(&self) -> Result<String> {
        self.session().company_id().ok_or_else(|| {
            DeskError::Other(
                "no company on this session, create one with `issuedesk company create`"
                    .to_string(),
            )
        })
    }
}

/// Parse `--sort` input: `field` sorts ascending, `-field` descending.
pub(crate) fn parse_sort<F: FilterSet>(input: &str) -> Result<Sort> {
    let input = input.trim();
    let (name, direction) = match input.strip_prefix('-') {
        Some(name) => (name, SortDirection::Desc),
        None => (input, SortDirection::Asc),
    };
    Ok(Sort {
        field: F::sort_field(name)?,
        direction,
    })
}

/// Fetch the single page described by `query` through a list controller.
pub(crate) async fn fetch_page<T, F, S>(
    source: &S,
    noun: &'static str,
    query: ListQuery<F>,
) -> Result<ListController<T, F>>
where
    F: FilterSet,
    S: ListSource<T, F>,
{
    let mut controller = ListController::with_query(noun, query);
    let request = controller.start();
    let page = source.fetch(&request.query).await?;
    controller.complete(request.generation, Ok(page));
    Ok(controller)
}

/// Text for the current state of a list view.
pub(crate) fn render_list<T, F: FilterSet>(
    controller: &ListController<T, F>,
    table: fn(&[T]) -> String,
    create_command: &str,
) -> String {
    match controller.view() {
        ListView::Loading => format!("Loading {}...", controller.noun()),
        ListView::Empty(state) => empty_state_message(state, controller.noun(), create_command),
        ListView::Unavailable => format!(
            "Could not load {}. Type `refresh` to try again.",
            controller.noun()
        ),
        ListView::Items {
            items,
            meta,
            refreshing,
        } => {
            let mut text = table(items);
            text.push('\n');
            text.push_str(&page_footer(&meta, controller.noun()));
            if meta.total_pages > 1 {
                text.push_str(&format!("  {}", display::page_numbers(&meta, 7)));
            }
            if refreshing {
                text.push_str("  (refreshing)");
            }
            text
        }
    }
}

pub(crate) fn meta_json(meta: Option<PageMeta>) -> Value {
    match meta {
        Some(meta) => json!({
            "page": meta.page,
            "limit": meta.limit,
            "total_docs": meta.total_docs,
            "total_pages": meta.total_pages,
            "has_next_page": meta.has_next_page,
            "has_prev_page": meta.has_prev_page,
        }),
        None => Value::Null,
    }
}

/// Success line for mutations, preferring the server's own message.
pub(crate) fn ack_text(message: Option<String>, fallback: impl Into<String>) -> String {
    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.into())
}

/// Use `value`, or read it from piped stdin when absent.
pub(crate) fn value_or_stdin(value: Option<String>, what: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    if io::stdin().is_terminal() {
        return Err(DeskError::Other(format!(
            "{what} is required (pass it as an argument or pipe it on stdin)"
        )));
    }
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::{IssueFilters, ProjectFilters};

    #[test]
    fn test_parse_sort_direction_prefix() {
        let desc = parse_sort::<IssueFilters>("-priority").unwrap();
        assert_eq!(desc.to_param(), "-priority");
        let asc = parse_sort::<IssueFilters>("Title").unwrap();
        assert_eq!(asc.to_param(), "title");
        assert!(parse_sort::<IssueFilters>("-nope").is_err());
        assert!(parse_sort::<ProjectFilters>("name").is_err());
    }

    #[test]
    fn test_ack_text_prefers_server_message() {
        assert_eq!(ack_text(Some("Issue deleted".into()), "Deleted"), "Issue deleted");
        assert_eq!(ack_text(Some("  ".into()), "Deleted"), "Deleted");
        assert_eq!(ack_text(None, "Deleted"), "Deleted");
    }

    #[test]
    fn test_meta_json() {
        assert!(meta_json(None).is_null());
        let meta = crate::list::PaginatedList::<()>::new(vec![], 2, 10, 25).meta();
        assert_eq!(meta_json(Some(meta))["total_pages"], 3);
    }

    #[test]
    fn test_render_list_failed_first_load_has_no_empty_hint() {
        let mut controller = ListController::<String, IssueFilters>::new("issues", 10);
        let request = controller.start();
        controller.complete(request.generation, Err(DeskError::Timeout(10)));

        let text = render_list(&controller, |_: &[String]| String::new(), "issues create");
        assert_eq!(text, "Could not load issues. Type `refresh` to try again.");
    }
}
