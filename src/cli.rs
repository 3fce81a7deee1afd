use std::io;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::commands::{
    cmd_backlog, cmd_board, cmd_company_create, cmd_company_lookup, cmd_config_get,
    cmd_config_path, cmd_config_set, cmd_config_show, cmd_dashboard, cmd_issue_comment,
    cmd_issue_create, cmd_issue_delete, cmd_issue_show, cmd_issue_subtask, cmd_issue_update,
    cmd_issues_browse, cmd_issues_ls, cmd_login, cmd_logout, cmd_members, cmd_project_create,
    cmd_project_delete, cmd_project_names, cmd_project_update, cmd_projects_browse,
    cmd_projects_ls, cmd_register, cmd_reports, cmd_sprint_complete, cmd_sprint_create,
    cmd_sprint_start, cmd_sprints_ls, cmd_whoami,
};
use crate::error::Result;
use crate::types::{IssuePriority, IssueStatus, IssueType, ProjectStatus, UserRole};

#[derive(Parser)]
#[command(name = "issuedesk")]
#[command(about = "Terminal client for a company issue-tracking workspace")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output switches shared by every command.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Create an account and sign in
    Register {
        /// Full name (at least 3 characters)
        #[arg(long)]
        fullname: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password, at least 6 characters (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,

        /// Role: developer or organization
        #[arg(long)]
        role: Option<UserRole>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// List the members of your company
    Members {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Manage your company
    Company {
        #[command(subcommand)]
        action: CompanyAction,
    },

    /// Work with issues
    #[command(visible_alias = "i")]
    Issues {
        #[command(subcommand)]
        action: IssueAction,
    },

    /// Work with projects
    #[command(visible_alias = "p")]
    Projects {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Show a project's active sprint board
    Board {
        /// Project id, key or name
        project: String,

        /// Only show issues whose title or key contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Move an issue to another column: `--move <issue-id> <status>`
        #[arg(long = "move", num_args = 2, value_names = ["ISSUE", "STATUS"])]
        move_to: Option<Vec<String>>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Show a project's planned sprints and backlog
    Backlog {
        /// Project id, key or name
        project: String,

        /// Move an issue into a sprint (id or name) or back to `backlog`
        #[arg(long = "move", num_args = 2, value_names = ["ISSUE", "TARGET"])]
        move_to: Option<Vec<String>>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Manage sprints
    Sprints {
        #[command(subcommand)]
        action: SprintAction,
    },

    /// Workspace overview
    Dashboard {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Issue statistics and trends
    Reports {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CompanyAction {
    /// Create a company and attach it to the session
    Create {
        /// Company name
        name: String,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Look up a company by its join code
    Lookup {
        /// Join code
        code: String,

        #[command(flatten)]
        output: OutputOptions,
    },
}

/// Search, filter, sort and paging flags of the issues list.
#[derive(Args, Debug, Clone, Default)]
pub struct IssueListArgs {
    /// Free-text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Status filter (open, in_progress, resolved, closed, reopened or all)
    #[arg(long)]
    pub status: Option<String>,

    /// Priority filter (lowest, low, medium, high, critical or all)
    #[arg(long)]
    pub priority: Option<String>,

    /// Type filter (bug, task, story, epic or all)
    #[arg(short = 't', long = "type")]
    pub issue_type: Option<String>,

    /// Project id filter
    #[arg(long)]
    pub project: Option<String>,

    /// Sort field; prefix with `-` for descending (default: -updated_at)
    #[arg(long, allow_hyphen_values = true)]
    pub sort: Option<String>,

    /// Page to show
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Page size (default: list.page_size)
    #[arg(long)]
    pub limit: Option<u32>,
}

/// Search, filter and paging flags of the projects list.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectListArgs {
    /// Free-text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Status filter (active, inactive, completed, archived or all)
    #[arg(long)]
    pub status: Option<String>,

    /// Page to show
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Page size (default: list.page_size)
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct IssueCreateArgs {
    /// Issue title
    pub title: String,

    /// Project id, key or name
    #[arg(short, long)]
    pub project: String,

    /// Short summary
    #[arg(long)]
    pub summary: Option<String>,

    /// Description text
    #[arg(short, long)]
    pub description: Option<String>,

    /// Type: bug, task, story, epic
    #[arg(short = 't', long = "type", default_value = "task")]
    pub issue_type: IssueType,

    /// Initial status
    #[arg(long, default_value = "open")]
    pub status: IssueStatus,

    /// Priority: lowest, low, medium, high, critical
    #[arg(long, default_value = "medium")]
    pub priority: IssuePriority,

    /// Assignee user id
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Sprint id
    #[arg(long)]
    pub sprint: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    /// Story points
    #[arg(long)]
    pub story_points: Option<String>,

    /// Estimated hours
    #[arg(long)]
    pub estimate: Option<String>,

    /// Hours spent so far
    #[arg(long)]
    pub actual: Option<String>,

    /// Environment the issue occurs in
    #[arg(long)]
    pub environment: Option<String>,

    /// Mark the issue as blocked, with a reason
    #[arg(long)]
    pub blocked: Option<String>,

    /// Label, can be repeated or comma-separated
    #[arg(short, long = "label", value_delimiter = ',')]
    pub labels: Vec<String>,

    /// Subtask title, can be repeated
    #[arg(long = "subtask")]
    pub subtasks: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct IssueUpdateArgs {
    /// Issue id
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New summary
    #[arg(long)]
    pub summary: Option<String>,

    /// New description
    #[arg(short, long)]
    pub description: Option<String>,

    /// New type
    #[arg(short = 't', long = "type")]
    pub issue_type: Option<IssueType>,

    /// New status
    #[arg(long)]
    pub status: Option<IssueStatus>,

    /// New priority
    #[arg(long)]
    pub priority: Option<IssuePriority>,

    /// New assignee user id, or `none` to unassign
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// New sprint id, or `none` for the backlog
    #[arg(long)]
    pub sprint: Option<String>,

    /// New due date (YYYY-MM-DD), or `none` to clear
    #[arg(long)]
    pub due: Option<String>,

    /// Story points, or `none` to clear
    #[arg(long)]
    pub story_points: Option<String>,

    /// Estimated hours, or `none` to clear
    #[arg(long)]
    pub estimate: Option<String>,

    /// Hours spent, or `none` to clear
    #[arg(long)]
    pub actual: Option<String>,

    /// Environment the issue occurs in
    #[arg(long)]
    pub environment: Option<String>,

    /// Mark blocked with a reason
    #[arg(long, conflicts_with = "unblock")]
    pub blocked: Option<String>,

    /// Clear the blocked flag
    #[arg(long)]
    pub unblock: bool,

    /// Replace labels (comma-separated)
    #[arg(short, long = "label", value_delimiter = ',')]
    pub labels: Option<Vec<String>>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SubtaskArgs {
    /// Parent issue id
    pub id: String,

    /// Subtask title
    pub title: String,

    /// Description text
    #[arg(short, long)]
    pub description: Option<String>,

    /// Assignee user id
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Subcommand)]
pub enum IssueAction {
    /// List one page of issues
    Ls {
        #[command(flatten)]
        list: IssueListArgs,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Browse issues interactively
    Browse {
        #[command(flatten)]
        list: IssueListArgs,
    },
    /// Show an issue with its subtasks and comments
    Show {
        /// Issue id
        id: String,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Create an issue
    #[command(visible_alias = "c")]
    Create {
        #[command(flatten)]
        issue: IssueCreateArgs,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Update fields of an issue
    Update {
        #[command(flatten)]
        update: IssueUpdateArgs,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Delete an issue
    Delete {
        /// Issue id
        id: String,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Comment on an issue
    Comment {
        /// Issue id
        id: String,

        /// Comment text (read from stdin when omitted)
        text: Vec<String>,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Add a subtask to an issue
    Subtask {
        #[command(flatten)]
        subtask: SubtaskArgs,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project name
    #[arg(long)]
    pub name: Option<String>,

    /// Project key, up to 10 characters
    #[arg(long)]
    pub key: Option<String>,

    /// Description text
    #[arg(short, long)]
    pub description: Option<String>,

    /// Lead user id (default on create: you)
    #[arg(long)]
    pub lead: Option<String>,

    /// Team member user id, can be repeated or comma-separated
    #[arg(short, long = "member", value_delimiter = ',')]
    pub members: Vec<String>,

    /// Start date (YYYY-MM-DD, default on create: today)
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD), or `none` to clear
    #[arg(long)]
    pub end: Option<String>,

    /// Status
    #[arg(long)]
    pub status: Option<ProjectStatus>,

    /// Comma-separated categories
    #[arg(long)]
    pub categories: Option<String>,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// List one page of projects
    Ls {
        #[command(flatten)]
        list: ProjectListArgs,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Browse projects interactively
    Browse {
        #[command(flatten)]
        list: ProjectListArgs,
    },
    /// List project names, keys and ids
    Names {
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Create a project
    #[command(visible_alias = "c")]
    Create {
        #[command(flatten)]
        project: ProjectArgs,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Update a project
    Update {
        /// Project id or key
        project: String,

        #[command(flatten)]
        changes: ProjectArgs,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Delete a project
    Delete {
        /// Project id or key
        project: String,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum SprintAction {
    /// List a project's sprints
    Ls {
        /// Project id, key or name
        project: String,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Create a sprint
    Create {
        /// Project id, key or name
        project: String,

        /// Sprint name
        name: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Start a planned sprint
    Start {
        /// Sprint id
        id: String,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Complete the active sprint
    Complete {
        /// Sprint id
        id: String,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (api.base_url, api.timeout_secs, list.page_size)
        key: String,
        /// Value to set
        value: String,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (api.base_url, api.timeout_secs, list.page_size)
        key: String,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Print the path of the configuration file
    Path,
}

/// Write completions for `shell` to stdout.
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "issuedesk", &mut io::stdout());
}

impl Commands {
    pub async fn run(self) -> Result<()> {
        match self {
            Commands::Login {
                email,
                password,
                output,
            } => cmd_login(email, password, output).await,
            Commands::Register {
                fullname,
                email,
                password,
                role,
                output,
            } => cmd_register(fullname, email, password, role, output).await,
            Commands::Logout => cmd_logout(),
            Commands::Whoami { output } => cmd_whoami(output),
            Commands::Members { output } => cmd_members(output).await,

            Commands::Company { action } => match action {
                CompanyAction::Create { name, output } => cmd_company_create(name, output).await,
                CompanyAction::Lookup { code, output } => cmd_company_lookup(&code, output).await,
            },

            Commands::Issues { action } => match action {
                IssueAction::Ls { list, output } => cmd_issues_ls(list, output).await,
                IssueAction::Browse { list } => cmd_issues_browse(list).await,
                IssueAction::Show { id, output } => cmd_issue_show(&id, output).await,
                IssueAction::Create { issue, output } => cmd_issue_create(issue, output).await,
                IssueAction::Update { update, output } => cmd_issue_update(update, output).await,
                IssueAction::Delete { id, output } => cmd_issue_delete(&id, output).await,
                IssueAction::Comment { id, text, output } => {
                    let text = if text.is_empty() {
                        None
                    } else {
                        Some(text.join(" "))
                    };
                    cmd_issue_comment(&id, text, output).await
                }
                IssueAction::Subtask { subtask, output } => {
                    cmd_issue_subtask(subtask, output).await
                }
            },

            Commands::Projects { action } => match action {
                ProjectAction::Ls { list, output } => cmd_projects_ls(list, output).await,
                ProjectAction::Browse { list } => cmd_projects_browse(list).await,
                ProjectAction::Names { output } => cmd_project_names(output).await,
                ProjectAction::Create { project, output } => {
                    cmd_project_create(project, output).await
                }
                ProjectAction::Update {
                    project,
                    changes,
                    output,
                } => cmd_project_update(&project, changes, output).await,
                ProjectAction::Delete { project, output } => {
                    cmd_project_delete(&project, output).await
                }
            },

            Commands::Board {
                project,
                search,
                move_to,
                output,
            } => cmd_board(&project, search.as_deref(), move_pair(move_to), output).await,
            Commands::Backlog {
                project,
                move_to,
                output,
            } => cmd_backlog(&project, move_pair(move_to), output).await,

            Commands::Sprints { action } => match action {
                SprintAction::Ls { project, output } => cmd_sprints_ls(&project, output).await,
                SprintAction::Create {
                    project,
                    name,
                    start,
                    end,
                    output,
                } => cmd_sprint_create(&project, name, start, end, output).await,
                SprintAction::Start { id, output } => cmd_sprint_start(&id, output).await,
                SprintAction::Complete { id, output } => cmd_sprint_complete(&id, output).await,
            },

            Commands::Dashboard { output } => cmd_dashboard(output).await,
            Commands::Reports { output } => cmd_reports(output).await,

            Commands::Config { action } => match action {
                ConfigAction::Show { output } => cmd_config_show(output),
                ConfigAction::Set { key, value, output } => cmd_config_set(&key, &value, output),
                ConfigAction::Get { key, output } => cmd_config_get(&key, output),
                ConfigAction::Path => cmd_config_path(),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// `--move a b` arrives as a two-element list.
fn move_pair(values: Option<Vec<String>>) -> Option<(String, String)> {
    let mut values = values?.into_iter();
    Some((values.next()?, values.next()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_board_move_takes_two_values() {
        let cli = Cli::try_parse_from([
            "issuedesk", "board", "WEB", "--move", "i1", "in_progress",
        ])
        .unwrap();
        let Commands::Board { move_to, .. } = cli.command else {
            panic!("expected board");
        };
        assert_eq!(
            move_pair(move_to),
            Some(("i1".to_string(), "in_progress".to_string()))
        );
    }

    #[test]
    fn test_enum_flags_use_fromstr() {
        let cli = Cli::try_parse_from([
            "issuedesk", "issues", "create", "Crash", "-p", "WEB", "--priority", "HIGH", "-t",
            "bug",
        ])
        .unwrap();
        let Commands::Issues {
            action: IssueAction::Create { issue, .. },
        } = cli.command
        else {
            panic!("expected issues create");
        };
        assert_eq!(issue.priority, IssuePriority::High);
        assert_eq!(issue.issue_type, IssueType::Bug);
        assert!(
            Cli::try_parse_from(["issuedesk", "issues", "create", "x", "-p", "W", "-t", "bad"])
                .is_err()
        );
    }

    #[test]
    fn test_sort_accepts_leading_dash() {
        let cli = Cli::try_parse_from(["issuedesk", "issues", "ls", "--sort", "-priority"]).unwrap();
        let Commands::Issues {
            action: IssueAction::Ls { list, .. },
        } = cli.command
        else {
            panic!("expected issues ls");
        };
        assert_eq!(list.sort.as_deref(), Some("-priority"));
    }
}
