#[macro_use]
mod macros;

pub mod api;
pub mod board;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod list;
pub mod notice;
pub mod session;
pub mod types;
pub mod validate;

#[cfg(test)]
mod test_guards;

pub use api::ApiClient;
pub use board::{Backlog, Board, Column};
pub use config::Config;
pub use error::{DeskError, Result};
pub use list::{
    EmptyState, FilterSet, IssueFilters, ListController, ListQuery, ListSource, ListView,
    LiveList, PaginatedList, ProjectFilters,
};
pub use notice::{Notice, NoticeLevel};
pub use session::SessionContext;
pub use types::{
    Issue, IssuePriority, IssueStatus, IssueType, Project, ProjectStatus, Sprint, SprintStatus,
    User, UserRole,
};
