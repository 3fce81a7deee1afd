//! Filter shapes for the list views.
//!
//! Each resource declares its filter dimensions, how they render into query
//! parameters, and which fields its endpoint can sort by.

use std::fmt;
use std::str::FromStr;

use crate::error::{DeskError, Result};
use crate::types::{IssuePriority, IssueStatus, IssueType, ProjectStatus};

/// One filter dimension: either unrestricted or pinned to a value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Filter<T> {
    pub fn is_active(&self) -> bool {
        matches!(self, Filter::Only(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Filter::All => None,
            Filter::Only(v) => Some(v),
        }
    }
}

impl<T> Filter<T>
where
    T: FromStr,
    DeskError: From<T::Err>,
{
    /// Parse user input. Empty input and "all" clear the filter.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            Ok(Filter::All)
        } else {
            Ok(Filter::Only(value.parse::<T>()?))
        }
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "all"),
            Filter::Only(v) => write!(f, "{v}"),
        }
    }
}

/// Replace `slot` with `next`, reporting whether anything changed.
fn replace<T: PartialEq>(slot: &mut T, next: T) -> bool {
    if *slot == next {
        false
    } else {
        *slot = next;
        true
    }
}

/// The filter shape of one list resource.
pub trait FilterSet: Clone + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Names one editable filter dimension.
    type Dimension: Copy + Eq + fmt::Debug + fmt::Display + FromStr<Err = DeskError> + Send;

    /// Fields the endpoint can sort by. Empty means the endpoint is unsorted.
    const SORT_FIELDS: &'static [&'static str];

    /// Sort applied before the user picks one.
    const DEFAULT_SORT: Option<&'static str>;

    /// Set one dimension from user input. Returns whether the value changed.
    fn set(&mut self, dimension: Self::Dimension, value: &str) -> Result<bool>;

    /// Whether any dimension is restricted.
    fn is_active(&self) -> bool;

    /// Append the active dimensions as query parameters.
    fn append_params(&self, params: &mut Vec<(&'static str, String)>);

    /// Resolve a user-supplied sort field to its canonical name.
    fn sort_field(name: &str) -> Result<&'static str> {
        let name = name.trim();
        Self::SORT_FIELDS
            .iter()
            .copied()
            .find(|field| field.eq_ignore_ascii_case(name))
            .ok_or_else(|| DeskError::InvalidSortField(name.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueDimension {
    Status,
    Priority,
    Type,
    Project,
}

enum_display_fromstr!(IssueDimension, "issue filter", {
    Status => "status",
    Priority => "priority",
    Type => "type",
    Project => "project",
});

/// Filters of the issues list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFilters {
    pub status: Filter<IssueStatus>,
    pub priority: Filter<IssuePriority>,
    pub issue_type: Filter<IssueType>,
    pub project: Filter<String>,
}

impl FilterSet for IssueFilters {
    type Dimension = IssueDimension;

    const SORT_FIELDS: &'static [&'static str] = &[
        "updated_at",
        "created_at",
        "priority",
        "status",
        "issue_type",
        "title",
        "due_date",
    ];

    const DEFAULT_SORT: Option<&'static str> = Some("updated_at");

    fn set(&mut self, dimension: IssueDimension, value: &str) -> Result<bool> {
        Ok(match dimension {
            IssueDimension::Status => replace(&mut self.status, Filter::parse(value)?),
            IssueDimension::Priority => replace(&mut self.priority, Filter::parse(value)?),
            IssueDimension::Type => replace(&mut self.issue_type, Filter::parse(value)?),
            IssueDimension::Project => replace(&mut self.project, Filter::parse(value)?),
        })
    }

    fn is_active(&self) -> bool {
        self.status.is_active()
            || self.priority.is_active()
            || self.issue_type.is_active()
            || self.project.is_active()
    }

    fn append_params(&self, params: &mut Vec<(&'static str, String)>) {
        if let Some(status) = self.status.value() {
            params.push(("status", status.to_string()));
        }
        if let Some(priority) = self.priority.value() {
            params.push(("priority", priority.to_string()));
        }
        if let Some(issue_type) = self.issue_type.value() {
            params.push(("issue_type", issue_type.to_string()));
        }
        if let Some(project) = self.project.value() {
            params.push(("project_id", project.clone()));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectDimension {
    Status,
}

enum_display_fromstr!(ProjectDimension, "project filter", {
    Status => "status",
});

/// Filters of the projects list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilters {
    pub status: Filter<ProjectStatus>,
}

impl FilterSet for ProjectFilters {
    type Dimension = ProjectDimension;

    const SORT_FIELDS: &'static [&'static str] = &[];

    const DEFAULT_SORT: Option<&'static str> = None;

    fn set(&mut self, dimension: ProjectDimension, value: &str) -> Result<bool> {
        Ok(match dimension {
            ProjectDimension::Status => replace(&mut self.status, Filter::parse(value)?),
        })
    }

    fn is_active(&self) -> bool {
        self.status.is_active()
    }

    fn append_params(&self, params: &mut Vec<(&'static str, String)>) {
        if let Some(status) = self.status.value() {
            params.push(("status", status.to_string()));
        }
    }
}
