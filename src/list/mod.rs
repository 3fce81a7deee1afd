//! Remote-backed list views.
//!
//! A list view is a [`ListController`] (pure state machine) fed by a
//! [`ListSource`] (the fetch adapter). [`LiveList`] runs the fetches on the
//! tokio runtime and applies their results through the controller's
//! generation check.

use std::future::Future;

pub mod controller;
pub mod filters;
pub mod live;
pub mod page;
pub mod sort;

pub use controller::{Completion, EmptyState, FetchRequest, ListController, ListView};
pub use filters::{
    Filter, FilterSet, IssueDimension, IssueFilters, ProjectDimension, ProjectFilters,
};
pub use live::LiveList;
pub use page::{PageMeta, PaginatedList};
pub use sort::{Sort, SortDirection};

use crate::error::Result;

/// Everything the server needs to produce one page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F> {
    pub search: String,
    pub filters: F,
    pub sort: Option<Sort>,
    pub page: u32,
    pub limit: u32,
}

impl<F: FilterSet> ListQuery<F> {
    pub fn new(limit: u32) -> Self {
        Self {
            search: String::new(),
            filters: F::default(),
            sort: F::DEFAULT_SORT.map(Sort::desc),
            page: 1,
            limit: limit.max(1),
        }
    }

    /// Whether the result set is narrowed by search or any filter.
    pub fn is_filtered(&self) -> bool {
        !self.search.trim().is_empty() || self.filters.is_active()
    }

    /// Query-string parameters, in a stable order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("search", self.search.trim().to_string()),
        ];
        self.filters.append_params(&mut params);
        if let Some(sort) = &self.sort {
            params.push(("sort", sort.to_param()));
        }
        params
    }
}

/// Fetch adapter: turns a query into one page of results.
pub trait ListSource<T, F: FilterSet>: Send + Sync {
    fn fetch(&self, query: &ListQuery<F>)
    -> impl Future<Output = Result<PaginatedList<T>>> + Send;
}
