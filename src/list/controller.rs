//! Paginated list controller.
//!
//! Owns search, filter, sort and page state for one list view and keeps the
//! displayed page consistent with it. Every state transition hands back a
//! [`FetchRequest`] stamped with a generation number; the caller performs the
//! fetch and reports back through [`ListController::complete`]. Completions
//! for anything but the latest generation are discarded, so a slow response
//! can never overwrite a newer one.

use crate::error::Result;
use crate::notice::Notice;

use super::filters::FilterSet;
use super::page::{PageMeta, PaginatedList};
use super::ListQuery;

/// A fetch the caller must perform.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest<F> {
    pub generation: u64,
    pub query: ListQuery<F>,
}

/// What happened to a reported fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result is now on display.
    Applied,
    /// The latest fetch failed; the previous page stays on display.
    Failed,
    /// A newer request was issued since; the result was dropped.
    Stale,
}

/// Why a successful fetch came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Search or filters are active.
    NoMatches,
    /// Nothing exists yet.
    NothingYet,
}

/// What a list view should render right now.
#[derive(Debug, PartialEq)]
pub enum ListView<'a, T> {
    /// First load still in flight.
    Loading,
    Items {
        items: &'a [T],
        meta: PageMeta,
        /// A newer fetch is in flight over the displayed page.
        refreshing: bool,
    },
    Empty(EmptyState),
    /// Nothing has ever loaded and the latest fetch failed.
    Unavailable,
}

#[derive(Debug)]
pub struct ListController<T, F> {
    noun: &'static str,
    query: ListQuery<F>,
    items: Vec<T>,
    meta: Option<PageMeta>,
    /// Query that produced the displayed page.
    shown: Option<ListQuery<F>>,
    empty: EmptyState,
    issued: u64,
    settled: u64,
    notices: Vec<Notice>,
}

impl<T, F: FilterSet> ListController<T, F> {
    /// `noun` names the collection in notices, e.g. "issues".
    pub fn new(noun: &'static str, limit: u32) -> Self {
        Self::with_query(noun, ListQuery::new(limit))
    }

    /// Start from a prepared query, e.g. one built from command-line flags.
    pub fn with_query(noun: &'static str, query: ListQuery<F>) -> Self {
        Self {
            noun,
            query,
            items: Vec::new(),
            meta: None,
            shown: None,
            empty: EmptyState::NothingYet,
            issued: 0,
            settled: 0,
            notices: Vec::new(),
        }
    }

    pub fn noun(&self) -> &'static str {
        self.noun
    }

    pub fn query(&self) -> &ListQuery<F> {
        &self.query
    }

    /// Items of the page on display.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Paging metadata of the page on display, once one has loaded.
    pub fn meta(&self) -> Option<PageMeta> {
        self.meta
    }

    pub fn latest_generation(&self) -> u64 {
        self.issued
    }

    fn in_flight(&self) -> bool {
        self.settled < self.issued
    }

    /// Nothing has been displayed yet and a fetch is running.
    pub fn is_loading(&self) -> bool {
        self.in_flight() && self.meta.is_none()
    }

    /// A page is displayed and a newer fetch is running over it.
    pub fn is_processing(&self) -> bool {
        self.in_flight() && self.meta.is_some()
    }

    fn issue(&mut self) -> FetchRequest<F> {
        self.issued += 1;
        tracing::debug!(
            noun = self.noun,
            generation = self.issued,
            page = self.query.page,
            search = %self.query.search,
            filters = ?self.query.filters,
            "list fetch issued"
        );
        FetchRequest {
            generation: self.issued,
            query: self.query.clone(),
        }
    }

    /// Initial load. Same as [`refresh`](Self::refresh).
    pub fn start(&mut self) -> FetchRequest<F> {
        self.issue()
    }

    /// Re-fetch the current state, e.g. after a mutation.
    pub fn refresh(&mut self) -> FetchRequest<F> {
        self.issue()
    }

    /// Change the search term. Resets to page 1.
    pub fn set_search(&mut self, term: &str) -> Option<FetchRequest<F>> {
        if self.query.search == term {
            return None;
        }
        self.query.search = term.to_string();
        self.query.page = 1;
        Some(self.issue())
    }

    /// Change one filter dimension. Resets to page 1. An invalid value is
    /// rejected without touching state; an unchanged value issues nothing.
    pub fn set_filter(
        &mut self,
        dimension: F::Dimension,
        value: &str,
    ) -> Result<Option<FetchRequest<F>>> {
        if !self.query.filters.set(dimension, value)? {
            return Ok(None);
        }
        self.query.page = 1;
        Ok(Some(self.issue()))
    }

    /// Clear search and all filters.
    pub fn clear_filters(&mut self) -> Option<FetchRequest<F>> {
        if !self.query.is_filtered() && self.query.search.is_empty() {
            return None;
        }
        self.query.search.clear();
        self.query.filters = F::default();
        self.query.page = 1;
        Some(self.issue())
    }

    /// Sort by `field`: the active field flips direction, a new field starts
    /// descending. Resets to page 1.
    pub fn set_sort(&mut self, field: &str) -> Result<FetchRequest<F>> {
        let field = F::sort_field(field)?;
        self.query.sort = Some(match &self.query.sort {
            Some(current) => current.toggled(field),
            None => super::Sort::desc(field),
        });
        self.query.page = 1;
        Ok(self.issue())
    }

    /// Jump to page `n`. Pages outside `[1, total_pages]` of the displayed
    /// result, and the current page, are no-ops.
    pub fn go_to_page(&mut self, n: u32) -> Option<FetchRequest<F>> {
        let meta = self.meta?;
        if !meta.contains_page(n) || n == self.query.page {
            tracing::debug!(noun = self.noun, page = n, "page change ignored");
            return None;
        }
        self.query.page = n;
        Some(self.issue())
    }

    pub fn next_page(&mut self) -> Option<FetchRequest<F>> {
        let next = self.query.page.checked_add(1)?;
        self.go_to_page(next)
    }

    pub fn prev_page(&mut self) -> Option<FetchRequest<F>> {
        let prev = self.query.page.checked_sub(1)?;
        self.go_to_page(prev)
    }

    /// Change the page size. Resets to page 1.
    pub fn set_limit(&mut self, limit: u32) -> Option<FetchRequest<F>> {
        let limit = limit.max(1);
        if self.query.limit == limit {
            return None;
        }
        self.query.limit = limit;
        self.query.page = 1;
        Some(self.issue())
    }

    /// Report the outcome of the fetch for `generation`.
    pub fn complete(&mut self, generation: u64, result: Result<PaginatedList<T>>) -> Completion {
        if generation != self.issued {
            tracing::debug!(
                noun = self.noun,
                generation,
                latest = self.issued,
                "stale list response dropped"
            );
            return Completion::Stale;
        }
        self.settled = generation;

        match result {
            Ok(page) => {
                let page = page.normalized();
                let meta = page.meta();
                self.query.page = meta.page;
                self.items = page.items;
                self.meta = Some(meta);
                self.shown = Some(self.query.clone());
                self.empty = if self.query.is_filtered() {
                    EmptyState::NoMatches
                } else {
                    EmptyState::NothingYet
                };
                Completion::Applied
            }
            Err(err) => {
                tracing::warn!(noun = self.noun, generation, error = %err, "list fetch failed");
                // Back to the query on display, so the next refresh or page
                // change never pairs an old page number with new filters.
                if let Some(shown) = &self.shown {
                    self.query = shown.clone();
                }
                self.notices
                    .push(Notice::error(format!("Failed to fetch {}: {}", self.noun, err)));
                Completion::Failed
            }
        }
    }

    /// Drain queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn view(&self) -> ListView<'_, T> {
        match self.meta {
            None if self.in_flight() || self.issued == 0 => ListView::Loading,
            None => ListView::Unavailable,
            Some(_) if self.items.is_empty() => ListView::Empty(self.empty),
            Some(meta) => ListView::Items {
                items: &self.items,
                meta,
                refreshing: self.is_processing(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeskError;
    use crate::list::filters::{IssueDimension, IssueFilters, ProjectFilters};
    use crate::list::sort::SortDirection;

    type Issues = ListController<&'static str, IssueFilters>;

    fn page(items: Vec<&'static str>, page: u32, total: u64) -> Result<PaginatedList<&'static str>> {
        Ok(PaginatedList::new(items, page, 10, total))
    }

    fn loaded(total: u64) -> Issues {
        let mut list = Issues::new("issues", 10);
        let req = list.start();
        list.complete(req.generation, page(vec!["a", "b"], 1, total));
        list
    }

    #[test]
    fn test_initial_state_is_loading() {
        let mut list = Issues::new("issues", 10);
        assert_eq!(list.view(), ListView::Loading);
        let req = list.start();
        assert_eq!(req.generation, 1);
        assert_eq!(req.query.page, 1);
        assert!(list.is_loading());
        assert!(!list.is_processing());
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut list = loaded(30);
        let req = list.go_to_page(3).unwrap();
        list.complete(req.generation, page(vec!["z"], 3, 30));
        assert_eq!(list.query().page, 3);

        let req = list.set_filter(IssueDimension::Status, "open").unwrap().unwrap();
        assert_eq!(req.query.page, 1);
        assert_eq!(list.query().page, 1);
    }

    #[test]
    fn test_search_change_resets_page() {
        let mut list = loaded(30);
        let req = list.go_to_page(2).unwrap();
        list.complete(req.generation, page(vec!["y"], 2, 30));

        let req = list.set_search("crash").unwrap();
        assert_eq!(req.query.page, 1);
        assert_eq!(req.query.search, "crash");
    }

    #[test]
    fn test_unchanged_values_issue_nothing() {
        let mut list = loaded(30);
        let before = list.latest_generation();
        assert!(list.set_search("").is_none());
        assert!(list.set_filter(IssueDimension::Status, "all").unwrap().is_none());
        assert!(list.set_limit(10).is_none());
        assert_eq!(list.latest_generation(), before);
    }

    #[test]
    fn test_invalid_filter_is_rejected_without_fetch() {
        let mut list = loaded(30);
        let before = list.latest_generation();
        assert!(list.set_filter(IssueDimension::Priority, "urgent").is_err());
        assert_eq!(list.latest_generation(), before);
        assert!(!list.query().filters.status.is_active());
    }

    #[test]
    fn test_sort_same_field_flips_new_field_descends() {
        let mut list = loaded(30);
        let req = list.set_sort("updated_at").unwrap();
        assert_eq!(req.query.sort.as_ref().unwrap().direction, SortDirection::Asc);

        let req = list.set_sort("updated_at").unwrap();
        assert_eq!(req.query.sort.as_ref().unwrap().direction, SortDirection::Desc);

        let req = list.set_sort("priority").unwrap();
        let sort = req.query.sort.unwrap();
        assert_eq!(sort.field, "priority");
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn test_sort_resets_page() {
        let mut list = loaded(30);
        let req = list.go_to_page(2).unwrap();
        list.complete(req.generation, page(vec!["y"], 2, 30));
        let req = list.set_sort("title").unwrap();
        assert_eq!(req.query.page, 1);
    }

    #[test]
    fn test_sort_unknown_field_rejected() {
        let mut list = loaded(30);
        assert!(matches!(
            list.set_sort("assignee"),
            Err(DeskError::InvalidSortField(_))
        ));

        let mut projects = ListController::<(), ProjectFilters>::new("projects", 10);
        assert!(projects.set_sort("name").is_err());
    }

    #[test]
    fn test_go_to_page_out_of_range_is_noop() {
        let mut list = loaded(25);
        let before = list.latest_generation();
        assert!(list.go_to_page(0).is_none());
        assert!(list.go_to_page(4).is_none());
        assert!(list.go_to_page(1).is_none());
        assert_eq!(list.latest_generation(), before);
        assert_eq!(list.query().page, 1);

        let req = list.go_to_page(3).unwrap();
        assert_eq!(req.query.page, 3);
    }

    #[test]
    fn test_go_to_page_before_first_load_is_noop() {
        let mut list = Issues::new("issues", 10);
        assert!(list.go_to_page(1).is_none());
        assert!(list.next_page().is_none());
    }

    #[test]
    fn test_go_to_page_keeps_filters() {
        let mut list = loaded(25);
        let req = list.set_filter(IssueDimension::Type, "bug").unwrap().unwrap();
        list.complete(req.generation, page(vec!["a"], 1, 25));
        let req = list.next_page().unwrap();
        assert_eq!(req.query.page, 2);
        assert!(req.query.filters.issue_type.is_active());
    }

    #[test]
    fn test_prev_page_on_first_page_is_noop() {
        let mut list = loaded(25);
        assert!(list.prev_page().is_none());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut list = loaded(25);
        let slow = list.set_search("a").unwrap();
        let fast = list.set_search("ab").unwrap();

        assert_eq!(
            list.complete(fast.generation, page(vec!["ab-match"], 1, 1)),
            Completion::Applied
        );
        assert_eq!(
            list.complete(slow.generation, page(vec!["a-1", "a-2"], 1, 2)),
            Completion::Stale
        );
        assert_eq!(list.items(), &["ab-match"]);
    }

    #[test]
    fn test_processing_until_latest_settles() {
        let mut list = loaded(25);
        let first = list.refresh();
        let second = list.refresh();
        list.complete(first.generation, page(vec!["old"], 1, 25));
        assert!(list.is_processing());
        list.complete(second.generation, page(vec!["new"], 1, 25));
        assert!(!list.is_processing());
    }

    #[test]
    fn test_failed_fetch_keeps_previous_items_and_notifies_once() {
        let mut list = loaded(25);
        let req = list.go_to_page(2).unwrap();

        let outcome = list.complete(req.generation, Err(DeskError::Timeout(10)));
        assert_eq!(outcome, Completion::Failed);
        assert_eq!(list.items(), &["a", "b"]);
        assert_eq!(list.query().page, 1);

        let notices = list.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].is_error());
        assert!(notices[0].message.contains("issues"));
        assert!(list.take_notices().is_empty());
    }

    #[test]
    fn test_failed_filter_change_rolls_back_to_displayed_query() {
        let mut list = loaded(30);
        let req = list.go_to_page(3).unwrap();
        list.complete(req.generation, page(vec!["z"], 3, 30));

        let req = list.set_filter(IssueDimension::Status, "open").unwrap().unwrap();
        assert_eq!(
            list.complete(req.generation, Err(DeskError::Timeout(10))),
            Completion::Failed
        );
        assert_eq!(list.items(), &["z"]);

        let req = list.refresh();
        assert_eq!(req.query.page, 3);
        assert!(!req.query.filters.status.is_active());
    }

    #[test]
    fn test_failed_first_load_is_unavailable_not_empty() {
        let mut list = Issues::new("issues", 10);
        let req = list.start();
        list.complete(req.generation, Err(DeskError::Timeout(10)));
        assert_eq!(list.view(), ListView::Unavailable);
        assert_eq!(list.take_notices().len(), 1);

        let req = list.refresh();
        assert_eq!(list.view(), ListView::Loading);
        list.complete(req.generation, page(vec![], 1, 0));
        assert_eq!(list.view(), ListView::Empty(EmptyState::NothingYet));
    }

    #[test]
    fn test_stale_failure_is_silent() {
        let mut list = loaded(25);
        let old = list.refresh();
        let new = list.refresh();
        list.complete(new.generation, page(vec!["fresh"], 1, 25));
        assert_eq!(
            list.complete(old.generation, Err(DeskError::Timeout(10))),
            Completion::Stale
        );
        assert!(list.take_notices().is_empty());
    }

    #[test]
    fn test_empty_state_depends_on_filters() {
        let mut list = Issues::new("issues", 10);
        let req = list.start();
        list.complete(req.generation, page(vec![], 1, 0));
        assert_eq!(list.view(), ListView::Empty(EmptyState::NothingYet));

        let req = list.set_filter(IssueDimension::Status, "closed").unwrap().unwrap();
        list.complete(req.generation, page(vec![], 1, 0));
        assert_eq!(list.view(), ListView::Empty(EmptyState::NoMatches));
    }

    #[test]
    fn test_view_reports_refreshing() {
        let mut list = loaded(25);
        let _pending = list.refresh();
        match list.view() {
            ListView::Items { items, refreshing, meta } => {
                assert_eq!(items.len(), 2);
                assert!(refreshing);
                assert_eq!(meta.total_pages, 3);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_server_page_is_clamped_into_state() {
        let mut list = loaded(25);
        let req = list.go_to_page(3).unwrap();
        // The collection shrank while we were paging.
        list.complete(req.generation, page(vec!["x"], 3, 12));
        assert_eq!(list.query().page, 2);
        assert_eq!(list.meta().unwrap().total_pages, 2);
    }

    #[test]
    fn test_set_limit_resets_page() {
        let mut list = loaded(25);
        let req = list.go_to_page(2).unwrap();
        list.complete(req.generation, page(vec!["x"], 2, 25));
        let req = list.set_limit(25).unwrap();
        assert_eq!(req.query.page, 1);
        assert_eq!(req.query.limit, 25);
    }

    #[test]
    fn test_clear_filters() {
        let mut list = loaded(25);
        list.set_search("x");
        list.set_filter(IssueDimension::Status, "open").unwrap();
        let req = list.clear_filters().unwrap();
        assert!(!req.query.is_filtered());
        assert!(list.clear_filters().is_none());
    }

    #[test]
    fn test_prepared_query_is_fetched_as_is() {
        let mut query = ListQuery::<IssueFilters>::new(5);
        query.page = 3;
        query.search = "login".to_string();
        let mut list = Issues::with_query("issues", query);
        let req = list.start();
        assert_eq!(req.query.page, 3);
        assert_eq!(req.query.limit, 5);
        list.complete(req.generation, page(vec![], 3, 0));
        assert_eq!(list.view(), ListView::Empty(EmptyState::NoMatches));
    }
}
