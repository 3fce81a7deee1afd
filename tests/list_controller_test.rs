mod common;

use std::time::Duration;

use common::fixtures::{issue, page, project, user};
use issuedesk::config::ApiConfig;
use issuedesk::list::{IssueDimension, ProjectDimension};
use issuedesk::{
    ApiClient, EmptyState, Issue, IssueFilters, ListController, ListView, LiveList, NoticeLevel,
    Project, ProjectFilters, SessionContext, User,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    let config = ApiConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    };
    let client = ApiClient::new(&config, SessionContext::ephemeral()).unwrap();
    let user: User = serde_json::from_value(user()).unwrap();
    client.session().sign_in("t1".to_string(), user).unwrap();
    client
}

type Issues = LiveList<Issue, IssueFilters, ApiClient>;

fn issues(server: &MockServer) -> Issues {
    LiveList::new(client(server), ListController::new("issues", 10))
}

fn titles(list: &Issues) -> Vec<String> {
    list.with(|c| c.items().iter().map(|i| i.title.clone()).collect())
}

async fn mount_first_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/issues"))
        .and(query_param("search", ""))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![issue("i1", "Login fails", "open"), issue("i2", "Logo blurry", "open")],
            1,
            10,
            12,
        )))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_initial_load() {
    let server = MockServer::start().await;
    mount_first_page(&server).await;

    let mut list = issues(&server);
    assert!(list.with(|c| matches!(c.view(), ListView::Loading)));
    list.start();
    list.settle().await;

    assert_eq!(titles(&list), vec!["Login fails", "Logo blurry"]);
    let meta = list.with(|c| c.meta()).unwrap();
    assert_eq!(meta.total_pages, 2);
    assert!(meta.has_next_page);
    assert!(list.take_notices().is_empty());
}

#[tokio::test]
async fn test_slow_superseded_search_is_dropped() {
    let server = MockServer::start().await;
    mount_first_page(&server).await;
    Mock::given(method("GET"))
        .and(path("/issues"))
        .and(query_param("search", "lo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(vec![issue("i1", "Login fails", "open")], 1, 10, 1))
                .set_delay(Duration::from_millis(600)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/issues"))
        .and(query_param("search", "logo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(vec![issue("i2", "Logo blurry", "open")], 1, 10, 1)),
        )
        .mount(&server)
        .await;

    let mut list = issues(&server);
    list.start();
    list.settle().await;

    assert!(list.update(|c| c.set_search("lo")));
    assert!(list.update(|c| c.set_search("logo")));
    assert_eq!(list.in_flight(), 2);
    list.settle().await;

    assert_eq!(titles(&list), vec!["Logo blurry"]);
    assert_eq!(list.with(|c| c.query().search.clone()), "logo");
    assert!(!list.with(|c| c.is_loading()));
}

#[tokio::test]
async fn test_failed_page_change_keeps_items() {
    let server = MockServer::start().await;
    mount_first_page(&server).await;
    Mock::given(method("GET"))
        .and(path("/issues"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "success": false,
            "message": "database unavailable"
        })))
        .mount(&server)
        .await;

    let mut list = issues(&server);
    list.start();
    list.settle().await;

    assert!(list.update(|c| c.next_page()));
    list.settle().await;

    assert_eq!(titles(&list), vec!["Login fails", "Logo blurry"]);
    assert_eq!(list.with(|c| c.query().page), 1);
    let notices = list.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].message.contains("database unavailable"));
    assert!(list.take_notices().is_empty());
}

#[tokio::test]
async fn test_filtered_empty_result_reports_no_matches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/issues"))
        .and(query_param("priority", "critical"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![], 1, 10, 0)))
        .mount(&server)
        .await;
    mount_first_page(&server).await;

    let mut list = issues(&server);
    list.start();
    list.settle().await;

    let dispatched = list
        .try_update(|c| c.set_filter(IssueDimension::Priority, "critical"))
        .unwrap();
    assert!(dispatched);
    list.settle().await;

    assert!(list.with(|c| matches!(c.view(), ListView::Empty(EmptyState::NoMatches))));
}

#[tokio::test]
async fn test_invalid_filter_dispatches_nothing() {
    let server = MockServer::start().await;
    mount_first_page(&server).await;

    let mut list = issues(&server);
    list.start();
    list.settle().await;

    assert!(
        list.try_update(|c| c.set_filter(IssueDimension::Status, "done"))
            .is_err()
    );
    assert_eq!(list.in_flight(), 0);
    assert_eq!(titles(&list).len(), 2);
}

#[tokio::test]
async fn test_empty_project_list_reports_nothing_yet() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(query_param("status", "archived"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(vec![project("p1", "Old", "OLD")], 1, 10, 1)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![], 1, 10, 0)))
        .mount(&server)
        .await;

    let mut list: LiveList<Project, ProjectFilters, ApiClient> =
        LiveList::new(client(&server), ListController::new("projects", 10));
    list.start();
    list.settle().await;
    assert!(list.with(|c| matches!(c.view(), ListView::Empty(EmptyState::NothingYet))));

    list.try_update(|c| c.set_filter(ProjectDimension::Status, "archived"))
        .unwrap();
    list.settle().await;
    assert_eq!(list.with(|c| c.items().len()), 1);
}

#[tokio::test]
async fn test_status_filter_replaces_unfiltered_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/issues"))
        .and(query_param("status", "open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![issue("i1", "Login fails", "open")],
            1,
            10,
            1,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![issue("i1", "Login fails", "open"), issue("i3", "Typo", "closed")],
            1,
            10,
            2,
        )))
        .mount(&server)
        .await;

    let mut list = issues(&server);
    list.try_update(|c| c.set_filter(IssueDimension::Status, "all"))
        .unwrap();
    list.start();
    list.settle().await;
    assert_eq!(titles(&list), vec!["Login fails", "Typo"]);

    list.try_update(|c| c.set_filter(IssueDimension::Status, "open"))
        .unwrap();
    list.settle().await;
    assert_eq!(titles(&list), vec!["Login fails"]);
    assert_eq!(list.with(|c| c.query().page), 1);
}
