//! HTTP-level integration tests driving the router with in-process requests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use walkstats::db::{LocalRepository, WalkRepository};
use walkstats::http::{create_router, AppState};
use walkstats::models::{Account, AccountId, Contest, DailyWalk};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Repository seeded with one April contest and two walkers.
fn seeded_repository() -> (Arc<LocalRepository>, String) {
    let repo = Arc::new(LocalRepository::new());
    let contest = Contest::new(
        Some(date(2023, 3, 1)),
        date(2023, 3, 15),
        date(2023, 4, 1),
        date(2023, 4, 30),
    );
    let contest_id = contest.contest_id.clone();
    repo.add_contest(contest).unwrap();

    for (id, age, steps) in [(1, 34, 4000), (2, 67, 11000)] {
        repo.add_account(Account {
            id: AccountId::new(id),
            email: format!("walker{}@example.org", id),
            age: Some(age),
            zip: "94110".to_string(),
            is_tester: false,
        })
        .unwrap();
        repo.add_daily_walk(DailyWalk {
            account_id: AccountId::new(id),
            date: date(2023, 4, 10),
            steps,
            distance: steps as f64 / 2000.0,
        })
        .unwrap();
    }

    (repo, contest_id)
}

fn app(repo: Arc<LocalRepository>) -> axum::Router {
    let repository: Arc<dyn WalkRepository> = repo;
    create_router(AppState::new(repository))
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (repo, _) = seeded_repository();
    let (status, body) = get(app(repo), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_list_contests() {
    let (repo, contest_id) = seeded_repository();
    let (status, body) = get(app(repo), "/v1/contests").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["contests"][0]["contest_id"], contest_id.as_str());
    assert_eq!(body["contests"][0]["start"], "2023-04-01");
}

#[tokio::test]
async fn test_histogram_returns_dense_bins() {
    let (repo, _) = seeded_repository();
    let (status, body) = get(
        app(repo),
        "/v1/admin/histogram/dailywalk?field=steps&bin_size=2000",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unit"], "steps");
    assert_eq!(body["bin_size"], 2000);
    assert!(body.get("bin_count").is_none());
    assert!(body.get("bin_custom").is_none());

    // Steps 4000 and 11000 with size 2000: indices 2 and 5, dense output.
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 6);
    for (idx, bin) in data.iter().enumerate() {
        assert_eq!(bin["bin_idx"], idx);
        assert_eq!(bin["bin_start"], (idx as i64) * 2000);
    }
    assert_eq!(data[2]["count"], 1);
    assert_eq!(data[5]["count"], 1);
}

#[tokio::test]
async fn test_histogram_with_contest_filter() {
    let (repo, contest_id) = seeded_repository();
    let uri = format!(
        "/v1/admin/histogram/users?field=age&bin_size=10&contest_id={}",
        contest_id
    );
    let (status, body) = get(app(repo), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unit"], "years");
    let data = body["data"].as_array().unwrap();
    assert_eq!(data[3]["count"], 1);
    assert_eq!(data[6]["count"], 1);
}

#[tokio::test]
async fn test_unknown_record_kind_is_404() {
    let (repo, _) = seeded_repository();
    let (status, body) = get(
        app(repo),
        "/v1/admin/histogram/devices?field=steps&bin_size=100",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_contest_is_404() {
    let (repo, _) = seeded_repository();
    let (status, body) = get(
        app(repo),
        "/v1/admin/histogram/dailywalk?field=steps&bin_size=100&contest_id=nope",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("does not exist"));
}

#[tokio::test]
async fn test_missing_strategy_is_422_with_field_map() {
    let (repo, _) = seeded_repository();
    let (status, body) = get(app(repo), "/v1/admin/histogram/dailywalk?field=steps").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["non_field_errors"]
        .as_str()
        .unwrap()
        .contains("required"));
}

#[tokio::test]
async fn test_invalid_bin_size_keyed_by_parameter() {
    let (repo, _) = seeded_repository();
    let (status, body) = get(
        app(repo),
        "/v1/admin/histogram/dailywalk?field=steps&bin_size=0",
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["bin_size"]
        .as_str()
        .unwrap()
        .contains("greater than 0"));
}

#[tokio::test]
async fn test_unsupported_field_names_alternatives() {
    let (repo, _) = seeded_repository();
    let (status, body) = get(
        app(repo),
        "/v1/admin/histogram/leaderboard?field=distance&bin_size=1",
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let message = body["non_field_errors"].as_str().unwrap();
    assert!(message.contains("not supported"));
    assert!(message.contains("steps"));
}
