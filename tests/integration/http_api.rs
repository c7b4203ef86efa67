//! End-to-end tests for the HTTP API.
//!
//! Starts a real server on an OS-assigned port and drives it with an HTTP
//! client: status codes, distinguishable error bodies, leaderboard
//! ordering, the feed fallback, and cross-post links.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use nudge_core::{Task, TaskStatus, User};
use nudge_reddit::{FeedClient, RedditPost};
use nudge_server::api::{self, AppState, AwardResponse, CrosspostLink, ErrorBody};
use nudge_server::ledger::Ledger;
use nudge_server::store::MemoryStore;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Starts a test server with an unreachable feed base URL, so the feed
/// endpoint deterministically serves the sample fallback.
async fn start_test_server() -> String {
    let ledger = Ledger::new(Arc::new(MemoryStore::new()));
    let feed = FeedClient::with_base_url("NeighborNudge", "http://127.0.0.1:1");
    let state = Arc::new(AppState::new(ledger, feed, 25));
    let (addr, _handle) = api::start_server("127.0.0.1:0", state)
        .await
        .expect("failed to start test server");
    format!("http://{addr}")
}

fn draft_json(description: &str, proposer: &str) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "location": "X",
        "contact_method": "DM",
        "proposer": proposer,
    })
}

async fn propose(client: &reqwest::Client, base: &str, description: &str, proposer: &str) -> Task {
    let response = client
        .post(format!("{base}/api/tasks"))
        .json(&draft_json(description, proposer))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

// ---------------------------------------------------------------------------
// Task endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn propose_returns_created_open_task() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let task = propose(&client, &base, "walk dog", "alice").await;
    assert_eq!(task.status, TaskStatus::Open);
    assert_eq!(task.claimer, None);
    assert_eq!(task.proposer, "alice");
}

#[tokio::test]
async fn propose_empty_field_is_bad_request() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/tasks"))
        .json(&draft_json("   ", "alice"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code, "validation");

    // Nothing was created.
    let tasks: Vec<Task> = client
        .get(format!("{base}/api/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn list_tasks_newest_first() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    propose(&client, &base, "first", "alice").await;
    propose(&client, &base, "second", "alice").await;

    let tasks: Vec<Task> = client
        .get(format!("{base}/api/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].description, "second");
    assert_eq!(tasks[1].description, "first");
}

#[tokio::test]
async fn claim_then_losing_claim_conflicts() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();
    let task = propose(&client, &base, "walk dog", "alice").await;

    let response = client
        .post(format!("{base}/api/tasks/{}/claim", task.id))
        .json(&serde_json::json!({"claimer": "bob"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let claimed: Task = response.json().await.unwrap();
    assert_eq!(claimed.status, TaskStatus::InProgress);
    assert_eq!(claimed.claimer.as_deref(), Some("bob"));

    // A second claimer arrives late and gets a distinguishable conflict.
    let response = client
        .post(format!("{base}/api/tasks/{}/claim", task.id))
        .json(&serde_json::json!({"claimer": "carol"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code, "task_not_open");
}

#[tokio::test]
async fn self_claim_is_a_distinct_conflict() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();
    let task = propose(&client, &base, "walk dog", "alice").await;

    let response = client
        .post(format!("{base}/api/tasks/{}/claim", task.id))
        .json(&serde_json::json!({"claimer": "alice"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code, "self_claim");
}

#[tokio::test]
async fn claim_unknown_task_is_not_found() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!(
            "{base}/api/tasks/00000000-0000-7000-8000-000000000000/claim"
        ))
        .json(&serde_json::json!({"claimer": "bob"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code, "not_found");
}

#[tokio::test]
async fn complete_awards_and_double_complete_conflicts() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();
    let task = propose(&client, &base, "walk dog", "alice").await;

    client
        .post(format!("{base}/api/tasks/{}/claim", task.id))
        .json(&serde_json::json!({"claimer": "bob"}))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{base}/api/tasks/{}/complete", task.id))
        .json(&serde_json::json!({"completer": "bob"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let completed: Task = response.json().await.unwrap();
    assert_eq!(completed.status, TaskStatus::Completed);

    // Completing again is rejected.
    let response = client
        .post(format!("{base}/api/tasks/{}/complete", task.id))
        .json(&serde_json::json!({"completer": "bob"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code, "already_completed");

    // bob earned exactly one completion award on top of nothing else.
    let users: Vec<User> = client
        .get(format!("{base}/api/leaderboard"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let bob = users.iter().find(|u| u.reddit_username == "bob").unwrap();
    assert_eq!(bob.nudge_points, 10);
}

// ---------------------------------------------------------------------------
// Leaderboard and awards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn leaderboard_orders_and_limits() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    for (name, amount) in [("alice", 5u64), ("bob", 25), ("carol", 15)] {
        let response = client
            .post(format!("{base}/api/awards"))
            .json(&serde_json::json!({"username": name, "amount": amount}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    let users: Vec<User> = client
        .get(format!("{base}/api/leaderboard?limit=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.reddit_username.as_str()).collect();
    assert_eq!(names, vec!["bob", "carol"]);
}

#[tokio::test]
async fn manual_award_returns_new_balance() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/awards"))
        .json(&serde_json::json!({"username": "dana", "amount": 7}))
        .send()
        .await
        .unwrap();
    let award: AwardResponse = response.json().await.unwrap();
    assert_eq!(award.username, "dana");
    assert_eq!(award.nudge_points, 7);
}

#[tokio::test]
async fn zero_award_is_bad_request() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/awards"))
        .json(&serde_json::json!({"username": "dana", "amount": 0}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn award_history_is_auditable() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();
    propose(&client, &base, "walk dog", "alice").await;

    let history: Vec<serde_json::Value> = client
        .get(format!("{base}/api/users/alice/awards"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["amount"], 5);
    assert_eq!(history[0]["reason"], "proposed_task");
}

// ---------------------------------------------------------------------------
// Feed and cross-post
// ---------------------------------------------------------------------------

#[tokio::test]
async fn feed_serves_sample_fallback() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/api/feed"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let posts: Vec<RedditPost> = response.json().await.unwrap();
    assert_eq!(posts.len(), 5);
    assert!(posts.iter().all(|p| p.subreddit == "NeighborNudge"));
}

#[tokio::test]
async fn feed_search_filters_fallback() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let posts: Vec<RedditPost> = client
        .get(format!("{base}/api/feed?q=tutoring"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(posts.len(), 1);
    assert!(posts[0].title.to_lowercase().contains("tutoring"));
}

#[tokio::test]
async fn crosspost_link_prefills_submission() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();
    let task = propose(&client, &base, "walk dog", "alice").await;

    let link: CrosspostLink = client
        .get(format!("{base}/api/tasks/{}/crosspost", task.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(link.url.starts_with("https://www.reddit.com/r/NeighborNudge/submit"));
    assert!(link.url.contains("walk"));
}

#[tokio::test]
async fn crosspost_unknown_task_is_not_found() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!(
            "{base}/api/tasks/00000000-0000-7000-8000-000000000000/crosspost"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}
