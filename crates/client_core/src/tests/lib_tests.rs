use std::sync::Arc;

use super::*;
use anyhow::Result;
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::{FormField, HistoryItem};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct ScriptedServer {
    status: StatusCode,
    body: Value,
    submits: Arc<Mutex<Vec<SubmitFormRequest>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl ScriptedServer {
    fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            submits: Arc::new(Mutex::new(Vec::new())),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

async fn handle_submit(
    State(state): State<ScriptedServer>,
    Json(payload): Json<SubmitFormRequest>,
) -> (StatusCode, Json<Value>) {
    state.submits.lock().await.push(payload);
    (state.status, Json(state.body.clone()))
}

async fn handle_history(
    State(state): State<ScriptedServer>,
    RawQuery(query): RawQuery,
) -> (StatusCode, Json<Value>) {
    state.queries.lock().await.push(query.unwrap_or_default());
    (state.status, Json(state.body.clone()))
}

async fn handle_unique_names(State(state): State<ScriptedServer>) -> (StatusCode, Json<Value>) {
    (state.status, Json(state.body.clone()))
}

async fn spawn_scripted_server(status: StatusCode, body: Value) -> Result<(String, ScriptedServer)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ScriptedServer::new(status, body);
    let app = Router::new()
        .route("/api/submit", post(handle_submit))
        .route("/api/history", get(handle_history))
        .route("/api/unique-names", get(handle_unique_names))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/api"), state))
}

/// Base URL of a port nothing listens on.
async fn unreachable_base_url() -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}/api"))
}

#[test]
fn history_query_with_only_date_has_no_name_params() {
    let filter = HistoryFilter::for_date("2025-01-20");
    assert_eq!(history_query(&filter), vec![("date", "2025-01-20")]);
}

#[test]
fn history_query_keeps_fixed_parameter_order() {
    let filter = HistoryFilter::for_date("2025-01-20")
        .with_last_name("Ivanov")
        .with_first_name("Ivan");
    assert_eq!(
        history_query(&filter),
        vec![
            ("date", "2025-01-20"),
            ("first_name", "Ivan"),
            ("last_name", "Ivanov"),
        ]
    );
}

#[test]
fn base_url_trailing_slash_is_ignored() {
    let api = HttpFormApi::new("http://localhost:8000/api/");
    assert_eq!(api.base_url(), "http://localhost:8000/api");
    assert_eq!(api.endpoint("submit"), "http://localhost:8000/api/submit");
}

#[tokio::test]
async fn submit_posts_the_three_fields_once() {
    let (base_url, server) = spawn_scripted_server(StatusCode::OK, json!({ "success": true }))
        .await
        .expect("spawn server");
    let api = HttpFormApi::new(base_url);

    let outcome = api
        .submit(&SubmissionRecord::new("2025-01-15", "Ivan", "Ivanov"))
        .await
        .expect("submit");

    assert_eq!(outcome, SubmitOutcome::Accepted);
    let submits = server.submits.lock().await;
    assert_eq!(
        *submits,
        vec![SubmitFormRequest {
            date: "2025-01-15".into(),
            first_name: "Ivan".into(),
            last_name: "Ivanov".into(),
        }]
    );
}

#[tokio::test]
async fn submit_propagates_field_errors_unchanged() {
    let (base_url, _server) = spawn_scripted_server(
        StatusCode::BAD_REQUEST,
        json!({
            "success": false,
            "error": { "first_name": ["No whitespace in first_name is allowed"] }
        }),
    )
    .await
    .expect("spawn server");
    let api = HttpFormApi::new(base_url);

    let err = api
        .submit(&SubmissionRecord::new("2025-01-15", "Iv an", "Ivanov"))
        .await
        .expect_err("must be rejected");

    let (status, errors) = match err {
        SubmitError::Rejected { status, errors } => (status, errors),
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(status, 400);
    assert_eq!(
        errors.for_field(FormField::FirstName),
        ["No whitespace in first_name is allowed".to_string()]
    );
    assert_eq!(errors.keys().count(), 1);
}

#[tokio::test]
async fn submit_surfaces_rejection_sent_with_success_status() {
    let (base_url, _server) = spawn_scripted_server(
        StatusCode::OK,
        json!({ "success": false, "error": { "last_name": ["too long"] } }),
    )
    .await
    .expect("spawn server");
    let api = HttpFormApi::new(base_url);

    let err = api
        .submit(&SubmissionRecord::new("2025-01-15", "Ivan", "Ivanov"))
        .await
        .expect_err("must be rejected");
    assert_eq!(
        err.field_errors().map(|e| e.for_field(FormField::LastName).to_vec()),
        Some(vec!["too long".to_string()])
    );
}

#[tokio::test]
async fn submit_without_error_payload_reports_status() {
    let (base_url, _server) =
        spawn_scripted_server(StatusCode::BAD_GATEWAY, json!({ "detail": "upstream" }))
            .await
            .expect("spawn server");
    let api = HttpFormApi::new(base_url);

    let err = api
        .submit(&SubmissionRecord::new("2025-01-15", "Ivan", "Ivanov"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, SubmitError::Status { status: 502 }), "{err}");
}

#[tokio::test]
async fn submit_with_false_success_is_not_accepted() {
    let (base_url, _server) = spawn_scripted_server(StatusCode::OK, json!({ "success": false }))
        .await
        .expect("spawn server");
    let api = HttpFormApi::new(base_url);

    let outcome = api
        .submit(&SubmissionRecord::new("2025-01-15", "Ivan", "Ivanov"))
        .await
        .expect("submit");
    assert_eq!(outcome, SubmitOutcome::NotAccepted);
}

#[tokio::test]
async fn submit_transport_failure_is_reported() {
    let api = HttpFormApi::new(unreachable_base_url().await.expect("addr"));
    let err = api
        .submit(&SubmissionRecord::new("2025-01-15", "Ivan", "Ivanov"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, SubmitError::Transport(_)), "{err}");
}

#[tokio::test]
async fn fetch_history_sends_date_only_when_names_are_empty() {
    let (base_url, server) =
        spawn_scripted_server(StatusCode::OK, json!({ "items": [], "total": 0 }))
            .await
            .expect("spawn server");
    let api = HttpFormApi::new(base_url);

    let page = api
        .fetch_history(&HistoryFilter::for_date("2025-01-20"))
        .await
        .expect("history");

    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(*server.queries.lock().await, vec!["date=2025-01-20".to_string()]);
}

#[tokio::test]
async fn fetch_history_serializes_names_in_order_and_keeps_server_order() {
    let (base_url, server) = spawn_scripted_server(
        StatusCode::OK,
        json!({
            "items": [
                { "date": "2025-01-20", "first_name": "Ivan", "last_name": "Ivanov", "count": 2 },
                { "date": "2025-01-20", "first_name": "Ivan", "last_name": "Abramov", "count": 0 }
            ],
            "total": 2
        }),
    )
    .await
    .expect("spawn server");
    let api = HttpFormApi::new(base_url);

    let filter = HistoryFilter::for_date("2025-01-20")
        .with_first_name("Ivan")
        .with_last_name("Ivanov");
    let page = api.fetch_history(&filter).await.expect("history");

    assert_eq!(
        *server.queries.lock().await,
        vec!["date=2025-01-20&first_name=Ivan&last_name=Ivanov".to_string()]
    );
    assert_eq!(page.total, 2);
    assert_eq!(
        page.items,
        vec![
            HistoryItem {
                date: "2025-01-20".into(),
                first_name: "Ivan".into(),
                last_name: "Ivanov".into(),
                count: 2,
            },
            HistoryItem {
                date: "2025-01-20".into(),
                first_name: "Ivan".into(),
                last_name: "Abramov".into(),
                count: 0,
            },
        ]
    );
}

#[tokio::test]
async fn fetch_history_propagates_server_errors() {
    let (base_url, _server) = spawn_scripted_server(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "success": false, "error": { "server_error": ["Internal Server Error"] } }),
    )
    .await
    .expect("spawn server");
    let api = HttpFormApi::new(base_url);

    let err = api
        .fetch_history(&HistoryFilter::for_date("2025-01-20"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, ApiClientError::Http(_)), "{err}");
}

#[tokio::test]
async fn fetch_distinct_names_returns_both_lists() {
    let (base_url, _server) = spawn_scripted_server(
        StatusCode::OK,
        json!({ "first_names": ["Ivan", "John"], "last_names": ["Ivanov", "Smith"] }),
    )
    .await
    .expect("spawn server");
    let api = HttpFormApi::new(base_url);

    let names = api.fetch_distinct_names().await;
    assert_eq!(names.first_names, vec!["Ivan", "John"]);
    assert_eq!(names.last_names, vec!["Ivanov", "Smith"]);
}

#[tokio::test]
async fn fetch_distinct_names_falls_back_to_empty_on_network_failure() {
    let api = HttpFormApi::new(unreachable_base_url().await.expect("addr"));
    let names = api.fetch_distinct_names().await;
    assert_eq!(names, NameOptions::default());
}

#[tokio::test]
async fn fetch_distinct_names_falls_back_to_empty_on_server_error() {
    let (base_url, _server) =
        spawn_scripted_server(StatusCode::SERVICE_UNAVAILABLE, json!({}))
            .await
            .expect("spawn server");
    let api = HttpFormApi::new(base_url);

    assert!(api.fetch_distinct_names().await.is_empty());
}
