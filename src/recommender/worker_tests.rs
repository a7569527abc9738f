//! Tests for the request worker thread

use super::*;
use crate::error::FALLBACK_ERROR_MESSAGE;
use crate::test_utils::test_helpers::{
    BlockingMockApi, api_error, recommend_route, recommendations,
};
use serde_json::json;
use std::sync::mpsc;
use wiremock::matchers::body_json;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn start_worker(
    url: &str,
) -> (
    tokio::sync::mpsc::UnboundedSender<RecommendRequest>,
    mpsc::Receiver<RecommendResponse>,
) {
    let client = RecommendClient::new(url, None).unwrap();
    let (request_tx, request_rx) = tokio::sync::mpsc::unbounded_channel();
    let (response_tx, response_rx) = mpsc::channel();
    spawn_worker(client, request_rx, response_tx).unwrap();
    (request_tx, response_rx)
}

#[test]
fn test_worker_returns_recommendations() {
    let server = BlockingMockApi::start(recommendations(&["4A", "1B"]));
    let (request_tx, response_rx) = start_worker(&server.url());

    request_tx
        .send(RecommendRequest::Fetch {
            handle: "Hamim99".to_string(),
            request_id: 1,
        })
        .unwrap();

    let response = response_rx.recv_timeout(WAIT).unwrap();
    assert_eq!(
        response,
        RecommendResponse::Recommendations {
            request_id: 1,
            items: vec!["4A".to_string(), "1B".to_string()],
        }
    );
}

#[test]
fn test_worker_reports_server_error_message() {
    let server = BlockingMockApi::start(api_error(400, "handle not found"));
    let (request_tx, response_rx) = start_worker(&server.url());

    request_tx
        .send(RecommendRequest::Fetch {
            handle: "ghost".to_string(),
            request_id: 7,
        })
        .unwrap();

    let response = response_rx.recv_timeout(WAIT).unwrap();
    assert_eq!(
        response,
        RecommendResponse::Failed {
            request_id: 7,
            message: "handle not found".to_string(),
        }
    );
}

#[test]
fn test_worker_reports_fallback_on_network_error() {
    let (request_tx, response_rx) = start_worker("http://127.0.0.1:1/recommend");

    request_tx
        .send(RecommendRequest::Fetch {
            handle: "Hamim99".to_string(),
            request_id: 2,
        })
        .unwrap();

    let response = response_rx.recv_timeout(WAIT).unwrap();
    assert_eq!(
        response,
        RecommendResponse::Failed {
            request_id: 2,
            message: FALLBACK_ERROR_MESSAGE.to_string(),
        }
    );
}

#[test]
fn test_worker_handles_cancel_without_request() {
    let (request_tx, response_rx) = start_worker("http://127.0.0.1:1/recommend");

    request_tx
        .send(RecommendRequest::Cancel { request_id: 1 })
        .unwrap();

    let response = response_rx.recv_timeout(WAIT).unwrap();
    assert_eq!(response, RecommendResponse::Cancelled { request_id: 1 });
}

#[test]
fn test_worker_cancels_in_flight_request() {
    let server =
        BlockingMockApi::start(recommendations(&["4A"]).set_delay(Duration::from_secs(3)));
    let (request_tx, response_rx) = start_worker(&server.url());

    request_tx
        .send(RecommendRequest::Fetch {
            handle: "Hamim99".to_string(),
            request_id: 1,
        })
        .unwrap();
    // Make sure the request is on the wire before cancelling
    assert!(server.wait_for_requests(1, WAIT));
    request_tx
        .send(RecommendRequest::Cancel { request_id: 1 })
        .unwrap();

    let response = response_rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(response, RecommendResponse::Cancelled { request_id: 1 });
}

#[test]
fn test_worker_new_fetch_supersedes_previous() {
    // The slow handle answers late; the fast one answers at once
    let server = BlockingMockApi::with_mocks(vec![
        recommend_route()
            .and(body_json(json!({ "handle": "slow" })))
            .respond_with(recommendations(&["OLD"]).set_delay(Duration::from_secs(2))),
        recommend_route()
            .and(body_json(json!({ "handle": "fast" })))
            .respond_with(recommendations(&["NEW"])),
    ]);
    let (request_tx, response_rx) = start_worker(&server.url());

    request_tx
        .send(RecommendRequest::Fetch {
            handle: "slow".to_string(),
            request_id: 1,
        })
        .unwrap();
    request_tx
        .send(RecommendRequest::Fetch {
            handle: "fast".to_string(),
            request_id: 2,
        })
        .unwrap();

    let mut responses = vec![
        response_rx.recv_timeout(WAIT).unwrap(),
        response_rx.recv_timeout(WAIT).unwrap(),
    ];
    responses.sort_by_key(|r| r.request_id());

    assert_eq!(responses[0], RecommendResponse::Cancelled { request_id: 1 });
    assert_eq!(
        responses[1],
        RecommendResponse::Recommendations {
            request_id: 2,
            items: vec!["NEW".to_string()],
        }
    );
}

#[test]
fn test_worker_exits_when_request_channel_closes() {
    let client = RecommendClient::new("http://127.0.0.1:1/recommend", None).unwrap();
    let (request_tx, request_rx) = tokio::sync::mpsc::unbounded_channel();
    let (response_tx, _response_rx) = mpsc::channel();
    let handle = spawn_worker(client, request_rx, response_tx).unwrap();

    drop(request_tx);

    handle.join().unwrap();
}

fn in_flight_with(request_id: u64, task: TaskHandle<()>) -> InFlight {
    InFlight {
        request_id,
        token: CancellationToken::new(),
        task,
    }
}

#[tokio::test]
async fn test_cancel_if_running_cancels_live_request() {
    let current = in_flight_with(
        3,
        tokio::spawn(tokio::time::sleep(Duration::from_secs(5))),
    );

    assert_eq!(current.cancel_if_running(), Some(3));
    assert!(current.token.is_cancelled());
    // Only the first cancel counts
    assert_eq!(current.cancel_if_running(), None);
    current.task.abort();
}

#[tokio::test]
async fn test_cancel_if_running_skips_finished_request() {
    let current = in_flight_with(4, tokio::spawn(async {}));
    while !current.task.is_finished() {
        tokio::task::yield_now().await;
    }

    assert_eq!(current.cancel_if_running(), None);
    assert!(!current.token.is_cancelled());
}

#[test]
fn test_worker_serves_request_after_previous_completed() {
    let server = BlockingMockApi::with_mocks(vec![
        recommend_route()
            .and(body_json(json!({ "handle": "first" })))
            .respond_with(recommendations(&["4A"])),
        recommend_route()
            .and(body_json(json!({ "handle": "second" })))
            .respond_with(recommendations(&["1B"])),
    ]);
    let (request_tx, response_rx) = start_worker(&server.url());

    request_tx
        .send(RecommendRequest::Fetch {
            handle: "first".to_string(),
            request_id: 1,
        })
        .unwrap();
    assert_eq!(
        response_rx.recv_timeout(WAIT).unwrap(),
        RecommendResponse::Recommendations {
            request_id: 1,
            items: vec!["4A".to_string()],
        }
    );

    request_tx
        .send(RecommendRequest::Fetch {
            handle: "second".to_string(),
            request_id: 2,
        })
        .unwrap();
    assert_eq!(
        response_rx.recv_timeout(WAIT).unwrap(),
        RecommendResponse::Recommendations {
            request_id: 2,
            items: vec!["1B".to_string()],
        }
    );
    // The finished request produces no extra Cancelled message
    assert!(response_rx.recv_timeout(Duration::from_millis(200)).is_err());
}
