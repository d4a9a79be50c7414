use std::{
	future::IntoFuture,
	sync::{Arc, Mutex},
	time::Duration,
};

use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing,
};
use serde_json::Value;
use tokio::{
	net::TcpListener,
	sync::oneshot::{self, Sender},
};

use rerank_config::Upstream;
use rerank_domain::LocalScore;
use rerank_providers::{Error, TeiClient, tei};

#[derive(Clone, Copy)]
enum Behavior {
	Score,
	Fail,
	Stall,
}

#[derive(Clone)]
struct MockState {
	behavior: Behavior,
	bodies: Arc<Mutex<Vec<Value>>>,
}

async fn start_tei_server(state: MockState) -> (String, Sender<()>) {
	let app = Router::new().route("/rerank", routing::post(rerank_handler)).with_state(state);
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind mock server.");
	let addr = listener.local_addr().expect("Failed to read mock server address.");
	let (tx, rx) = oneshot::channel();
	let server = axum::serve(listener, app).with_graceful_shutdown(async move {
		let _ = rx.await;
	});

	tokio::spawn(async move {
		let _ = server.into_future().await;
	});

	(format!("http://{addr}"), tx)
}

async fn rerank_handler(State(state): State<MockState>, Json(payload): Json<Value>) -> Response {
	state.bodies.lock().unwrap_or_else(|err| err.into_inner()).push(payload.clone());

	match state.behavior {
		Behavior::Fail => (StatusCode::SERVICE_UNAVAILABLE, "model loading").into_response(),
		Behavior::Stall => {
			tokio::time::sleep(Duration::from_secs(5)).await;

			StatusCode::OK.into_response()
		},
		Behavior::Score => {
			let count = payload["texts"].as_array().map(Vec::len).unwrap_or_default();
			let data: Vec<Value> = (0..count)
				.rev()
				.map(|index| serde_json::json!({ "index": index, "score": index as f64 / 10.0 }))
				.collect();

			Json(Value::Array(data)).into_response()
		},
	}
}

fn upstream(api_base: String, timeout_ms: u64) -> Upstream {
	Upstream { api_base, timeout_ms, ..Upstream::default() }
}

fn mock(behavior: Behavior) -> MockState {
	MockState { behavior, bodies: Arc::new(Mutex::new(Vec::new())) }
}

#[tokio::test]
async fn scores_a_slice_with_local_indices() {
	let state = mock(Behavior::Score);
	let (api_base, shutdown) = start_tei_server(state.clone()).await;
	let client = TeiClient::new(&upstream(api_base, 2_000)).expect("Failed to build client.");
	let texts = vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()];
	let scores = client.score("which", &texts).await.expect("Scoring failed.");

	assert_eq!(
		scores,
		vec![
			LocalScore { index: 2, score: 0.2 },
			LocalScore { index: 1, score: 0.1 },
			LocalScore { index: 0, score: 0.0 },
		]
	);

	let bodies = state.bodies.lock().unwrap_or_else(|err| err.into_inner()).clone();

	assert_eq!(
		bodies,
		vec![serde_json::json!({
			"query": "which",
			"texts": ["alpha", "beta", "gamma"],
			"top_n": 3,
			"raw_scores": false
		})]
	);

	let _ = shutdown.send(());
}

#[tokio::test]
async fn non_success_status_is_an_error() {
	let (api_base, shutdown) = start_tei_server(mock(Behavior::Fail)).await;
	let client = TeiClient::new(&upstream(api_base, 2_000)).expect("Failed to build client.");
	let err = client.score("q", &["doc".to_string()]).await.expect_err("Expected status error.");

	match err {
		Error::Status { status, body } => {
			assert_eq!(status, 503);
			assert_eq!(body, "model loading");
		},
		other => panic!("Unexpected error: {other:?}"),
	}

	let _ = shutdown.send(());
}

#[tokio::test]
async fn slow_upstream_times_out() {
	let (api_base, shutdown) = start_tei_server(mock(Behavior::Stall)).await;
	let client = TeiClient::new(&upstream(api_base, 100)).expect("Failed to build client.");
	let err = client.score("q", &["doc".to_string()]).await.expect_err("Expected timeout.");

	assert!(err.is_timeout(), "Unexpected error: {err:?}");

	let _ = shutdown.send(());
}

#[test]
fn url_joins_base_and_path() {
	let client = TeiClient::new(&upstream("http://tei:80".to_string(), 1_000))
		.expect("Failed to build client.");

	assert_eq!(client.url(), "http://tei:80/rerank");
}

#[test]
fn payload_len_grows_with_texts() {
	let one = vec!["doc".to_string()];
	let two = vec!["doc".to_string(), "doc".to_string()];

	assert!(tei::payload_len("q", &two) > tei::payload_len("q", &one));
}
