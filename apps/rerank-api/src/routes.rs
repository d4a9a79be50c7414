use axum::{
	Json, Router,
	body::Bytes,
	extract::{DefaultBodyLimit, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;

use crate::state::AppState;
use rerank_service::{Error as ServiceError, ModelList, RerankRequest, RerankResponse};

pub fn router(state: AppState) -> Router {
	let body_limit = state.service.cfg.service.max_body_bytes;

	Router::new()
		.route("/health", get(health))
		.route("/v1/models", get(models))
		.route("/models", get(models))
		.route("/v1/rerank", post(rerank))
		.route("/rerank", post(rerank))
		.layer(DefaultBodyLimit::max(body_limit))
		.with_state(state)
}

async fn health() -> Json<Value> {
	Json(serde_json::json!({ "status": "ok" }))
}

async fn models(State(state): State<AppState>) -> Json<ModelList> {
	Json(state.service.models())
}

async fn rerank(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<RerankResponse>, ApiError> {
	let request = RerankRequest::from_slice(&body)?;
	let response = state.service.rerank(request).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message, field } => ApiError::new(
				StatusCode::BAD_REQUEST,
				"INVALID_REQUEST",
				message,
				field.map(|field| vec![field]),
			),
			err @ ServiceError::PayloadTooLarge { .. } => ApiError::new(
				StatusCode::PAYLOAD_TOO_LARGE,
				"PAYLOAD_TOO_LARGE",
				err.to_string(),
				None,
			),
			ServiceError::Upstream { message } => {
				tracing::error!(%message, "Rerank request failed upstream.");

				ApiError::new(StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", message, None)
			},
			ServiceError::UpstreamTimeout { message } => {
				tracing::error!(%message, "Rerank request timed out upstream.");

				ApiError::new(StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT", message, None)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
