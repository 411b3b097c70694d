use std::time::Instant;

use axum::{
	Json, Router,
	extract::{
		DefaultBodyLimit, Multipart, State,
		multipart::{MultipartError, MultipartRejection},
		rejection::JsonRejection,
	},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use time::OffsetDateTime;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use furnsight_service::{
	Error, RankingConfig, RankingConfigPatch, SearchRequest, SearchResponse, VocabularyReport,
};

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";
const RETRIEVAL_FAILED: &str = "Catalog search failed.";
const INTERNAL_FAILED: &str = "Internal server error.";

#[derive(Debug, Serialize)]
struct HealthResponse {
	status: &'static str,
	#[serde(with = "crate::time_serde")]
	timestamp: OffsetDateTime,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, message: impl Into<String>) -> Self {
		Self { status, message: message.into() }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match &err {
			Error::InvalidRequest { .. } => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
			Error::Analysis { .. } => Self::new(StatusCode::BAD_GATEWAY, err.to_string()),
			Error::Provider { status, .. } => {
				let status = status
					.and_then(|code| StatusCode::from_u16(code).ok())
					.filter(StatusCode::is_client_error)
					.unwrap_or(StatusCode::BAD_GATEWAY);

				Self::new(status, err.to_string())
			},
			// Storage details stay in the log.
			Error::Retrieval { .. } => {
				tracing::error!(error = %err, "Catalog retrieval failed.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, RETRIEVAL_FAILED)
			},
			Error::Internal { .. } => {
				tracing::error!(error = %err, "Request failed with an internal error.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_FAILED)
			},
		}
	}
}

impl From<MultipartError> for ApiError {
	fn from(err: MultipartError) -> Self {
		Self::new(err.status(), err.body_text())
	}
}

impl From<MultipartRejection> for ApiError {
	fn from(rejection: MultipartRejection) -> Self {
		Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(ErrorBody { error: self.message })).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	let max_upload_bytes = state.service.cfg.service.max_upload_bytes;
	let cors_allow_any_origin = state.service.cfg.service.cors_allow_any_origin;
	let router = Router::new()
		.route("/api/health", get(health))
		.route("/api/search", post(search))
		.route("/api/config", get(get_config).put(update_config))
		.with_state(state)
		.layer(DefaultBodyLimit::max(max_upload_bytes))
		.layer(TraceLayer::new_for_http());

	if cors_allow_any_origin { router.layer(CorsLayer::permissive()) } else { router }
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/api/admin/catalog/refresh", post(refresh_catalog))
		.with_state(state)
		.layer(TraceLayer::new_for_http())
}

async fn health() -> Json<HealthResponse> {
	Json(HealthResponse { status: "ok", timestamp: OffsetDateTime::now_utc() })
}

async fn search(
	State(state): State<AppState>,
	multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let received_at = Instant::now();
	let mut multipart = multipart?;
	let mut image = Vec::new();
	let mut mime_type = DEFAULT_IMAGE_MIME.to_string();
	let mut api_key = String::new();
	let mut query = None;

	while let Some(field) = multipart.next_field().await? {
		let name = field.name().unwrap_or_default().to_string();

		match name.as_str() {
			"file" => {
				if let Some(content_type) = field.content_type().filter(|ct| !ct.is_empty()) {
					mime_type = content_type.to_string();
				}

				image = field.bytes().await?.to_vec();
			},
			"apiKey" => api_key = field.text().await?,
			"query" => query = Some(field.text().await?),
			_ => {},
		}
	}

	let request = SearchRequest { image, mime_type, api_key, query, received_at };
	let response = state.service.search(request).await?;

	Ok(Json(response))
}

async fn get_config(State(state): State<AppState>) -> Json<RankingConfig> {
	Json(state.service.ranking_config())
}

async fn update_config(
	State(state): State<AppState>,
	payload: Result<Json<RankingConfigPatch>, JsonRejection>,
) -> Result<Json<RankingConfig>, ApiError> {
	let Json(patch) = payload?;
	let updated = state.service.update_ranking_config(patch)?;

	Ok(Json(updated))
}

async fn refresh_catalog(
	State(state): State<AppState>,
) -> Result<Json<VocabularyReport>, ApiError> {
	let report = state.service.refresh_vocabulary().await?;

	Ok(Json(report))
}
