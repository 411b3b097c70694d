use std::{fmt, time::Instant};

use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
	Error, FurnsightService, Result,
	analysis::{AnalyzeArgs, ImageAnalysis},
	ranking::{self, ScoredProduct},
};
use furnsight_domain::query_terms;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
	Received,
	Analyzing,
	Retrieving,
	Scoring,
	Responding,
	Failed,
}
impl SearchStage {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Received => "received",
			Self::Analyzing => "analyzing",
			Self::Retrieving => "retrieving",
			Self::Scoring => "scoring",
			Self::Responding => "responding",
			Self::Failed => "failed",
		}
	}
}
impl fmt::Display for SearchStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

pub struct SearchRequest {
	pub image: Vec<u8>,
	pub mime_type: String,
	pub api_key: String,
	pub query: Option<String>,
	/// When the request arrived, before the upload was read; `search_time_ms` counts from here.
	pub received_at: Instant,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
	pub results: Vec<ScoredProduct>,
	pub analysis: ImageAnalysis,
	pub total_candidates: usize,
	pub search_time_ms: u64,
}

impl FurnsightService {
	/// Runs one image search from analysis through ranking.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let request_id = Uuid::new_v4();
		let span = tracing::info_span!("search", request_id = %request_id);

		async move {
			let mut stage = SearchStage::Received;
			let result = self.run_search(&req, &mut stage).await;

			match &result {
				Ok(response) => tracing::info!(
					results = response.results.len(),
					total_candidates = response.total_candidates,
					search_time_ms = response.search_time_ms,
					"Search completed."
				),
				Err(err) => tracing::warn!(
					error = %err,
					stage = %stage,
					next = %SearchStage::Failed,
					"Search failed."
				),
			}

			result
		}
		.instrument(span)
		.await
	}

	async fn run_search(
		&self,
		req: &SearchRequest,
		stage: &mut SearchStage,
	) -> Result<SearchResponse> {
		if req.image.is_empty() {
			return Err(Error::invalid_request("No valid image provided."));
		}
		if req.api_key.trim().is_empty() {
			return Err(Error::invalid_request("API key is required."));
		}

		let query = req.query.as_deref().map(str::trim).filter(|query| !query.is_empty());
		// Read once; later updates apply to the next request.
		let config = self.settings.snapshot();

		*stage = SearchStage::Analyzing;

		let analysis = self
			.analyze(AnalyzeArgs {
				image: &req.image,
				mime_type: &req.mime_type,
				api_key: req.api_key.trim(),
				model: &config.model,
				query,
			})
			.await?;

		tracing::debug!(
			category = %analysis.category,
			product_type = %analysis.product_type,
			confidence = analysis.confidence,
			"Image analyzed."
		);

		*stage = SearchStage::Retrieving;

		let mut text_terms = analysis.search_terms.clone();

		if let Some(query) = query {
			text_terms.push(query.to_string());
		}

		let limit = config.max_results.saturating_mul(self.cfg.search.over_fetch_multiplier);
		let (text_hits, category_type_hits, category_hits) = tokio::try_join!(
			self.catalog.text_search(&text_terms, limit, analysis.max_price),
			self.catalog.category_type_search(
				&analysis.category,
				&analysis.product_type,
				limit,
				analysis.max_price,
			),
			self.catalog.category_search(&analysis.category, limit, analysis.max_price),
		)?;

		tracing::debug!(
			text = text_hits.len(),
			category_type = category_type_hits.len(),
			category = category_hits.len(),
			"Candidates retrieved."
		);

		*stage = SearchStage::Scoring;

		let terms = query_terms::tokenize_query(query);
		let ranked = ranking::rank_candidates(
			[text_hits, category_type_hits, category_hits],
			&analysis,
			&terms,
			&config,
		);

		*stage = SearchStage::Responding;

		let search_time_ms = u64::try_from(req.received_at.elapsed().as_millis()).unwrap_or(u64::MAX);

		Ok(SearchResponse {
			results: ranked.results,
			analysis,
			total_candidates: ranked.total_candidates,
			search_time_ms,
		})
	}
}
