pub mod admin;
pub mod analysis;
pub mod cache;
pub mod catalog;
pub mod ranking;
pub mod search;
pub mod settings;

mod error;

pub use admin::VocabularyReport;
pub use analysis::ImageAnalysis;
pub use catalog::{CatalogCandidate, PgCatalog, Product};
pub use error::{Error, Result};
pub use ranking::{RankedResults, ScoreSignals, ScoredProduct};
pub use search::{SearchRequest, SearchResponse, SearchStage};
pub use settings::{RankingConfig, RankingConfigPatch, RankingSettings, Weights, WeightsPatch};

use std::{
	future::Future,
	pin::Pin,
	sync::{Arc, Mutex, RwLock},
};

use serde_json::Value;

use cache::AnalysisCache;
use furnsight_config::{Config, VisionProviderConfig};
use furnsight_domain::vocabulary::CatalogVocabulary;
use furnsight_providers::vision::{self, VisionRequest};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait VisionProvider
where
	Self: Send + Sync,
{
	/// Sends the prompt messages, which embed the image as a data URL, and returns the raw
	/// model text.
	fn analyze<'a>(
		&'a self,
		cfg: &'a VisionProviderConfig,
		api_key: &'a str,
		model: &'a str,
		messages: &'a [Value],
	) -> BoxFuture<'a, Result<String>>;
}

/// The three retrieval strategies plus the vocabulary lookup.
///
/// Each strategy returns candidates in its own relevance order. Exact-match strategies report a
/// text score of zero.
pub trait CatalogStore
where
	Self: Send + Sync,
{
	fn text_search<'a>(
		&'a self,
		terms: &'a [String],
		limit: u32,
		max_price: Option<f64>,
	) -> BoxFuture<'a, Result<Vec<CatalogCandidate>>>;

	fn category_type_search<'a>(
		&'a self,
		category: &'a str,
		product_type: &'a str,
		limit: u32,
		max_price: Option<f64>,
	) -> BoxFuture<'a, Result<Vec<CatalogCandidate>>>;

	fn category_search<'a>(
		&'a self,
		category: &'a str,
		limit: u32,
		max_price: Option<f64>,
	) -> BoxFuture<'a, Result<Vec<CatalogCandidate>>>;

	fn vocabulary<'a>(&'a self) -> BoxFuture<'a, Result<CatalogVocabulary>>;
}

#[derive(Clone)]
pub struct Providers {
	pub vision: Arc<dyn VisionProvider>,
}

pub struct FurnsightService {
	pub cfg: Config,
	pub catalog: Arc<dyn CatalogStore>,
	pub providers: Providers,
	pub settings: RankingSettings,
	cache: Mutex<AnalysisCache>,
	vocabulary: RwLock<CatalogVocabulary>,
}

struct DefaultProviders;

impl VisionProvider for DefaultProviders {
	fn analyze<'a>(
		&'a self,
		cfg: &'a VisionProviderConfig,
		api_key: &'a str,
		model: &'a str,
		messages: &'a [Value],
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			let text = vision::complete(cfg, VisionRequest { api_key, model, messages }).await?;

			Ok(text)
		})
	}
}

impl Providers {
	pub fn new(vision: Arc<dyn VisionProvider>) -> Self {
		Self { vision }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { vision: Arc::new(DefaultProviders) }
	}
}

impl FurnsightService {
	pub fn new(cfg: Config, catalog: Arc<dyn CatalogStore>, vocabulary: CatalogVocabulary) -> Self {
		Self::with_providers(cfg, catalog, vocabulary, Providers::default())
	}

	pub fn with_providers(
		cfg: Config,
		catalog: Arc<dyn CatalogStore>,
		vocabulary: CatalogVocabulary,
		providers: Providers,
	) -> Self {
		let settings = RankingSettings::new(RankingConfig::from(&cfg.ranking));
		let cache = AnalysisCache::new(cfg.analysis.cache_capacity);

		Self {
			cfg,
			catalog,
			providers,
			settings,
			cache: Mutex::new(cache),
			vocabulary: RwLock::new(vocabulary),
		}
	}

	pub fn ranking_config(&self) -> RankingConfig {
		self.settings.snapshot()
	}

	/// Merges `patch` into the live ranking configuration and returns the result.
	///
	/// A change of model drops cached analyses; entries keyed on the old model are unreachable.
	pub fn update_ranking_config(&self, patch: RankingConfigPatch) -> Result<RankingConfig> {
		let previous_model = self.settings.snapshot().model;
		let updated = self.settings.update(patch)?;

		if updated.model != previous_model {
			self.lock_cache().clear();
		}

		tracing::info!(
			max_results = updated.max_results,
			min_score = updated.min_score,
			model = %updated.model,
			"Ranking configuration updated."
		);

		Ok(updated)
	}

	pub fn vocabulary(&self) -> CatalogVocabulary {
		self.vocabulary.read().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub(crate) fn set_vocabulary(&self, vocabulary: CatalogVocabulary) {
		*self.vocabulary.write().unwrap_or_else(|err| err.into_inner()) = vocabulary;
	}

	pub(crate) fn lock_cache(&self) -> std::sync::MutexGuard<'_, AnalysisCache> {
		self.cache.lock().unwrap_or_else(|err| err.into_inner())
	}
}
