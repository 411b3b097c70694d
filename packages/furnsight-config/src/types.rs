use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub analysis: Analysis,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub ranking: Ranking,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
	/// Upper bound for a whole request body, multipart image included.
	#[serde(default = "default_max_upload_bytes")]
	pub max_upload_bytes: usize,
	#[serde(default = "default_true")]
	pub cors_allow_any_origin: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub vision: VisionProviderConfig,
}

/// OpenAI-compatible chat completions endpoint used for image analysis.
///
/// The credential is supplied per request by the caller, so it is not part of the file.
#[derive(Debug, Clone, Deserialize)]
pub struct VisionProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub path: String,
	pub temperature: f32,
	pub max_tokens: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Analysis {
	/// Descriptive attributes requested from the vision model, e.g. style or material.
	#[serde(default = "default_attribute_keys")]
	pub attribute_keys: Vec<String>,
	/// Maximum number of cached analyses. Zero disables the cache.
	#[serde(default = "default_cache_capacity")]
	pub cache_capacity: usize,
}
impl Default for Analysis {
	fn default() -> Self {
		Self { attribute_keys: default_attribute_keys(), cache_capacity: default_cache_capacity() }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	#[serde(default = "default_over_fetch_multiplier")]
	pub over_fetch_multiplier: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self { over_fetch_multiplier: default_over_fetch_multiplier() }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ranking {
	#[serde(default)]
	pub weights: RankingWeights,
	#[serde(default = "default_max_results")]
	pub max_results: u32,
	#[serde(default = "default_min_score")]
	pub min_score: f64,
	#[serde(default = "default_model")]
	pub model: String,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			weights: RankingWeights::default(),
			max_results: default_max_results(),
			min_score: default_min_score(),
			model: default_model(),
		}
	}
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RankingWeights {
	#[serde(default = "default_text_weight")]
	pub text: f64,
	#[serde(default = "default_category_weight")]
	pub category: f64,
	#[serde(rename = "type", default = "default_type_weight")]
	pub product_type: f64,
	#[serde(default = "default_style_weight")]
	pub style: f64,
	#[serde(default = "default_query_weight")]
	pub query: f64,
}
impl Default for RankingWeights {
	fn default() -> Self {
		Self {
			text: default_text_weight(),
			category: default_category_weight(),
			product_type: default_type_weight(),
			style: default_style_weight(),
			query: default_query_weight(),
		}
	}
}

fn default_true() -> bool {
	true
}

fn default_max_upload_bytes() -> usize {
	10 * 1_024 * 1_024
}

fn default_attribute_keys() -> Vec<String> {
	["style", "material", "color"].into_iter().map(String::from).collect()
}

fn default_cache_capacity() -> usize {
	128
}

fn default_over_fetch_multiplier() -> u32 {
	3
}

fn default_max_results() -> u32 {
	20
}

fn default_min_score() -> f64 {
	0.1
}

fn default_model() -> String {
	"google/gemini-2.5-flash-lite".to_string()
}

fn default_text_weight() -> f64 {
	0.25
}

fn default_category_weight() -> f64 {
	0.35
}

fn default_type_weight() -> f64 {
	0.25
}

fn default_style_weight() -> f64 {
	0.15
}

fn default_query_weight() -> f64 {
	0.2
}
