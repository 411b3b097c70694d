mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Analysis, Config, Postgres, Providers, Ranking, RankingWeights, Search, Service, Storage,
	VisionProviderConfig,
};

use std::{collections::HashSet, fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
		("storage.postgres.dsn", &cfg.storage.postgres.dsn),
		("providers.vision.provider_id", &cfg.providers.vision.provider_id),
		("providers.vision.api_base", &cfg.providers.vision.api_base),
		("ranking.model", &cfg.ranking.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::validation(format!("{label} must be non-empty.")));
		}
	}

	if cfg.service.max_upload_bytes == 0 {
		return Err(Error::validation("service.max_upload_bytes must be greater than zero."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::validation("storage.postgres.pool_max_conns must be greater than zero."));
	}

	let vision = &cfg.providers.vision;

	if vision.timeout_ms == 0 {
		return Err(Error::validation("providers.vision.timeout_ms must be greater than zero."));
	}
	if vision.max_tokens == 0 {
		return Err(Error::validation("providers.vision.max_tokens must be greater than zero."));
	}
	if !vision.temperature.is_finite() || !(0.0..=2.0).contains(&vision.temperature) {
		return Err(Error::validation(
			"providers.vision.temperature must be in the range 0.0-2.0.",
		));
	}
	if vision.default_headers.values().any(|value| !value.is_string()) {
		return Err(Error::validation("providers.vision.default_headers values must be strings."));
	}
	if cfg.analysis.attribute_keys.is_empty() {
		return Err(Error::validation("analysis.attribute_keys must be non-empty."));
	}
	if cfg.analysis.attribute_keys.iter().any(|key| is_reserved_attribute_key(key)) {
		return Err(Error::validation(
			"analysis.attribute_keys must not reuse category, type, searchTerms, confidence, or maxPrice.",
		));
	}
	if cfg.search.over_fetch_multiplier == 0 {
		return Err(Error::validation("search.over_fetch_multiplier must be greater than zero."));
	}
	if cfg.ranking.max_results == 0 {
		return Err(Error::validation("ranking.max_results must be greater than zero."));
	}
	if !cfg.ranking.min_score.is_finite() {
		return Err(Error::validation("ranking.min_score must be a finite number."));
	}

	let weights = &cfg.ranking.weights;

	for (label, weight) in [
		("text", weights.text),
		("category", weights.category),
		("type", weights.product_type),
		("style", weights.style),
		("query", weights.query),
	] {
		if !weight.is_finite() {
			return Err(Error::validation(format!(
				"ranking.weights.{label} must be a finite number."
			)));
		}
		if weight < 0.0 {
			return Err(Error::validation(format!(
				"ranking.weights.{label} must be zero or greater."
			)));
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let mut seen = HashSet::new();

	cfg.analysis.attribute_keys = cfg
		.analysis
		.attribute_keys
		.iter()
		.map(|key| key.trim().to_string())
		.filter(|key| !key.is_empty())
		.filter(|key| seen.insert(key.to_lowercase()))
		.collect();
	cfg.ranking.model = cfg.ranking.model.trim().to_string();
	cfg.providers.vision.api_base =
		cfg.providers.vision.api_base.trim().trim_end_matches('/').to_string();
}

fn is_reserved_attribute_key(key: &str) -> bool {
	matches!(key, "category" | "type" | "searchTerms" | "confidence" | "maxPrice")
}
