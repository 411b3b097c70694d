use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
	pub text: f64,
	pub category: f64,
	#[serde(rename = "type")]
	pub product_type: f64,
	pub style: f64,
	pub query: f64,
}

/// Ranking parameters applied to every search, as exposed over `/api/config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingConfig {
	pub weights: Weights,
	pub max_results: u32,
	pub min_score: f64,
	pub model: String,
}
impl RankingConfig {
	pub fn validate(&self) -> Result<()> {
		for (label, weight) in [
			("text", self.weights.text),
			("category", self.weights.category),
			("type", self.weights.product_type),
			("style", self.weights.style),
			("query", self.weights.query),
		] {
			if !weight.is_finite() || weight < 0.0 {
				return Err(Error::invalid_request(format!(
					"weights.{label} must be a finite number of zero or greater."
				)));
			}
		}

		if self.max_results == 0 {
			return Err(Error::invalid_request("maxResults must be greater than zero."));
		}
		if !self.min_score.is_finite() {
			return Err(Error::invalid_request("minScore must be a finite number."));
		}
		if self.model.trim().is_empty() {
			return Err(Error::invalid_request("model must be non-empty."));
		}

		Ok(())
	}

	/// Weights merge key by key; every other field is replaced when present.
	pub fn merged(&self, patch: RankingConfigPatch) -> Self {
		let mut next = self.clone();

		if let Some(weights) = patch.weights {
			let current = &mut next.weights;

			current.text = weights.text.unwrap_or(current.text);
			current.category = weights.category.unwrap_or(current.category);
			current.product_type = weights.product_type.unwrap_or(current.product_type);
			current.style = weights.style.unwrap_or(current.style);
			current.query = weights.query.unwrap_or(current.query);
		}
		if let Some(max_results) = patch.max_results {
			next.max_results = max_results;
		}
		if let Some(min_score) = patch.min_score {
			next.min_score = min_score;
		}
		if let Some(model) = patch.model {
			next.model = model.trim().to_string();
		}

		next
	}
}
impl From<&furnsight_config::Ranking> for RankingConfig {
	fn from(cfg: &furnsight_config::Ranking) -> Self {
		Self {
			weights: Weights {
				text: cfg.weights.text,
				category: cfg.weights.category,
				product_type: cfg.weights.product_type,
				style: cfg.weights.style,
				query: cfg.weights.query,
			},
			max_results: cfg.max_results,
			min_score: cfg.min_score,
			model: cfg.model.clone(),
		}
	}
}

/// Partial [`RankingConfig`]; absent or null fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingConfigPatch {
	pub weights: Option<WeightsPatch>,
	pub max_results: Option<u32>,
	pub min_score: Option<f64>,
	pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeightsPatch {
	pub text: Option<f64>,
	pub category: Option<f64>,
	#[serde(rename = "type")]
	pub product_type: Option<f64>,
	pub style: Option<f64>,
	pub query: Option<f64>,
}

/// Process-wide holder for the live [`RankingConfig`]. Concurrent updates are last-writer-wins.
pub struct RankingSettings {
	inner: RwLock<RankingConfig>,
}
impl RankingSettings {
	pub fn new(config: RankingConfig) -> Self {
		Self { inner: RwLock::new(config) }
	}

	pub fn snapshot(&self) -> RankingConfig {
		self.inner.read().unwrap_or_else(|err| err.into_inner()).clone()
	}

	/// Applies `patch` atomically. An invalid result is rejected and the current value kept.
	pub fn update(&self, patch: RankingConfigPatch) -> Result<RankingConfig> {
		let mut guard = self.inner.write().unwrap_or_else(|err| err.into_inner());
		let next = guard.merged(patch);

		next.validate()?;

		*guard = next.clone();

		Ok(next)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn defaults() -> RankingConfig {
		RankingConfig::from(&furnsight_config::Ranking::default())
	}

	#[test]
	fn defaults_come_from_config_section() {
		let cfg = defaults();

		assert_eq!(cfg.weights.category, 0.35);
		assert_eq!(cfg.weights.query, 0.2);
		assert_eq!(cfg.max_results, 20);
		assert_eq!(cfg.min_score, 0.1);
		assert_eq!(cfg.model, "google/gemini-2.5-flash-lite");
	}

	#[test]
	fn weights_merge_key_by_key() {
		let settings = RankingSettings::new(defaults());
		let patch: RankingConfigPatch =
			serde_json::from_value(serde_json::json!({ "weights": { "style": 0.5 } }))
				.expect("patch");
		let updated = settings.update(patch).expect("update");

		assert_eq!(updated.weights.style, 0.5);
		assert_eq!(updated.weights.text, 0.25);
		assert_eq!(updated.weights.product_type, 0.25);
		assert_eq!(settings.snapshot(), updated);
	}

	#[test]
	fn scalars_replace_and_unknown_fields_are_ignored() {
		let settings = RankingSettings::new(defaults());
		let patch: RankingConfigPatch = serde_json::from_value(serde_json::json!({
			"maxResults": 5,
			"minScore": 0.3,
			"model": "  openai/gpt-4o-mini ",
			"theme": "dark"
		}))
		.expect("patch");
		let updated = settings.update(patch).expect("update");

		assert_eq!(updated.max_results, 5);
		assert_eq!(updated.min_score, 0.3);
		assert_eq!(updated.model, "openai/gpt-4o-mini");
	}

	#[test]
	fn invalid_patch_leaves_config_unchanged() {
		let settings = RankingSettings::new(defaults());

		for body in [
			serde_json::json!({ "weights": { "text": -0.1 } }),
			serde_json::json!({ "maxResults": 0 }),
			serde_json::json!({ "model": "   " }),
		] {
			let patch: RankingConfigPatch = serde_json::from_value(body).expect("patch");
			let err = settings.update(patch).expect_err("Expected invalid patch.");

			assert!(matches!(err, Error::InvalidRequest { .. }));
		}

		assert_eq!(settings.snapshot(), defaults());
	}

	#[test]
	fn serializes_with_camel_case_keys() {
		let json = serde_json::to_value(defaults()).expect("json");

		assert_eq!(json["maxResults"], 20);
		assert_eq!(json["weights"]["type"], 0.25);
		assert!(json.get("max_results").is_none());
	}
}
