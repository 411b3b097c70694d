use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, FurnsightService, Result, cache};
use furnsight_domain::{
	query_terms,
	vocabulary::{self, CatalogVocabulary},
};
use furnsight_providers::vision;

const RAW_EXCERPT_CHARS: usize = 200;

/// Structured description of the furniture in an uploaded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
	pub category: String,
	#[serde(rename = "type")]
	pub product_type: String,
	pub search_terms: Vec<String>,
	pub confidence: f32,
	pub attributes: BTreeMap<String, String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_price: Option<f64>,
}

pub(crate) struct AnalyzeArgs<'a> {
	pub(crate) image: &'a [u8],
	pub(crate) mime_type: &'a str,
	pub(crate) api_key: &'a str,
	pub(crate) model: &'a str,
	pub(crate) query: Option<&'a str>,
}

impl FurnsightService {
	/// Returns the cached analysis for this image, model, and query, or asks the vision model.
	pub(crate) async fn analyze(&self, args: AnalyzeArgs<'_>) -> Result<ImageAnalysis> {
		let key = cache::cache_key(args.image, args.model, args.query);

		if let Some(hit) = self.lock_cache().get(&key) {
			tracing::debug!(cache_key = %&key[..12], "Analysis cache hit.");

			return Ok(hit);
		}

		let vocabulary = self.vocabulary();
		let attribute_keys = &self.cfg.analysis.attribute_keys;
		let messages = build_analysis_messages(
			&vocabulary,
			attribute_keys,
			args.query,
			&vision::image_data_url(args.mime_type, args.image),
		);
		let raw = self
			.providers
			.vision
			.analyze(&self.cfg.providers.vision, args.api_key, args.model, &messages)
			.await?;
		let analysis = parse_analysis(&raw, attribute_keys, &vocabulary, args.query)?;

		self.lock_cache().put(key, analysis.clone());

		Ok(analysis)
	}
}

pub fn build_analysis_messages(
	vocabulary: &CatalogVocabulary,
	attribute_keys: &[String],
	query: Option<&str>,
	image_data_url: &str,
) -> Vec<Value> {
	let mut schema_lines = vec![
		"  \"category\": string,       // one of the valid categories".to_string(),
		"  \"type\": string,           // one of the valid types".to_string(),
	];

	for key in attribute_keys {
		schema_lines.push(format!("  \"{key}\": string,"));
	}

	schema_lines.push(
		"  \"searchTerms\": string[],  // 2-4 short phrases for finding similar items".to_string(),
	);
	schema_lines.push(
		"  \"confidence\": number,     // 0-1, how sure you are the image shows furniture"
			.to_string(),
	);
	schema_lines.push(
		"  \"maxPrice\": number        // optional, only when the user states a budget".to_string(),
	);

	let system_prompt = format!(
		"You identify furniture in photos and describe it as structured attributes.\n\
Respond with one JSON object only. Do not use markdown or add explanations.\n\n\
Valid categories (use exactly one):\n{categories}\n\n\
Valid types (use exactly one):\n{types}\n\n\
If the image shows no recognizable furniture, set confidence to 0 and give your best guess.\n\n\
Response schema:\n{{\n{schema}\n}}",
		categories = vocabulary.categories.join(", "),
		types = vocabulary.types.join(", "),
		schema = schema_lines.join("\n"),
	);
	let user_text = match query.map(str::trim).filter(|query| !query.is_empty()) {
		Some(query) => format!(
			"Analyze this furniture image. The user added: \"{query}\". Use it as a hint about \
preferred style, color, material, budget, or features."
		),
		None => "Analyze this furniture image and extract its attributes.".to_string(),
	};

	vec![
		serde_json::json!({ "role": "system", "content": system_prompt }),
		serde_json::json!({
			"role": "user",
			"content": [
				{ "type": "text", "text": user_text },
				{ "type": "image_url", "image_url": { "url": image_data_url } }
			]
		}),
	]
}

/// Parses the raw model reply into an [`ImageAnalysis`].
///
/// Markdown code fences are tolerated. Attributes are read only for `attribute_keys`, confidence
/// is capped for values outside `vocabulary`, and a missing `maxPrice` falls back to a budget
/// phrase in `query`.
pub fn parse_analysis(
	raw: &str,
	attribute_keys: &[String],
	vocabulary: &CatalogVocabulary,
	query: Option<&str>,
) -> Result<ImageAnalysis> {
	let parse_error = || Error::Analysis {
		message: format!(
			"Failed to parse analysis response: {}",
			raw.chars().take(RAW_EXCERPT_CHARS).collect::<String>()
		),
	};
	let value: Value = serde_json::from_str(strip_code_fences(raw)).map_err(|_| parse_error())?;
	let Value::Object(object) = value else {
		return Err(parse_error());
	};
	let category = text_field(&object, "category").unwrap_or_default();
	let product_type = text_field(&object, "type").unwrap_or_default();
	let search_terms = object
		.get("searchTerms")
		.and_then(Value::as_array)
		.map(|terms| {
			terms
				.iter()
				.filter_map(Value::as_str)
				.map(str::trim)
				.filter(|term| !term.is_empty())
				.map(String::from)
				.collect()
		})
		.unwrap_or_default();
	let raw_confidence = number_field(&object, "confidence").unwrap_or(0.0) as f32;
	let attributes = attribute_keys
		.iter()
		.filter_map(|key| {
			let value = text_field(&object, key)?;

			if value.trim().is_empty() { None } else { Some((key.clone(), value)) }
		})
		.collect();
	let max_price = number_field(&object, "maxPrice")
		.filter(|price| price.is_finite() && *price > 0.0)
		.or_else(|| query.and_then(query_terms::extract_max_price));
	let confidence =
		vocabulary::cap_confidence(raw_confidence, &category, &product_type, vocabulary);

	Ok(ImageAnalysis {
		category,
		product_type,
		search_terms,
		confidence,
		attributes,
		max_price,
	})
}

fn strip_code_fences(raw: &str) -> &str {
	let mut text = raw.trim();

	if let Some(rest) = text.strip_prefix("```") {
		text = rest.strip_prefix("json").unwrap_or(rest);
	}
	if let Some(rest) = text.trim_end().strip_suffix("```") {
		text = rest;
	}

	text.trim()
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
	match object.get(key)? {
		Value::String(text) => Some(text.trim().to_string()),
		Value::Number(number) => Some(number.to_string()),
		Value::Bool(flag) => Some(flag.to_string()),
		_ => None,
	}
}

fn number_field(object: &Map<String, Value>, key: &str) -> Option<f64> {
	match object.get(key)? {
		Value::Number(number) => number.as_f64(),
		Value::String(text) => text.trim().parse().ok(),
		_ => None,
	}
}
