use serde::{Deserialize, Serialize};

use crate::{
	analysis::ImageAnalysis,
	catalog::{CatalogCandidate, Product},
	settings::{RankingConfig, Weights},
};
use furnsight_domain::matching;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSignals {
	/// Text relevance normalized by the best candidate in the pool.
	pub text_score: f64,
	pub category_match: bool,
	pub type_match: bool,
	pub style_match: f64,
	pub query_match: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProduct {
	#[serde(flatten)]
	pub product: Product,
	/// Composite score rounded to three decimals.
	pub score: f64,
	pub signals: ScoreSignals,
}

pub fn composite_score(weights: &Weights, signals: &ScoreSignals) -> f64 {
	weights.text * signals.text_score
		+ weights.category * indicator(signals.category_match)
		+ weights.product_type * indicator(signals.type_match)
		+ weights.style * signals.style_match
		+ weights.query * signals.query_match
}

/// Scores merged candidates and drops those whose unrounded composite is below `minScore`.
///
/// Input order is preserved.
pub fn score_candidates(
	candidates: &[CatalogCandidate],
	analysis: &ImageAnalysis,
	query_terms: &[String],
	config: &RankingConfig,
) -> Vec<ScoredProduct> {
	let max_text_score = candidates.iter().map(|c| c.text_score).fold(0.0_f64, f64::max);
	let category = analysis.category.to_lowercase();
	let product_type = analysis.product_type.to_lowercase();
	let mut scored = Vec::with_capacity(candidates.len());

	for candidate in candidates {
		let product = &candidate.product;
		let text = matching::combined_text(&product.title, &product.description);
		let signals = ScoreSignals {
			text_score: if max_text_score > 0.0 {
				candidate.text_score / max_text_score
			} else {
				0.0
			},
			category_match: product.category.to_lowercase() == category,
			type_match: product.product_type.to_lowercase() == product_type,
			style_match: matching::style_match(
				&text,
				analysis.attributes.values().map(String::as_str),
			),
			query_match: matching::query_match(
				&text,
				product.price,
				query_terms,
				analysis.max_price,
			),
		};
		let raw = composite_score(&config.weights, &signals);

		if raw < config.min_score {
			continue;
		}

		scored.push(ScoredProduct {
			product: product.clone(),
			score: (raw * 1_000.0).round() / 1_000.0,
			signals,
		});
	}

	scored
}

fn indicator(flag: bool) -> f64 {
	if flag { 1.0 } else { 0.0 }
}
