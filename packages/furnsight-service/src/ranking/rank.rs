use std::cmp::Ordering;

use super::{merge, score};
use crate::{
	analysis::ImageAnalysis, catalog::CatalogCandidate, ranking::ScoredProduct,
	settings::RankingConfig,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RankedResults {
	pub results: Vec<ScoredProduct>,
	/// Distinct candidates seen across all strategies, before threshold and cap.
	pub total_candidates: usize,
}

/// Merges, scores, orders, and caps the strategy outputs.
///
/// Ordering is by score descending, then title ascending, then id ascending, so equal inputs
/// always produce the same sequence.
pub fn rank_candidates<I>(
	lists: I,
	analysis: &ImageAnalysis,
	query_terms: &[String],
	config: &RankingConfig,
) -> RankedResults
where
	I: IntoIterator<Item = Vec<CatalogCandidate>>,
{
	let merged = merge::merge_candidates(lists);
	let total_candidates = merged.len();
	let mut results = score::score_candidates(&merged, analysis, query_terms, config);

	results.sort_by(cmp_ranked);
	results.truncate(config.max_results as usize);

	RankedResults { results, total_candidates }
}

fn cmp_ranked(a: &ScoredProduct, b: &ScoredProduct) -> Ordering {
	b.score
		.total_cmp(&a.score)
		.then_with(|| a.product.title.cmp(&b.product.title))
		.then_with(|| a.product.id.cmp(&b.product.id))
}
