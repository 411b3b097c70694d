use serde::{Deserialize, Serialize};

/// Confidence ceiling for analyses whose category or type is outside the catalog vocabulary.
pub const OUT_OF_VOCABULARY_CONFIDENCE_CAP: f32 = 0.5;

/// Distinct categories and types known to the catalog, sorted and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogVocabulary {
	pub categories: Vec<String>,
	pub types: Vec<String>,
}
impl CatalogVocabulary {
	pub fn new(mut categories: Vec<String>, mut types: Vec<String>) -> Self {
		categories.sort();
		categories.dedup();
		types.sort();
		types.dedup();

		Self { categories, types }
	}

	pub fn has_category(&self, category: &str) -> bool {
		self.categories.binary_search_by(|known| known.as_str().cmp(category)).is_ok()
	}

	pub fn has_type(&self, product_type: &str) -> bool {
		self.types.binary_search_by(|known| known.as_str().cmp(product_type)).is_ok()
	}
}

/// Clamps `confidence` to `[0, 1]` and caps it when the category or type is unknown.
///
/// The cap only ever lowers the value.
pub fn cap_confidence(
	confidence: f32,
	category: &str,
	product_type: &str,
	vocabulary: &CatalogVocabulary,
) -> f32 {
	let mut confidence = if confidence.is_finite() { confidence.clamp(0.0, 1.0) } else { 0.0 };

	if !vocabulary.has_category(category) || !vocabulary.has_type(product_type) {
		confidence = confidence.min(OUT_OF_VOCABULARY_CONFIDENCE_CAP);
	}

	confidence
}
