use std::collections::{HashMap, VecDeque};

use crate::analysis::ImageAnalysis;

/// Bounded analysis cache with first-in-first-out eviction.
///
/// Replacing the value of an existing key keeps its original position in the eviction queue.
pub struct AnalysisCache {
	capacity: usize,
	entries: HashMap<String, ImageAnalysis>,
	order: VecDeque<String>,
}
impl AnalysisCache {
	/// A capacity of zero disables caching.
	pub fn new(capacity: usize) -> Self {
		Self { capacity, entries: HashMap::new(), order: VecDeque::new() }
	}

	pub fn get(&self, key: &str) -> Option<ImageAnalysis> {
		self.entries.get(key).cloned()
	}

	pub fn put(&mut self, key: String, value: ImageAnalysis) {
		if self.capacity == 0 {
			return;
		}
		if let Some(existing) = self.entries.get_mut(&key) {
			*existing = value;

			return;
		}

		while self.order.len() >= self.capacity {
			let Some(oldest) = self.order.pop_front() else {
				break;
			};

			self.entries.remove(&oldest);
		}

		self.order.push_back(key.clone());
		self.entries.insert(key, value);
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub(crate) fn clear(&mut self) {
		self.entries.clear();
		self.order.clear();
	}
}

/// BLAKE3 over the image bytes, the vision model, and the trimmed query text.
pub fn cache_key(image: &[u8], model: &str, query: Option<&str>) -> String {
	let mut hasher = blake3::Hasher::new();

	hasher.update(&(image.len() as u64).to_le_bytes());
	hasher.update(image);
	hasher.update(&(model.len() as u64).to_le_bytes());
	hasher.update(model.as_bytes());
	hasher.update(query.map(str::trim).unwrap_or_default().as_bytes());

	hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use super::*;

	fn analysis(category: &str) -> ImageAnalysis {
		ImageAnalysis {
			category: category.to_string(),
			product_type: "Sofa".to_string(),
			search_terms: Vec::new(),
			confidence: 0.9,
			attributes: BTreeMap::new(),
			max_price: None,
		}
	}

	#[test]
	fn evicts_oldest_insertion_first() {
		let mut cache = AnalysisCache::new(2);

		cache.put("a".to_string(), analysis("A"));
		cache.put("b".to_string(), analysis("B"));

		assert!(cache.get("a").is_some());

		cache.put("c".to_string(), analysis("C"));

		assert!(cache.get("a").is_none());
		assert_eq!(cache.get("b").map(|a| a.category), Some("B".to_string()));
		assert_eq!(cache.len(), 2);
	}

	#[test]
	fn replacing_a_key_keeps_its_position() {
		let mut cache = AnalysisCache::new(2);

		cache.put("a".to_string(), analysis("A"));
		cache.put("b".to_string(), analysis("B"));
		cache.put("a".to_string(), analysis("A2"));
		cache.put("c".to_string(), analysis("C"));

		assert!(cache.get("a").is_none());
		assert!(cache.get("b").is_some());
		assert!(cache.get("c").is_some());
	}

	#[test]
	fn zero_capacity_disables_caching() {
		let mut cache = AnalysisCache::new(0);

		cache.put("a".to_string(), analysis("A"));

		assert!(cache.is_empty());
	}

	#[test]
	fn key_depends_on_image_model_and_query() {
		let base = cache_key(b"image", "vision-a", Some("oak"));

		assert_eq!(base, cache_key(b"image", "vision-a", Some("  oak ")));
		assert_ne!(base, cache_key(b"image", "vision-a", None));
		assert_ne!(base, cache_key(b"imagf", "vision-a", Some("oak")));
		assert_ne!(base, cache_key(b"image", "vision-b", Some("oak")));
		assert_ne!(base, cache_key(b"image", "vision-", Some("aoak")));
		assert_eq!(
			cache_key(b"image", "vision-a", None),
			cache_key(b"image", "vision-a", Some(""))
		);
	}
}
