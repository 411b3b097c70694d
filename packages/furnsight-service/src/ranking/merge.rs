use std::collections::HashMap;

use crate::catalog::CatalogCandidate;

/// Folds strategy outputs into one entry per product id, keeping the highest text score.
///
/// Lists are consumed in order and the result keeps first-seen order. A later occurrence replaces
/// the stored candidate only when its text score is strictly greater.
pub fn merge_candidates<I>(lists: I) -> Vec<CatalogCandidate>
where
	I: IntoIterator<Item = Vec<CatalogCandidate>>,
{
	let mut merged: Vec<CatalogCandidate> = Vec::new();
	let mut by_id: HashMap<String, usize> = HashMap::new();

	for list in lists {
		for candidate in list {
			match by_id.get(&candidate.product.id) {
				Some(&idx) =>
					if candidate.text_score > merged[idx].text_score {
						merged[idx] = candidate;
					},
				None => {
					by_id.insert(candidate.product.id.clone(), merged.len());
					merged.push(candidate);
				},
			}
		}
	}

	merged
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::Product;

	fn candidate(id: &str, text_score: f64) -> CatalogCandidate {
		CatalogCandidate {
			product: Product {
				id: id.to_string(),
				title: format!("Item {id}"),
				description: String::new(),
				category: "Sofas".to_string(),
				product_type: "Sofa".to_string(),
				price: 100.0,
				width: 1.0,
				height: 1.0,
				depth: 1.0,
			},
			text_score,
		}
	}

	#[test]
	fn keeps_max_text_score_and_counts_distinct_ids() {
		let merged = merge_candidates([
			vec![candidate("A", 0.9)],
			vec![candidate("A", 0.2)],
			vec![candidate("B", 0.0), candidate("A", 0.1)],
		]);

		assert_eq!(merged.len(), 2);
		assert_eq!(merged[0].product.id, "A");
		assert_eq!(merged[0].text_score, 0.9);
		assert_eq!(merged[1].product.id, "B");
	}

	#[test]
	fn later_strictly_greater_score_replaces_entry() {
		let mut better = candidate("A", 0.7);

		better.product.title = "Updated".to_string();

		let merged = merge_candidates([vec![candidate("A", 0.0)], vec![better]]);

		assert_eq!(merged.len(), 1);
		assert_eq!(merged[0].text_score, 0.7);
		assert_eq!(merged[0].product.title, "Updated");
	}

	#[test]
	fn equal_score_keeps_first_occurrence() {
		let mut later = candidate("A", 0.0);

		later.product.title = "Later".to_string();

		let merged = merge_candidates([vec![candidate("A", 0.0)], vec![later]]);

		assert_eq!(merged[0].product.title, "Item A");
	}

	#[test]
	fn empty_inputs_merge_to_nothing() {
		assert!(merge_candidates(Vec::<Vec<CatalogCandidate>>::new()).is_empty());
		assert!(merge_candidates([Vec::new(), Vec::new(), Vec::new()]).is_empty());
	}
}
