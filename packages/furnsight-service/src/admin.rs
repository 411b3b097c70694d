use serde::{Deserialize, Serialize};

use crate::{FurnsightService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VocabularyReport {
	pub categories: Vec<String>,
	pub types: Vec<String>,
}

impl FurnsightService {
	/// Reloads the catalog vocabulary used for prompts and confidence capping.
	///
	/// Cached analyses were judged against the old vocabulary and are dropped.
	pub async fn refresh_vocabulary(&self) -> Result<VocabularyReport> {
		let vocabulary = self.catalog.vocabulary().await?;
		let report = VocabularyReport {
			categories: vocabulary.categories.clone(),
			types: vocabulary.types.clone(),
		};

		self.set_vocabulary(vocabulary);
		self.lock_cache().clear();

		tracing::info!(
			categories = report.categories.len(),
			types = report.types.len(),
			"Catalog vocabulary refreshed."
		);

		Ok(report)
	}
}
