use std::sync::Arc;

use furnsight_service::{CatalogStore, FurnsightService, PgCatalog};
use furnsight_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<FurnsightService>,
}
impl AppState {
	pub async fn new(config: furnsight_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let catalog = Arc::new(PgCatalog::new(db));
		let vocabulary = catalog.vocabulary().await?;

		if vocabulary.categories.is_empty() {
			tracing::warn!("Catalog is empty; every analysis will be capped at low confidence.");
		} else {
			tracing::info!(
				categories = vocabulary.categories.len(),
				types = vocabulary.types.len(),
				"Catalog vocabulary loaded."
			);
		}

		Ok(Self::from_service(FurnsightService::new(config, catalog, vocabulary)))
	}

	pub fn from_service(service: FurnsightService) -> Self {
		Self { service: Arc::new(service) }
	}
}
