use serde::{Deserialize, Serialize};

use crate::{BoxFuture, CatalogStore, Result};
use furnsight_domain::vocabulary::CatalogVocabulary;
use furnsight_storage::{catalog, db::Db, models};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
	#[serde(rename = "_id")]
	pub id: String,
	pub title: String,
	pub description: String,
	pub category: String,
	#[serde(rename = "type")]
	pub product_type: String,
	pub price: f64,
	pub width: f64,
	pub height: f64,
	pub depth: f64,
}
impl From<models::Product> for Product {
	fn from(row: models::Product) -> Self {
		Self {
			id: row.product_id,
			title: row.title,
			description: row.description,
			category: row.category,
			product_type: row.product_type,
			price: row.price,
			width: row.width,
			height: row.height,
			depth: row.depth,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogCandidate {
	pub product: Product,
	/// Raw full-text relevance; zero for exact-match strategies.
	pub text_score: f64,
}
impl CatalogCandidate {
	pub fn exact(product: Product) -> Self {
		Self { product, text_score: 0.0 }
	}
}

/// [`CatalogStore`] backed by the PostgreSQL `products` table.
pub struct PgCatalog {
	db: Db,
}
impl PgCatalog {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}

impl CatalogStore for PgCatalog {
	fn text_search<'a>(
		&'a self,
		terms: &'a [String],
		limit: u32,
		max_price: Option<f64>,
	) -> BoxFuture<'a, Result<Vec<CatalogCandidate>>> {
		Box::pin(async move {
			let rows = catalog::text_search(&self.db, terms, limit, max_price).await?;

			Ok(rows
				.into_iter()
				.map(|row| CatalogCandidate {
					product: row.product.into(),
					text_score: row.text_score.max(0.0),
				})
				.collect())
		})
	}

	fn category_type_search<'a>(
		&'a self,
		category: &'a str,
		product_type: &'a str,
		limit: u32,
		max_price: Option<f64>,
	) -> BoxFuture<'a, Result<Vec<CatalogCandidate>>> {
		Box::pin(async move {
			let rows =
				catalog::category_type_search(&self.db, category, product_type, limit, max_price)
					.await?;

			Ok(rows.into_iter().map(|row| CatalogCandidate::exact(row.into())).collect())
		})
	}

	fn category_search<'a>(
		&'a self,
		category: &'a str,
		limit: u32,
		max_price: Option<f64>,
	) -> BoxFuture<'a, Result<Vec<CatalogCandidate>>> {
		Box::pin(async move {
			let rows = catalog::category_search(&self.db, category, limit, max_price).await?;

			Ok(rows.into_iter().map(|row| CatalogCandidate::exact(row.into())).collect())
		})
	}

	fn vocabulary<'a>(&'a self) -> BoxFuture<'a, Result<CatalogVocabulary>> {
		Box::pin(async move {
			let categories = catalog::distinct_categories(&self.db).await?;
			let types = catalog::distinct_types(&self.db).await?;

			Ok(CatalogVocabulary::new(categories, types))
		})
	}
}
