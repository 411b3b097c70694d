use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Product {
	pub product_id: String,
	pub title: String,
	pub description: String,
	pub category: String,
	pub product_type: String,
	pub price: f64,
	pub width: f64,
	pub height: f64,
	pub depth: f64,
}

/// A product returned by full-text search, with its relevance from `ts_rank_cd`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductMatch {
	#[sqlx(flatten)]
	pub product: Product,
	pub text_score: f64,
}
