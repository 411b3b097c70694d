use crate::{
	Error, Result,
	db::Db,
	models::{Product, ProductMatch},
};

const PRODUCT_COLUMNS: &str =
	"product_id, title, description, category, product_type, price, width, height, depth";

/// Full-text lookup ranked by `ts_rank_cd`, most relevant first.
///
/// Terms are OR-combined through `websearch_to_tsquery`, so a product only has to mention one of
/// them. Returns nothing when every term is blank.
pub async fn text_search(
	db: &Db,
	terms: &[String],
	limit: u32,
	max_price: Option<f64>,
) -> Result<Vec<ProductMatch>> {
	let Some(query) = build_text_query(terms) else {
		return Ok(Vec::new());
	};
	let sql = format!(
		"\
SELECT {PRODUCT_COLUMNS}, ts_rank_cd(search_vector, query)::float8 AS text_score
FROM products, websearch_to_tsquery('english', $1) AS query
WHERE search_vector @@ query
	AND ($2::float8 IS NULL OR price <= $2)
ORDER BY text_score DESC, product_id ASC
LIMIT $3"
	);
	let rows = sqlx::query_as::<_, ProductMatch>(&sql)
		.bind(query)
		.bind(max_price)
		.bind(i64::from(limit))
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}

pub async fn category_type_search(
	db: &Db,
	category: &str,
	product_type: &str,
	limit: u32,
	max_price: Option<f64>,
) -> Result<Vec<Product>> {
	let sql = format!(
		"\
SELECT {PRODUCT_COLUMNS}
FROM products
WHERE category = $1
	AND product_type = $2
	AND ($3::float8 IS NULL OR price <= $3)
ORDER BY product_id ASC
LIMIT $4"
	);
	let rows = sqlx::query_as::<_, Product>(&sql)
		.bind(category)
		.bind(product_type)
		.bind(max_price)
		.bind(i64::from(limit))
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}

pub async fn category_search(
	db: &Db,
	category: &str,
	limit: u32,
	max_price: Option<f64>,
) -> Result<Vec<Product>> {
	let sql = format!(
		"\
SELECT {PRODUCT_COLUMNS}
FROM products
WHERE category = $1
	AND ($2::float8 IS NULL OR price <= $2)
ORDER BY product_id ASC
LIMIT $3"
	);
	let rows = sqlx::query_as::<_, Product>(&sql)
		.bind(category)
		.bind(max_price)
		.bind(i64::from(limit))
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}

pub async fn distinct_categories(db: &Db) -> Result<Vec<String>> {
	let rows = sqlx::query_scalar::<_, String>(
		"SELECT DISTINCT category FROM products ORDER BY category ASC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn distinct_types(db: &Db) -> Result<Vec<String>> {
	let rows = sqlx::query_scalar::<_, String>(
		"SELECT DISTINCT product_type FROM products ORDER BY product_type ASC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn upsert_product(db: &Db, product: &Product) -> Result<()> {
	if product.product_id.trim().is_empty() {
		return Err(Error::InvalidArgument("product_id must be non-empty.".to_string()));
	}
	if !product.price.is_finite() || product.price < 0.0 {
		return Err(Error::InvalidArgument(
			"price must be a finite, non-negative number.".to_string(),
		));
	}

	sqlx::query(
		"\
INSERT INTO products (
	product_id,
	title,
	description,
	category,
	product_type,
	price,
	width,
	height,
	depth
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
ON CONFLICT (product_id) DO UPDATE
SET
	title = EXCLUDED.title,
	description = EXCLUDED.description,
	category = EXCLUDED.category,
	product_type = EXCLUDED.product_type,
	price = EXCLUDED.price,
	width = EXCLUDED.width,
	height = EXCLUDED.height,
	depth = EXCLUDED.depth",
	)
	.bind(product.product_id.as_str())
	.bind(product.title.as_str())
	.bind(product.description.as_str())
	.bind(product.category.as_str())
	.bind(product.product_type.as_str())
	.bind(product.price)
	.bind(product.width)
	.bind(product.height)
	.bind(product.depth)
	.execute(&db.pool)
	.await?;

	Ok(())
}

fn build_text_query(terms: &[String]) -> Option<String> {
	let cleaned = terms
		.iter()
		.map(|term| term.replace(['"', '-'], " ").trim().to_string())
		.filter(|term| !term.is_empty())
		.collect::<Vec<_>>();

	if cleaned.is_empty() {
		return None;
	}

	Some(cleaned.join(" or "))
}
