/// Lowercased `title + " " + description`, the text every matcher searches.
pub fn combined_text(title: &str, description: &str) -> String {
	format!("{title} {description}").to_lowercase()
}

/// Fraction of non-empty attribute values contained in `text`.
///
/// `text` must come from [`combined_text`]. Containment is a plain substring check, so "oak"
/// also matches "oaken".
pub fn style_match<'a, I>(text: &str, attribute_values: I) -> f64
where
	I: IntoIterator<Item = &'a str>,
{
	let mut total = 0_usize;
	let mut matched = 0_usize;

	for value in attribute_values {
		let needle = value.trim();

		if needle.is_empty() {
			continue;
		}

		total += 1;

		if text.contains(needle.to_lowercase().as_str()) {
			matched += 1;
		}
	}

	if total == 0 {
		return 0.0;
	}

	matched as f64 / total as f64
}

/// Alignment between the user's stated intent and a product, in `[0, 1]`.
///
/// Averages whichever of the two sub-signals applies: the fraction of `terms` found in `text`, and
/// whether `price` fits under `max_price`. Returns 0 when neither applies.
pub fn query_match(text: &str, price: f64, terms: &[String], max_price: Option<f64>) -> f64 {
	let mut sum = 0.0;
	let mut applicable = 0_u32;

	if !terms.is_empty() {
		let matched = terms.iter().filter(|term| text.contains(term.as_str())).count();

		sum += matched as f64 / terms.len() as f64;
		applicable += 1;
	}
	if let Some(max_price) = max_price {
		if price <= max_price {
			sum += 1.0;
		}

		applicable += 1;
	}

	if applicable == 0 {
		return 0.0;
	}

	sum / f64::from(applicable)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn style_match_counts_substring_hits() {
		let text = combined_text("Oslo Sofa", "Mid-century modern sofa in grey velvet.");
		let score = style_match(&text, ["Modern", "velvet", "teak", ""]);

		assert!((score - 2.0 / 3.0).abs() < 1e-9);
	}

	#[test]
	fn style_match_without_attributes_is_zero() {
		assert_eq!(style_match("anything", Vec::<&str>::new()), 0.0);
		assert_eq!(style_match("anything", ["  ", ""]), 0.0);
	}

	#[test]
	fn query_match_averages_applicable_signals() {
		let text = combined_text("Oak Table", "Solid oak dining table.");
		let terms = vec!["oak".to_string(), "round".to_string()];

		assert!((query_match(&text, 400.0, &terms, Some(500.0)) - 0.75).abs() < 1e-9);
		assert!((query_match(&text, 600.0, &terms, Some(500.0)) - 0.25).abs() < 1e-9);
		assert!((query_match(&text, 600.0, &terms, None) - 0.5).abs() < 1e-9);
		assert_eq!(query_match(&text, 500.0, &[], Some(500.0)), 1.0);
	}

	#[test]
	fn query_match_without_signals_is_zero() {
		assert_eq!(query_match("oak table", 10.0, &[], None), 0.0);
	}
}
