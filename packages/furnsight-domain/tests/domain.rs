use furnsight_domain::{
	matching,
	query_terms,
	vocabulary::{self, CatalogVocabulary},
};

fn vocabulary() -> CatalogVocabulary {
	CatalogVocabulary::new(
		vec!["Tables".to_string(), "Sofas".to_string(), "Sofas".to_string()],
		vec!["Sectional Sofa".to_string(), "Dining Table".to_string()],
	)
}

#[test]
fn vocabulary_is_sorted_and_deduplicated() {
	let vocab = vocabulary();

	assert_eq!(vocab.categories, vec!["Sofas", "Tables"]);
	assert!(vocab.has_category("Sofas"));
	assert!(!vocab.has_category("sofas"));
	assert!(vocab.has_type("Dining Table"));
}

#[test]
fn unknown_category_caps_confidence() {
	let vocab = vocabulary();
	let capped = vocabulary::cap_confidence(0.95, "Spaceships", "Dining Table", &vocab);

	assert_eq!(capped, vocabulary::OUT_OF_VOCABULARY_CONFIDENCE_CAP);
}

#[test]
fn unknown_type_caps_confidence() {
	let vocab = vocabulary();

	assert_eq!(vocabulary::cap_confidence(0.8, "Sofas", "Hoverboard", &vocab), 0.5);
}

#[test]
fn capping_never_raises_confidence() {
	let vocab = vocabulary();

	assert_eq!(vocabulary::cap_confidence(0.2, "Spaceships", "Hoverboard", &vocab), 0.2);
	assert_eq!(vocabulary::cap_confidence(0.9, "Sofas", "Sectional Sofa", &vocab), 0.9);
}

#[test]
fn confidence_is_clamped_to_unit_range() {
	let vocab = vocabulary();

	assert_eq!(vocabulary::cap_confidence(3.0, "Sofas", "Sectional Sofa", &vocab), 1.0);
	assert_eq!(vocabulary::cap_confidence(-1.0, "Sofas", "Sectional Sofa", &vocab), 0.0);
	assert_eq!(vocabulary::cap_confidence(f32::NAN, "Sofas", "Sectional Sofa", &vocab), 0.0);
}

#[test]
fn vocabulary_round_trips_through_json() {
	let vocab = vocabulary();
	let json = serde_json::to_value(&vocab).expect("Failed to encode vocabulary.");

	assert_eq!(json["types"][0], "Dining Table");
}

#[test]
fn tokenized_terms_drive_query_match() {
	let terms = query_terms::tokenize_query(Some("looking for a walnut desk under $300"));
	let max_price = query_terms::extract_max_price("looking for a walnut desk under $300");
	let text = matching::combined_text("Ridge Desk", "Walnut veneer writing desk.");

	assert_eq!(terms, vec!["walnut", "desk"]);
	assert_eq!(max_price, Some(300.0));
	assert_eq!(matching::query_match(&text, 250.0, &terms, max_price), 1.0);
	assert_eq!(matching::query_match(&text, 350.0, &terms, max_price), 0.5);
}
