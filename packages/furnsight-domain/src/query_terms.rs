//! Free-text query normalization.
//!
//! Price intent ("under $500", "budget 200", "$300") is never a search term. It is removed before
//! tokenizing and can be read separately with [`extract_max_price`].

use std::{collections::HashSet, sync::LazyLock};

use regex::{Captures, Regex};

pub const MIN_TERM_CHARS: usize = 3;

const STOP_WORDS: &[&str] = &[
	"about", "also", "and", "any", "are", "but", "can", "could", "find", "for", "from", "get",
	"had", "has", "have", "her", "his", "into", "its", "just", "like", "looking", "look", "need",
	"needs", "not", "our", "please", "really", "should", "show", "some", "something", "that",
	"the", "their", "them", "these", "they", "this", "those", "very", "want", "wants", "was",
	"what", "which", "with", "would", "you", "your",
];

static PRICE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"(?ix)
		\b(?:under|below|less\s+than|max(?:imum)?|budget(?:\s+of)?|up\s+to)\s*:?\s*\$?\s*
			(?P<bounded>\d[\d,]*(?:\.\d+)?)(?P<bounded_k>k)?\b
		|
		\$\s*(?P<bare>\d[\d,]*(?:\.\d+)?)(?P<bare_k>k)?\b
		",
	)
	.expect("Price phrase pattern must compile.")
});

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
	LazyLock::new(|| STOP_WORDS.iter().copied().collect());

/// Splits a user query into lowercase alphabetic search terms.
///
/// Any non-alphabetic character, hyphens and apostrophes included, separates terms, so
/// "mid-century" yields `mid` and `century`. Both halves then match catalog text written with or
/// without the hyphen. Terms shorter than [`MIN_TERM_CHARS`], stop words, and repeated terms are
/// dropped. The order of first appearance is kept.
pub fn tokenize_query(query: Option<&str>) -> Vec<String> {
	let Some(query) = query else { return Vec::new() };
	let stripped = strip_price_phrases(query);
	let mut normalized = String::with_capacity(stripped.len());

	for ch in stripped.chars() {
		if ch.is_alphabetic() {
			normalized.extend(ch.to_lowercase());
		} else {
			normalized.push(' ');
		}
	}

	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for token in normalized.split_whitespace() {
		if token.chars().count() < MIN_TERM_CHARS || STOP_WORD_SET.contains(token) {
			continue;
		}
		if seen.insert(token) {
			out.push(token.to_string());
		}
	}

	out
}

/// Removes every price-intent phrase from `text`.
pub fn strip_price_phrases(text: &str) -> String {
	PRICE_PHRASE.replace_all(text, " ").into_owned()
}

/// Returns the first positive price ceiling expressed in `text`, if any.
pub fn extract_max_price(text: &str) -> Option<f64> {
	PRICE_PHRASE.captures_iter(text).find_map(|caps| parse_amount(&caps))
}

fn parse_amount(caps: &Captures<'_>) -> Option<f64> {
	let (digits, thousands) = match caps.name("bounded") {
		Some(digits) => (digits, caps.name("bounded_k").is_some()),
		None => (caps.name("bare")?, caps.name("bare_k").is_some()),
	};
	let cleaned: String = digits.as_str().chars().filter(|ch| *ch != ',').collect();
	let mut amount: f64 = cleaned.parse().ok()?;

	if thousands {
		amount *= 1_000.0;
	}

	(amount.is_finite() && amount > 0.0).then_some(amount)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_price_phrase_before_tokenizing() {
		assert_eq!(tokenize_query(Some("under $500 modern oak")), vec!["modern", "oak"]);
	}

	#[test]
	fn drops_stop_words_and_short_tokens() {
		let terms = tokenize_query(Some("I want a sofa that is like, really green"));

		assert_eq!(terms, vec!["sofa", "green"]);
	}

	#[test]
	fn strips_punctuation_and_repeats() {
		let terms = tokenize_query(Some("Velvet! velvet... (tufted) chair?"));

		assert_eq!(terms, vec!["velvet", "tufted", "chair"]);
	}

	#[test]
	fn hyphenated_words_split_into_parts() {
		let terms = tokenize_query(Some("mid-century l-shaped sofa"));

		assert_eq!(terms, vec!["mid", "century", "shaped", "sofa"]);
	}

	#[test]
	fn empty_or_absent_query_yields_nothing() {
		assert!(tokenize_query(None).is_empty());
		assert!(tokenize_query(Some("")).is_empty());
		assert!(tokenize_query(Some("   $200  ")).is_empty());
	}

	#[test]
	fn strips_every_price_form() {
		for query in
			["below 300 desk", "max 1000 desk", "budget 200 desk", "budget: 200 desk", "desk $ 75"]
		{
			assert_eq!(tokenize_query(Some(query)), vec!["desk"], "query: {query}");
		}
	}

	#[test]
	fn extracts_first_price_ceiling() {
		assert_eq!(extract_max_price("under $500 modern oak"), Some(500.0));
		assert_eq!(extract_max_price("budget of 1,200 or $900"), Some(1_200.0));
		assert_eq!(extract_max_price("something up to 2k"), Some(2_000.0));
		assert_eq!(extract_max_price("Budget: $350"), Some(350.0));
		assert_eq!(extract_max_price("$49.99 lamp"), Some(49.99));
	}

	#[test]
	fn ignores_text_without_price_intent() {
		assert_eq!(extract_max_price("a 3 seater sofa"), None);
		assert_eq!(extract_max_price("under $0"), None);
	}
}
