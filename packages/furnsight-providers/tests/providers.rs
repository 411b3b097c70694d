use reqwest::header::{AUTHORIZATION, HeaderName};
use serde_json::{Map, Value};

use furnsight_providers::Error;

#[test]
fn builds_bearer_auth_header() {
	let headers =
		furnsight_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn copies_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("X-Title".to_string(), Value::String("furnsight".to_string()));

	let headers =
		furnsight_providers::auth_headers("secret", &defaults).expect("Failed to build headers.");

	assert_eq!(headers.get(HeaderName::from_static("x-title")).expect("Missing header."), "furnsight");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("X-Retries".to_string(), Value::from(3));

	let err = furnsight_providers::auth_headers("secret", &defaults)
		.expect_err("Expected invalid header config.");

	assert!(matches!(err, Error::InvalidConfig { .. }));
	assert_eq!(err.upstream_status(), None);
}
