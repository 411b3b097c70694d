use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use furnsight_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_value() -> Value {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.")
}

fn render(value: &Value) -> String {
	toml::to_string(value).expect("Failed to render sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("furnsight_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_value(value: &Value) -> furnsight_config::Result<Config> {
	let path = write_temp_config(render(value));
	let result = furnsight_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.")
}

#[test]
fn sample_config_loads() {
	let cfg = load_value(&sample_value()).expect("Sample config must be valid.");

	assert_eq!(cfg.ranking.max_results, 20);
	assert_eq!(cfg.search.over_fetch_multiplier, 3);
	assert_eq!(cfg.analysis.attribute_keys, vec!["style", "material", "color"]);
	assert!((cfg.ranking.weights.product_type - 0.25).abs() < f64::EPSILON);
}

#[test]
fn optional_sections_fall_back_to_defaults() {
	let mut value = sample_value();
	let root = value.as_table_mut().expect("Sample config must be a table.");

	root.remove("analysis");
	root.remove("search");
	root.remove("ranking");

	let cfg = load_value(&value).expect("Config without optional sections must be valid.");

	assert_eq!(cfg.analysis.cache_capacity, 128);
	assert_eq!(cfg.search.over_fetch_multiplier, 3);
	assert_eq!(cfg.ranking.max_results, 20);
	assert!((cfg.ranking.min_score - 0.1).abs() < f64::EPSILON);
	assert!((cfg.ranking.weights.category - 0.35).abs() < f64::EPSILON);
	assert_eq!(cfg.ranking.model, "google/gemini-2.5-flash-lite");
}

#[test]
fn attribute_keys_are_trimmed_and_deduplicated() {
	let mut value = sample_value();
	let analysis = value
		.get_mut("analysis")
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [analysis].");

	analysis.insert(
		"attribute_keys".to_string(),
		Value::Array(vec![
			Value::String(" style ".to_string()),
			Value::String("Style".to_string()),
			Value::String("".to_string()),
			Value::String("finish".to_string()),
		]),
	);

	let cfg = load_value(&value).expect("Config must load.");

	assert_eq!(cfg.analysis.attribute_keys, vec!["style", "finish"]);
}

#[test]
fn max_results_must_be_positive() {
	let mut cfg = base_config();

	cfg.ranking.max_results = 0;

	let err = furnsight_config::validate(&cfg).expect_err("Expected max_results validation error.");

	assert!(
		err.to_string().contains("ranking.max_results must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn negative_weights_are_rejected() {
	let mut cfg = base_config();

	cfg.ranking.weights.style = -0.1;

	let err = furnsight_config::validate(&cfg).expect_err("Expected weight validation error.");

	assert!(
		err.to_string().contains("ranking.weights.style must be zero or greater."),
		"Unexpected error: {err}"
	);
}

#[test]
fn reserved_attribute_keys_are_rejected() {
	let mut cfg = base_config();

	cfg.analysis.attribute_keys = vec!["style".to_string(), "category".to_string()];

	let err = furnsight_config::validate(&cfg).expect_err("Expected attribute key error.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn over_fetch_multiplier_must_be_positive() {
	let mut cfg = base_config();

	cfg.search.over_fetch_multiplier = 0;

	let err = furnsight_config::validate(&cfg).expect_err("Expected multiplier error.");

	assert!(
		err.to_string().contains("search.over_fetch_multiplier must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn missing_file_reports_path() {
	let path = env::temp_dir().join("furnsight_config_missing_file.toml");
	let err = furnsight_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}
