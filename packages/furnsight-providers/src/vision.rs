use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

pub struct VisionRequest<'a> {
	pub api_key: &'a str,
	pub model: &'a str,
	pub messages: &'a [Value],
}

/// Sends a chat completion with image content and returns the raw text of the first choice.
pub async fn complete(
	cfg: &furnsight_config::VisionProviderConfig,
	req: VisionRequest<'_>,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": req.model,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_tokens,
		"messages": req.messages,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(req.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion_content(json)
}

pub fn image_data_url(mime_type: &str, image: &[u8]) -> String {
	format!("data:{mime_type};base64,{}", BASE64_STANDARD.encode(image))
}

fn parse_completion_content(json: Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.ok_or_else(|| Error::InvalidResponse {
			message: "Vision response is missing choices[0].message.content.".to_string(),
		})?;

	match content {
		Value::String(text) => Ok(text.trim().to_string()),
		// Some providers return content as an array of typed parts.
		Value::Array(parts) => Ok(parts
			.iter()
			.filter_map(|part| part.get("text").and_then(|text| text.as_str()))
			.collect::<Vec<_>>()
			.join("")
			.trim()
			.to_string()),
		Value::Null => Ok(String::new()),
		_ => Err(Error::InvalidResponse {
			message: "Vision response content must be text.".to_string(),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_string_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "  {\"category\": \"Sofas\"}\n" } }
			]
		});
		let content = parse_completion_content(json).expect("parse failed");

		assert_eq!(content, "{\"category\": \"Sofas\"}");
	}

	#[test]
	fn joins_content_parts() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": [
					{ "type": "text", "text": "{\"a\":" },
					{ "type": "text", "text": "1}" }
				] } }
			]
		});

		assert_eq!(parse_completion_content(json).expect("parse failed"), "{\"a\":1}");
	}

	#[test]
	fn rejects_missing_choices() {
		let err = parse_completion_content(serde_json::json!({ "error": "nope" }))
			.expect_err("Expected missing content error.");

		assert!(matches!(err, Error::InvalidResponse { .. }));
	}

	#[test]
	fn encodes_data_url() {
		assert_eq!(image_data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
	}
}
