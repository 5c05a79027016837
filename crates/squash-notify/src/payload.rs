// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Report payload construction and ignore rules.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::warn;

use crate::config::NotifierConfig;
use crate::error::Result;
use crate::exception::Exception;

/// Value of the payload's `client` field.
pub const CLIENT_NAME: &str = "rust";

/// Payload fields user data may not replace.
pub const PROTECTED_FIELDS: &[&str] = &["api_key", "client"];

/// Whether an exception should be dropped instead of reported.
///
/// An exception is dropped when its class is ignored by configuration or by a
/// surrounding scope, or when its message matches one of the patterns
/// configured for its class.
pub fn should_ignore(config: &NotifierConfig, exception: &Exception) -> bool {
	let class = exception.class_name.as_str();

	if config.ignored_exception_classes.iter().any(|c| c == class)
		|| exception.ignored_classes.iter().any(|c| c == class)
	{
		return true;
	}

	config
		.ignored_exception_messages
		.get(class)
		.is_some_and(|patterns| patterns.iter().any(|re| re.is_match(&exception.message)))
}

/// Build the JSON body posted to the notify endpoint.
pub fn build_payload(
	config: &NotifierConfig,
	exception: &Exception,
	occurred_at: DateTime<Utc>,
) -> Result<Value> {
	let mut body = Map::new();
	body.insert("api_key".to_string(), Value::from(config.api_key.as_str()));
	body.insert("environment".to_string(), Value::from(config.environment.as_str()));
	body.insert("client".to_string(), Value::from(CLIENT_NAME));
	body.insert("revision".to_string(), Value::from(config.revision.as_str()));
	body.insert("class_name".to_string(), Value::from(exception.class_name.as_str()));
	body.insert("message".to_string(), Value::from(exception.message.as_str()));
	body.insert(
		"occurred_at".to_string(),
		Value::from(occurred_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
	);
	body.insert("backtraces".to_string(), serde_json::to_value(&exception.backtraces)?);

	for (key, value) in &exception.user_data {
		if PROTECTED_FIELDS.contains(&key.as_str()) {
			warn!(field = %key, "user data may not replace protected payload field");
			continue;
		}
		body.insert(key.clone(), value.clone());
	}

	Ok(Value::Object(body))
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use serde_json::json;
	use squash_core::{Backtrace, Frame};

	fn config() -> NotifierConfig {
		NotifierConfig::builder()
			.api_key("abc-123")
			.environment("development")
			.revision("abc123")
			.api_host("http://test.host")
			.ignored_exception_classes(["SyntaxError"])
			.ignored_exception_messages("TypeError", ["^undefined is not"])
			.build()
			.unwrap()
	}

	fn now() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2012, 3, 4, 5, 6, 7).unwrap()
	}

	#[test]
	fn test_payload_fields() {
		let exception = Exception::new("RangeError", "too far").with_backtraces(vec![
			Backtrace::active_thread(vec![Frame::minified("http://test.host/app.js", 3, 14)]),
		]);
		let payload = build_payload(&config(), &exception, now()).unwrap();

		assert_eq!(payload["api_key"], "abc-123");
		assert_eq!(payload["environment"], "development");
		assert_eq!(payload["client"], "rust");
		assert_eq!(payload["revision"], "abc123");
		assert_eq!(payload["class_name"], "RangeError");
		assert_eq!(payload["message"], "too far");
		assert_eq!(payload["occurred_at"], "2012-03-04T05:06:07Z");
		assert_eq!(
			payload["backtraces"],
			json!([{
				"name": "Active Thread",
				"faulted": true,
				"backtrace": [{
					"type": "minified",
					"url": "http://test.host/app.js",
					"line": 3,
					"column": 14
				}]
			}])
		);
	}

	#[test]
	fn test_user_data_overrides_except_protected() {
		let exception = Exception::new("RangeError", "too far")
			.with_user_data("environment", "staging")
			.with_user_data("api_key", "stolen")
			.with_user_data("client", "other")
			.with_user_data("user_id", 42);
		let payload = build_payload(&config(), &exception, now()).unwrap();

		assert_eq!(payload["environment"], "staging");
		assert_eq!(payload["user_id"], 42);
		assert_eq!(payload["api_key"], "abc-123");
		assert_eq!(payload["client"], "rust");
	}

	#[test]
	fn test_ignored_class() {
		assert!(should_ignore(&config(), &Exception::new("SyntaxError", "anything")));
	}

	#[test]
	fn test_ignored_message_pattern() {
		let config = config();
		assert!(should_ignore(
			&config,
			&Exception::new("TypeError", "undefined is not a function")
		));
		assert!(!should_ignore(&config, &Exception::new("TypeError", "null has no properties")));
		// patterns only apply to their own class
		assert!(!should_ignore(
			&config,
			&Exception::new("RangeError", "undefined is not a function")
		));
	}

	proptest::proptest! {
		#[test]
		fn prop_protected_fields_survive_user_data(key in "api_key|client|[a-z_]{1,12}", value in ".*") {
			let exception = Exception::new("RangeError", "too far").with_user_data(key.clone(), value.clone());
			let payload = build_payload(&config(), &exception, now()).unwrap();

			proptest::prop_assert!(payload["api_key"] == "abc-123");
			proptest::prop_assert!(payload["client"] == "rust");
			if !PROTECTED_FIELDS.contains(&key.as_str()) {
				proptest::prop_assert!(payload[key.as_str()] == Value::from(value));
			}
		}
	}

	#[test]
	fn test_scope_ignored_class() {
		let mut exception = Exception::new("RangeError", "too far");
		assert!(!should_ignore(&config(), &exception));
		exception.merge_ignored_classes(&["RangeError".to_string()]);
		assert!(should_ignore(&config(), &exception));
	}
}
