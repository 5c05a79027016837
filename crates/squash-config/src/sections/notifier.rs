// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Notifier configuration section.
//!
//! Required notifier fields stay optional here; they are checked when the
//! settings are turned into a [`squash_notify::NotifierConfig`].

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use squash_notify::{NotifierConfigBuilder, DEFAULT_NOTIFY_PATH, DEFAULT_TRANSMIT_TIMEOUT};

#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotifierConfigLayer {
	pub api_key: Option<String>,
	pub api_host: Option<String>,
	pub environment: Option<String>,
	pub revision: Option<String>,
	pub disabled: Option<bool>,
	pub notify_path: Option<String>,
	pub transmit_timeout_ms: Option<u64>,
	pub ignored_exception_classes: Option<Vec<String>>,
	pub ignored_exception_messages: Option<HashMap<String, Vec<String>>>,
}

impl fmt::Debug for NotifierConfigLayer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NotifierConfigLayer")
			.field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
			.field("api_host", &self.api_host)
			.field("environment", &self.environment)
			.field("revision", &self.revision)
			.field("disabled", &self.disabled)
			.field("notify_path", &self.notify_path)
			.field("transmit_timeout_ms", &self.transmit_timeout_ms)
			.field("ignored_exception_classes", &self.ignored_exception_classes)
			.field("ignored_exception_messages", &self.ignored_exception_messages)
			.finish()
	}
}

impl NotifierConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.api_key.is_some() {
			self.api_key = other.api_key;
		}
		if other.api_host.is_some() {
			self.api_host = other.api_host;
		}
		if other.environment.is_some() {
			self.environment = other.environment;
		}
		if other.revision.is_some() {
			self.revision = other.revision;
		}
		if other.disabled.is_some() {
			self.disabled = other.disabled;
		}
		if other.notify_path.is_some() {
			self.notify_path = other.notify_path;
		}
		if other.transmit_timeout_ms.is_some() {
			self.transmit_timeout_ms = other.transmit_timeout_ms;
		}
		if other.ignored_exception_classes.is_some() {
			self.ignored_exception_classes = other.ignored_exception_classes;
		}
		if other.ignored_exception_messages.is_some() {
			self.ignored_exception_messages = other.ignored_exception_messages;
		}
	}

	pub fn finalize(self) -> NotifierSettings {
		NotifierSettings {
			api_key: self.api_key,
			api_host: self.api_host,
			environment: self.environment,
			revision: self.revision,
			disabled: self.disabled.unwrap_or(false),
			notify_path: self
				.notify_path
				.unwrap_or_else(|| DEFAULT_NOTIFY_PATH.to_string()),
			transmit_timeout: self
				.transmit_timeout_ms
				.map(Duration::from_millis)
				.unwrap_or(DEFAULT_TRANSMIT_TIMEOUT),
			ignored_exception_classes: self.ignored_exception_classes.unwrap_or_default(),
			ignored_exception_messages: self.ignored_exception_messages.unwrap_or_default(),
		}
	}
}

/// Resolved notifier settings.
#[derive(Clone, PartialEq)]
pub struct NotifierSettings {
	pub api_key: Option<String>,
	pub api_host: Option<String>,
	pub environment: Option<String>,
	pub revision: Option<String>,
	pub disabled: bool,
	pub notify_path: String,
	pub transmit_timeout: Duration,
	pub ignored_exception_classes: Vec<String>,
	pub ignored_exception_messages: HashMap<String, Vec<String>>,
}

impl NotifierSettings {
	/// Whether the fields a report needs are all present.
	pub fn is_configured(&self) -> bool {
		self.api_key.is_some()
			&& self.api_host.is_some()
			&& self.environment.is_some()
			&& self.revision.is_some()
	}

	/// Seed a notifier config builder with these settings.
	pub fn builder(&self) -> NotifierConfigBuilder {
		let mut builder = NotifierConfigBuilder::new()
			.disabled(self.disabled)
			.notify_path(self.notify_path.clone())
			.transmit_timeout(self.transmit_timeout)
			.ignored_exception_classes(self.ignored_exception_classes.iter().cloned());

		if let Some(key) = &self.api_key {
			builder = builder.api_key(key.clone());
		}
		if let Some(host) = &self.api_host {
			builder = builder.api_host(host.clone());
		}
		if let Some(env) = &self.environment {
			builder = builder.environment(env.clone());
		}
		if let Some(revision) = &self.revision {
			builder = builder.revision(revision.clone());
		}
		for (class_name, patterns) in &self.ignored_exception_messages {
			builder = builder.ignored_exception_messages(class_name.clone(), patterns.iter().cloned());
		}
		builder
	}
}

impl Default for NotifierSettings {
	fn default() -> Self {
		NotifierConfigLayer::default().finalize()
	}
}

impl fmt::Debug for NotifierSettings {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NotifierSettings")
			.field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
			.field("api_host", &self.api_host)
			.field("environment", &self.environment)
			.field("revision", &self.revision)
			.field("disabled", &self.disabled)
			.field("notify_path", &self.notify_path)
			.field("transmit_timeout", &self.transmit_timeout)
			.field("ignored_exception_classes", &self.ignored_exception_classes)
			.field("ignored_exception_messages", &self.ignored_exception_messages)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use squash_notify::NotifyError;

	#[test]
	fn test_defaults() {
		let settings = NotifierSettings::default();
		assert!(!settings.is_configured());
		assert!(!settings.disabled);
		assert_eq!(settings.notify_path, "/api/1.0/notify");
		assert_eq!(settings.transmit_timeout, Duration::from_millis(15_000));
	}

	#[test]
	fn test_toml_section() {
		let layer: NotifierConfigLayer = toml::from_str(
			r#"
			api_key = "abc-123"
			api_host = "https://squash.example.com"
			environment = "production"
			revision = "4f2c1e0"
			transmit_timeout_ms = 5000
			ignored_exception_classes = ["SyntaxError"]

			[ignored_exception_messages]
			TypeError = ["^undefined is not"]
			"#,
		)
		.unwrap();
		let settings = layer.finalize();
		assert!(settings.is_configured());

		let config = settings.builder().build().unwrap();
		assert_eq!(config.transmit_timeout, Duration::from_millis(5000));
		assert_eq!(config.ignored_exception_classes, vec!["SyntaxError"]);
		assert_eq!(config.ignored_exception_messages["TypeError"].len(), 1);
	}

	#[test]
	fn test_unconfigured_builder_reports_missing_field() {
		let result = NotifierSettings::default().builder().build();
		assert!(matches!(result, Err(NotifyError::MissingConfig("api_key"))));
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = NotifierConfigLayer {
			api_host: Some("http://old.host".to_string()),
			disabled: Some(true),
			..Default::default()
		};
		base.merge(NotifierConfigLayer {
			api_host: Some("http://new.host".to_string()),
			..Default::default()
		});
		assert_eq!(base.api_host.as_deref(), Some("http://new.host"));
		assert_eq!(base.disabled, Some(true));
	}

	#[test]
	fn test_debug_redacts_api_key() {
		let layer = NotifierConfigLayer {
			api_key: Some("secret-key".to_string()),
			..Default::default()
		};
		assert!(!format!("{layer:?}").contains("secret-key"));
		assert!(!format!("{:?}", layer.finalize()).contains("secret-key"));
	}
}
