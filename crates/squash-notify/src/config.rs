// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Notifier configuration.
//!
//! Configuration is an explicit value built once and validated eagerly: a
//! notifier cannot exist without the fields a report needs.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use regex::Regex;

use crate::error::{NotifyError, Result};

/// Path reports are posted to, relative to the API host.
pub const DEFAULT_NOTIFY_PATH: &str = "/api/1.0/notify";

/// Timeout for transmitting a single report.
pub const DEFAULT_TRANSMIT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Validated notifier configuration.
#[derive(Clone)]
pub struct NotifierConfig {
	pub api_key: String,
	/// Scheme and host of the Squash server, e.g. `https://squash.example.com`.
	pub api_host: String,
	pub environment: String,
	/// Revision of the deployed code, usually a commit SHA.
	pub revision: String,
	/// When set, reports are built but never transmitted.
	pub disabled: bool,
	pub notify_path: String,
	pub transmit_timeout: Duration,
	/// Exception classes that are never reported.
	pub ignored_exception_classes: Vec<String>,
	/// Per-class message patterns; a matching message is not reported.
	pub ignored_exception_messages: HashMap<String, Vec<Regex>>,
}

impl NotifierConfig {
	pub fn builder() -> NotifierConfigBuilder {
		NotifierConfigBuilder::new()
	}

	/// Full URL reports are posted to.
	pub fn notify_url(&self) -> String {
		format!("{}{}", self.api_host, self.notify_path)
	}
}

impl fmt::Debug for NotifierConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NotifierConfig")
			.field("api_key", &"[REDACTED]")
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

/// Builder for [`NotifierConfig`]. Setting a field twice keeps the last value.
#[derive(Clone, Default)]
pub struct NotifierConfigBuilder {
	api_key: Option<String>,
	api_host: Option<String>,
	environment: Option<String>,
	revision: Option<String>,
	disabled: bool,
	notify_path: Option<String>,
	transmit_timeout: Option<Duration>,
	ignored_exception_classes: Vec<String>,
	ignored_exception_messages: HashMap<String, Vec<String>>,
}

impl NotifierConfigBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn api_key(mut self, key: impl Into<String>) -> Self {
		self.api_key = Some(key.into());
		self
	}

	pub fn api_host(mut self, host: impl Into<String>) -> Self {
		self.api_host = Some(host.into());
		self
	}

	/// Example: `production`, `staging`, `development`
	pub fn environment(mut self, env: impl Into<String>) -> Self {
		self.environment = Some(env.into());
		self
	}

	pub fn revision(mut self, revision: impl Into<String>) -> Self {
		self.revision = Some(revision.into());
		self
	}

	pub fn disabled(mut self, disabled: bool) -> Self {
		self.disabled = disabled;
		self
	}

	pub fn notify_path(mut self, path: impl Into<String>) -> Self {
		self.notify_path = Some(path.into());
		self
	}

	pub fn transmit_timeout(mut self, timeout: Duration) -> Self {
		self.transmit_timeout = Some(timeout);
		self
	}

	/// Replace the list of ignored exception classes.
	pub fn ignored_exception_classes<I, S>(mut self, classes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.ignored_exception_classes = classes.into_iter().map(Into::into).collect();
		self
	}

	/// Replace the ignored message patterns for one exception class.
	pub fn ignored_exception_messages<I, S>(mut self, class_name: impl Into<String>, patterns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.ignored_exception_messages.insert(
			class_name.into(),
			patterns.into_iter().map(Into::into).collect(),
		);
		self
	}

	/// Validate and build the configuration.
	pub fn build(self) -> Result<NotifierConfig> {
		let api_key = required(self.api_key, "api_key")?;
		let environment = required(self.environment, "environment")?;
		let revision = required(self.revision, "revision")?;
		let api_host = required(self.api_host, "api_host")?;

		let mut ignored_exception_messages = HashMap::new();
		for (class_name, patterns) in self.ignored_exception_messages {
			let compiled = patterns
				.iter()
				.map(|p| Regex::new(p))
				.collect::<std::result::Result<Vec<_>, _>>()
				.map_err(|source| NotifyError::InvalidPattern {
					class_name: class_name.clone(),
					source,
				})?;
			ignored_exception_messages.insert(class_name, compiled);
		}

		Ok(NotifierConfig {
			api_key,
			api_host: api_host.trim_end_matches('/').to_string(),
			environment,
			revision,
			disabled: self.disabled,
			notify_path: self
				.notify_path
				.unwrap_or_else(|| DEFAULT_NOTIFY_PATH.to_string()),
			transmit_timeout: self.transmit_timeout.unwrap_or(DEFAULT_TRANSMIT_TIMEOUT),
			ignored_exception_classes: self.ignored_exception_classes,
			ignored_exception_messages,
		})
	}
}

fn required(value: Option<String>, field: &'static str) -> Result<String> {
	value
		.filter(|v| !v.trim().is_empty())
		.ok_or(NotifyError::MissingConfig(field))
}
