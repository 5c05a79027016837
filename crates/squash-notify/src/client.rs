// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The notifier client.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::config::NotifierConfig;
use crate::error::Result;
use crate::exception::Exception;
use crate::payload::{build_payload, should_ignore};
use crate::transmit::{HttpTransmitter, Transmit, JSON_HEADERS};

/// What happened to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
	/// The notifier is disabled; nothing was sent.
	Disabled,
	/// The exception matched an ignore rule; nothing was sent.
	Ignored,
	/// The report was accepted by the server.
	Sent,
}

/// Reports exceptions to a Squash server.
pub struct Notifier<T = HttpTransmitter> {
	config: Arc<NotifierConfig>,
	transmitter: T,
}

impl Notifier<HttpTransmitter> {
	/// Create a notifier that sends reports over HTTP.
	pub fn new(config: NotifierConfig) -> Result<Self> {
		let transmitter = HttpTransmitter::new(config.transmit_timeout)?;
		info!(
			api_host = %config.api_host,
			environment = %config.environment,
			disabled = config.disabled,
			"Notifier initialized"
		);
		Ok(Self::with_transmitter(config, transmitter))
	}
}

impl<T: Transmit> Notifier<T> {
	pub fn with_transmitter(config: NotifierConfig, transmitter: T) -> Self {
		Self {
			config: Arc::new(config),
			transmitter,
		}
	}

	pub fn config(&self) -> &NotifierConfig {
		&self.config
	}

	/// Whether `exception` would be dropped by an ignore rule.
	pub fn should_ignore(&self, exception: &Exception) -> bool {
		should_ignore(&self.config, exception)
	}

	/// Report an exception.
	///
	/// Ignore rules and the disabled flag are checked before anything is
	/// serialized; transport failures are returned to the caller.
	pub async fn notify(&self, exception: &Exception) -> Result<NotifyOutcome> {
		if self.config.disabled {
			debug!(class_name = %exception.class_name, "Notifier disabled; not sending");
			return Ok(NotifyOutcome::Disabled);
		}
		if self.should_ignore(exception) {
			debug!(class_name = %exception.class_name, "Exception ignored; not sending");
			return Ok(NotifyOutcome::Ignored);
		}

		let payload = build_payload(&self.config, exception, Utc::now())?;
		let body = serde_json::to_string(&payload)?;
		self.transmitter
			.transmit(&self.config.notify_url(), JSON_HEADERS, body)
			.await?;

		info!(class_name = %exception.class_name, "Exception reported");
		Ok(NotifyOutcome::Sent)
	}
}
