// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Report transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use crate::error::{NotifyError, Result};

/// Headers sent with every report.
pub const JSON_HEADERS: &[(&str, &str)] = &[("Content-Type", "application/json")];

/// Sends a serialized report to the server.
#[async_trait]
pub trait Transmit: Send + Sync {
	async fn transmit(&self, url: &str, headers: &[(&str, &str)], body: String) -> Result<()>;
}

/// Transmits reports over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransmitter {
	client: Client,
}

impl HttpTransmitter {
	/// Create a transmitter whose requests give up after `timeout`.
	pub fn new(timeout: Duration) -> Result<Self> {
		let client = squash_common_http::new_client_with_timeout(timeout)?;
		Ok(Self { client })
	}
}

#[async_trait]
impl Transmit for HttpTransmitter {
	async fn transmit(&self, url: &str, headers: &[(&str, &str)], body: String) -> Result<()> {
		debug!(url = %url, bytes = body.len(), "Sending report");

		let mut request = self.client.post(url);
		for (name, value) in headers {
			request = request.header(*name, *value);
		}
		let response = request.body(body).send().await?;

		if !response.status().is_success() {
			let status = response.status().as_u16();
			let message = response.text().await.unwrap_or_default();
			error!(status, message = %message, "Failed to send report");
			return Err(NotifyError::ServerError { status, message });
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_json_headers() {
		assert_eq!(JSON_HEADERS, &[("Content-Type", "application/json")]);
	}

	#[test]
	fn test_http_transmitter_builds() {
		assert!(HttpTransmitter::new(Duration::from_millis(15_000)).is_ok());
	}
}
