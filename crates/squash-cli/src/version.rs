// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Build information.

/// Format version info for display.
pub fn format_version_info() -> String {
	format!(
		"squash {}\n\
         Platform:   {}-{}\n\
         User-Agent: {}",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH,
		squash_common_http::user_agent(),
	)
}
