// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! A partial configuration, as contributed by one source.

use serde::{Deserialize, Serialize};

use crate::sections::{LoggingConfigLayer, NotifierConfigLayer, SourceMapConfigLayer};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SquashConfigLayer {
	pub logging: Option<LoggingConfigLayer>,
	pub sourcemap: Option<SourceMapConfigLayer>,
	pub notifier: Option<NotifierConfigLayer>,
}

impl SquashConfigLayer {
	/// Overlay `other` on top of this layer; fields set in `other` win.
	pub fn merge(&mut self, other: Self) {
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_section(&mut self.sourcemap, other.sourcemap, SourceMapConfigLayer::merge);
		merge_section(&mut self.notifier, other.notifier, NotifierConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (base.as_mut(), other) {
		(Some(existing), Some(overlay)) => merge(existing, overlay),
		(None, Some(overlay)) => *base = Some(overlay),
		(_, None) => {}
	}
}
