// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod logging;
mod notifier;
mod sourcemap;

pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use notifier::{NotifierConfigLayer, NotifierSettings};
pub use sourcemap::{SourceMapConfig, SourceMapConfigLayer};
