// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error report notifier for Squash.
//!
//! Builds reports from exceptions, applies ignore rules, and posts them to
//! a Squash server.
//!
//! # Example
//!
//! ```ignore
//! use squash_notify::{Exception, Notifier, NotifierConfig};
//!
//! let config = NotifierConfig::builder()
//!     .api_key("abc-123")
//!     .api_host("https://squash.example.com")
//!     .environment("production")
//!     .revision("4f2c1e0")
//!     .build()?;
//! let notifier = Notifier::new(config)?;
//!
//! notifier.notify(&Exception::new("TypeError", "boom")).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod exception;
pub mod payload;
pub mod transmit;

pub use client::{Notifier, NotifyOutcome};
pub use config::{NotifierConfig, NotifierConfigBuilder, DEFAULT_NOTIFY_PATH, DEFAULT_TRANSMIT_TIMEOUT};
pub use error::{NotifyError, Result};
pub use exception::{add_user_data, adding_user_data, ignore_exceptions, ignoring_exceptions, Exception};
pub use payload::{build_payload, should_ignore, CLIENT_NAME, PROTECTED_FIELDS};
pub use transmit::{HttpTransmitter, Transmit, JSON_HEADERS};
