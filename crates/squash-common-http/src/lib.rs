// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Squash.
//!
//! Every outbound request carries the same User-Agent so the receiving
//! service can tell which client and platform sent it.

mod client;

pub use client::{builder, builder_with_user_agent, new_client_with_timeout, user_agent};
