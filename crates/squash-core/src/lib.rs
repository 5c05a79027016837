// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types shared by the Squash source map engine and the error notifier.
//!
//! Backtraces travel in error reports produced by the notifier and are
//! rewritten by the symbolicator in `squash-sourcemap`. Both sides agree on
//! the wire shape defined here.

pub mod backtrace;
pub mod error;

pub use backtrace::{Backtrace, Frame, FrameType};
pub use error::{CoreError, Result};
