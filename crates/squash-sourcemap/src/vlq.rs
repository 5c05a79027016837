// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Base64 VLQ (Variable-Length Quantity) decoder for source map mappings.
//!
//! Each Base64 character carries six bits: the high bit (`0x20`) marks a
//! continuation and the low five bits are payload, least significant group
//! first. The lowest bit of an assembled value is its sign.

use crate::error::DecodeError;

/// Continuation flag of a VLQ digit.
const VLQ_CONTINUATION_BIT: u8 = 1 << 5;

/// Payload mask of a VLQ digit.
const VLQ_PAYLOAD_MASK: u8 = VLQ_CONTINUATION_BIT - 1;

/// Highest shift at which a 5-bit group still fits in a `u64`.
const MAX_SHIFT: u32 = 59;

/// Decode a Base64 character to its 6-bit value.
pub fn decode_char(byte: u8) -> Result<u8, DecodeError> {
	match byte {
		b'A'..=b'Z' => Ok(byte - b'A'),
		b'a'..=b'z' => Ok(byte - b'a' + 26),
		b'0'..=b'9' => Ok(byte - b'0' + 52),
		b'+' => Ok(62),
		b'/' => Ok(63),
		_ => Err(DecodeError::InvalidChar(byte)),
	}
}

/// Decode a VLQ-encoded token into the signed integers it carries.
///
/// A token yields one integer per VLQ group. Within a mappings segment the
/// values are, in order: generated column, source index, original line,
/// original column, name index, each relative to its previous value.
pub fn decode_segment(token: &str) -> Result<Vec<i64>, DecodeError> {
	if token.is_empty() {
		return Err(DecodeError::Empty);
	}

	let mut values = Vec::with_capacity(5);
	let mut raw = 0u64;
	let mut shift = 0u32;
	let mut continuation = false;

	for byte in token.bytes() {
		let digit = decode_char(byte)?;
		if shift > MAX_SHIFT {
			return Err(DecodeError::Overflow(token.to_string()));
		}

		continuation = digit & VLQ_CONTINUATION_BIT != 0;
		raw += u64::from(digit & VLQ_PAYLOAD_MASK) << shift;
		shift += 5;

		if !continuation {
			let magnitude = (raw >> 1) as i64;
			values.push(if raw & 1 != 0 { -magnitude } else { magnitude });
			raw = 0;
			shift = 0;
		}
	}

	if continuation {
		return Err(DecodeError::Unterminated(token.to_string()));
	}

	Ok(values)
}
