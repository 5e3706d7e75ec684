// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Input validation for track and identify calls.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Rejected input. Never produced after an upstream call has been made.
///
/// The messages are returned verbatim to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	#[error("Missing required field: {0}")]
	MissingField(&'static str),

	#[error("Invalid email format")]
	InvalidEmail,
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
	EMAIL_REGEX.is_match(email)
}

pub(crate) fn require_field(value: &str, field: &'static str) -> Result<(), ValidationError> {
	if value.trim().is_empty() {
		return Err(ValidationError::MissingField(field));
	}
	Ok(())
}
