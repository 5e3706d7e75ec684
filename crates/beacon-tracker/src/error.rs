// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use beacon_relay_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
	/// Base URL is missing or not http(s).
	#[error("invalid base URL: {0}")]
	InvalidBaseUrl(String),

	/// Rejected locally; nothing was sent.
	#[error(transparent)]
	Validation(#[from] ValidationError),

	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// The beacon server answered with a non-success status.
	#[error("server error ({status}): {message}")]
	Server { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, TrackerError>;
