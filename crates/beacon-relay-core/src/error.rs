// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::validation::ValidationError;

/// Coarse classification used to pick a response status and retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	Validation,
	Upstream,
	Transport,
}

/// Terminal failure of a relay or reconcile call.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
	#[error(transparent)]
	Validation(#[from] ValidationError),

	/// Upstream answered with a non-success status.
	#[error("upstream returned status {status}")]
	Upstream { status: u16, body: String },

	/// Upstream reported a 409 whose body did not name the existing profile.
	#[error("upstream conflict response did not identify an existing profile")]
	UnrecognizedConflict { body: String },

	/// The request never produced an upstream response.
	#[error("failed to reach upstream: {0}")]
	Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RelayError {
	pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
		RelayError::Transport(Box::new(err))
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			RelayError::Validation(_) => ErrorKind::Validation,
			RelayError::Upstream { .. } | RelayError::UnrecognizedConflict { .. } => {
				ErrorKind::Upstream
			}
			RelayError::Transport(_) => ErrorKind::Transport,
		}
	}

	pub fn upstream_status(&self) -> Option<u16> {
		match self {
			RelayError::Upstream { status, .. } => Some(*status),
			RelayError::UnrecognizedConflict { .. } => Some(409),
			_ => None,
		}
	}

	pub fn upstream_body(&self) -> Option<&str> {
		match self {
			RelayError::Upstream { body, .. } | RelayError::UnrecognizedConflict { body } => {
				Some(body)
			}
			_ => None,
		}
	}

	/// Only transport failures are worth retrying; nothing here retries itself.
	pub fn is_retryable(&self) -> bool {
		self.kind() == ErrorKind::Transport
	}
}
