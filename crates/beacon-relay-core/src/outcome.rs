// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

/// Result of a successful relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventReceipt {
	/// Upstream event id, or the anonymous id when upstream returned none.
	pub event_id: String,
}

/// Result of a successful identify reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
	/// `None` only when upstream accepted a create with an empty body.
	pub profile_id: Option<String>,
	/// True when an existing profile was updated after a conflict.
	pub updated: bool,
}

impl ReconcileOutcome {
	pub fn accepted(profile_id: Option<String>) -> Self {
		Self {
			profile_id,
			updated: false,
		}
	}

	pub fn updated(profile_id: String) -> Self {
		Self {
			profile_id: Some(profile_id),
			updated: true,
		}
	}
}
