// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identify reconciliation.
//!
//! Upstream enforces one profile per email, so a create for a known email
//! fails with 409 and names the existing profile. The reconciler turns that
//! conflict into a partial update of the existing profile, which makes
//! identify idempotent for callers:
//!
//! ```text
//! validate -> create --2xx--> accepted
//!                    --409--> duplicate detected -> update --2xx--> updated
//!                    --else-> failed                      --else--> failed
//! ```
//!
//! The create-then-update sequence is not atomic. Two concurrent identify
//! calls for a new email can both observe the conflict and both update the
//! same profile. Each update writes the attribute set of its own request, so
//! this race is benign: the profile ends up with one of the two attribute
//! sets and no duplicate profile is created. Likewise, a lost response to the
//! update leaves the profile updated while the caller sees a transport error.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use beacon_relay_core::{IdentifyRequest, ReconcileOutcome, RelayError};

use crate::payload;
use crate::upstream::{UpstreamApi, UpstreamResponse};

enum CreateOutcome {
	Accepted(Option<String>),
	Duplicate(String),
	Failed(RelayError),
}

fn classify_create(response: UpstreamResponse) -> CreateOutcome {
	if response.is_success() {
		return CreateOutcome::Accepted(response.data_id());
	}
	if response.is_conflict() {
		return match payload::duplicate_profile_id(&response.body) {
			Some(profile_id) => CreateOutcome::Duplicate(profile_id),
			None => CreateOutcome::Failed(RelayError::UnrecognizedConflict {
				body: response.body,
			}),
		};
	}
	CreateOutcome::Failed(response.into_error())
}

/// Creates or updates the upstream profile for an identify request.
#[derive(Clone)]
pub struct IdentifyReconciler {
	upstream: Arc<dyn UpstreamApi>,
}

impl IdentifyReconciler {
	pub fn new(upstream: Arc<dyn UpstreamApi>) -> Self {
		Self { upstream }
	}

	/// Resolve `request` to a single upstream profile.
	///
	/// Makes at most two upstream calls. The update after a conflict is
	/// issued exactly once; its failure is returned as-is, even if it is
	/// another conflict.
	#[instrument(skip(self, request))]
	pub async fn reconcile(&self, request: &IdentifyRequest) -> Result<ReconcileOutcome, RelayError> {
		request.validate()?;

		let attributes = request.profile_attributes();
		let create = payload::profile_create_document(attributes.clone());
		let response = self.upstream.create_profile(&create).await?;

		match classify_create(response) {
			CreateOutcome::Accepted(profile_id) => {
				debug!(profile_id = ?profile_id, "profile created");
				Ok(ReconcileOutcome::accepted(profile_id))
			}
			CreateOutcome::Duplicate(profile_id) => {
				debug!(profile_id = %profile_id, "profile exists for email, updating it");
				let update = payload::profile_update_document(&profile_id, attributes);
				let response = self.upstream.update_profile(&profile_id, &update).await?;
				if !response.is_success() {
					warn!(
						profile_id = %profile_id,
						status = response.status,
						"upstream rejected profile update"
					);
					return Err(response.into_error());
				}
				Ok(ReconcileOutcome::updated(profile_id))
			}
			CreateOutcome::Failed(err) => {
				warn!(error = %err, status = ?err.upstream_status(), "upstream rejected profile create");
				Err(err)
			}
		}
	}
}
