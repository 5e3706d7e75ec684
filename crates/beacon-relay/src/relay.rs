// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument, warn};

use beacon_relay_core::{EventReceipt, RelayError, TrackEvent};

use crate::payload;
use crate::upstream::UpstreamApi;

/// Forwards tracked events upstream, one request per event.
#[derive(Clone)]
pub struct EventRelay {
	upstream: Arc<dyn UpstreamApi>,
}

impl EventRelay {
	pub fn new(upstream: Arc<dyn UpstreamApi>) -> Self {
		Self { upstream }
	}

	/// Validate and submit `event`.
	///
	/// Invalid events are rejected before upstream is contacted. The receipt
	/// carries upstream's event id when the response body has one, otherwise
	/// the event's anonymous id.
	#[instrument(skip(self, event), fields(event = %event.name()))]
	pub async fn relay(&self, event: &TrackEvent) -> Result<EventReceipt, RelayError> {
		event.validate()?;

		let unique_id = payload::dedup_key(event.anonymous_id(), Utc::now());
		let document = payload::event_document(event, unique_id);
		let response = self.upstream.create_event(&document).await?;

		if !response.is_success() {
			warn!(status = response.status, "upstream rejected event");
			return Err(response.into_error());
		}

		let event_id = response
			.data_id()
			.unwrap_or_else(|| event.anonymous_id().to_string());
		debug!(event_id = %event_id, "event relayed");
		Ok(EventReceipt { event_id })
	}
}
