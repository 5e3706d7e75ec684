// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Forwarding events and identify calls to the upstream profile store.
//!
//! - [`EventRelay`] turns a [`TrackEvent`](beacon_relay_core::TrackEvent) into
//!   an upstream event submission.
//! - [`IdentifyReconciler`] creates a profile for an
//!   [`IdentifyRequest`](beacon_relay_core::IdentifyRequest) and, when the
//!   email is already taken, updates the existing profile instead.
//!
//! Both talk to upstream through the [`UpstreamApi`] trait. [`HttpUpstream`]
//! is the production implementation.

pub mod payload;
pub mod reconcile;
pub mod relay;
pub mod upstream;

#[cfg(test)]
mod mock;

pub use reconcile::IdentifyReconciler;
pub use relay::EventRelay;
pub use upstream::{
	HttpUpstream, HttpUpstreamBuilder, UpstreamApi, UpstreamConfigError, UpstreamResponse,
	DEFAULT_BASE_URL, DEFAULT_REVISION, DEFAULT_TIMEOUT,
};
