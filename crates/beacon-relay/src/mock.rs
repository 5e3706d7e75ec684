// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-process upstreams for relay and reconciler tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use beacon_relay_core::RelayError;

use crate::payload::{EventDocument, ProfileDocument};
use crate::upstream::{UpstreamApi, UpstreamResponse};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
	CreateEvent(Value),
	CreateProfile(Value),
	UpdateProfile(String, Value),
}

/// Replays queued responses in order and records every call.
///
/// An exhausted queue answers with a transport error.
#[derive(Default)]
pub struct MockUpstream {
	responses: Mutex<VecDeque<UpstreamResponse>>,
	calls: Mutex<Vec<Call>>,
}

impl MockUpstream {
	pub fn new(responses: impl IntoIterator<Item = UpstreamResponse>) -> Self {
		Self {
			responses: Mutex::new(responses.into_iter().collect()),
			calls: Mutex::new(Vec::new()),
		}
	}

	pub async fn calls(&self) -> Vec<Call> {
		self.calls.lock().await.clone()
	}

	async fn next(&self, call: Call) -> Result<UpstreamResponse, RelayError> {
		self.calls.lock().await.push(call);
		self.responses.lock().await.pop_front().ok_or_else(|| {
			RelayError::transport(std::io::Error::new(
				std::io::ErrorKind::ConnectionReset,
				"no scripted response",
			))
		})
	}
}

#[async_trait]
impl UpstreamApi for MockUpstream {
	async fn create_event(&self, document: &EventDocument) -> Result<UpstreamResponse, RelayError> {
		self.next(Call::CreateEvent(to_value(document))).await
	}

	async fn create_profile(
		&self,
		document: &ProfileDocument,
	) -> Result<UpstreamResponse, RelayError> {
		self.next(Call::CreateProfile(to_value(document))).await
	}

	async fn update_profile(
		&self,
		profile_id: &str,
		document: &ProfileDocument,
	) -> Result<UpstreamResponse, RelayError> {
		self.next(Call::UpdateProfile(profile_id.to_string(), to_value(document)))
			.await
	}
}

/// Enforces email uniqueness the way the real store does.
#[derive(Default)]
pub struct UniqueEmailUpstream {
	profiles: Mutex<HashMap<String, String>>,
	next_id: AtomicUsize,
	pub updates: AtomicUsize,
}

#[async_trait]
impl UpstreamApi for UniqueEmailUpstream {
	async fn create_event(&self, _document: &EventDocument) -> Result<UpstreamResponse, RelayError> {
		Ok(UpstreamResponse::new(202, ""))
	}

	async fn create_profile(
		&self,
		document: &ProfileDocument,
	) -> Result<UpstreamResponse, RelayError> {
		let email = document.data.attributes.email.clone();
		let mut profiles = self.profiles.lock().await;
		if let Some(existing) = profiles.get(&email) {
			return Ok(conflict(existing));
		}
		let id = format!("P{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
		profiles.insert(email, id.clone());
		Ok(UpstreamResponse::new(
			201,
			json!({"data": {"type": "profile", "id": id}}).to_string(),
		))
	}

	async fn update_profile(
		&self,
		profile_id: &str,
		_document: &ProfileDocument,
	) -> Result<UpstreamResponse, RelayError> {
		self.updates.fetch_add(1, Ordering::SeqCst);
		Ok(UpstreamResponse::new(
			200,
			json!({"data": {"type": "profile", "id": profile_id}}).to_string(),
		))
	}
}

pub fn conflict(profile_id: &str) -> UpstreamResponse {
	UpstreamResponse::new(
		409,
		json!({
			"errors": [{
				"status": 409,
				"code": "duplicate_profile",
				"title": "Conflict.",
				"meta": {"duplicate_profile_id": profile_id}
			}]
		})
		.to_string(),
	)
}

fn to_value<T: serde::Serialize>(document: &T) -> Value {
	serde_json::to_value(document).unwrap_or(Value::Null)
}
