// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared fixtures for route tests: a scripted upstream and request helpers.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::ServiceExt;

use beacon_relay::payload::{EventDocument, ProfileDocument};
use beacon_relay::{UpstreamApi, UpstreamResponse};
use beacon_relay_core::RelayError;
use beacon_server::{create_router, AppState};

#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamCall {
	CreateEvent(Value),
	CreateProfile(Value),
	UpdateProfile(String, Value),
}

/// Scripted upstream. `None` entries, and an exhausted script, fail as
/// transport errors.
#[derive(Default)]
pub struct ScriptedUpstream {
	script: Mutex<VecDeque<Option<UpstreamResponse>>>,
	calls: Mutex<Vec<UpstreamCall>>,
}

impl ScriptedUpstream {
	pub fn new(script: impl IntoIterator<Item = Option<UpstreamResponse>>) -> Arc<Self> {
		Arc::new(Self {
			script: Mutex::new(script.into_iter().collect()),
			calls: Mutex::new(Vec::new()),
		})
	}

	pub fn responding(responses: impl IntoIterator<Item = UpstreamResponse>) -> Arc<Self> {
		Self::new(responses.into_iter().map(Some))
	}

	pub async fn calls(&self) -> Vec<UpstreamCall> {
		self.calls.lock().await.clone()
	}

	async fn next(&self, call: UpstreamCall) -> Result<UpstreamResponse, RelayError> {
		self.calls.lock().await.push(call);
		self.script.lock().await.pop_front().flatten().ok_or_else(|| {
			RelayError::transport(std::io::Error::new(
				std::io::ErrorKind::ConnectionRefused,
				"connection refused",
			))
		})
	}
}

#[async_trait]
impl UpstreamApi for ScriptedUpstream {
	async fn create_event(&self, document: &EventDocument) -> Result<UpstreamResponse, RelayError> {
		let value = serde_json::to_value(document).unwrap();
		self.next(UpstreamCall::CreateEvent(value)).await
	}

	async fn create_profile(
		&self,
		document: &ProfileDocument,
	) -> Result<UpstreamResponse, RelayError> {
		let value = serde_json::to_value(document).unwrap();
		self.next(UpstreamCall::CreateProfile(value)).await
	}

	async fn update_profile(
		&self,
		profile_id: &str,
		document: &ProfileDocument,
	) -> Result<UpstreamResponse, RelayError> {
		let value = serde_json::to_value(document).unwrap();
		self.next(UpstreamCall::UpdateProfile(profile_id.to_string(), value))
			.await
	}
}

pub fn conflict(profile_id: &str) -> UpstreamResponse {
	UpstreamResponse::new(
		409,
		json!({
			"errors": [{
				"status": 409,
				"code": "duplicate_profile",
				"meta": {"duplicate_profile_id": profile_id}
			}]
		})
		.to_string(),
	)
}

pub fn app(upstream: Arc<ScriptedUpstream>, public_dir: &Path) -> Router {
	create_router(AppState::new(upstream), public_dir)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
	Request::builder()
		.method(Method::POST)
		.uri(uri)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body.to_string()))
		.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
	Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
	let response = app.oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	(status, bytes.to_vec())
}

pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
	let (status, bytes) = send(app, request).await;
	(status, serde_json::from_slice(&bytes).unwrap())
}
