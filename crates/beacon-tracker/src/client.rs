// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracker client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use beacon_identity::{
	AnonymousId, AnonymousIdentityProvider, FileIdentityStore, IdentityConfig, IdentityStore,
	MemoryIdentityStore, DEFAULT_EXPIRE_DAYS, DEFAULT_IDENTITY_NAME,
};
use beacon_relay_core::{Properties, ValidationError};
use beacon_server_api::{
	ErrorResponse, IdentifyUserRequest, IdentifyUserResponse, TrackEventRequest,
	TrackEventResponse, IDENTIFY_PATH, TRACK_PATH,
};

use crate::error::{Result, TrackerError};
use crate::page::{PageView, PAGE_VIEW_EVENT};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TrackerClientBuilder {
	base_url: Option<String>,
	track_path: String,
	identify_path: String,
	identity_store: Option<Arc<dyn IdentityStore>>,
	identity: IdentityConfig,
	timeout: Duration,
}

impl TrackerClientBuilder {
	pub fn new() -> Self {
		Self {
			base_url: None,
			track_path: TRACK_PATH.to_string(),
			identify_path: IDENTIFY_PATH.to_string(),
			identity_store: None,
			identity: IdentityConfig {
				name: DEFAULT_IDENTITY_NAME.to_string(),
				expire_days: DEFAULT_EXPIRE_DAYS,
			},
			timeout: DEFAULT_TIMEOUT,
		}
	}

	/// Beacon server root, e.g. `https://beacon.example.com`.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());
		self
	}

	pub fn track_path(mut self, path: impl Into<String>) -> Self {
		self.track_path = path.into();
		self
	}

	pub fn identify_path(mut self, path: impl Into<String>) -> Self {
		self.identify_path = path.into();
		self
	}

	/// Where the anonymous id is persisted. Defaults to a JSON file in the
	/// user's data directory.
	pub fn identity_store(mut self, store: Arc<dyn IdentityStore>) -> Self {
		self.identity_store = Some(store);
		self
	}

	pub fn identity_name(mut self, name: impl Into<String>) -> Self {
		self.identity.name = name.into();
		self
	}

	/// Identity lifetime; values beyond `MAX_EXPIRE_DAYS` are clamped.
	pub fn expire_days(mut self, days: i64) -> Self {
		self.identity.expire_days = days;
		self
	}

	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn build(self) -> Result<TrackerClient> {
		let base_url = self
			.base_url
			.ok_or_else(|| TrackerError::InvalidBaseUrl(String::new()))?;
		let base_url = base_url.trim().trim_end_matches('/').to_string();
		if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
			return Err(TrackerError::InvalidBaseUrl(base_url));
		}

		let store = match self.identity_store {
			Some(store) => store,
			None => match FileIdentityStore::default_location() {
				Ok(store) => Arc::new(store) as Arc<dyn IdentityStore>,
				Err(e) => {
					warn!(error = %e, "no identity file location, keeping anonymous id in memory");
					Arc::new(MemoryIdentityStore::new())
				}
			},
		};

		let http_client = beacon_common_http::builder()
			.timeout(self.timeout)
			.build()
			.map_err(TrackerError::RequestFailed)?;

		let client = TrackerClient {
			track_url: join(&base_url, &self.track_path),
			identify_url: join(&base_url, &self.identify_path),
			identity: Arc::new(AnonymousIdentityProvider::new(store, self.identity)),
			http_client,
		};

		info!(base_url = %base_url, "Tracker client initialized");
		Ok(client)
	}
}

impl Default for TrackerClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn join(base_url: &str, path: &str) -> String {
	format!("{}/{}", base_url, path.trim_start_matches('/'))
}

/// Sends events and identify calls for one visitor.
///
/// Cheap to clone; clones share the visitor identity.
#[derive(Clone)]
pub struct TrackerClient {
	track_url: String,
	identify_url: String,
	identity: Arc<AnonymousIdentityProvider>,
	http_client: Client,
}

impl TrackerClient {
	pub fn builder() -> TrackerClientBuilder {
		TrackerClientBuilder::new()
	}

	/// Send `event` for the current visitor.
	pub async fn track(
		&self,
		event: impl Into<String>,
		properties: Properties,
	) -> Result<TrackEventResponse> {
		let event = event.into();
		if event.trim().is_empty() {
			return Err(ValidationError::MissingField("event").into());
		}

		let request = TrackEventRequest {
			event: Some(event),
			properties: Some(properties.into_map()),
			anonymous_id: Some(self.anonymous_id().await.into_string()),
		};
		let response: TrackEventResponse = self.post(&self.track_url, &request).await?;
		debug!(event_id = %response.event_id, "event tracked");
		Ok(response)
	}

	/// Attach `email` and `properties` to the current visitor.
	pub async fn identify(
		&self,
		email: impl Into<String>,
		properties: Properties,
	) -> Result<IdentifyUserResponse> {
		let email = email.into();
		if email.trim().is_empty() {
			return Err(ValidationError::MissingField("email").into());
		}

		let request = IdentifyUserRequest {
			email: Some(email),
			anonymous_id: Some(self.anonymous_id().await.into_string()),
			properties: Some(properties.into_map()),
		};
		let response: IdentifyUserResponse = self.post(&self.identify_url, &request).await?;
		debug!(profile_id = ?response.profile_id, updated = response.updated, "visitor identified");
		Ok(response)
	}

	pub async fn track_page_view(&self, page: PageView) -> Result<TrackEventResponse> {
		self.track(PAGE_VIEW_EVENT, page.into_properties()).await
	}

	pub async fn anonymous_id(&self) -> AnonymousId {
		self.identity.get_or_create().await
	}

	/// Discard the current anonymous id and start a new one.
	pub async fn reset_anonymous_id(&self) -> AnonymousId {
		self.identity.reset().await
	}

	async fn post<B, R>(&self, url: &str, body: &B) -> Result<R>
	where
		B: Serialize + ?Sized,
		R: DeserializeOwned,
	{
		let response = self.http_client.post(url).json(body).send().await?;

		let status = response.status();
		if !status.is_success() {
			let status = status.as_u16();
			let text = response.text().await.unwrap_or_default();
			let message = serde_json::from_str::<ErrorResponse>(&text)
				.map(|e| e.message)
				.unwrap_or(text);
			error!(status, message = %message, url = %url, "beacon server rejected request");
			return Err(TrackerError::Server { status, message });
		}

		Ok(response.json().await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use beacon_identity::StoredIdentity;
	use serde_json::json;
	use wiremock::matchers::{body_partial_json, header_exists, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn tracker(server: &MockServer, store: Arc<MemoryIdentityStore>) -> TrackerClient {
		TrackerClient::builder()
			.base_url(format!("{}/", server.uri()))
			.identity_store(store)
			.build()
			.unwrap()
	}

	#[test]
	fn rejects_missing_or_non_http_base_url() {
		assert!(matches!(
			TrackerClient::builder().build(),
			Err(TrackerError::InvalidBaseUrl(_))
		));
		assert!(matches!(
			TrackerClient::builder().base_url("ftp://example.com").build(),
			Err(TrackerError::InvalidBaseUrl(_))
		));
	}

	#[test]
	fn joins_paths_without_doubled_slashes() {
		assert_eq!(join("https://b.example.com", "/track"), "https://b.example.com/track");
		assert_eq!(join("https://b.example.com", "collect"), "https://b.example.com/collect");
	}

	#[tokio::test]
	async fn oversized_expiry_still_tracks() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/track"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"success": true,
				"message": "Event tracked successfully",
				"eventId": "evt-far"
			})))
			.expect(1)
			.mount(&server)
			.await;

		let client = TrackerClient::builder()
			.base_url(server.uri())
			.identity_store(Arc::new(MemoryIdentityStore::new()))
			.expire_days(i64::MAX)
			.build()
			.unwrap();

		let response = client.track("Signed Up", Properties::new()).await.unwrap();
		assert_eq!(response.event_id, "evt-far");
	}

	#[tokio::test]
	async fn track_sends_event_with_persisted_anonymous_id() {
		let server = MockServer::start().await;
		let store = Arc::new(MemoryIdentityStore::new());
		store
			.save(&StoredIdentity::new(
				DEFAULT_IDENTITY_NAME,
				AnonymousId::from("anon-known".to_string()),
				DEFAULT_EXPIRE_DAYS,
			))
			.await
			.unwrap();

		Mock::given(method("POST"))
			.and(path("/track"))
			.and(header_exists("user-agent"))
			.and(body_partial_json(json!({
				"event": "Added to Cart",
				"anonymousId": "anon-known",
				"properties": {"sku": "A-1"}
			})))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"success": true,
				"message": "Event tracked successfully",
				"eventId": "evt-1"
			})))
			.expect(1)
			.mount(&server)
			.await;

		let client = tracker(&server, store);
		let response = client
			.track("Added to Cart", Properties::new().insert("sku", "A-1"))
			.await
			.unwrap();
		assert_eq!(response.event_id, "evt-1");
	}

	#[tokio::test]
	async fn empty_event_name_is_rejected_locally() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200))
			.expect(0)
			.mount(&server)
			.await;

		let client = tracker(&server, Arc::new(MemoryIdentityStore::new()));
		let err = client.track("  ", Properties::new()).await.unwrap_err();
		assert!(matches!(
			err,
			TrackerError::Validation(ValidationError::MissingField("event"))
		));

		let err = client.identify("", Properties::new()).await.unwrap_err();
		assert!(matches!(
			err,
			TrackerError::Validation(ValidationError::MissingField("email"))
		));
	}

	#[tokio::test]
	async fn identify_and_track_share_the_same_visitor() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/identify"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"success": true,
				"message": "User identified successfully",
				"profileId": "P1",
				"updated": true
			})))
			.mount(&server)
			.await;

		let client = tracker(&server, Arc::new(MemoryIdentityStore::new()));
		let response = client
			.identify("jane@example.com", Properties::new().insert("firstName", "Jane"))
			.await
			.unwrap();
		assert_eq!(response.profile_id.as_deref(), Some("P1"));
		assert!(response.updated);

		let requests = server.received_requests().await.unwrap();
		let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
		assert_eq!(body["email"], "jane@example.com");
		assert_eq!(body["anonymousId"], client.anonymous_id().await.as_str());
		assert_eq!(body["properties"]["firstName"], "Jane");
	}

	#[tokio::test]
	async fn page_view_is_a_viewed_page_event() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/collect"))
			.and(body_partial_json(json!({
				"event": "Viewed Page",
				"properties": {"url": "https://shop.example.com/", "path": "/", "title": "Home"}
			})))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"success": true,
				"message": "Event tracked successfully",
				"eventId": "evt-2"
			})))
			.expect(1)
			.mount(&server)
			.await;

		let client = TrackerClient::builder()
			.base_url(server.uri())
			.track_path("/collect")
			.identity_store(Arc::new(MemoryIdentityStore::new()))
			.build()
			.unwrap();
		client
			.track_page_view(PageView::new("https://shop.example.com/", "/").with_title("Home"))
			.await
			.unwrap();
	}

	#[tokio::test]
	async fn server_error_surfaces_boundary_message() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/identify"))
			.respond_with(ResponseTemplate::new(400).set_body_json(json!({
				"error": "validation_error",
				"message": "Invalid email format"
			})))
			.mount(&server)
			.await;
		Mock::given(method("POST"))
			.and(path("/track"))
			.respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
			.mount(&server)
			.await;

		let client = tracker(&server, Arc::new(MemoryIdentityStore::new()));

		let err = client.identify("nope", Properties::new()).await.unwrap_err();
		match err {
			TrackerError::Server { status, message } => {
				assert_eq!(status, 400);
				assert_eq!(message, "Invalid email format");
			}
			other => panic!("unexpected error: {other:?}"),
		}

		let err = client.track("Viewed Page", Properties::new()).await.unwrap_err();
		assert!(matches!(
			err,
			TrackerError::Server { status: 503, ref message } if message == "unavailable"
		));
	}

	#[tokio::test]
	async fn reset_replaces_anonymous_id() {
		let server = MockServer::start().await;
		let client = tracker(&server, Arc::new(MemoryIdentityStore::new()));

		let before = client.anonymous_id().await;
		let after = client.reset_anonymous_id().await;
		assert_ne!(before, after);
		assert_eq!(client.anonymous_id().await, after);
	}
}
