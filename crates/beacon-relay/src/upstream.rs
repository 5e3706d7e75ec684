// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The upstream profile/event store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method};
use serde::Serialize;
use tracing::{debug, info};

use beacon_common_config::SecretString;
use beacon_relay_core::RelayError;

use crate::payload::{self, EventDocument, ProfileDocument};

pub const DEFAULT_BASE_URL: &str = "https://a.klaviyo.com/api";
pub const DEFAULT_REVISION: &str = "2024-10-15";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const AUTH_SCHEME: &str = "Klaviyo-API-Key";
const REVISION_HEADER: &str = "revision";

/// Raw upstream answer. Status interpretation is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
	pub status: u16,
	pub body: String,
}

impl UpstreamResponse {
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self {
			status,
			body: body.into(),
		}
	}

	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	pub fn is_conflict(&self) -> bool {
		self.status == 409
	}

	/// `data.id` from the body, if the body carries one.
	pub fn data_id(&self) -> Option<String> {
		payload::response_data_id(&self.body)
	}

	pub fn into_error(self) -> RelayError {
		RelayError::Upstream {
			status: self.status,
			body: self.body,
		}
	}
}

/// Outbound calls to the upstream store.
///
/// Implementations make exactly one request per call and never retry. An
/// `Err` means no response was obtained ([`RelayError::Transport`]); any
/// HTTP status, including errors, comes back as `Ok`.
#[async_trait]
pub trait UpstreamApi: Send + Sync {
	async fn create_event(&self, document: &EventDocument) -> Result<UpstreamResponse, RelayError>;

	async fn create_profile(
		&self,
		document: &ProfileDocument,
	) -> Result<UpstreamResponse, RelayError>;

	/// Partial update of an existing profile.
	async fn update_profile(
		&self,
		profile_id: &str,
		document: &ProfileDocument,
	) -> Result<UpstreamResponse, RelayError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamConfigError {
	#[error("upstream API key is missing or blank")]
	MissingApiKey,

	#[error("upstream base URL must start with http:// or https://: {0}")]
	InvalidBaseUrl(String),

	#[error("failed to build HTTP client: {0}")]
	Client(#[from] reqwest::Error),
}

pub struct HttpUpstreamBuilder {
	base_url: String,
	api_key: Option<SecretString>,
	revision: String,
	timeout: Duration,
}

impl HttpUpstreamBuilder {
	pub fn new() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			api_key: None,
			revision: DEFAULT_REVISION.to_string(),
			timeout: DEFAULT_TIMEOUT,
		}
	}

	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = url.into();
		self
	}

	/// Private API key, sent as `Authorization: Klaviyo-API-Key <key>`.
	pub fn api_key(mut self, key: SecretString) -> Self {
		self.api_key = Some(key);
		self
	}

	/// Value of the `revision` header sent on every call.
	pub fn revision(mut self, revision: impl Into<String>) -> Self {
		self.revision = revision.into();
		self
	}

	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn build(self) -> Result<HttpUpstream, UpstreamConfigError> {
		let api_key = self
			.api_key
			.filter(|k| !k.is_blank())
			.ok_or(UpstreamConfigError::MissingApiKey)?;

		if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
			return Err(UpstreamConfigError::InvalidBaseUrl(self.base_url));
		}
		let base_url = self.base_url.trim_end_matches('/').to_string();

		let client = beacon_common_http::new_client_with_timeout(self.timeout)?;

		info!(base_url = %base_url, revision = %self.revision, "upstream client initialized");

		Ok(HttpUpstream {
			client,
			base_url,
			api_key,
			revision: self.revision,
		})
	}
}

impl Default for HttpUpstreamBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// [`UpstreamApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
	client: Client,
	base_url: String,
	api_key: SecretString,
	revision: String,
}

impl HttpUpstream {
	pub fn builder() -> HttpUpstreamBuilder {
		HttpUpstreamBuilder::new()
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	async fn send<T>(&self, method: Method, path: &str, body: &T) -> Result<UpstreamResponse, RelayError>
	where
		T: Serialize + Sync,
	{
		let url = format!("{}{}", self.base_url, path);
		debug!(%method, url = %url, "calling upstream");

		let response = self
			.client
			.request(method, &url)
			.header(AUTHORIZATION, format!("{AUTH_SCHEME} {}", self.api_key.expose()))
			.header(REVISION_HEADER, &self.revision)
			.header(ACCEPT, "application/json")
			.json(body)
			.send()
			.await
			.map_err(RelayError::transport)?;

		let status = response.status().as_u16();
		let body = response.text().await.map_err(RelayError::transport)?;
		debug!(status, "upstream responded");
		Ok(UpstreamResponse { status, body })
	}
}

#[async_trait]
impl UpstreamApi for HttpUpstream {
	async fn create_event(&self, document: &EventDocument) -> Result<UpstreamResponse, RelayError> {
		self.send(Method::POST, "/events/", document).await
	}

	async fn create_profile(
		&self,
		document: &ProfileDocument,
	) -> Result<UpstreamResponse, RelayError> {
		self.send(Method::POST, "/profiles/", document).await
	}

	async fn update_profile(
		&self,
		profile_id: &str,
		document: &ProfileDocument,
	) -> Result<UpstreamResponse, RelayError> {
		self.send(Method::PATCH, &format!("/profiles/{profile_id}/"), document)
			.await
	}
}
