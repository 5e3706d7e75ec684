// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client metadata captured from the inbound request.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use beacon_relay_core::EventContext;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
	pub ip_address: Option<String>,
	pub user_agent: Option<String>,
}

impl ClientInfo {
	/// Headers take priority over the socket peer, which is a proxy when
	/// deployed behind one.
	pub fn from_parts(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
		let ip_address = extract_client_ip(headers).or_else(|| peer.map(|addr| addr.ip().to_string()));
		let user_agent = headers
			.get(USER_AGENT)
			.and_then(|v| v.to_str().ok())
			.filter(|s| !s.is_empty())
			.map(str::to_string);

		Self {
			ip_address,
			user_agent,
		}
	}

	pub fn into_event_context(self) -> EventContext {
		EventContext {
			user_agent: self.user_agent,
			client_ip: self.ip_address,
		}
	}
}

impl<S> FromRequestParts<S> for ClientInfo
where
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let peer = parts
			.extensions
			.get::<ConnectInfo<SocketAddr>>()
			.map(|ConnectInfo(addr)| *addr);
		Ok(Self::from_parts(&parts.headers, peer))
	}
}

/// `X-Forwarded-For` (first hop), then `X-Real-IP`.
fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
	let forwarded = headers
		.get("x-forwarded-for")
		.and_then(|v| v.to_str().ok())
		.and_then(|v| v.split(',').next())
		.map(str::trim)
		.filter(|ip| !ip.is_empty());
	if let Some(ip) = forwarded {
		return Some(ip.to_string());
	}

	headers
		.get("x-real-ip")
		.and_then(|v| v.to_str().ok())
		.map(str::trim)
		.filter(|ip| !ip.is_empty())
		.map(str::to_string)
}
