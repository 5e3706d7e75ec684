// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use beacon_relay_core::Properties;

pub const PAGE_VIEW_EVENT: &str = "Viewed Page";

/// A page view, sent as the [`PAGE_VIEW_EVENT`] event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageView {
	pub url: String,
	pub path: String,
	pub title: Option<String>,
	pub referrer: Option<String>,
}

impl PageView {
	pub fn new(url: impl Into<String>, path: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			path: path.into(),
			..Default::default()
		}
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
		self.referrer = Some(referrer.into());
		self
	}

	/// Missing title and referrer are sent as empty strings.
	pub fn into_properties(self) -> Properties {
		Properties::new()
			.insert("url", self.url)
			.insert("path", self.path)
			.insert("title", self.title.unwrap_or_default())
			.insert("referrer", self.referrer.unwrap_or_default())
	}
}
