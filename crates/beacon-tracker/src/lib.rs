// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracker SDK for beacon.
//!
//! Sends events and identify calls to a beacon server on behalf of one
//! visitor, stamping each with the visitor's durable anonymous id.
//!
//! ```ignore
//! use beacon_relay_core::Properties;
//! use beacon_tracker::{PageView, TrackerClient};
//!
//! let tracker = TrackerClient::builder()
//!     .base_url("https://beacon.example.com")
//!     .build()?;
//!
//! tracker.track("Added to Cart", Properties::new().insert("sku", "A-1")).await?;
//! tracker.identify("jane@example.com", Properties::new()).await?;
//! tracker.track_page_view(PageView::new("https://shop.example.com/", "/")).await?;
//! ```

mod client;
mod error;
mod page;

pub use client::{TrackerClient, TrackerClientBuilder};
pub use error::{Result, TrackerError};
pub use page::{PageView, PAGE_VIEW_EVENT};
