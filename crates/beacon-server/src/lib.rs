// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP transport for beacon.
//!
//! Exposes `POST /track` and `POST /identify` in front of the
//! [`EventRelay`](beacon_relay::EventRelay) and
//! [`IdentifyReconciler`](beacon_relay::IdentifyReconciler), plus health and
//! service-info endpoints and a static file fallback.

pub mod api;
pub mod client_info;
pub mod error;
pub mod routes;

pub use api::{cors_layer, create_router, AppState};
pub use error::ServerError;
