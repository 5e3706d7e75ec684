// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP client for beacon.
//!
//! Every outbound client (the upstream relay and the tracker SDK) is built
//! from [`builder`] so requests carry the same User-Agent.

mod client;

pub use client::{builder, new_client_with_timeout, user_agent};
