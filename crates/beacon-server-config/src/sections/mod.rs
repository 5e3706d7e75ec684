// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for beacon-server.

pub mod cors;
pub mod http;
pub mod logging;
pub mod paths;
pub mod upstream;

pub use cors::{CorsConfig, CorsConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use paths::{PathsConfig, PathsConfigLayer};
pub use upstream::{UpstreamConfig, UpstreamConfigLayer};
