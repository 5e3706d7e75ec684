// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for beacon.
//!
//! This crate has no I/O. It defines what a tracked event and an identify
//! request look like, how they are validated, how property bags are merged,
//! and the error taxonomy shared by the relay, the server, and the tracker.

pub mod error;
pub mod event;
pub mod identify;
pub mod outcome;
pub mod properties;
pub mod validation;

pub use error::{ErrorKind, RelayError};
pub use event::{EventContext, TrackEvent, CLIENT_IP_KEY, USER_AGENT_KEY, VALUE_KEY};
pub use identify::{IdentifyRequest, ProfileAttributes};
pub use outcome::{EventReceipt, ReconcileOutcome};
pub use properties::{MergeSource, Properties, PropertyMerge};
pub use validation::{is_valid_email, ValidationError};
