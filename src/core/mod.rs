//! Core components of the crate.
//!
//! This module contains the foundational building blocks:
//! - The main [`YfClient`] and its builder.
//! - The primary [`YfError`] type.
//! - The [`HttpTransport`] capability and its `reqwest` implementation.
//! - The time-boxed [`SessionCache`] holding the cookie/crumb pair.

/// The main client (`YfClient`), builder, and configuration.
pub mod client;
/// The primary error type (`YfError`) for the crate.
pub mod error;
/// Session cache and clock abstraction.
pub mod session;
/// HTTP transport capability.
pub mod transport;

pub(crate) mod net;

// convenient re-exports so most code can just `use crate::core::YfClient`
pub use client::{AuthFallback, CacheMode, CookieStrategy, YfClient, YfClientBuilder};
pub use error::{AcquisitionFailure, ErrorPayload, YfError};
pub use session::{Clock, ManualClock, SESSION_TTL, Session, SessionCache, SystemClock};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
