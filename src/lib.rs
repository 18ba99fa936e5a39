//! Typed client for the transit booking backend.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller
//!     │
//!     ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ services (bookings, payments, routes, trips, auth)           │
//! │   validate ─▶ build request ─▶ pick cache class              │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ client::ApiClient                                            │
//! │   cache ─▶ resilience (retry) ─▶ queue ─▶ HTTP ─▶ envelope   │
//! └───────┬──────────────────────────────────────────┬───────────┘
//!         │ bearer token                        401  │
//!         ▼                                          ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ session (state machine, token store, login redirect)         │
//! └──────────────────────────────────────────────────────────────┘
//!
//!   cross-cutting: config, error, observability
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod queue;
pub mod resilience;
pub mod services;
pub mod session;

pub use client::{ApiClient, ApiClientBuilder, ApiRequest, ApiResponse, BuildError, HealthReport};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, ErrorKind};
pub use session::{AuthPhase, Session};
