//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! ApiClient lifecycle points (request start, response, error, cache hit)
//!     → observer.rs (RequestObserver, injectable)
//!         → logging (tracing events)
//!         → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - Request ids (UUID v4) tie request and response events together
//! - Payloads are logged only in debug builds when enabled
//! - Headers are never handed to observers

pub mod logging;
pub mod metrics;
pub mod observer;

pub use observer::{NoopObserver, RequestLog, RequestObserver, TracingObserver};
