//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Idempotent read to backend:
//!     → retries.rs (run attempt, classify failure)
//!     → backoff.rs (delay before the next attempt)
//!     → last error returned unchanged when attempts run out
//! ```
//!
//! # Design Decisions
//! - Per-request timeouts live in the transport, so a timeout is simply a
//!   network-class failure here
//! - Mutations (POST/PUT/PATCH/DELETE) are never retried

pub mod backoff;
pub mod retries;

pub use retries::RetryPolicy;
