//! Optional observability helpers for token fetches and refreshes.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_cc.fetch` with the `phase` and
//!   `stage` fields, plus `debug`/`warn` events for refreshes and soft failures.
//! - Enable `metrics` to increment the `oauth2_cc_token_fetch_total` counter for every
//!   attempt/success/failure, labeled by `phase` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Point in the middleware lifecycle that triggered a token fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchPhase {
	/// Cache miss before the protected request is sent.
	Initial,
	/// Forced fetch after the protected resource answered 401.
	Refresh,
}
impl FetchPhase {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FetchPhase::Initial => "initial",
			FetchPhase::Refresh => "refresh",
		}
	}
}
impl Display for FetchPhase {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchOutcome {
	/// Entry to the fetcher.
	Attempt,
	/// Credential obtained and cached.
	Success,
	/// Fetch failed.
	Failure,
}
impl FetchOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FetchOutcome::Attempt => "attempt",
			FetchOutcome::Success => "success",
			FetchOutcome::Failure => "failure",
		}
	}
}
impl Display for FetchOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
