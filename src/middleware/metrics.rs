//! In-process token fetch counters.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::obs::FetchPhase;

/// Thread-safe counters for token fetches, split by phase.
#[derive(Debug, Default)]
pub struct FetchMetrics {
	initial: PhaseCounters,
	refresh: PhaseCounters,
}
impl FetchMetrics {
	/// Returns the number of fetch attempts in `phase`.
	pub fn attempts(&self, phase: FetchPhase) -> u64 {
		self.counters(phase).attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of fetches in `phase` that produced a token.
	pub fn successes(&self, phase: FetchPhase) -> u64 {
		self.counters(phase).success.load(Ordering::Relaxed)
	}

	/// Returns the number of failed fetches in `phase`.
	pub fn failures(&self, phase: FetchPhase) -> u64 {
		self.counters(phase).failure.load(Ordering::Relaxed)
	}

	/// Returns fetch attempts across both phases.
	pub fn total_attempts(&self) -> u64 {
		self.attempts(FetchPhase::Initial) + self.attempts(FetchPhase::Refresh)
	}

	pub(crate) fn record_attempt(&self, phase: FetchPhase) {
		self.counters(phase).attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self, phase: FetchPhase) {
		self.counters(phase).success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self, phase: FetchPhase) {
		self.counters(phase).failure.fetch_add(1, Ordering::Relaxed);
	}

	fn counters(&self, phase: FetchPhase) -> &PhaseCounters {
		match phase {
			FetchPhase::Initial => &self.initial,
			FetchPhase::Refresh => &self.refresh,
		}
	}
}

#[derive(Debug, Default)]
struct PhaseCounters {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn phases_are_counted_separately() {
		let metrics = FetchMetrics::default();

		metrics.record_attempt(FetchPhase::Initial);
		metrics.record_failure(FetchPhase::Initial);
		metrics.record_attempt(FetchPhase::Refresh);
		metrics.record_success(FetchPhase::Refresh);

		assert_eq!(metrics.attempts(FetchPhase::Initial), 1);
		assert_eq!(metrics.failures(FetchPhase::Initial), 1);
		assert_eq!(metrics.successes(FetchPhase::Initial), 0);
		assert_eq!(metrics.successes(FetchPhase::Refresh), 1);
		assert_eq!(metrics.total_attempts(), 2);
	}
}
