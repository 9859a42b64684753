// self
use crate::obs::{FetchOutcome, FetchPhase};

/// Records a fetch outcome via the global metrics recorder (when enabled).
pub fn record_fetch_outcome(phase: FetchPhase, outcome: FetchOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_cc_token_fetch_total",
			"phase" => phase.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (phase, outcome);
	}
}
