// self
use crate::{_prelude::*, obs::FetchPhase};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFetch<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFetch<F> = F;

/// A span builder used around token fetches.
#[derive(Clone, Debug)]
pub struct FetchSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FetchSpan {
	/// Creates a new span tagged with the provided fetch phase + stage.
	pub fn new(phase: FetchPhase, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("oauth2_cc.fetch", phase = phase.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (phase, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFetch<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

pub(crate) fn soft_fetch_failure(url: &Url, err: &Error) {
	#[cfg(feature = "tracing")]
	tracing::warn!(
		%url,
		error = %err,
		"Token fetch failed; sending the request without credentials."
	);
	#[cfg(not(feature = "tracing"))]
	let _ = (url, err);
}

pub(crate) fn refresh_triggered(url: &Url) {
	#[cfg(feature = "tracing")]
	tracing::debug!(%url, "Protected resource rejected the token; refreshing once.");
	#[cfg(not(feature = "tracing"))]
	let _ = url;
}

pub(crate) fn refresh_exhausted(url: &Url) {
	#[cfg(feature = "tracing")]
	tracing::debug!(%url, "Protected resource rejected the refreshed token.");
	#[cfg(not(feature = "tracing"))]
	let _ = url;
}

pub(crate) fn refresh_unreplayable(url: &Url) {
	#[cfg(feature = "tracing")]
	tracing::warn!(%url, "Token refreshed, but the request body cannot be sent again.");
	#[cfg(not(feature = "tracing"))]
	let _ = url;
}

pub(crate) fn cache_failure(operation: &'static str, err: &Error) {
	#[cfg(feature = "tracing")]
	tracing::warn!(operation, error = %err, "Token cache operation failed.");
	#[cfg(not(feature = "tracing"))]
	let _ = (operation, err);
}
