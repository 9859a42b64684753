//! Token-endpoint requests issued through the rest of the middleware stack.

// crates.io
use reqwest_middleware::Next;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{CachedToken, token},
	cache::{CacheKey, TokenCache},
	error::{TokenEndpointError, TransportError},
	middleware::{ClientCredentialsConfig, FetchMetrics},
	obs::{self, FetchOutcome, FetchPhase, FetchSpan},
};

/// Performs `client_credentials` grants and writes successful results to the cache.
#[derive(Clone)]
pub(crate) struct TokenFetcher {
	pub(crate) cache: Arc<dyn TokenCache>,
	pub(crate) metrics: Arc<FetchMetrics>,
}
impl TokenFetcher {
	/// Requests a fresh token for `key`, bypassing any cached entry.
	///
	/// The token request enters the stack at `next`, below the auth step, with empty
	/// extensions: it carries none of the protected request's headers, body, or
	/// extensions, and only the middleware registered after this one (retry policies
	/// included) applies to it.
	pub(crate) async fn fetch(
		&self,
		next: &Next<'_>,
		config: &ClientCredentialsConfig,
		key: &CacheKey,
		phase: FetchPhase,
	) -> Result<CachedToken> {
		let span = FetchSpan::new(phase, "fetch_token");

		obs::record_fetch_outcome(phase, FetchOutcome::Attempt);
		self.metrics.record_attempt(phase);

		let result = span
			.instrument(async move {
				let response = next
					.clone()
					.run(token_request(config), &mut Extensions::new())
					.await
					.map_err(TransportError::from)?;
				let status = response.status();
				let body = response.bytes().await.map_err(TransportError::from)?;

				if status != StatusCode::OK {
					return Err(TokenEndpointError::unexpected_status(status, &body).into());
				}

				let token = token::parse_token_response(&body)?;

				if let Err(e) = self.cache.put(key.clone(), token.clone()).await {
					obs::cache_failure("put", &Error::from(e));
				}

				Ok(token)
			})
			.await;

		match &result {
			Ok(_) => {
				obs::record_fetch_outcome(phase, FetchOutcome::Success);
				self.metrics.record_success(phase);
			},
			Err(_) => {
				obs::record_fetch_outcome(phase, FetchOutcome::Failure);
				self.metrics.record_failure(phase);
			},
		}

		result
	}
}

fn token_request(config: &ClientCredentialsConfig) -> Request {
	let body = form_urlencoded::Serializer::new(String::new())
		.extend_pairs(config.params.form())
		.finish();
	let mut request = Request::new(reqwest::Method::POST, config.token_url.clone());
	let headers = request.headers_mut();

	headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
	headers.insert(
		header::CONTENT_TYPE,
		HeaderValue::from_static("application/x-www-form-urlencoded"),
	);
	*request.body_mut() = Some(body.into());

	request
}
