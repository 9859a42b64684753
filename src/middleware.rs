//! Client-credentials middleware: per-host token caching plus a one-shot refresh on 401.
//!
//! [`ClientCredentials`] acts on any request carrying a [`ClientCredentialsConfig`] extension:
//!
//! - On its first pass over a logical request it validates the config and stores a fresh
//!   [`AuthSession`] next to it.
//! - Before sending, it gates on the audience, reads the cache, fetches on a miss, and
//!   attaches `Authorization`. A failed fetch here is absorbed and the request goes out
//!   without credentials.
//! - The first 401 turns into a forced refresh plus one re-send with the new token. A second
//!   401 is final. A failed refresh fetch replaces the 401 as the request's outcome.
//!
//! Token requests are sent through the middleware registered after this one, never through
//! this one. Retry policies for both the protected and the token requests are therefore
//! registered after it, e.g. a `reqwest-retry` `RetryTransientMiddleware`.

pub mod config;
pub mod ext;
pub mod metrics;
pub mod session;

mod fetch;

pub use config::*;
pub use ext::*;
pub use metrics::*;
pub use session::{AuthSession, RefreshState};

// crates.io
use reqwest_middleware::{ClientBuilder, Extension, Middleware, Next};
// self
use crate::{
	_prelude::*,
	auth::{CachedToken, audience},
	cache::{CacheKey, TokenCache},
	error::ConfigError,
	middleware::fetch::TokenFetcher,
	obs::{self, FetchPhase},
};

/// OAuth 2.0 client-credentials middleware.
///
/// Cloning is cheap; clones share the cache and metrics.
#[derive(Clone)]
pub struct ClientCredentials {
	fetcher: TokenFetcher,
}
impl ClientCredentials {
	/// Creates the middleware over `cache`.
	pub fn new(cache: impl TokenCache + 'static) -> Self {
		Self::with_cache(Arc::new(cache))
	}

	/// Creates the middleware over a cache that is already shared elsewhere.
	pub fn with_cache(cache: Arc<dyn TokenCache>) -> Self {
		Self { fetcher: TokenFetcher { cache, metrics: Arc::default() } }
	}

	/// Starts a middleware stack over `client` with this middleware outermost and `config`
	/// attached to every request.
	///
	/// Middleware added to the returned builder runs after this one, for protected and
	/// token requests alike.
	pub fn client_builder(
		&self,
		client: ReqwestClient,
		config: ClientCredentialsConfig,
	) -> ClientBuilder {
		ClientBuilder::new(client).with(self.clone()).with_init(Extension(config))
	}

	/// Shared token cache.
	pub fn cache(&self) -> &Arc<dyn TokenCache> {
		&self.fetcher.cache
	}

	/// Fetch counters accumulated by this middleware and its clones.
	pub fn metrics(&self) -> &Arc<FetchMetrics> {
		&self.fetcher.metrics
	}

	/// Drops the token cached for the host of `url`, forcing the next request to fetch.
	pub async fn bust_cache(&self, url: &Url) -> Result<()> {
		let key = host_key(url)?;

		self.fetcher.cache.erase(&key).await?;

		Ok(())
	}

	/// Stores `token` for the host of `url`, replacing any cached entry.
	pub async fn seed(&self, url: &Url, token: CachedToken) -> Result<()> {
		let key = host_key(url)?;

		self.fetcher.cache.put(key, token).await?;

		Ok(())
	}

	/// Returns the token cached for the host of `url`, if any.
	pub async fn cached(&self, url: &Url) -> Result<Option<CachedToken>> {
		let key = host_key(url)?;

		Ok(self.fetcher.cache.get(&key).await?)
	}

	/// Attaches a token to `request` when the session's config covers its URL.
	///
	/// Returns the cache key when the middleware engaged.
	async fn authorize(
		&self,
		request: &mut Request,
		session: &mut AuthSession,
		next: &Next<'_>,
	) -> Result<Option<CacheKey>> {
		let config = session.config().clone();

		if !audience::matches(config.params.audience.as_deref(), request.url())? {
			return Ok(None);
		}

		let Some(key) = CacheKey::for_url(request.url()) else {
			return Ok(None);
		};

		session.engage(key.clone());

		let token = match session.refreshed_token() {
			Some(token) => Some(token.clone()),
			None => self.cached_or_fetched(next, &config, &key, request.url()).await,
		};

		if let Some(token) = token {
			request.headers_mut().insert(header::AUTHORIZATION, token.header_value());
		}

		Ok(Some(key))
	}

	async fn cached_or_fetched(
		&self,
		next: &Next<'_>,
		config: &ClientCredentialsConfig,
		key: &CacheKey,
		url: &Url,
	) -> Option<CachedToken> {
		let cached = match self.fetcher.cache.get(key).await {
			Ok(cached) => cached,
			Err(e) => {
				obs::cache_failure("get", &Error::from(e));

				None
			},
		};

		if cached.is_some() {
			return cached;
		}

		match self.fetcher.fetch(next, config, key, FetchPhase::Initial).await {
			Ok(token) => Some(token),
			Err(e) => {
				obs::soft_fetch_failure(url, &e);

				None
			},
		}
	}

	/// Sends `request`, refreshing once and re-sending when the resource answers 401.
	///
	/// `session` is written back to `extensions` before every call down the stack so that
	/// nested registrations see it as active.
	async fn send(
		&self,
		mut request: Request,
		session: &mut AuthSession,
		extensions: &mut Extensions,
		next: Next<'_>,
	) -> reqwest_middleware::Result<Response> {
		let Some(key) = self.authorize(&mut request, session, &next).await? else {
			extensions.insert(session.clone());

			return next.run(request, extensions).await;
		};
		let url = request.url().clone();
		let replay = request.try_clone();

		extensions.insert(session.clone());

		let response = next.clone().run(request, extensions).await?;

		if response.status() != StatusCode::UNAUTHORIZED {
			return Ok(response);
		}
		if !session.begin_refresh() {
			obs::refresh_exhausted(&url);

			return Ok(response);
		}

		let config = session.config().clone();

		obs::refresh_triggered(&url);

		let token = self.fetcher.fetch(&next, &config, &key, FetchPhase::Refresh).await?;

		session.complete_refresh(token.clone());

		let Some(mut replay) = replay else {
			obs::refresh_unreplayable(&url);

			return Ok(response);
		};

		if !session.should_retry(response.status()) {
			return Ok(response);
		}

		replay.headers_mut().insert(header::AUTHORIZATION, token.header_value());
		extensions.insert(session.clone());

		let retried = next.run(replay, extensions).await?;

		if retried.status() == StatusCode::UNAUTHORIZED && !session.begin_refresh() {
			obs::refresh_exhausted(&url);
		}

		Ok(retried)
	}
}
#[async_trait::async_trait]
impl Middleware for ClientCredentials {
	async fn handle(
		&self,
		request: Request,
		extensions: &mut Extensions,
		next: Next<'_>,
	) -> reqwest_middleware::Result<Response> {
		let Some(config) = extensions.get::<ClientCredentialsConfig>().cloned() else {
			return next.run(request, extensions).await;
		};
		let mut session = match extensions.get::<AuthSession>().cloned() {
			// Another registration of this middleware is already handling the request.
			Some(session) if session.is_active() => return next.run(request, extensions).await,
			Some(session) => session,
			None => {
				config.validate()?;

				AuthSession::new(config)
			},
		};

		session.enter();

		let result = self.send(request, &mut session, extensions, next).await;

		session.leave();
		extensions.insert(session);

		result
	}
}
impl Debug for ClientCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentials").field("metrics", &self.fetcher.metrics).finish()
	}
}

fn host_key(url: &Url) -> Result<CacheKey> {
	CacheKey::for_url(url).ok_or_else(|| ConfigError::MissingHost { url: url.to_string() }.into())
}
