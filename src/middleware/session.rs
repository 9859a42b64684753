//! Per-request refresh state machine and the auth-retry decision built on it.

// self
use crate::{
	_prelude::*, auth::CachedToken, cache::CacheKey, middleware::ClientCredentialsConfig,
};

/// Whether the one permitted refresh has been spent for the current logical request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RefreshState {
	/// No refresh attempted yet.
	#[default]
	NotStarted,
	/// A refresh was attempted; further 401s are final.
	Refreshed,
}

/// State the middleware keeps in a request's [`Extensions`].
///
/// It is created on the middleware's first pass over a logical request and lives as long as
/// the request's extensions do, so retries issued by middleware registered in front of
/// [`ClientCredentials`](crate::middleware::ClientCredentials) see the refresh already spent.
#[derive(Clone, Debug)]
pub struct AuthSession {
	config: ClientCredentialsConfig,
	refresh: RefreshState,
	retry_requested: bool,
	target: Option<CacheKey>,
	refreshed: Option<CachedToken>,
	active: bool,
}
impl AuthSession {
	pub(crate) fn new(config: ClientCredentialsConfig) -> Self {
		Self {
			config,
			refresh: RefreshState::NotStarted,
			retry_requested: false,
			target: None,
			refreshed: None,
			active: false,
		}
	}

	/// Configuration captured on the middleware's first pass.
	pub fn config(&self) -> &ClientCredentialsConfig {
		&self.config
	}

	/// Current refresh state.
	pub fn refresh_state(&self) -> RefreshState {
		self.refresh
	}

	/// Whether the last 401 asked for the request to be re-sent.
	pub fn retry_requested(&self) -> bool {
		self.retry_requested
	}

	/// Cache key of the protected resource, once the middleware has engaged.
	pub fn target(&self) -> Option<&CacheKey> {
		self.target.as_ref()
	}

	/// Whether the middleware acted on this request (config present and audience matched).
	pub fn is_engaged(&self) -> bool {
		self.target.is_some()
	}

	/// Token obtained by the refresh, which later attempts send regardless of the cache.
	pub fn refreshed_token(&self) -> Option<&CachedToken> {
		self.refreshed.as_ref()
	}

	/// Decides whether `status` earns the single auth retry.
	///
	/// Only a 401 on an engaged request, after a refresh that asked for a retry, qualifies.
	/// Every other outcome belongs to whatever retry policy the caller installed.
	pub fn should_retry(&self, status: StatusCode) -> bool {
		status == StatusCode::UNAUTHORIZED
			&& self.is_engaged()
			&& self.retry_requested
			&& self.refresh == RefreshState::Refreshed
	}

	/// Whether a registration of the middleware is currently handling the request.
	pub(crate) fn is_active(&self) -> bool {
		self.active
	}

	pub(crate) fn enter(&mut self) {
		self.active = true;
	}

	pub(crate) fn leave(&mut self) {
		self.active = false;
	}

	pub(crate) fn engage(&mut self, key: CacheKey) {
		self.target = Some(key);
	}

	/// Spends the refresh. Returns `false` when it was already spent, in which case the
	/// pending retry request is withdrawn.
	pub(crate) fn begin_refresh(&mut self) -> bool {
		match self.refresh {
			RefreshState::NotStarted => {
				self.refresh = RefreshState::Refreshed;

				true
			},
			RefreshState::Refreshed => {
				self.retry_requested = false;

				false
			},
		}
	}

	pub(crate) fn complete_refresh(&mut self, token: CachedToken) {
		self.refreshed = Some(token);
		self.retry_requested = true;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn session() -> AuthSession {
		let config = ClientCredentialsConfig::parse("https://auth.example.com/token")
			.expect("Token URL fixture should parse.");

		AuthSession::new(config)
	}

	fn token(value: &str) -> CachedToken {
		CachedToken::new(value, "Bearer").expect("Token fixture should be valid.")
	}

	#[test]
	fn refresh_is_spent_exactly_once() {
		let mut session = session();

		assert_eq!(session.refresh_state(), RefreshState::NotStarted);
		assert!(session.begin_refresh());

		session.complete_refresh(token("fresh"));

		assert_eq!(session.refresh_state(), RefreshState::Refreshed);
		assert!(session.retry_requested());
		assert_eq!(session.refreshed_token(), Some(&token("fresh")));
		assert!(!session.begin_refresh());
		assert!(!session.retry_requested());
		assert_eq!(session.refresh_state(), RefreshState::Refreshed);
	}

	#[test]
	fn only_a_requested_401_on_an_engaged_request_is_retried() {
		let mut session = session();

		session.engage(CacheKey::for_host("api.example.com"));

		assert!(!session.should_retry(StatusCode::UNAUTHORIZED));
		assert!(session.begin_refresh());

		session.complete_refresh(token("fresh"));

		assert!(session.should_retry(StatusCode::UNAUTHORIZED));
		assert!(!session.should_retry(StatusCode::SERVICE_UNAVAILABLE));
		assert!(!session.should_retry(StatusCode::OK));

		session.begin_refresh();

		assert!(!session.should_retry(StatusCode::UNAUTHORIZED));
	}

	#[test]
	fn disengaged_sessions_never_retry() {
		let mut session = session();

		session.begin_refresh();
		session.complete_refresh(token("fresh"));

		assert!(!session.should_retry(StatusCode::UNAUTHORIZED));
	}

	#[test]
	fn sessions_are_active_between_enter_and_leave() {
		let mut session = session();

		assert!(!session.is_active());

		session.enter();

		assert!(session.is_active());

		session.leave();

		assert!(!session.is_active());
	}
}
