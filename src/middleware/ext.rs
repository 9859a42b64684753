//! Per-request switches for [`reqwest_middleware::RequestBuilder`].

// crates.io
use reqwest_middleware::RequestBuilder;
// self
use crate::middleware::ClientCredentialsConfig;

/// Overrides or removes the client-wide [`ClientCredentialsConfig`] for one request.
pub trait RequestBuilderExt: Sized {
	/// Authenticates this request with `config` instead of the client default.
	fn client_credentials(self, config: ClientCredentialsConfig) -> Self;

	/// Sends this request without the middleware acting on it.
	fn without_client_credentials(self) -> Self;
}
impl RequestBuilderExt for RequestBuilder {
	fn client_credentials(self, config: ClientCredentialsConfig) -> Self {
		self.with_extension(config)
	}

	fn without_client_credentials(mut self) -> Self {
		self.extensions().remove::<ClientCredentialsConfig>();

		self
	}
}
