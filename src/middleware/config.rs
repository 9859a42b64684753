//! Client-credentials configuration carried as a request extension.

// crates.io
use oauth2::ClientSecret;
// self
use crate::{_prelude::*, auth::audience, error::ConfigError};

/// Enables the middleware for every request that carries it.
///
/// Set it for a whole client with [`reqwest_middleware::Extension`] (see
/// [`ClientCredentials::client_builder`](crate::middleware::ClientCredentials::client_builder)),
/// override it per request with
/// [`RequestBuilderExt::client_credentials`](crate::middleware::RequestBuilderExt::client_credentials),
/// or disable the middleware for one request with
/// [`RequestBuilderExt::without_client_credentials`](crate::middleware::RequestBuilderExt::without_client_credentials).
#[derive(Clone, Debug)]
pub struct ClientCredentialsConfig {
	/// Token endpoint receiving the `client_credentials` grant.
	pub token_url: Url,
	/// Form parameters sent to the token endpoint.
	pub params: ClientCredentialsParams,
}
impl ClientCredentialsConfig {
	/// Creates a config for `token_url` with empty parameters.
	pub fn new(token_url: Url) -> Self {
		Self { token_url, params: ClientCredentialsParams::default() }
	}

	/// Parses `token_url` and creates a config for it.
	pub fn parse(token_url: &str) -> Result<Self> {
		let url = Url::parse(token_url).map_err(|source| ConfigError::InvalidTokenUrl {
			url: token_url.to_owned(),
			source,
		})?;

		Ok(Self::new(url))
	}

	/// Sets `client_id`.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.params.client_id = Some(client_id.into());

		self
	}

	/// Sets `client_secret`.
	pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
		self.params.client_secret = Some(ClientSecret::new(client_secret.into()));

		self
	}

	/// Restricts the middleware to requests whose scheme/host/port match `audience`.
	///
	/// The audience is also forwarded to the token endpoint.
	pub fn audience(mut self, audience: impl Into<String>) -> Self {
		self.params.audience = Some(audience.into());

		self
	}

	/// Overrides the grant type (defaults to `client_credentials`).
	pub fn grant_type(mut self, grant_type: impl Into<String>) -> Self {
		self.params.grant_type = Some(grant_type.into());

		self
	}

	/// Adds a form parameter; recognized keys are routed to their typed fields.
	pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.set(key, value);

		self
	}

	/// Replaces every parameter.
	pub fn params(mut self, params: ClientCredentialsParams) -> Self {
		self.params = params;

		self
	}

	/// Checks the parts that can only fail at request time (currently the audience).
	pub fn validate(&self) -> Result<()> {
		if let Some(value) = &self.params.audience {
			audience::validate(value)?;
		}

		Ok(())
	}
}

/// Token request parameters.
///
/// Unrecognized provider-specific fields live in `extra` and are sent verbatim.
#[derive(Clone, Debug, Default)]
pub struct ClientCredentialsParams {
	/// OAuth 2.0 client identifier.
	pub client_id: Option<String>,
	/// OAuth 2.0 client secret.
	pub client_secret: Option<ClientSecret>,
	/// Resource-server URI gating the middleware and forwarded to the provider.
	pub audience: Option<String>,
	/// Grant type override.
	pub grant_type: Option<String>,
	/// Provider-specific fields.
	pub extra: BTreeMap<String, String>,
}
impl ClientCredentialsParams {
	/// Grant type used unless the caller overrides it.
	pub const DEFAULT_GRANT_TYPE: &'static str = "client_credentials";

	/// Sets a parameter by name.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();

		match key.as_str() {
			"client_id" => self.client_id = Some(value),
			"client_secret" => self.client_secret = Some(ClientSecret::new(value)),
			"audience" => self.audience = Some(value),
			"grant_type" => self.grant_type = Some(value),
			_ => {
				self.extra.insert(key, value);
			},
		}
	}

	/// Effective form body: the default grant type overridden by every caller parameter.
	pub fn form(&self) -> BTreeMap<String, String> {
		let mut form = BTreeMap::new();

		form.insert("grant_type".to_owned(), Self::DEFAULT_GRANT_TYPE.to_owned());
		form.extend(self.extra.iter().map(|(key, value)| (key.clone(), value.clone())));

		if let Some(value) = &self.client_id {
			form.insert("client_id".to_owned(), value.clone());
		}
		if let Some(value) = &self.client_secret {
			form.insert("client_secret".to_owned(), value.secret().clone());
		}
		if let Some(value) = &self.audience {
			form.insert("audience".to_owned(), value.clone());
		}
		if let Some(value) = &self.grant_type {
			form.insert("grant_type".to_owned(), value.clone());
		}

		form
	}
}
