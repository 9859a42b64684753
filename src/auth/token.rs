//! Cached bearer credentials and token-endpoint response parsing.

// self
use crate::{_prelude::*, auth::TokenSecret, error::TokenEndpointError};

/// `(access_token, token_type)` tuple cached per protected-resource host.
///
/// Construction renders the `Authorization` header value up front, so a cached token is
/// always attachable. Entries are replaced wholesale; fields are never patched in place.
#[derive(Clone, PartialEq, Eq)]
pub struct CachedToken {
	access_token: TokenSecret,
	token_type: String,
	header: HeaderValue,
}
impl CachedToken {
	/// Builds a token, rejecting values that cannot form an `Authorization` header.
	pub fn new(access_token: impl Into<TokenSecret>, token_type: impl Into<String>) -> Result<Self> {
		let access_token = access_token.into();
		let token_type = token_type.into();
		let mut header =
			HeaderValue::try_from(format!("{token_type} {}", access_token.expose())).map_err(
				|_| Error::InvalidToken { token_type: token_type.clone() },
			)?;

		header.set_sensitive(true);

		Ok(Self { access_token, token_type, header })
	}

	/// Access token secret; callers must avoid logging it.
	pub fn access_token(&self) -> &TokenSecret {
		&self.access_token
	}

	/// Token type exactly as issued (e.g. `Bearer`).
	pub fn token_type(&self) -> &str {
		&self.token_type
	}

	/// `Authorization` header value rendered as `"<type> <token>"`, flagged sensitive.
	pub fn header_value(&self) -> HeaderValue {
		self.header.clone()
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("access_token", &self.access_token)
			.field("token_type", &self.token_type)
			.finish()
	}
}

#[derive(Deserialize)]
struct TokenResponse {
	access_token: String,
	token_type: String,
}

/// Parses a `200 OK` token-endpoint body into a [`CachedToken`].
pub(crate) fn parse_token_response(body: &[u8]) -> Result<CachedToken> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let response: TokenResponse = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| TokenEndpointError::MalformedResponse { source })?;

	CachedToken::new(response.access_token, response.token_type)
}
