//! Middleware-level error types shared across the cache, token fetcher, and request step.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token cache failure.
	#[error("{0}")]
	Cache(
		#[from]
		#[source]
		crate::cache::CacheError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token endpoint answered, but not with a usable credential.
	#[error(transparent)]
	TokenEndpoint(#[from] TokenEndpointError),
	/// Transport failure (DNS, TCP, TLS, or a middleware further down the stack).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Token endpoint issued a token that cannot be rendered as an `Authorization` header.
	#[error("Token of type `{token_type}` cannot be used as an Authorization header value.")]
	InvalidToken {
		/// Token type reported alongside the rejected token.
		token_type: String,
	},
}
impl Error {
	/// Finds the crate error carried by a failed middleware-stack call, if any.
	pub fn from_middleware(err: &reqwest_middleware::Error) -> Option<&Self> {
		match err {
			reqwest_middleware::Error::Middleware(e) => e.downcast_ref::<Self>(),
			reqwest_middleware::Error::Reqwest(_) => None,
		}
	}
}
impl From<url::ParseError> for Error {
	fn from(e: url::ParseError) -> Self {
		ConfigError::InvalidUrl { source: e }.into()
	}
}
impl From<Error> for reqwest_middleware::Error {
	fn from(e: Error) -> Self {
		Self::middleware(e)
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A URL supplied by the caller cannot be parsed.
	#[error("URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Configured token endpoint cannot be parsed.
	#[error("Token endpoint URL `{url}` is invalid.")]
	InvalidTokenUrl {
		/// Raw value that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Configured audience cannot be parsed into scheme, host, and port.
	#[error("Audience `{audience}` is not a valid URI.")]
	InvalidAudience {
		/// Raw audience value.
		audience: String,
		/// Underlying parsing failure, when the value is not a URL at all.
		#[source]
		source: Option<url::ParseError>,
	},
	/// Cache-management call targeted a URL without a host.
	#[error("URL `{url}` has no host to derive a cache key from.")]
	MissingHost {
		/// Offending URL.
		url: String,
	},
}

/// Token endpoint responses that do not carry a usable credential.
#[derive(Debug, ThisError)]
pub enum TokenEndpointError {
	/// Token endpoint responded with a status other than `200 OK`.
	#[error("Token endpoint returned HTTP {status}.")]
	UnexpectedStatus {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Leading bytes of the response body, lossily decoded.
		body_preview: String,
	},
	/// Token endpoint responded with JSON that lacks `access_token`/`token_type` strings.
	#[error("Token endpoint returned a malformed credential response.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl TokenEndpointError {
	const BODY_PREVIEW_LIMIT: usize = 256;

	pub(crate) fn unexpected_status(status: StatusCode, body: &[u8]) -> Self {
		let end = body.len().min(Self::BODY_PREVIEW_LIMIT);

		Self::UnexpectedStatus {
			status: status.as_u16(),
			body_preview: String::from_utf8_lossy(&body[..end]).into_owned(),
		}
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while sending the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// A middleware between this one and the HTTP client failed the request.
	#[error("Middleware failed while sending the request.")]
	Middleware {
		/// Error raised by the middleware.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
impl From<reqwest_middleware::Error> for TransportError {
	fn from(e: reqwest_middleware::Error) -> Self {
		match e {
			reqwest_middleware::Error::Reqwest(e) => Self::network(e),
			reqwest_middleware::Error::Middleware(e) => Self::Middleware { source: e.into() },
		}
	}
}
