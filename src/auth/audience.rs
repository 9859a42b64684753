//! Audience gating for outgoing requests.
//!
//! A configured audience pins the middleware to one resource server. The outgoing URI
//! must agree on scheme, host, and port (scheme default ports applied) for a token to
//! be fetched or attached; otherwise the request proceeds untouched.

// self
use crate::{_prelude::*, error::ConfigError};

/// Parses `audience` into a URL carrying a host, or fails with
/// [`ConfigError::InvalidAudience`].
pub fn validate(audience: &str) -> Result<Url> {
	let url = Url::parse(audience).map_err(|source| ConfigError::InvalidAudience {
		audience: audience.to_owned(),
		source: Some(source),
	})?;

	if url.host_str().is_none() {
		return Err(ConfigError::InvalidAudience { audience: audience.to_owned(), source: None }
			.into());
	}

	Ok(url)
}

/// Returns `true` when the middleware should act on a request for `target`.
///
/// No audience always matches. An unparsable audience is a configuration error, never a
/// silent skip.
pub fn matches(audience: Option<&str>, target: &Url) -> Result<bool> {
	let Some(audience) = audience else {
		return Ok(true);
	};
	let audience = validate(audience)?;

	Ok(audience.scheme() == target.scheme()
		&& audience.host_str() == target.host_str()
		&& audience.port_or_known_default() == target.port_or_known_default())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse target URL fixture.")
	}

	#[test]
	fn missing_audience_always_matches() {
		assert!(matches(None, &url("https://api.example.com/v1")).expect("Matcher should succeed."));
		assert!(matches(None, &url("http://10.0.0.1:8080")).expect("Matcher should succeed."));
	}

	#[test]
	fn matching_ignores_path_query_and_default_ports() {
		let target = url("https://API.example.com/v1/items?page=2");

		assert!(matches(Some("https://api.example.com"), &target).expect("Matcher should succeed."));
		assert!(
			matches(Some("https://api.example.com:443/other"), &target)
				.expect("Matcher should succeed.")
		);
	}

	#[test]
	fn any_component_mismatch_disables_the_request() {
		let target = url("https://api.example.com/v1");

		for audience in [
			"http://api.example.com",
			"https://other.example.com",
			"https://api.example.com:8443",
		] {
			assert!(
				!matches(Some(audience), &target).expect("Matcher should succeed."),
				"Audience {audience} should not match {target}."
			);
		}
	}

	#[test]
	fn unparsable_audience_is_a_configuration_error() {
		let target = url("https://api.example.com");

		for audience in ["not a uri", "mailto:ops@example.com"] {
			let err = matches(Some(audience), &target)
				.expect_err("Invalid audiences must not be skipped silently.");

			assert!(matches!(err, Error::Config(ConfigError::InvalidAudience { .. })));
		}
	}
}
