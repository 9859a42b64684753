//! Token cache contract and the built-in in-memory implementation.
//!
//! The cache is the only state shared between concurrent requests. It is injected into
//! the middleware rather than living in a global, so every client (and every test) can
//! own an isolated instance.

pub mod memory;

pub use memory::MemoryCache;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, auth::CachedToken};

/// Boxed future returned by [`TokenCache`] operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// Storage contract for cached bearer credentials.
///
/// Every operation must be atomic with respect to concurrent callers. [`put`](Self::put)
/// replaces any previous entry for the key in full. No TTL or eviction is implied; entries
/// leave the cache only through [`erase`](Self::erase) or when the backend is dropped.
pub trait TokenCache
where
	Self: Send + Sync,
{
	/// Fetches the token cached for `key`, if present.
	fn get<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<CachedToken>>;

	/// Stores `token` under `key`, replacing any prior entry.
	fn put(&self, key: CacheKey, token: CachedToken) -> CacheFuture<'_, ()>;

	/// Removes the entry for `key`, if present.
	fn erase<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, ()>;
}

/// Error type produced by [`TokenCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CacheError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Opaque cache key derived from the protected resource's host.
///
/// The key is a base64 (no padding) SHA-256 digest of the lower-cased host, so the same
/// host always resolves to the same key regardless of path, query, scheme, or port.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);
impl CacheKey {
	/// Derives the key for a bare host name.
	pub fn for_host(host: &str) -> Self {
		let digest = Sha256::digest(host.to_ascii_lowercase().as_bytes());

		Self(STANDARD_NO_PAD.encode(digest))
	}

	/// Derives the key for the host of `url`, or `None` when the URL has no host.
	pub fn for_url(url: &Url) -> Option<Self> {
		url.host_str().map(Self::for_host)
	}

	/// Returns the fingerprint string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Debug for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "CacheKey({})", self.0)
	}
}
impl Display for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
