//! Thread-safe in-memory [`TokenCache`] implementation.

// self
use crate::{
	_prelude::*,
	auth::CachedToken,
	cache::{CacheError, CacheFuture, CacheKey, TokenCache},
};

type CacheMap = Arc<RwLock<HashMap<CacheKey, CachedToken>>>;

/// Process-local cache backend; clones share the same storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache(CacheMap);
impl MemoryCache {
	/// Number of cached entries.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns true if nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	/// Drops every cached entry.
	pub fn clear(&self) {
		self.0.write().clear();
	}

	fn get_now(map: &CacheMap, key: &CacheKey) -> Option<CachedToken> {
		map.read().get(key).cloned()
	}

	fn put_now(map: &CacheMap, key: CacheKey, token: CachedToken) -> Result<(), CacheError> {
		map.write().insert(key, token);

		Ok(())
	}

	fn erase_now(map: &CacheMap, key: &CacheKey) {
		map.write().remove(key);
	}
}
impl TokenCache for MemoryCache {
	fn get<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<CachedToken>> {
		Box::pin(async move { Ok(Self::get_now(&self.0, key)) })
	}

	fn put(&self, key: CacheKey, token: CachedToken) -> CacheFuture<'_, ()> {
		Box::pin(async move { Self::put_now(&self.0, key, token) })
	}

	fn erase<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, ()> {
		Box::pin(async move {
			Self::erase_now(&self.0, key);

			Ok(())
		})
	}
}
