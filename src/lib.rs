//! OAuth 2.0 client-credentials middleware that attaches per-host cached bearer tokens to
//! outgoing requests and recovers from a single stale-token rejection with a one-shot refresh.
//!
//! [`ClientCredentials`](middleware::ClientCredentials) is a [`reqwest_middleware::Middleware`].
//! It acts on every request that carries a
//! [`ClientCredentialsConfig`](middleware::ClientCredentialsConfig) extension. Token requests
//! are sent through the remainder of the middleware stack, so register it first: whatever is
//! registered after it (tracing, a `reqwest-retry` policy, ...) also applies to token requests,
//! while the auth step itself never does.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use oauth2_cc_middleware::{
//! 	cache::MemoryCache,
//! 	middleware::{ClientCredentials, ClientCredentialsConfig},
//! 	reqwest,
//! };
//!
//! let config = ClientCredentialsConfig::parse("https://auth.example.com/oauth/token")?
//! 	.client_id("service-a")
//! 	.client_secret("s3cr3t")
//! 	.audience("https://api.example.com");
//! let client = ClientCredentials::new(MemoryCache::default())
//! 	.client_builder(reqwest::Client::new(), config)
//! 	.build();
//! let response = client.get("https://api.example.com/v1/items").send().await?;
//!
//! assert!(response.status().is_success());
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod error;
pub mod middleware;
pub mod obs;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use oauth2::http::{Extensions, HeaderValue, StatusCode, header};
	pub use parking_lot::RwLock;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, Request, Response};
	pub use serde::Deserialize;
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
pub use reqwest;
pub use reqwest_middleware;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, reqwest_retry as _, tokio as _};
