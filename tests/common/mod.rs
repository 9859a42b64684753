#![allow(dead_code)]

// std
use std::{collections::BTreeMap, sync::Arc, time::Duration};
// crates.io
use parking_lot::Mutex;
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
// self
use oauth2_cc_middleware::{
	cache::MemoryCache,
	middleware::{ClientCredentials, ClientCredentialsConfig},
	oauth2::http::{self, Extensions, HeaderMap, Method, header::AUTHORIZATION},
	reqwest::{Client, Request, Response},
	reqwest_middleware::{self, ClientBuilder, Middleware, Next},
	url::{Url, form_urlencoded},
};

pub const TOKEN_URL: &str = "https://auth.example.com/oauth/token";
pub const RESOURCE_URL: &str = "https://api.example.com/v1/items";

type Handler = dyn Fn(&Recorded) -> reqwest_middleware::Result<Response> + Send + Sync;

/// Snapshot of one request as it reached the end of the middleware stack.
#[derive(Clone, Debug)]
pub struct Recorded {
	pub method: Method,
	pub url: Url,
	pub headers: HeaderMap,
	pub body: Vec<u8>,
}
impl Recorded {
	pub fn is_token_request(&self) -> bool {
		self.url.path() == "/oauth/token"
	}

	pub fn authorization(&self) -> Option<&str> {
		self.headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok())
	}

	pub fn form(&self) -> BTreeMap<String, String> {
		form_urlencoded::parse(&self.body).into_owned().collect()
	}
}

/// Terminal middleware that records every request and answers from a script instead of
/// touching the network.
#[derive(Clone)]
pub struct RecordingTransport {
	log: Arc<Mutex<Vec<Recorded>>>,
	handler: Arc<Handler>,
}
impl RecordingTransport {
	pub fn new(
		handler: impl 'static + Fn(&Recorded) -> reqwest_middleware::Result<Response> + Send + Sync,
	) -> Self {
		Self { log: Arc::default(), handler: Arc::new(handler) }
	}

	pub fn requests(&self) -> Vec<Recorded> {
		self.log.lock().clone()
	}

	pub fn token_requests(&self) -> Vec<Recorded> {
		self.requests().into_iter().filter(Recorded::is_token_request).collect()
	}

	pub fn resource_requests(&self) -> Vec<Recorded> {
		self.requests().into_iter().filter(|request| !request.is_token_request()).collect()
	}
}
#[async_trait::async_trait]
impl Middleware for RecordingTransport {
	async fn handle(
		&self,
		request: Request,
		_extensions: &mut Extensions,
		_next: Next<'_>,
	) -> reqwest_middleware::Result<Response> {
		let recorded = Recorded {
			method: request.method().clone(),
			url: request.url().clone(),
			headers: request.headers().clone(),
			body: request.body().and_then(|body| body.as_bytes()).unwrap_or_default().to_vec(),
		};
		let outcome = (self.handler)(&recorded);

		self.log.lock().push(recorded);

		outcome
	}
}

pub fn response(status: u16) -> Response {
	json_response(status, "")
}

pub fn json_response(status: u16, body: &str) -> Response {
	http::Response::builder()
		.status(status)
		.body(body.as_bytes().to_vec())
		.expect("Response fixture should be valid.")
		.into()
}

pub fn token_response(access_token: &str) -> Response {
	json_response(
		200,
		&format!(r#"{{"access_token":"{access_token}","token_type":"Bearer"}}"#),
	)
}

pub fn refused() -> reqwest_middleware::Error {
	reqwest_middleware::Error::middleware(std::io::Error::from(
		std::io::ErrorKind::ConnectionRefused,
	))
}

pub fn url(value: &str) -> Url {
	Url::parse(value).expect("Failed to parse URL fixture.")
}

pub fn config() -> ClientCredentialsConfig {
	ClientCredentialsConfig::parse(TOKEN_URL)
		.expect("Token URL fixture should parse.")
		.client_id("service-a")
		.client_secret("s3cr3t")
}

/// Transient-failure retry policy with millisecond backoff.
pub fn retry(max_retries: u32) -> RetryTransientMiddleware<ExponentialBackoff> {
	RetryTransientMiddleware::new_with_policy(
		ExponentialBackoff::builder()
			.retry_bounds(Duration::from_millis(1), Duration::from_millis(2))
			.build_with_max_retries(max_retries),
	)
}

/// Stack with a fresh cache and the default config; finish it with [`finish`].
pub fn builder() -> (ClientBuilder, ClientCredentials) {
	let middleware = ClientCredentials::new(MemoryCache::default());
	let builder = middleware.client_builder(Client::new(), config());

	(builder, middleware)
}

/// Terminates `builder` with `transport`.
pub fn finish(
	builder: ClientBuilder,
	transport: &RecordingTransport,
) -> reqwest_middleware::ClientWithMiddleware {
	builder.with(transport.clone()).build()
}
