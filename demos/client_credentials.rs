//! Demonstrates the client-credentials middleware against a local mock provider: the first
//! request fetches and caches a token, the second reuses it, and a forced rejection shows the
//! one-shot refresh.

// std
use std::time::Duration;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
// self
use oauth2_cc_middleware::{
	cache::MemoryCache,
	middleware::{ClientCredentials, ClientCredentialsConfig},
	obs::FetchPhase,
	reqwest::Client,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\"}");
		})
		.await;
	let resource_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/items").header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body("[\"widget\"]");
		})
		.await;
	let config = ClientCredentialsConfig::parse(&server.url("/token"))?
		.client_id("demo-client")
		.client_secret("super-secret")
		.param("scope", "items.read");
	let middleware = ClientCredentials::new(MemoryCache::default());
	let retry = ExponentialBackoff::builder()
		.retry_bounds(Duration::from_millis(50), Duration::from_millis(500))
		.build_with_max_retries(2);
	let client = middleware
		.client_builder(Client::new(), config)
		.with(RetryTransientMiddleware::new_with_policy(retry))
		.build();
	let items = Url::parse(&server.url("/v1/items"))?;

	for round in 1..=2 {
		let response = client.get(items.clone()).send().await?;

		println!("Round {round}: HTTP {} {}", response.status(), response.text().await?);
	}

	token_mock.assert_calls_async(1).await;
	resource_mock.assert_calls_async(2).await;

	let reject_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/admin");
			then.status(401);
		})
		.await;
	let response = client.get(Url::parse(&server.url("/v1/admin"))?).send().await?;

	println!("Rejected twice: HTTP {}", response.status());
	println!(
		"Token fetches: initial={}, refresh={}",
		middleware.metrics().attempts(FetchPhase::Initial),
		middleware.metrics().attempts(FetchPhase::Refresh)
	);

	reject_mock.assert_calls_async(2).await;
	token_mock.assert_calls_async(2).await;

	Ok(())
}
