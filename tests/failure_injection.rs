//! Failure injection for the gateway's hop to the resolver.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use httpmock::prelude::*;
use serde_json::json;

use cep_temperature::config::PipelineConfig;
use cep_temperature::http::build_resolver;
use cep_temperature::lifecycle::Shutdown;

mod common;

async fn submit(gateway: SocketAddr, body: &str) -> reqwest::Response {
    common::client()
        .post(format!("http://{}/cep", gateway))
        .body(body.to_string())
        .send()
        .await
        .expect("gateway unreachable")
}

#[tokio::test]
async fn test_resolver_connection_refused() {
    // Bind then drop to get a port nothing listens on.
    let dead: SocketAddr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let shutdown = Shutdown::new();
    let gateway = common::spawn_gateway(dead, &shutdown).await;

    let res = submit(gateway, r#"{"cep":"01001000"}"#).await;
    assert_eq!(res.status(), 500);
    assert_eq!(res.text().await.unwrap(), "error contacting resolver");

    shutdown.trigger();
}

#[tokio::test]
async fn test_resolver_timeout_is_unreachable() {
    let silent = common::start_silent_backend().await;
    let shutdown = Shutdown::new();
    let gateway = common::spawn_gateway(silent, &shutdown).await;

    let started = Instant::now();
    let res = submit(gateway, r#"{"cep":"01001000"}"#).await;
    assert_eq!(res.status(), 500);
    assert_eq!(res.text().await.unwrap(), "error contacting resolver");
    assert!(started.elapsed() < Duration::from_secs(5), "deadline should bound the hop");

    shutdown.trigger();
}

#[tokio::test]
async fn test_truncated_resolver_body_is_read_error() {
    let truncating = common::start_truncating_backend().await;
    let shutdown = Shutdown::new();
    let gateway = common::spawn_gateway(truncating, &shutdown).await;

    let res = submit(gateway, r#"{"cep":"01001000"}"#).await;
    assert_eq!(res.status(), 500);
    assert_eq!(res.text().await.unwrap(), "error reading response");

    shutdown.trigger();
}

#[tokio::test]
async fn test_resolver_responses_relayed_verbatim() {
    let calls = Arc::new(AtomicU32::new(0));
    let cc = calls.clone();
    let backend = common::start_programmable_backend(move || {
        let cc = cc.clone();
        async move {
            match cc.fetch_add(1, Ordering::SeqCst) {
                0 => (503, "resolver overloaded".into()),
                1 => (418, "short and stout".into()),
                _ => (404, "can not find zipcode".into()),
            }
        }
    })
    .await;

    let shutdown = Shutdown::new();
    let gateway = common::spawn_gateway(backend, &shutdown).await;

    let res = submit(gateway, r#"{"cep":"01001000"}"#).await;
    assert_eq!(res.status(), 503);
    assert_eq!(res.text().await.unwrap(), "resolver overloaded");

    let res = submit(gateway, r#"{"cep":"01001000"}"#).await;
    assert_eq!(res.status(), 418);
    assert_eq!(res.text().await.unwrap(), "short and stout");

    let res = submit(gateway, r#"{"cep":"01001000"}"#).await;
    assert_eq!(res.status(), 404);
    assert_eq!(
        res.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
    assert_eq!(res.text().await.unwrap(), "can not find zipcode");

    // No retries: one upstream call per request.
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    shutdown.trigger();
}

/// Resolver with a one second bound per lookup, fronted by a gateway whose
/// hop bound covers both lookups.
async fn spawn_slow_pipeline(
    directory: &MockServer,
    weather: &MockServer,
    shutdown: &Shutdown,
) -> SocketAddr {
    let mut config = PipelineConfig::default();
    config.directory.base_url = directory.base_url();
    config.weather.base_url = weather.base_url();
    config.weather.api_key = "test-key".into();
    config.timeouts.upstream_secs = 1;

    let resolver = common::spawn_resolver(build_resolver(&config).unwrap(), shutdown).await;
    common::spawn_gateway(resolver, shutdown).await
}

#[tokio::test]
async fn test_slow_lookups_within_their_bounds_succeed() {
    let directory = MockServer::start_async().await;
    let weather = MockServer::start_async().await;
    directory
        .mock_async(|when, then| {
            when.method(GET).path("/ws/01001000/json/");
            then.status(200)
                .delay(Duration::from_millis(700))
                .json_body(json!({"localidade": "São Paulo"}));
        })
        .await;
    weather
        .mock_async(|when, then| {
            when.method(GET).path("/v1/current.json");
            then.status(200)
                .delay(Duration::from_millis(700))
                .json_body(json!({"current": {"temp_c": 28.5}}));
        })
        .await;

    let shutdown = Shutdown::new();
    let gateway = spawn_slow_pipeline(&directory, &weather, &shutdown).await;

    // 1.4s in total: longer than one lookup bound, shorter than the hop bound.
    let res = submit(gateway, r#"{"cep":"01001000"}"#).await;
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["city"], "São Paulo");
    assert_eq!(body["temp_C"], 28.5);

    shutdown.trigger();
}

#[tokio::test]
async fn test_directory_timeout_reaches_client_as_invalid_zipcode() {
    let directory = MockServer::start_async().await;
    let weather = MockServer::start_async().await;
    directory
        .mock_async(|when, then| {
            when.method(GET).path("/ws/01001000/json/");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(json!({"localidade": "São Paulo"}));
        })
        .await;
    let weather_mock = weather
        .mock_async(|when, then| {
            when.method(GET).path("/v1/current.json");
            then.status(200).json_body(json!({"current": {"temp_c": 28.5}}));
        })
        .await;

    let shutdown = Shutdown::new();
    let gateway = spawn_slow_pipeline(&directory, &weather, &shutdown).await;

    let res = submit(gateway, r#"{"cep":"01001000"}"#).await;
    assert_eq!(res.status(), 422);
    assert_eq!(res.text().await.unwrap(), "invalid zipcode");
    weather_mock.assert_hits_async(0).await;

    shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_servers() {
    let backend = common::start_programmable_backend(|| async { (200, "{}".into()) }).await;
    let shutdown = Shutdown::new();
    let gateway = common::spawn_gateway(backend, &shutdown).await;
    assert_eq!(shutdown.receiver_count(), 1);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let result = common::client()
        .get(format!("http://{}/health", gateway))
        .send()
        .await;
    assert!(result.is_err(), "gateway should stop accepting after shutdown");
}
