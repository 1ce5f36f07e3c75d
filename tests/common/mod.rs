//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use cep_temperature::config::PipelineConfig;
use cep_temperature::http::HttpServer;
use cep_temperature::lifecycle::Shutdown;
use cep_temperature::observability::Telemetry;
use cep_temperature::temperature::TemperatureResolver;

/// Start a programmable backend on an ephemeral port.
///
/// `f` produces the status and body for every connection.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;

                let (status, body) = f().await;
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    418 => "418 I'm a teapot",
                    422 => "422 Unprocessable Entity",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// A backend that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// A backend that promises more body than it sends, then hangs up.
pub async fn start_truncating_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n{\"city\":")
                    .await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Run a gateway pointed at `resolver_addr`.
pub async fn spawn_gateway(resolver_addr: SocketAddr, shutdown: &Shutdown) -> SocketAddr {
    let mut config = PipelineConfig::default();
    config.gateway.resolver_url = format!("http://{}", resolver_addr);
    config.timeouts.upstream_secs = 1;
    config.timeouts.gateway_secs = 3;

    let server = HttpServer::gateway(&config, Arc::new(Telemetry::disabled())).unwrap();
    serve(server, shutdown).await
}

/// Run a resolver around `resolver`.
pub async fn spawn_resolver(resolver: TemperatureResolver, shutdown: &Shutdown) -> SocketAddr {
    let server = HttpServer::resolver(
        &PipelineConfig::default(),
        resolver,
        Arc::new(Telemetry::disabled()),
    );
    serve(server, shutdown).await
}

async fn serve(server: HttpServer, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    addr
}

/// Client that never reuses connections and ignores proxy settings.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
