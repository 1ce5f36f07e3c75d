//! Front gateway: validate the postal code, forward it, relay the answer.
//!
//! The resolver's status and body come back to the client untouched; the
//! gateway only produces its own response when validation fails or the
//! resolver cannot be reached or read.

use axum::{
    body::Body,
    extract::State,
    http::{header::CONTENT_TYPE, Method, Request, Uri},
    response::{IntoResponse, Response},
};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::error::PipelineError;
use crate::http::request::{request_id, X_REQUEST_ID};
use crate::observability::{metrics, RequestSpan, Telemetry};
use crate::resilience::with_deadline;
use crate::temperature::PostalCode;

/// Gateway state injected into the handler.
#[derive(Clone)]
pub struct GatewayState {
    pub client: Client<HttpConnector, Body>,
    pub resolver_url: Url,
    pub upstream_timeout: Duration,
    pub max_body_bytes: usize,
    pub telemetry: Arc<Telemetry>,
}

/// `ANY /cep`: only POST is accepted.
pub async fn submit_postal_code(
    State(state): State<GatewayState>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let response = match handle(&state, request).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    };
    metrics::record_request("gateway", response.status().as_u16(), start);
    response
}

async fn handle(state: &GatewayState, request: Request<Body>) -> Result<Response, PipelineError> {
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();

    if parts.method != Method::POST {
        tracing::debug!(request_id = %request_id, method = %parts.method, "Rejected method");
        return Err(PipelineError::MethodNotAllowed);
    }

    let bytes = axum::body::to_bytes(body, state.max_body_bytes)
        .await
        .map_err(|e| {
            tracing::info!(request_id = %request_id, error = %e, "Unreadable request body");
            PipelineError::InvalidInput
        })?;

    let postal_code = PostalCode::from_json(&bytes).inspect_err(|_| {
        tracing::info!(request_id = %request_id, "Invalid postal code submitted");
    })?;

    let span = state.telemetry.start_span("submit_postal_code", &parts.headers);
    span.set_attribute("postal_code", postal_code.to_string());

    let result = forward(state, &postal_code, &request_id, &span).await;
    match &result {
        Ok(response) => span.record_status(response.status()),
        Err(e) => span.record_status(e.status_code()),
    }
    span.end();

    result
}

/// Call the resolver and relay its status and body.
async fn forward(
    state: &GatewayState,
    postal_code: &PostalCode,
    request_id: &str,
    span: &RequestSpan,
) -> Result<Response, PipelineError> {
    let uri = resolver_uri(&state.resolver_url, postal_code).ok_or_else(|| {
        tracing::error!(resolver_url = %state.resolver_url, "Cannot build resolver URI");
        PipelineError::UpstreamUnreachable
    })?;

    let mut upstream = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(X_REQUEST_ID, request_id)
        .body(Body::empty())
        .map_err(|e| {
            tracing::error!(request_id = %request_id, error = %e, "Cannot build resolver request");
            PipelineError::UpstreamUnreachable
        })?;
    state.telemetry.inject(span, upstream.headers_mut());

    tracing::debug!(request_id = %request_id, postal_code = %postal_code, "Forwarding to resolver");

    let response = match with_deadline(state.upstream_timeout, state.client.request(upstream)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            tracing::error!(request_id = %request_id, error = %e, "Resolver unreachable");
            return Err(PipelineError::UpstreamUnreachable);
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Resolver timed out");
            return Err(PipelineError::UpstreamUnreachable);
        }
    };

    let (parts, body) = response.into_parts();
    let bytes = match with_deadline(
        state.upstream_timeout,
        axum::body::to_bytes(Body::new(body), usize::MAX),
    )
    .await
    {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to read resolver response");
            return Err(PipelineError::UpstreamReadError);
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Resolver response stalled");
            return Err(PipelineError::UpstreamUnreachable);
        }
    };

    tracing::debug!(request_id = %request_id, status = %parts.status, "Relaying resolver response");

    let mut relayed = Response::builder().status(parts.status);
    if let Some(content_type) = parts.headers.get(CONTENT_TYPE) {
        relayed = relayed.header(CONTENT_TYPE, content_type.clone());
    }
    relayed
        .body(Body::from(bytes))
        .map_err(|_| PipelineError::UpstreamReadError)
}

/// `{resolver_url}/temperatura/{cep}` with the code as one escaped segment.
fn resolver_uri(base: &Url, postal_code: &PostalCode) -> Option<Uri> {
    let mut url = base.clone();
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(["temperatura", postal_code.as_str()]);
    url.as_str().parse().ok()
}
