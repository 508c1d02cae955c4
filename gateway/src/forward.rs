//! Pass-through forwarding to the backend server.
//!
//! The gateway never rewrites payloads: once a request passes validation the
//! original method, path, query, identity header, and JSON body are relayed,
//! and the backend's status and body come back untouched.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::identity::USER_ID_HEADER;

/// Relays validated requests to the backend.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    base: Url,
}

impl Forwarder {
    /// Create a forwarder targeting the given backend base URL.
    pub fn new(base: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
        }
    }

    /// Forward a request and mirror the backend's response.
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        user_id: Option<i64>,
        body: Option<&Value>,
    ) -> Result<HttpResponse, Error> {
        let url = self.base.join(path_and_query).map_err(|err| {
            Error::internal(format!("failed to build backend url: {err}"))
        })?;

        debug!(%method, %url, "forwarding request");

        let mut request = self.client.request(method, url);
        if let Some(user_id) = user_id {
            request = request.header(USER_ID_HEADER, user_id);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "backend unreachable");
            Error::bad_gateway("backend is unreachable")
        })?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.bytes().await.map_err(|err| {
            warn!(error = %err, "backend response body unreadable");
            Error::bad_gateway("backend response could not be read")
        })?;

        let mut builder = HttpResponse::build(status);
        if !bytes.is_empty() {
            builder.content_type("application/json");
        }
        Ok(builder.body(bytes))
    }
}
