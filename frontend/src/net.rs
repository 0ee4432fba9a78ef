//! `gloo-net` implementation of the client transport trait.

use client::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use gloo_net::http::Request;

/// Browser fetch transport. Stateless: scoping headers arrive already
/// attached to the request.
pub struct FetchTransport;

impl HttpTransport for FetchTransport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> LocalBoxFuture<'static, Result<HttpResponse, TransportError>> {
        async move {
            let mut builder = match request.method {
                Method::Get => Request::get(&request.url),
                Method::Post => Request::post(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            if let Some(content_type) = request.content_type {
                builder = builder.header("Content-Type", content_type);
            }
            let ready = match request.body {
                Some(body) => builder
                    .body(body)
                    .map_err(|err| TransportError(err.to_string()))?,
                None => builder
                    .build()
                    .map_err(|err| TransportError(err.to_string()))?,
            };
            let response = ready
                .send()
                .await
                .map_err(|err| TransportError(err.to_string()))?;
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Ok(HttpResponse { status, body })
        }
        .boxed_local()
    }
}
