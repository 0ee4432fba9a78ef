//! Typed access to the configuration-store and auth services.
//!
//! Every outgoing request is scoped through the current [`SessionStore`]
//! according to the configured [`AuthStrategy`]; no credential is ever
//! fabricated when none is stored. Response handling maps HTTP statuses to
//! the [`ApiError`] taxonomy and refuses to trust a 2xx status when the body
//! does not parse as the expected shape.

use common::model::{ConfigDefinition, ConfigValue};
use common::requests::{TokenRequest, TokenResponse};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::session::SessionStore;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// How requests are scoped to an identity.
///
/// `BearerToken` is the supported strategy and the only one the console
/// constructs: it attaches `Authorization: Bearer <token>` and carries the
/// tenant inside the token's claims. `TenantHeader` is the legacy deployment
/// variant that scopes by an explicit `X-Tenant-ID` header instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStrategy {
    #[default]
    BearerToken,
    TenantHeader,
}

pub struct ApiClient<T> {
    transport: T,
    session: SessionStore,
    base_url: String,
    auth_url: String,
    strategy: AuthStrategy,
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(
        transport: T,
        session: SessionStore,
        base_url: impl Into<String>,
        auth_url: impl Into<String>,
        strategy: AuthStrategy,
    ) -> Self {
        Self {
            transport,
            session,
            base_url: base_url.into(),
            auth_url: auth_url.into(),
            strategy,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Fetches the full list of configuration definitions, in service order.
    pub async fn list_definitions(&self) -> Result<Vec<ConfigDefinition>, ApiError> {
        let request = self.scoped(HttpRequest::get(format!("{}/definitions", self.base_url)));
        let response = self.send(request).await?;
        let response = classify(response)?;
        parse_body(&response, "definitions list")
    }

    /// Fetches the current value for `key`. HTTP 404 means "no value stored
    /// yet" and is an absent result, not an error.
    pub async fn get_value(&self, key: &str) -> Result<Option<ConfigValue>, ApiError> {
        let request = self.scoped(HttpRequest::get(format!("{}/config/{}", self.base_url, key)));
        let response = self.send(request).await?;
        if response.status == 404 {
            debug!("no stored value for {key}");
            return Ok(None);
        }
        let response = classify(response)?;
        parse_body(&response, "config value").map(Some)
    }

    /// Submits a new value for `key` and returns the server's authoritative
    /// stored representation, including the new version and timestamp.
    pub async fn save_value(&self, key: &str, value: &Value) -> Result<ConfigValue, ApiError> {
        let body = serde_json::to_string(value)
            .map_err(|err| ApiError::Internal(format!("unserializable value: {err}")))?;
        let request = self.scoped(HttpRequest::post(
            format!("{}/config/{}", self.base_url, key),
            body,
            "application/json",
        ));
        let response = self.send(request).await?;
        let response = classify(response)?;
        parse_body(&response, "saved config value")
    }

    /// Exchanges credentials for a bearer token via a password grant.
    ///
    /// On success the token (and the tenant, when one was given) is stored in
    /// the session, so subsequent calls are scoped without further wiring.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        tenant: Option<&str>,
    ) -> Result<String, ApiError> {
        let form = serde_urlencoded::to_string(TokenRequest::password_grant(
            username, password, tenant,
        ))
        .map_err(|err| ApiError::Internal(format!("unencodable token request: {err}")))?;
        // The token request itself carries no session scoping.
        let request = HttpRequest::post(
            format!("{}/auth/token", self.auth_url),
            form,
            "application/x-www-form-urlencoded",
        );
        let response = self.send(request).await?;
        let response = classify(response)?;
        let parsed: TokenResponse = parse_body(&response, "token response")?;
        match parsed.access_token {
            Some(token) if !token.is_empty() => {
                self.session.set_token(&token);
                if let Some(tenant) = tenant {
                    self.session.set_tenant(tenant);
                }
                Ok(token)
            }
            _ => Err(ApiError::Auth(
                "token response contained no access_token".to_string(),
            )),
        }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport
            .execute(request)
            .await
            .map_err(|err| ApiError::Network(err.to_string()))
    }

    fn scoped(&self, request: HttpRequest) -> HttpRequest {
        match self.strategy {
            AuthStrategy::BearerToken => match self.session.token() {
                Some(token) => request.header("Authorization", &format!("Bearer {token}")),
                None => request,
            },
            AuthStrategy::TenantHeader => match self.session.tenant() {
                Some(tenant) => request.header("X-Tenant-ID", &tenant),
                None => request,
            },
        }
    }
}

/// Maps a non-2xx response to the error taxonomy; passes 2xx through.
fn classify(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    match response.status {
        401 | 403 => Err(ApiError::Auth(excerpt(&response.body))),
        status => Err(ApiError::Service {
            status,
            message: excerpt(&response.body),
        }),
    }
}

/// Parses a successful body; a malformed one is a service fault, not a
/// success.
fn parse_body<D: DeserializeOwned>(response: &HttpResponse, what: &str) -> Result<D, ApiError> {
    serde_json::from_str(&response.body).map_err(|err| ApiError::Service {
        status: response.status,
        message: format!("malformed {what}: {err}"),
    })
}

/// First line of a body, bounded, for error messages.
fn excerpt(body: &str) -> String {
    let line = body.lines().next().unwrap_or("");
    line.chars().take(200).collect()
}
