use serde::{Deserialize, Serialize};

/// Form-encoded body of the password-grant token request.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest {
    pub grant_type: String,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl TokenRequest {
    /// Builds a `grant_type=password` request for the auth service.
    pub fn password_grant(username: &str, password: &str, tenant: Option<&str>) -> Self {
        Self {
            grant_type: "password".to_string(),
            username: username.to_string(),
            password: password.to_string(),
            tenant_id: tenant.map(str::to_string),
        }
    }
}

/// JSON body returned by the auth service.
///
/// `access_token` is optional here so a token-less success response can be
/// rejected as an authentication failure instead of a parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}
