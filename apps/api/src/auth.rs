//! Bearer-token authentication against the identity provider.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// Resolves an access token to the id of the user it was issued for.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Uuid, AppError>;
}

#[derive(Debug, Deserialize)]
struct AuthUserBody {
    id: Uuid,
}

/// Verifies tokens by calling `GET {auth_service_url}/user` with the token.
pub struct HttpTokenVerifier {
    client: Client,
    auth_service_url: String,
    service_key: String,
}

impl HttpTokenVerifier {
    pub fn new(auth_service_url: String, service_key: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()?,
            auth_service_url: auth_service_url.trim_end_matches('/').to_string(),
            service_key,
        })
    }
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        let response = self
            .client
            .get(format!("{}/user", self.auth_service_url))
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Auth service unreachable: {e}")))?;

        if !response.status().is_success() {
            warn!("Token rejected by auth service: {}", response.status());
            return Err(invalid_token());
        }

        let user: AuthUserBody = response.json().await.map_err(|e| {
            warn!("Auth service returned an unexpected body: {e}");
            invalid_token()
        })?;
        Ok(user.id)
    }
}

fn invalid_token() -> AppError {
    AppError::Unauthorized("Invalid or expired token".to_string())
}

/// Extracts the token from an `Authorization` header value.
/// Accepts `Bearer <token>` as well as a bare token.
pub fn bearer_token(header: &str) -> Option<&str> {
    let header = header.trim_start();
    let token = match header.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest,
        _ if header.trim_end().eq_ignore_ascii_case("bearer") => "",
        _ => header,
    }
    .trim();
    (!token.is_empty()).then_some(token)
}

/// The authenticated caller, resolved from the `Authorization` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = bearer_token(header).ok_or_else(invalid_token)?;
        let user_id = state.auth.verify(token).await?;
        Ok(AuthUser(user_id))
    }
}
