use axum::{extract::FromRequestParts, http::request::Parts};

use crate::http::server::ApiError;
use entities::{AuthValidator, SERVICE_KEY_HEADER, ServiceKeyValidator};

pub mod entities;

pub struct AuthMiddleware;

impl FromRequestParts<AuthValidator> for AuthMiddleware {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AuthValidator,
    ) -> Result<Self, Self::Rejection> {
        tracing::debug!(
            "Authentication middleware: checking request to {}",
            parts.uri
        );

        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or_else(|| {
                tracing::warn!("Authentication failed: Authorization header missing");
                ApiError::Unauthorized
            })?;

        let auth_value = auth_header.to_str().map_err(|e| {
            tracing::warn!(
                "Authentication failed: Authorization header is not valid UTF-8: {}",
                e
            );
            ApiError::Unauthorized
        })?;

        let token = auth_value.strip_prefix("Bearer ").ok_or_else(|| {
            tracing::warn!("Authentication failed: Authorization header doesn't start with 'Bearer '");
            ApiError::Unauthorized
        })?;

        let user_identity = state.identify(token).map_err(|e| {
            tracing::warn!("Authentication failed: {}", e);
            ApiError::Unauthorized
        })?;

        tracing::debug!("Authentication successful for user: {}", user_identity.user_id);

        parts.extensions.insert(user_identity);
        Ok(Self)
    }
}

/// Guards internal routes called by upstream services instead of end users.
pub struct ServiceKeyMiddleware;

impl FromRequestParts<ServiceKeyValidator> for ServiceKeyMiddleware {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceKeyValidator,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(SERVICE_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if !state.verify(presented) {
            tracing::warn!(
                "Internal request to {} rejected: missing or wrong service key",
                parts.uri
            );
            return Err(ApiError::Unauthorized);
        }

        Ok(Self)
    }
}
