use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::Error as JwtError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Authenticated caller, inserted into request extensions by [`super::AuthMiddleware`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    #[error("subject {0} is not a valid user id")]
    InvalidSubject(String),
}

/// Validates HS256 bearer tokens signed with the shared secret.
#[derive(Clone)]
pub struct AuthValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthValidator {
    pub fn new(secret_key: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret_key.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn identify(&self, token: &str) -> Result<UserIdentity, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let user_id = Uuid::try_parse(&token_data.claims.sub)
            .map_err(|_| AuthError::InvalidSubject(token_data.claims.sub.clone()))?;

        Ok(UserIdentity { user_id })
    }
}

pub const SERVICE_KEY_HEADER: &str = "x-internal-api-key";

/// Checks the shared key upstream services present on internal routes.
#[derive(Clone)]
pub struct ServiceKeyValidator {
    api_key: Option<Arc<str>>,
}

impl ServiceKeyValidator {
    /// An empty key rejects every request.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: (!api_key.is_empty()).then(|| Arc::from(api_key)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn verify(&self, presented: &str) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|expected| expected == presented)
    }
}
