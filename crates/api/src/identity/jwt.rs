use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use scheduling_core::{errors::AuthError, identity::IdentityVerifier, models::identity::Identity};

use super::AccessClaims;

/// Verifies HS256 access tokens signed with the account service's secret.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn validate(&self, credential: &str) -> Result<Identity, AuthError> {
        let data = decode::<AccessClaims>(credential, &self.key, &self.validation)
            .map_err(|e| AuthError::InvalidCredential(e.to_string()))?;
        Ok(data.claims.into())
    }
}
