use std::time::Duration;

use async_trait::async_trait;
use eyre::{Result, WrapErr};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use scheduling_core::{errors::AuthError, identity::IdentityVerifier, models::identity::Identity};
use tracing::warn;

use super::AccessClaims;

/// Delegates token validation to the account service.
///
/// A token the account service accepts is trusted for its signature; its claims
/// are then read locally, expiry still enforced.
pub struct RemoteVerifier {
    client: reqwest::Client,
    validate_url: String,
    validation: Validation,
}

impl RemoteVerifier {
    pub fn new(account_service_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .wrap_err("Failed to build account service client")?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();

        Ok(Self {
            client,
            validate_url: format!(
                "{}/api/Authentication/Validate",
                account_service_url.trim_end_matches('/')
            ),
            validation,
        })
    }
}

#[async_trait]
impl IdentityVerifier for RemoteVerifier {
    async fn validate(&self, credential: &str) -> Result<Identity, AuthError> {
        let response = self
            .client
            .get(&self.validate_url)
            .query(&[("accessToken", credential)])
            .send()
            .await
            .map_err(|e| {
                warn!("Account service request failed: {}", e);
                AuthError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        if status.is_server_error() {
            warn!(%status, "Account service failed to validate token");
            return Err(AuthError::Unavailable(format!(
                "account service returned {status}"
            )));
        }
        if !status.is_success() {
            return Err(AuthError::InvalidCredential(format!(
                "account service rejected token ({status})"
            )));
        }

        let key = DecodingKey::from_secret(&[]);
        let data = decode::<AccessClaims>(credential, &key, &self.validation)
            .map_err(|e| AuthError::InvalidCredential(e.to_string()))?;
        Ok(data.claims.into())
    }
}
