use async_trait::async_trait;

use crate::{errors::AuthError, models::identity::Identity};

/// Validates bearer credentials issued by the account service.
///
/// Implementations must reject expired or tampered credentials and return the
/// subject id carried by the credential itself.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn validate(&self, credential: &str) -> Result<Identity, AuthError>;
}
