//! Bearer credential verification against the account service.
//!
//! Two verifiers are available, selected by `IDENTITY_MODE`:
//!
//! - [`jwt::JwtVerifier`] checks HS256 access tokens locally with the shared secret
//! - [`remote::RemoteVerifier`] asks the account service to validate every token

pub mod jwt;
pub mod remote;

use std::sync::Arc;

use eyre::Result;
use scheduling_core::{
    identity::IdentityVerifier,
    models::identity::{Identity, Role},
};
use serde::{Deserialize, Serialize};

use crate::config::IdentityConfig;

/// Claims carried by access tokens issued by the account service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub user_id: i64,
    #[serde(default)]
    pub roles: Vec<Role>,
    pub exp: i64,
}

impl From<AccessClaims> for Identity {
    fn from(claims: AccessClaims) -> Self {
        Identity::new(claims.user_id, claims.roles)
    }
}

pub fn build_verifier(config: &IdentityConfig) -> Result<Arc<dyn IdentityVerifier>> {
    let verifier: Arc<dyn IdentityVerifier> = match config {
        IdentityConfig::Jwt { secret } => Arc::new(jwt::JwtVerifier::new(secret)),
        IdentityConfig::Remote {
            account_service_url,
            timeout,
        } => Arc::new(remote::RemoteVerifier::new(account_service_url, *timeout)?),
    };
    Ok(verifier)
}
