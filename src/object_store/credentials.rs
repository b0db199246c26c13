//! Static credentials for S3-compatible object storage clients.

use crate::config::{EnvironmentSnapshot, non_blank};

use super::BridgeError;

/// Access/secret key pair presented to an S3-compatible client. Scaleway
/// keys never expire, so there is no expiry or refresh state.
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    /// Access key identifier.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

/// Source of object storage credentials.
pub trait CredentialsProvider {
    /// Returns the credentials to sign requests with.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::CredentialsUnavailable`] when no complete key
    /// pair is known.
    fn retrieve(&self) -> Result<Credentials, BridgeError>;
}

/// Provider backed by `SCW_ACCESS_KEY` and `SCW_SECRET_KEY`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EnvCredentialsProvider {
    access_key: Option<String>,
    secret_key: Option<String>,
}

impl EnvCredentialsProvider {
    /// Captures the key pair from an environment snapshot.
    #[must_use]
    pub fn from_environment(env: &EnvironmentSnapshot) -> Self {
        Self {
            access_key: env.scaleway.access_key.clone(),
            secret_key: env.scaleway.secret_key.clone(),
        }
    }
}

impl CredentialsProvider for EnvCredentialsProvider {
    fn retrieve(&self) -> Result<Credentials, BridgeError> {
        let (Some(access_key), Some(secret_key)) = (
            non_blank(self.access_key.as_deref()),
            non_blank(self.secret_key.as_deref()),
        ) else {
            return Err(BridgeError::CredentialsUnavailable);
        };

        Ok(Credentials {
            access_key_id: access_key.to_owned(),
            secret_access_key: secret_key.to_owned(),
        })
    }
}
