//! Credential and endpoint resolution for S3-compatible object storage.
//!
//! The backup location store talks to Scaleway Object Storage through a
//! generic S3 client. This module only produces the inputs that client needs:
//! a static key pair, an endpoint with its signing region, and addressing
//! options. Constructing the client itself happens elsewhere.

mod credentials;
mod endpoint;

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::{EnvironmentSnapshot, non_blank};

pub use credentials::{Credentials, CredentialsProvider, EnvCredentialsProvider};
pub use endpoint::{Endpoint, EndpointResolver, S3_SERVICE, ScalewayEndpointResolver};

const MAX_TAGS: usize = 10;
const MAX_TAG_KEY_LEN: usize = 128;
const MAX_TAG_VALUE_LEN: usize = 256;

/// Errors raised while bridging Scaleway settings to an object storage client.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum BridgeError {
    /// No complete access/secret key pair is available.
    #[error("SCW_ACCESS_KEY and SCW_SECRET_KEY must both be set")]
    CredentialsUnavailable,
    /// The region is not a Scaleway Object Storage region.
    #[error("region {region} is not supported by Scaleway Object Storage")]
    UnsupportedRegion {
        /// Requested region.
        region: String,
    },
    /// Only the S3 service is exposed.
    #[error("service {service} is not supported by Scaleway Object Storage")]
    UnsupportedService {
        /// Requested service.
        service: String,
    },
    /// An explicit endpoint URL was malformed.
    #[error("invalid object storage URL {url}: {reason}")]
    InvalidUrl {
        /// URL as provided.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
    /// An object tagging string was malformed.
    #[error("invalid object tags {tagging}: {reason}")]
    InvalidTags {
        /// Tagging string as provided.
        tagging: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Settings handed to an S3-compatible client.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ObjectStoreConfig {
    credentials: Option<Credentials>,
    /// Endpoint and signing region.
    pub endpoint: Endpoint,
    /// Whether buckets are addressed in the path rather than the host name.
    pub force_path_style: bool,
}

impl ObjectStoreConfig {
    /// Key pair to sign requests with.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::CredentialsUnavailable`] when the build ran
    /// without verification and no key pair was known.
    pub fn credentials(&self) -> Result<&Credentials, BridgeError> {
        self.credentials
            .as_ref()
            .ok_or(BridgeError::CredentialsUnavailable)
    }
}

/// Composes credentials, endpoint and addressing options.
#[derive(Clone, Debug)]
pub struct ObjectStoreConfigBuilder<C = EnvCredentialsProvider, E = ScalewayEndpointResolver> {
    credentials: C,
    resolver: E,
    region: Option<String>,
    url: Option<String>,
    force_path_style: bool,
    verify_credentials: bool,
}

impl ObjectStoreConfigBuilder {
    /// Creates a builder reading keys, endpoint override and `SCW_REGION`
    /// from the environment snapshot.
    #[must_use]
    pub fn from_environment(env: &EnvironmentSnapshot) -> Self {
        Self::new(
            EnvCredentialsProvider::from_environment(env),
            ScalewayEndpointResolver::from_environment(env),
        )
        .region(non_blank(env.scaleway.region.as_deref()))
    }
}

impl<C: CredentialsProvider, E: EndpointResolver> ObjectStoreConfigBuilder<C, E> {
    /// Creates a builder from explicit collaborators.
    #[must_use]
    pub const fn new(credentials: C, resolver: E) -> Self {
        Self {
            credentials,
            resolver,
            region: None,
            url: None,
            force_path_style: false,
            verify_credentials: false,
        }
    }

    /// Sets the region, replacing any value taken from the environment.
    #[must_use]
    pub fn region(mut self, region: Option<&str>) -> Self {
        if let Some(value) = region {
            self.region = Some(value.to_owned());
        }
        self
    }

    /// Sets an explicit endpoint URL overriding the resolver.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Enables path-style bucket addressing.
    #[must_use]
    pub const fn force_path_style(mut self, enabled: bool) -> Self {
        self.force_path_style = enabled;
        self
    }

    /// Retrieves credentials eagerly in [`Self::build`].
    ///
    /// Credentials are always retrieved during the build; this flag only
    /// changes whether a failure aborts it. Without it, the build succeeds
    /// and [`ObjectStoreConfig::credentials`] reports the failure instead.
    #[must_use]
    pub const fn verify_credentials(mut self, enabled: bool) -> Self {
        self.verify_credentials = enabled;
        self
    }

    /// Builds the object storage settings.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnsupportedRegion`] when no supported region is
    /// set, [`BridgeError::InvalidUrl`] for a malformed explicit URL, and
    /// [`BridgeError::CredentialsUnavailable`] when verification is enabled
    /// and no key pair is known.
    pub fn build(&self) -> Result<ObjectStoreConfig, BridgeError> {
        let region = self.region.as_deref().unwrap_or_default();
        let mut endpoint = self.resolver.resolve_endpoint(S3_SERVICE, region)?;

        if let Some(url) = self.url.as_deref() {
            validate_url(url)?;
            url.clone_into(&mut endpoint.url);
        }

        let credentials = match self.credentials.retrieve() {
            Ok(credentials) => Some(credentials),
            Err(err) if self.verify_credentials => return Err(err),
            Err(err) => {
                debug!(error = %err, "object storage credentials deferred");
                None
            }
        };

        Ok(ObjectStoreConfig {
            credentials,
            endpoint,
            force_path_style: self.force_path_style,
        })
    }
}

/// Reports whether `url` parses and uses the `http` or `https` scheme.
#[must_use]
pub fn is_valid_s3_url_scheme(url: &str) -> bool {
    validate_url(url).is_ok()
}

fn validate_url(raw: &str) -> Result<(), BridgeError> {
    let invalid = |reason: String| BridgeError::InvalidUrl {
        url: raw.to_owned(),
        reason,
    };
    let parsed = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("scheme {other} is not http or https"))),
    }
}

/// Validates an object tagging string of the form `k=v&k=v`.
///
/// # Errors
///
/// Returns [`BridgeError::InvalidTags`] when there are more than ten tags, a
/// tag lacks exactly one `=`, or a key or value exceeds its length limit.
pub fn check_tags(tagging: &str) -> Result<(), BridgeError> {
    let invalid = |reason: String| BridgeError::InvalidTags {
        tagging: tagging.to_owned(),
        reason,
    };

    let tags: Vec<&str> = tagging.split('&').collect();
    if tags.len() > MAX_TAGS {
        return Err(invalid(format!("at most {MAX_TAGS} tags are allowed")));
    }

    for tag in tags {
        let mut parts = tag.split('=');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid(format!("tag {tag:?} must be a single key=value pair")));
        };
        if key.chars().count() > MAX_TAG_KEY_LEN {
            return Err(invalid(format!(
                "key {key:?} exceeds {MAX_TAG_KEY_LEN} characters"
            )));
        }
        if value.chars().count() > MAX_TAG_VALUE_LEN {
            return Err(invalid(format!(
                "value of {key:?} exceeds {MAX_TAG_VALUE_LEN} characters"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
