//! Endpoint resolution for S3-compatible object storage clients.

use crate::config::{EnvironmentSnapshot, non_blank};
use crate::validation::Region;

use super::BridgeError;

/// Service name of Scaleway Object Storage.
pub const S3_SERVICE: &str = "s3";

/// Resolved service endpoint.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoint {
    /// Base URL of the service.
    pub url: String,
    /// Region used to sign requests.
    pub signing_region: String,
}

/// Maps a service and region to an endpoint.
pub trait EndpointResolver {
    /// Resolves the endpoint for `service` in `region`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnsupportedRegion`] or
    /// [`BridgeError::UnsupportedService`] for inputs outside the supported
    /// set.
    fn resolve_endpoint(&self, service: &str, region: &str) -> Result<Endpoint, BridgeError>;
}

/// Resolver for Scaleway Object Storage honouring `SCW_S3_ENDPOINT`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScalewayEndpointResolver {
    endpoint_override: Option<String>,
}

impl ScalewayEndpointResolver {
    /// Creates a resolver with an optional endpoint override.
    #[must_use]
    pub const fn new(endpoint_override: Option<String>) -> Self {
        Self { endpoint_override }
    }

    /// Reads the override from `SCW_S3_ENDPOINT` in the snapshot.
    #[must_use]
    pub fn from_environment(env: &EnvironmentSnapshot) -> Self {
        Self::new(non_blank(env.scaleway.s3_endpoint.as_deref()).map(str::to_owned))
    }
}

impl EndpointResolver for ScalewayEndpointResolver {
    fn resolve_endpoint(&self, service: &str, region: &str) -> Result<Endpoint, BridgeError> {
        let supported = region
            .parse::<Region>()
            .map_err(|err| BridgeError::UnsupportedRegion { region: err.value })?;

        if service != S3_SERVICE {
            return Err(BridgeError::UnsupportedService {
                service: service.to_owned(),
            });
        }

        let url = self
            .endpoint_override
            .clone()
            .unwrap_or_else(|| format!("https://s3.{supported}.scw.cloud"));
        Ok(Endpoint {
            url,
            signing_region: supported.as_str().to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("fr-par", "https://s3.fr-par.scw.cloud")]
    #[case("nl-ams", "https://s3.nl-ams.scw.cloud")]
    #[case("pl-waw", "https://s3.pl-waw.scw.cloud")]
    fn default_endpoint_is_derived_from_region(#[case] region: &str, #[case] url: &str) {
        let endpoint = ScalewayEndpointResolver::default()
            .resolve_endpoint(S3_SERVICE, region)
            .expect("region supported");

        assert_eq!(
            endpoint,
            Endpoint {
                url: url.to_owned(),
                signing_region: region.to_owned(),
            }
        );
    }

    #[rstest]
    fn override_wins_over_default_template() {
        let mut env = EnvironmentSnapshot::empty();
        env.scaleway.s3_endpoint = Some(String::from("http://minio.local:9000"));

        let endpoint = ScalewayEndpointResolver::from_environment(&env)
            .resolve_endpoint(S3_SERVICE, "fr-par")
            .expect("region supported");

        assert_eq!(endpoint.url, "http://minio.local:9000");
        assert_eq!(endpoint.signing_region, "fr-par");
    }

    #[rstest]
    fn unknown_region_is_rejected() {
        assert_eq!(
            ScalewayEndpointResolver::default().resolve_endpoint(S3_SERVICE, "us-east-1"),
            Err(BridgeError::UnsupportedRegion {
                region: String::from("us-east-1")
            })
        );
    }

    #[rstest]
    fn unknown_service_is_rejected() {
        assert_eq!(
            ScalewayEndpointResolver::default().resolve_endpoint("sqs", "fr-par"),
            Err(BridgeError::UnsupportedService {
                service: String::from("sqs")
            })
        );
    }
}
