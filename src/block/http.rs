//! `reqwest` implementation of [`BlockStorageApi`].

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    ApiFuture, BlockApiError, BlockStorageApi, CreateSnapshotRequest, CreateVolumeRequest,
    Snapshot, Volume,
};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("velero-plugin-scaleway/", env!("CARGO_PKG_VERSION"));

/// Base URL of the Block Storage API.
pub const SCALEWAY_BLOCK_API_BASE: &str = "https://api.scaleway.com/block/v1alpha1";

static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

/// Block Storage client authenticated with a secret key.
#[derive(Clone)]
pub struct HttpBlockApi {
    secret_key: String,
    base_url: String,
}

impl HttpBlockApi {
    /// Creates a client for the public API endpoint.
    #[must_use]
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self::with_base_url(secret_key, SCALEWAY_BLOCK_API_BASE)
    }

    /// Creates a client for a custom endpoint.
    #[must_use]
    pub fn with_base_url(secret_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn request(&self, method: Method, zone: &str, path: &str) -> RequestBuilder {
        let url = format!("{}/zones/{zone}/{path}", self.base_url);
        debug!(method = method.as_str(), url = url.as_str(), "block storage request");
        HTTP_CLIENT
            .request(method, url)
            .header("X-Auth-Token", &self.secret_key)
    }

    async fn send<T: DeserializeOwned>(
        request: RequestBuilder,
        resource: &str,
        id: &str,
    ) -> Result<T, BlockApiError> {
        let body = Self::execute(request, resource, id).await?;
        serde_json::from_slice(&body).map_err(BlockApiError::from)
    }

    async fn execute(
        request: RequestBuilder,
        resource: &str,
        id: &str,
    ) -> Result<Vec<u8>, BlockApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return Ok(body.to_vec());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(BlockApiError::NotFound {
                resource: resource.to_owned(),
                id: id.to_owned(),
            });
        }
        Err(BlockApiError::Api {
            status: status.as_u16(),
            message: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

impl std::fmt::Debug for HttpBlockApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBlockApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl BlockStorageApi for HttpBlockApi {
    fn get_snapshot<'a>(&'a self, zone: &'a str, snapshot_id: &'a str) -> ApiFuture<'a, Snapshot> {
        Box::pin(async move {
            let request = self.request(Method::GET, zone, &format!("snapshots/{snapshot_id}"));
            Self::send(request, "snapshot", snapshot_id).await
        })
    }

    fn create_volume<'a>(&'a self, request: &'a CreateVolumeRequest) -> ApiFuture<'a, Volume> {
        Box::pin(async move {
            let builder = self
                .request(Method::POST, &request.zone, "volumes")
                .json(request);
            Self::send(builder, "snapshot", &request.from_snapshot.snapshot_id).await
        })
    }

    fn get_volume<'a>(&'a self, zone: &'a str, volume_id: &'a str) -> ApiFuture<'a, Volume> {
        Box::pin(async move {
            let request = self.request(Method::GET, zone, &format!("volumes/{volume_id}"));
            Self::send(request, "volume", volume_id).await
        })
    }

    fn create_snapshot<'a>(
        &'a self,
        request: &'a CreateSnapshotRequest,
    ) -> ApiFuture<'a, Snapshot> {
        Box::pin(async move {
            let builder = self
                .request(Method::POST, &request.zone, "snapshots")
                .json(request);
            Self::send(builder, "volume", &request.volume_id).await
        })
    }

    fn delete_snapshot<'a>(&'a self, zone: &'a str, snapshot_id: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let request = self.request(Method::DELETE, zone, &format!("snapshots/{snapshot_id}"));
            Self::execute(request, "snapshot", snapshot_id).await?;
            Ok(())
        })
    }
}
