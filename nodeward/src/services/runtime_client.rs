//! Container runtime client.

use serde::Deserialize;

use nodeward_shared::constants::runtime as runtime_consts;
use nodeward_shared::{NodewardError, NodewardResult};

/// Version report from the container runtime daemon.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuntimeVersion {
    pub version: String,
    pub api_version: String,
}

/// HTTP client for the container runtime daemon, pinned to one API version.
///
/// The handshake hits the version-prefixed endpoint, so a daemon that does
/// not speak [`runtime_consts::CONTAINER_API_VERSION`] fails the connect
/// instead of failing later on an arbitrary operation.
#[derive(Debug)]
pub struct ContainerRuntimeClient {
    endpoint: String,
    http: reqwest::Client,
    version: RuntimeVersion,
}

impl ContainerRuntimeClient {
    /// Connect to the daemon at `endpoint` and perform the version handshake.
    pub async fn connect(endpoint: &str) -> NodewardResult<Self> {
        let http = reqwest::Client::new();
        let url = format!(
            "{}/v{}/version",
            endpoint.trim_end_matches('/'),
            runtime_consts::CONTAINER_API_VERSION
        );

        let response = http.get(&url).send().await.map_err(|e| {
            NodewardError::Connectivity(format!(
                "could not reach container runtime at {endpoint}: {e}"
            ))
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST {
            return Err(NodewardError::Connectivity(format!(
                "container runtime at {endpoint} does not support API version {}",
                runtime_consts::CONTAINER_API_VERSION
            )));
        }
        if !status.is_success() {
            return Err(NodewardError::Connectivity(format!(
                "container runtime at {endpoint} returned HTTP {status}"
            )));
        }

        let version: RuntimeVersion = response.json().await.map_err(|e| {
            NodewardError::Connectivity(format!(
                "invalid version response from container runtime at {endpoint}: {e}"
            ))
        })?;

        tracing::debug!(
            endpoint,
            daemon = %version.version,
            api = %version.api_version,
            "Container runtime handshake complete"
        );
        Ok(Self {
            endpoint: endpoint.to_string(),
            http,
            version,
        })
    }

    /// Endpoint of the connected daemon.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Daemon version captured during the handshake.
    pub fn version(&self) -> &RuntimeVersion {
        &self.version
    }

    /// Ping the daemon under the pinned API version.
    pub async fn ping(&self) -> NodewardResult<()> {
        let url = format!(
            "{}/v{}/_ping",
            self.endpoint.trim_end_matches('/'),
            runtime_consts::CONTAINER_API_VERSION
        );
        self.http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                NodewardError::Connectivity(format!(
                    "container runtime at {} is not responding: {e}",
                    self.endpoint
                ))
            })?;
        Ok(())
    }
}
