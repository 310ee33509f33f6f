//! Consensus layer client.

use std::sync::Arc;

use serde::Deserialize;

use nodeward_shared::{NodewardError, NodewardResult};

use super::publisher::Publisher;

/// Consensus chain head summary.
#[derive(Clone, Debug, Deserialize)]
pub struct BeaconHead {
    pub slot: u64,
    #[serde(default)]
    pub finalized: bool,
}

/// Client for the consensus layer endpoint.
///
/// Construction only captures the endpoint and the publisher handle; no
/// request is made until a method is called.
#[derive(Debug)]
pub struct BeaconClient {
    endpoint: String,
    publisher: Arc<Publisher>,
    http: reqwest::Client,
}

impl BeaconClient {
    /// Topic on which head updates are published.
    pub const HEAD_TOPIC: &'static str = "beacon.head";

    pub fn new(endpoint: impl Into<String>, publisher: Arc<Publisher>) -> Self {
        Self {
            endpoint: endpoint.into(),
            publisher,
            http: reqwest::Client::new(),
        }
    }

    /// Endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Publisher used for head announcements.
    pub fn publisher(&self) -> &Arc<Publisher> {
        &self.publisher
    }

    /// Fetch the current chain head and announce it on the head topic.
    pub async fn fetch_head(&self) -> NodewardResult<BeaconHead> {
        let url = format!("{}/eth/v1/beacon/head", self.endpoint);
        let head: BeaconHead = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                NodewardError::Connectivity(format!(
                    "could not reach beacon node at {}: {e}",
                    self.endpoint
                ))
            })?
            .error_for_status()
            .map_err(|e| {
                NodewardError::Connectivity(format!(
                    "beacon node at {} rejected the request: {e}",
                    self.endpoint
                ))
            })?
            .json()
            .await
            .map_err(|e| {
                NodewardError::Connectivity(format!(
                    "invalid response from beacon node at {}: {e}",
                    self.endpoint
                ))
            })?;

        self.publisher.publish(
            Self::HEAD_TOPIC,
            serde_json::json!({"slot": head.slot, "finalized": head.finalized}),
        );
        Ok(head)
    }
}
