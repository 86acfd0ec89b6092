use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::HomeAssistantConfig;
use crate::entity::{EntityDomain, EntityState};
use crate::error::HubError;

/// Pause after a service call before state is read again.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

// =============================================================================
// Hub abstraction
// =============================================================================

/// The three hub operations the tools rely on.
///
/// Calls are issued one at a time by the caller, so implementations do not
/// need to be `Send` or `Sync`.
#[allow(async_fn_in_trait)]
pub trait Hub {
    /// Every entity id the hub knows about.
    async fn list_entities(&self) -> Result<Vec<String>, HubError>;

    async fn get_state(&self, entity_id: &str) -> Result<EntityState, HubError>;

    /// Invokes `<domain>.<service>` targeting a single entity.
    async fn call_service(
        &self,
        domain: EntityDomain,
        service: &str,
        entity_id: &str,
    ) -> Result<(), HubError>;
}

// =============================================================================
// REST client
// =============================================================================

#[derive(Deserialize)]
struct StateId {
    entity_id: String,
}

pub struct HomeAssistantClient {
    config: HomeAssistantConfig,
    http_client: Client,
}

impl HomeAssistantClient {
    pub fn new(config: HomeAssistantConfig) -> Self {
        Self {
            config,
            http_client: Client::new(),
        }
    }

    pub async fn rest_get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, HubError> {
        let url = self.endpoint_url(endpoint)?;
        tracing::debug!(%url, "GET");
        let request = self.http_client.get(url);
        self.send(endpoint, request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| HubError::Decode {
                endpoint: endpoint.to_string(),
                source: e,
            })
    }

    pub async fn rest_post(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<(), HubError> {
        let url = self.endpoint_url(endpoint)?;
        tracing::debug!(%url, %body, "POST");
        let request = self.http_client.post(url).json(body);
        self.send(endpoint, request).await?;
        Ok(())
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<url::Url, HubError> {
        self.config
            .api_url(endpoint)
            .map_err(|e| HubError::InvalidUrl {
                endpoint: endpoint.to_string(),
                source: e,
            })
    }

    async fn send(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, HubError> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.config.token))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    HubError::Connect {
                        url: self.config.url.to_string(),
                        source: e,
                    }
                } else if e.is_timeout() {
                    HubError::Timeout {
                        url: self.config.url.to_string(),
                        source: e,
                    }
                } else {
                    HubError::Network {
                        endpoint: endpoint.to_string(),
                        source: e,
                    }
                }
            })?;

        let status = response.status();
        tracing::debug!(%status, endpoint, "response");
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        Err(match status {
            StatusCode::UNAUTHORIZED => HubError::Unauthorized,
            StatusCode::FORBIDDEN => HubError::Forbidden,
            StatusCode::NOT_FOUND => HubError::NotFound {
                endpoint: endpoint.to_string(),
            },
            _ => HubError::Status {
                status,
                endpoint: endpoint.to_string(),
                body: error_text,
            },
        })
    }
}

impl Hub for HomeAssistantClient {
    async fn list_entities(&self) -> Result<Vec<String>, HubError> {
        let states: Vec<StateId> = self.rest_get("api/states").await?;
        Ok(states.into_iter().map(|s| s.entity_id).collect())
    }

    async fn get_state(&self, entity_id: &str) -> Result<EntityState, HubError> {
        self.rest_get(&format!("api/states/{}", entity_id)).await
    }

    async fn call_service(
        &self,
        domain: EntityDomain,
        service: &str,
        entity_id: &str,
    ) -> Result<(), HubError> {
        tracing::info!(%domain, service, entity_id, "calling service");
        self.rest_post(
            &format!("api/services/{}/{}", domain, service),
            &json!({ "entity_id": entity_id }),
        )
        .await
    }
}
