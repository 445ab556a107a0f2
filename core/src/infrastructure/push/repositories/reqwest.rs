use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, error};

use crate::domain::{
    common::CoreError,
    push::{entities::PushPayload, ports::PushGateway},
};

/// Posts push payloads as JSON to subscriber endpoints.
#[derive(Debug, Clone)]
pub struct ReqwestPushGateway {
    client: Client,
    timeout: Duration,
}

impl ReqwestPushGateway {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait::async_trait]
impl PushGateway for ReqwestPushGateway {
    async fn send(&self, endpoint: &str, payload: &PushPayload) -> Result<(), CoreError> {
        let response = self
            .client
            .post(endpoint)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!("{}", e);
                CoreError::PushDeliveryFailed { msg: e.to_string() }
            })?;

        match response.status() {
            status if status.is_success() => {
                debug!(%endpoint, %status, "Push payload accepted");
                Ok(())
            }
            StatusCode::NOT_FOUND | StatusCode::GONE => Err(CoreError::PushEndpointGone {
                endpoint: endpoint.to_string(),
            }),
            status => Err(CoreError::PushDeliveryFailed {
                msg: format!("endpoint {endpoint} answered {status}"),
            }),
        }
    }
}
