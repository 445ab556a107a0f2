use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{
    common::CoreError,
    notification::entities::{Notification, UserId},
    push::{
        entities::{DeliveryReport, PushPayload, PushSubscription, SubscribePushInput},
        ports::{PushDelivery, PushGateway, PushSubscriptionRepository, PushSubscriptionService},
    },
};

/// Fans a notification out to every endpoint the recipient subscribed.
pub struct PushService<R, G>
where
    R: PushSubscriptionRepository,
    G: PushGateway,
{
    subscription_repository: R,
    gateway: Arc<G>,
}

impl<R, G> Clone for PushService<R, G>
where
    R: PushSubscriptionRepository + Clone,
    G: PushGateway,
{
    fn clone(&self) -> Self {
        Self {
            subscription_repository: self.subscription_repository.clone(),
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<R, G> PushService<R, G>
where
    R: PushSubscriptionRepository,
    G: PushGateway,
{
    pub fn new(subscription_repository: R, gateway: G) -> Self {
        Self {
            subscription_repository,
            gateway: Arc::new(gateway),
        }
    }

    /// Sends `notification` to all of the recipient's endpoints concurrently.
    ///
    /// Endpoints reported as gone are unsubscribed; other failures are only counted.
    pub async fn fan_out(&self, notification: &Notification) -> Result<DeliveryReport, CoreError> {
        let subscriptions = self
            .subscription_repository
            .list_by_user(&notification.user_id)
            .await?;

        let mut report = DeliveryReport::default();
        if subscriptions.is_empty() {
            debug!(user_id = %notification.user_id, "No push subscriptions, skipping delivery");
            return Ok(report);
        }

        let payload = PushPayload::from(notification);
        let results = join_all(
            subscriptions
                .iter()
                .map(|subscription| self.gateway.send(&subscription.endpoint, &payload)),
        )
        .await;

        for (subscription, result) in subscriptions.iter().zip(results) {
            match result {
                Ok(()) => report.delivered += 1,
                Err(CoreError::PushEndpointGone { endpoint }) => {
                    info!(%endpoint, "Push endpoint gone, removing subscription");
                    if let Err(e) = self
                        .subscription_repository
                        .delete(&subscription.user_id, &endpoint)
                        .await
                    {
                        warn!(%endpoint, "Failed to remove stale push subscription: {}", e);
                    }
                    report.pruned += 1;
                }
                Err(e) => {
                    warn!(endpoint = %subscription.endpoint, "Push delivery failed: {}", e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

impl<R, G> PushDelivery for PushService<R, G>
where
    R: PushSubscriptionRepository + Clone + 'static,
    G: PushGateway + 'static,
{
    async fn deliver(&self, notification: &Notification) -> Result<(), CoreError> {
        let report = self.fan_out(notification).await?;

        if report.failed > 0 {
            return Err(CoreError::PushDeliveryFailed {
                msg: format!(
                    "{} of {} endpoints failed for notification {}",
                    report.failed,
                    report.delivered + report.pruned + report.failed,
                    notification.id
                ),
            });
        }
        Ok(())
    }
}

impl<R, G> PushSubscriptionService for PushService<R, G>
where
    R: PushSubscriptionRepository,
    G: PushGateway,
{
    async fn subscribe(
        &self,
        user_id: &UserId,
        input: SubscribePushInput,
    ) -> Result<PushSubscription, CoreError> {
        let endpoint = validate_endpoint(&input.endpoint)?;
        self.subscription_repository.upsert(user_id, &endpoint).await
    }

    async fn unsubscribe(&self, user_id: &UserId, endpoint: &str) -> Result<(), CoreError> {
        // Stored endpoints are normalized on subscribe
        let endpoint = validate_endpoint(endpoint).unwrap_or_else(|_| endpoint.to_string());
        self.subscription_repository.delete(user_id, &endpoint).await
    }

    async fn list_subscriptions(&self, user_id: &UserId) -> Result<Vec<PushSubscription>, CoreError> {
        self.subscription_repository.list_by_user(user_id).await
    }
}

/// Accepts absolute http(s) URLs only.
fn validate_endpoint(endpoint: &str) -> Result<String, CoreError> {
    let invalid = || CoreError::InvalidPushEndpoint {
        endpoint: endpoint.to_string(),
    };

    let url = Url::parse(endpoint.trim()).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(url.to_string()),
        _ => Err(invalid()),
    }
}
