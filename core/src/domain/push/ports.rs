use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    common::CoreError,
    notification::entities::{Notification, UserId},
    push::entities::{PushPayload, PushSubscription, SubscribePushInput},
};

/// Outbound delivery of a freshly created notification.
///
/// The engine spawns `deliver` in the background, hence the `Clone + 'static` bound.
pub trait PushDelivery: Clone + Send + Sync + 'static {
    fn deliver(
        &self,
        notification: &Notification,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

pub trait PushSubscriptionRepository: Send + Sync {
    /// Registers `endpoint` for the user, returning the existing record if it is already known.
    fn upsert(
        &self,
        user_id: &UserId,
        endpoint: &str,
    ) -> impl Future<Output = Result<PushSubscription, CoreError>> + Send;

    fn list_by_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<PushSubscription>, CoreError>> + Send;

    fn delete(
        &self,
        user_id: &UserId,
        endpoint: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Transport that hands one payload to one endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PushGateway: Send + Sync {
    /// # Errors
    ///
    /// `CoreError::PushEndpointGone` when the endpoint reports the subscription no longer exists.
    async fn send(&self, endpoint: &str, payload: &PushPayload) -> Result<(), CoreError>;
}

pub trait PushSubscriptionService: Send + Sync {
    fn subscribe(
        &self,
        user_id: &UserId,
        input: SubscribePushInput,
    ) -> impl Future<Output = Result<PushSubscription, CoreError>> + Send;

    fn unsubscribe(
        &self,
        user_id: &UserId,
        endpoint: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn list_subscriptions(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<PushSubscription>, CoreError>> + Send;
}

/// Records delivered notifications instead of sending them.
#[derive(Clone, Default)]
pub struct MockPushDelivery {
    delivered: Arc<Mutex<Vec<Notification>>>,
    fail: bool,
}

impl MockPushDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// A delivery collaborator whose every call fails after recording.
    pub fn failing() -> Self {
        Self {
            delivered: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().unwrap().clone()
    }
}

impl PushDelivery for MockPushDelivery {
    async fn deliver(&self, notification: &Notification) -> Result<(), CoreError> {
        self.delivered.lock().unwrap().push(notification.clone());

        if self.fail {
            return Err(CoreError::PushDeliveryFailed {
                msg: "mock delivery failure".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockPushSubscriptionRepository {
    subscriptions: Arc<Mutex<Vec<PushSubscription>>>,
}

impl MockPushSubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PushSubscriptionRepository for MockPushSubscriptionRepository {
    async fn upsert(&self, user_id: &UserId, endpoint: &str) -> Result<PushSubscription, CoreError> {
        let mut subscriptions = self.subscriptions.lock().unwrap();

        if let Some(existing) = subscriptions
            .iter()
            .find(|s| &s.user_id == user_id && s.endpoint == endpoint)
        {
            return Ok(existing.clone());
        }

        let subscription = PushSubscription {
            id: Uuid::new_v4(),
            user_id: *user_id,
            endpoint: endpoint.to_string(),
            created_at: Utc::now(),
        };
        subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<PushSubscription>, CoreError> {
        let subscriptions = self.subscriptions.lock().unwrap();
        Ok(subscriptions
            .iter()
            .filter(|s| &s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, user_id: &UserId, endpoint: &str) -> Result<(), CoreError> {
        let mut subscriptions = self.subscriptions.lock().unwrap();

        let count_before = subscriptions.len();
        subscriptions.retain(|s| !(&s.user_id == user_id && s.endpoint == endpoint));

        if subscriptions.len() == count_before {
            return Err(CoreError::PushSubscriptionNotFound {
                endpoint: endpoint.to_string(),
            });
        }
        Ok(())
    }
}
