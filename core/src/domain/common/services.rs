use std::sync::{Arc, OnceLock};

use tracing::warn;

use crate::domain::{
    health::port::HealthRepository, notification::ports::NotificationRepository,
    notification_settings::ports::NotificationSettingsRepository, push::ports::PushDelivery,
};

/// The notification engine.
///
/// Holds the storage collaborators directly and the push collaborator behind a
/// write-once slot. The push service is assembled alongside the engine, so it is
/// bound after both exist through [`Service::set_push_delivery`]. Clones share
/// the same slot.
#[derive(Clone)]
pub struct Service<N, S, H, P>
where
    N: NotificationRepository,
    S: NotificationSettingsRepository,
    H: HealthRepository,
    P: PushDelivery,
{
    pub(crate) notification_repository: N,
    pub(crate) settings_repository: S,
    pub(crate) health_repository: H,
    pub(crate) push_delivery: Arc<OnceLock<P>>,
}

impl<N, S, H, P> Service<N, S, H, P>
where
    N: NotificationRepository,
    S: NotificationSettingsRepository,
    H: HealthRepository,
    P: PushDelivery,
{
    pub fn new(notification_repository: N, settings_repository: S, health_repository: H) -> Self {
        Self {
            notification_repository,
            settings_repository,
            health_repository,
            push_delivery: Arc::new(OnceLock::new()),
        }
    }

    /// Binds the push collaborator. Only the first call takes effect.
    pub fn set_push_delivery(&self, push_delivery: P) {
        if self.push_delivery.set(push_delivery).is_err() {
            warn!("Push delivery is already configured, ignoring the new one");
        }
    }
}
