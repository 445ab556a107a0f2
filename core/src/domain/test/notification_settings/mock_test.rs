use uuid::Uuid;

use crate::{
    Service,
    domain::{
        common::CoreError,
        health::port::MockHealthRepository,
        notification::{
            entities::{NotificationType, UserId},
            ports::MockNotificationRepository,
        },
        notification_settings::{
            entities::{NotificationSettings, UpdateNotificationSettingsInput},
            ports::{
                MockNotificationSettingsRepository, NotificationSettingsRepository,
                NotificationSettingsService,
            },
        },
        push::ports::MockPushDelivery,
    },
};

fn user_id() -> UserId {
    UserId::from(Uuid::parse_str("123e4567-e89b-12d3-a456-426614174001").expect("valid uuid"))
}

fn service_with<S: NotificationSettingsRepository>(
    settings_repo: S,
) -> Service<MockNotificationRepository, S, MockHealthRepository, MockPushDelivery> {
    Service::new(
        MockNotificationRepository::new(),
        settings_repo,
        MockHealthRepository::new(),
    )
}

/// Settings store that loses every creation race: the lookup misses, then the
/// insert conflicts because a concurrent writer stored `winner` in between.
#[derive(Clone)]
struct RacingSettingsRepository {
    inner: MockNotificationSettingsRepository,
    winner: NotificationSettings,
}

impl NotificationSettingsRepository for RacingSettingsRepository {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<NotificationSettings>, CoreError> {
        self.inner.find_by_user(user_id).await
    }

    async fn create(&self, settings: &NotificationSettings) -> Result<(), CoreError> {
        self.inner.create(&self.winner).await?;
        Err(CoreError::SettingsAlreadyExist {
            user_id: settings.user_id,
        })
    }

    async fn update(
        &self,
        user_id: &UserId,
        settings: &NotificationSettings,
    ) -> Result<(), CoreError> {
        self.inner.update(user_id, settings).await
    }
}

#[tokio::test]
async fn test_get_settings_materializes_defaults_once() -> Result<(), Box<dyn std::error::Error>> {
    let settings_repo = MockNotificationSettingsRepository::new();
    let service = service_with(settings_repo.clone());

    let first = service.get_settings(&user_id()).await?;
    assert_eq!(first.user_id, user_id());
    assert!(first.replies);
    assert!(first.mentions);
    assert!(!first.votes);
    assert!(first.follows);
    assert!(!first.email_notifications);

    let second = service.get_settings(&user_id()).await?;
    assert_eq!(first, second, "Expected the stored record back");
    assert_eq!(settings_repo.create_calls(), 1, "Expected a single creation");
    assert_eq!(settings_repo.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_update_settings_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let service = service_with(MockNotificationSettingsRepository::new());

    let before = service.get_settings(&user_id()).await?;
    let updated = service
        .update_settings(
            &user_id(),
            UpdateNotificationSettingsInput {
                votes: Some(true),
                ..Default::default()
            },
        )
        .await?;
    let after = service.get_settings(&user_id()).await?;

    assert_eq!(updated, after);
    assert!(after.votes);
    assert_eq!(after.replies, before.replies);
    assert_eq!(after.mentions, before.mentions);
    assert_eq!(after.follows, before.follows);
    assert_eq!(after.email_notifications, before.email_notifications);
    assert!(after.updated_at >= before.updated_at);

    Ok(())
}

#[tokio::test]
async fn test_update_settings_without_record_starts_from_defaults()
-> Result<(), Box<dyn std::error::Error>> {
    let settings_repo = MockNotificationSettingsRepository::new();
    let service = service_with(settings_repo.clone());

    let updated = service
        .update_settings(
            &user_id(),
            UpdateNotificationSettingsInput {
                email_notifications: Some(true),
                ..Default::default()
            },
        )
        .await?;

    assert!(updated.email_notifications);
    assert!(updated.replies);
    assert!(!updated.votes);
    assert_eq!(settings_repo.create_calls(), 0, "Update path upserts, never creates");
    assert_eq!(
        settings_repo.find_by_user(&user_id()).await?,
        Some(updated)
    );

    Ok(())
}

#[tokio::test]
async fn test_get_settings_recovers_from_creation_race() -> Result<(), Box<dyn std::error::Error>> {
    let mut winner = NotificationSettings::defaults_for(user_id());
    winner.votes = true;
    let service = service_with(RacingSettingsRepository {
        inner: MockNotificationSettingsRepository::new(),
        winner: winner.clone(),
    });

    let settings = service.get_settings(&user_id()).await?;
    assert_eq!(settings, winner, "Expected the concurrently stored record");

    Ok(())
}

#[test]
fn test_type_to_toggle_mapping() {
    let mut settings = NotificationSettings::defaults_for(user_id());
    settings.replies = false;

    assert!(!settings.allows(&NotificationType::Reply));
    assert!(settings.allows(&NotificationType::Mention));
    assert!(!settings.allows(&NotificationType::Vote));
    assert!(settings.allows(&NotificationType::Follow));
    assert!(settings.allows(&NotificationType::Other("badge".to_string())));
}

#[test]
fn test_notification_type_tags() {
    for tag in ["reply", "mention", "vote", "follow", "badge"] {
        assert_eq!(NotificationType::from(tag).as_str(), tag);
    }
    assert_eq!(NotificationType::from("vote"), NotificationType::Vote);

    let json = serde_json::to_string(&NotificationType::Mention).unwrap();
    assert_eq!(json, "\"mention\"");
    let parsed: NotificationType = serde_json::from_str("\"custom\"").unwrap();
    assert_eq!(parsed, NotificationType::Other("custom".to_string()));
}
