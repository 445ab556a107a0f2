use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    Service,
    domain::{
        common::{CoreError, GetPaginated},
        health::port::MockHealthRepository,
        notification::{
            entities::{
                CommentId, CreateNotificationInput, Notification, NotificationId,
                NotificationType, PostId, UserId,
            },
            ports::{MockNotificationRepository, NotificationRepository, NotificationService},
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

type TestService = Service<
    MockNotificationRepository,
    MockNotificationSettingsRepository,
    MockHealthRepository,
    MockPushDelivery,
>;

fn user(id: &str) -> UserId {
    UserId::from(Uuid::parse_str(id).expect("valid uuid"))
}

fn alice() -> UserId {
    user("123e4567-e89b-12d3-a456-426614174001")
}

fn bob() -> UserId {
    user("123e4567-e89b-12d3-a456-426614174002")
}

fn setup() -> (TestService, MockNotificationRepository) {
    let notification_repo = MockNotificationRepository::new();
    let service = Service::new(
        notification_repo.clone(),
        MockNotificationSettingsRepository::new(),
        MockHealthRepository::new(),
    );
    (service, notification_repo)
}

fn input(
    recipient: UserId,
    sender: UserId,
    notification_type: NotificationType,
    message: &str,
) -> CreateNotificationInput {
    CreateNotificationInput {
        recipient_id: recipient,
        sender_id: sender,
        notification_type,
        message: message.to_string(),
        post_id: None,
        comment_id: None,
    }
}

async fn seed(
    repo: &MockNotificationRepository,
    recipient: UserId,
    minutes_ago: i64,
    is_read: bool,
) -> Result<Notification, CoreError> {
    let mut notification =
        input(recipient, bob(), NotificationType::Reply, "seeded").into_notification();
    notification.created_at = Utc::now() - chrono::Duration::minutes(minutes_ago);
    notification.is_read = is_read;
    repo.create(&notification).await?;
    Ok(notification)
}

async fn wait_for_deliveries(push: &MockPushDelivery, expected: usize) -> bool {
    tokio::time::timeout(Duration::from_secs(1), async {
        while push.delivered().len() < expected {
            tokio::task::yield_now().await;
        }
    })
    .await
    .is_ok()
}

// == Creation ==

#[tokio::test]
async fn test_create_reply_notification_with_default_settings() -> Result<(), Box<dyn std::error::Error>>
{
    let (service, _repo) = setup();
    let post_id = PostId::from(Uuid::new_v4());
    let comment_id = CommentId::from(Uuid::new_v4());

    service
        .create_notification(CreateNotificationInput {
            post_id: Some(post_id),
            comment_id: Some(comment_id),
            ..input(
                alice(),
                bob(),
                NotificationType::Reply,
                "B replied to your comment",
            )
        })
        .await?;

    let page = service
        .list_notifications(&alice(), &GetPaginated { offset: 0, limit: 10 })
        .await?;

    assert_eq!(page.notifications.len(), 1, "Expected one notification");
    assert_eq!(page.unread_count, 1, "Expected one unread notification");
    assert_eq!(page.meta.total, 1);

    let first = &page.notifications[0];
    assert_eq!(first.user_id, alice());
    assert_eq!(first.sender_id, bob());
    assert_eq!(first.notification_type, NotificationType::Reply);
    assert_eq!(first.message, "B replied to your comment");
    assert_eq!(first.post_id, Some(post_id));
    assert_eq!(first.comment_id, Some(comment_id));
    assert!(!first.is_read);

    Ok(())
}

#[tokio::test]
async fn test_create_vote_notification_is_skipped_when_disabled()
-> Result<(), Box<dyn std::error::Error>> {
    let (service, repo) = setup();
    let push = MockPushDelivery::new();
    service.set_push_delivery(push.clone());

    // votes are off by default
    let before = service.get_unread_count(&alice()).await?;
    service
        .create_notification(input(
            alice(),
            bob(),
            NotificationType::Vote,
            "B upvoted your post",
        ))
        .await?;

    assert!(repo.all().is_empty(), "Expected no notification row");
    assert_eq!(service.get_unread_count(&alice()).await?, before);

    tokio::task::yield_now().await;
    assert!(push.delivered().is_empty(), "Expected no push call");

    Ok(())
}

#[tokio::test]
async fn test_create_notification_respects_updated_toggle() -> Result<(), Box<dyn std::error::Error>>
{
    let (service, repo) = setup();

    service
        .update_settings(
            &alice(),
            UpdateNotificationSettingsInput {
                votes: Some(true),
                follows: Some(false),
                ..Default::default()
            },
        )
        .await?;

    service
        .create_notification(input(alice(), bob(), NotificationType::Vote, "upvote"))
        .await?;
    service
        .create_notification(input(alice(), bob(), NotificationType::Follow, "follow"))
        .await?;

    let stored = repo.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].notification_type, NotificationType::Vote);

    Ok(())
}

#[tokio::test]
async fn test_create_notification_with_unknown_type_always_notifies()
-> Result<(), Box<dyn std::error::Error>> {
    let (service, repo) = setup();

    service
        .update_settings(
            &alice(),
            UpdateNotificationSettingsInput {
                replies: Some(false),
                mentions: Some(false),
                votes: Some(false),
                follows: Some(false),
                email_notifications: Some(false),
            },
        )
        .await?;

    service
        .create_notification(input(
            alice(),
            bob(),
            NotificationType::from("mention_in_comment"),
            "B mentioned you in a comment",
        ))
        .await?;

    let stored = repo.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(
        stored[0].notification_type,
        NotificationType::Other("mention_in_comment".to_string())
    );

    Ok(())
}

#[tokio::test]
async fn test_create_notification_materializes_default_settings()
-> Result<(), Box<dyn std::error::Error>> {
    let notification_repo = MockNotificationRepository::new();
    let settings_repo = MockNotificationSettingsRepository::new();
    let service: TestService = Service::new(
        notification_repo,
        settings_repo.clone(),
        MockHealthRepository::new(),
    );

    assert!(settings_repo.is_empty());
    service
        .create_notification(input(alice(), bob(), NotificationType::Mention, "mention"))
        .await?;

    assert_eq!(settings_repo.len(), 1, "Expected default settings row");

    Ok(())
}

// == Push delivery ==

#[tokio::test]
async fn test_create_notification_forwards_to_push() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repo) = setup();
    let push = MockPushDelivery::new();
    service.set_push_delivery(push.clone());

    service
        .create_notification(input(alice(), bob(), NotificationType::Follow, "B followed you"))
        .await?;

    assert!(wait_for_deliveries(&push, 1).await, "Expected one push call");
    let delivered = push.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0], repo.all()[0]);

    Ok(())
}

#[tokio::test]
async fn test_push_failure_does_not_fail_creation() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repo) = setup();
    let push = MockPushDelivery::failing();
    service.set_push_delivery(push.clone());

    let result = service
        .create_notification(input(alice(), bob(), NotificationType::Reply, "reply"))
        .await;

    assert!(result.is_ok(), "Push failure must not surface");
    assert_eq!(repo.all().len(), 1);
    assert!(wait_for_deliveries(&push, 1).await);

    Ok(())
}

#[tokio::test]
async fn test_create_notification_without_push_configured() -> Result<(), Box<dyn std::error::Error>>
{
    let (service, repo) = setup();

    service
        .create_notification(input(alice(), bob(), NotificationType::Reply, "reply"))
        .await?;

    assert_eq!(repo.all().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_push_delivery_is_bound_once() {
    let (service, _repo) = setup();
    let first = MockPushDelivery::new();
    let second = MockPushDelivery::new();

    service.set_push_delivery(first.clone());
    service.set_push_delivery(second.clone());

    service
        .create_notification(input(alice(), bob(), NotificationType::Reply, "reply"))
        .await
        .expect("create_notification returned an error");

    assert!(wait_for_deliveries(&first, 1).await);
    assert!(second.delivered().is_empty());
}

// == Queries ==

#[tokio::test]
async fn test_list_notifications_newest_first_with_pagination()
-> Result<(), Box<dyn std::error::Error>> {
    let (service, repo) = setup();
    let oldest = seed(&repo, alice(), 30, true).await?;
    let middle = seed(&repo, alice(), 20, false).await?;
    let newest = seed(&repo, alice(), 10, false).await?;
    seed(&repo, bob(), 5, false).await?;

    let page = service
        .list_notifications(&alice(), &GetPaginated { offset: 0, limit: 2 })
        .await?;
    let ids: Vec<NotificationId> = page.notifications.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![newest.id, middle.id]);
    assert_eq!(page.unread_count, 2);
    assert_eq!(page.meta.total, 3);
    assert_eq!(page.meta.limit, 2);

    let page = service
        .list_notifications(&alice(), &GetPaginated { offset: 2, limit: 2 })
        .await?;
    assert_eq!(page.notifications.len(), 1);
    assert_eq!(page.notifications[0].id, oldest.id);
    assert_eq!(page.meta.offset, 2);

    Ok(())
}

#[tokio::test]
async fn test_list_unread_total_equals_unread_count() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repo) = setup();
    seed(&repo, alice(), 30, true).await?;
    seed(&repo, alice(), 20, false).await?;
    seed(&repo, alice(), 10, false).await?;

    let page = service
        .list_unread_notifications(&alice(), &GetPaginated::default())
        .await?;

    assert_eq!(page.notifications.len(), 2);
    assert!(page.notifications.iter().all(|n| !n.is_read));
    assert_eq!(page.unread_count, 2);
    assert_eq!(page.meta.total, 2, "Unread page total is the unread count");

    Ok(())
}

#[tokio::test]
async fn test_unread_count_matches_unread_rows() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repo) = setup();
    seed(&repo, alice(), 3, false).await?;
    seed(&repo, alice(), 2, true).await?;
    seed(&repo, alice(), 1, false).await?;
    seed(&repo, bob(), 1, false).await?;

    let expected = repo
        .all()
        .iter()
        .filter(|n| n.user_id == alice() && !n.is_read)
        .count() as u64;

    assert_eq!(service.get_unread_count(&alice()).await?, expected);
    assert_eq!(service.get_unread_count(&bob()).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_get_notification_success() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repo) = setup();
    let seeded = seed(&repo, alice(), 1, false).await?;

    let notification = service.get_notification(&seeded.id, &alice()).await?;
    assert_eq!(notification, seeded);

    Ok(())
}

#[tokio::test]
async fn test_get_notification_not_found() {
    let (service, _repo) = setup();
    let missing = NotificationId::new();

    let error = service
        .get_notification(&missing, &alice())
        .await
        .expect_err("Expected NotificationNotFound");

    assert!(matches!(error, CoreError::NotificationNotFound { id } if id == missing));
}

// == Ownership ==

#[tokio::test]
async fn test_other_user_cannot_touch_notification() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repo) = setup();
    let seeded = seed(&repo, alice(), 1, false).await?;

    let get = service.get_notification(&seeded.id, &bob()).await;
    assert!(matches!(get, Err(CoreError::NotNotificationOwner { .. })));

    let mark = service.mark_as_read(&seeded.id, &bob()).await;
    assert!(matches!(mark, Err(CoreError::NotNotificationOwner { .. })));

    let delete = service.delete_notification(&seeded.id, &bob()).await;
    assert!(matches!(delete, Err(CoreError::NotNotificationOwner { .. })));

    // no state change
    assert_eq!(repo.all(), vec![seeded]);

    Ok(())
}

#[tokio::test]
async fn test_mark_as_read_missing_notification() {
    let (service, _repo) = setup();

    let result = service.mark_as_read(&NotificationId::new(), &alice()).await;
    assert!(matches!(result, Err(CoreError::NotificationNotFound { .. })));

    let result = service
        .delete_notification(&NotificationId::new(), &alice())
        .await;
    assert!(matches!(result, Err(CoreError::NotificationNotFound { .. })));
}

// == Mutations ==

#[tokio::test]
async fn test_mark_as_read_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repo) = setup();
    let seeded = seed(&repo, alice(), 1, false).await?;

    service.mark_as_read(&seeded.id, &alice()).await?;
    let once = repo.all();

    service.mark_as_read(&seeded.id, &alice()).await?;
    let twice = repo.all();

    assert_eq!(once, twice);
    assert!(twice[0].is_read);
    assert_eq!(service.get_unread_count(&alice()).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_mark_all_as_read_is_scoped_to_user() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repo) = setup();
    seed(&repo, alice(), 2, false).await?;
    seed(&repo, alice(), 1, false).await?;
    seed(&repo, bob(), 1, false).await?;

    service.mark_all_as_read(&alice()).await?;

    assert_eq!(service.get_unread_count(&alice()).await?, 0);
    assert_eq!(service.get_unread_count(&bob()).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_delete_notification() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repo) = setup();
    let first = seed(&repo, alice(), 2, false).await?;
    let second = seed(&repo, alice(), 1, false).await?;

    service.delete_notification(&first.id, &alice()).await?;

    assert_eq!(repo.all(), vec![second]);
    let result = service.get_notification(&first.id, &alice()).await;
    assert!(matches!(result, Err(CoreError::NotificationNotFound { .. })));

    Ok(())
}

#[tokio::test]
async fn test_delete_all_notifications_is_scoped_to_user() -> Result<(), Box<dyn std::error::Error>>
{
    let (service, repo) = setup();
    seed(&repo, alice(), 2, false).await?;
    seed(&repo, alice(), 1, true).await?;
    let kept = seed(&repo, bob(), 1, false).await?;

    service.delete_all_notifications(&alice()).await?;

    let page = service
        .list_notifications(&alice(), &GetPaginated::default())
        .await?;
    assert!(page.notifications.is_empty());
    assert_eq!(page.meta.total, 0);
    assert_eq!(repo.all(), vec![kept]);

    Ok(())
}

// == Storage failures ==

#[derive(Clone, Copy, PartialEq, Eq)]
enum FailOn {
    CountByUser,
    CountUnreadByUser,
    MarkAsRead,
    Delete,
}

fn storage_error(operation: &str) -> CoreError {
    CoreError::DatabaseError {
        msg: format!("{operation} failed"),
    }
}

fn is_storage_error(error: &CoreError, operation: &str) -> bool {
    matches!(error, CoreError::DatabaseError { msg } if *msg == format!("{operation} failed"))
}

/// Notification store whose `fail_on` operation always errors; every other
/// operation reaches the in-memory store.
#[derive(Clone)]
struct FailingNotificationRepository {
    inner: MockNotificationRepository,
    fail_on: FailOn,
}

impl FailingNotificationRepository {
    fn check(&self, operation: FailOn, name: &str) -> Result<(), CoreError> {
        if self.fail_on == operation {
            return Err(storage_error(name));
        }
        Ok(())
    }
}

impl NotificationRepository for FailingNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<(), CoreError> {
        self.inner.create(notification).await
    }

    async fn find_by_id(&self, id: &NotificationId) -> Result<Option<Notification>, CoreError> {
        self.inner.find_by_id(id).await
    }

    async fn list_by_user(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<Vec<Notification>, CoreError> {
        self.inner.list_by_user(user_id, pagination).await
    }

    async fn list_unread_by_user(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<Vec<Notification>, CoreError> {
        self.inner.list_unread_by_user(user_id, pagination).await
    }

    async fn count_by_user(&self, user_id: &UserId) -> Result<u64, CoreError> {
        self.check(FailOn::CountByUser, "count_by_user")?;
        self.inner.count_by_user(user_id).await
    }

    async fn count_unread_by_user(&self, user_id: &UserId) -> Result<u64, CoreError> {
        self.check(FailOn::CountUnreadByUser, "count_unread_by_user")?;
        self.inner.count_unread_by_user(user_id).await
    }

    async fn mark_as_read(&self, id: &NotificationId) -> Result<(), CoreError> {
        self.check(FailOn::MarkAsRead, "mark_as_read")?;
        self.inner.mark_as_read(id).await
    }

    async fn mark_all_as_read(&self, user_id: &UserId) -> Result<(), CoreError> {
        self.inner.mark_all_as_read(user_id).await
    }

    async fn delete(&self, id: &NotificationId) -> Result<(), CoreError> {
        self.check(FailOn::Delete, "delete")?;
        self.inner.delete(id).await
    }

    async fn delete_all_by_user(&self, user_id: &UserId) -> Result<(), CoreError> {
        self.inner.delete_all_by_user(user_id).await
    }

    async fn delete_read_before(&self, cutoff: DateTime<Utc>) -> Result<u64, CoreError> {
        self.inner.delete_read_before(cutoff).await
    }
}

/// Settings store that cannot be reached.
#[derive(Clone)]
struct UnavailableSettingsRepository;

impl NotificationSettingsRepository for UnavailableSettingsRepository {
    async fn find_by_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<NotificationSettings>, CoreError> {
        Err(storage_error("find_by_user"))
    }

    async fn create(&self, _settings: &NotificationSettings) -> Result<(), CoreError> {
        Err(storage_error("create_settings"))
    }

    async fn update(
        &self,
        _user_id: &UserId,
        _settings: &NotificationSettings,
    ) -> Result<(), CoreError> {
        Err(storage_error("update_settings"))
    }
}

fn failing_setup(
    fail_on: FailOn,
) -> (
    Service<
        FailingNotificationRepository,
        MockNotificationSettingsRepository,
        MockHealthRepository,
        MockPushDelivery,
    >,
    MockNotificationRepository,
) {
    let inner = MockNotificationRepository::new();
    let service = Service::new(
        FailingNotificationRepository {
            inner: inner.clone(),
            fail_on,
        },
        MockNotificationSettingsRepository::new(),
        MockHealthRepository::new(),
    );
    (service, inner)
}

#[tokio::test]
async fn test_list_fails_when_unread_count_fails() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repo) = failing_setup(FailOn::CountUnreadByUser);
    seed(&repo, alice(), 1, false).await?;

    let listed = service
        .list_notifications(&alice(), &GetPaginated::default())
        .await
        .expect_err("Expected the unread count failure");
    assert!(is_storage_error(&listed, "count_unread_by_user"));

    let unread = service
        .list_unread_notifications(&alice(), &GetPaginated::default())
        .await
        .expect_err("Expected the unread count failure");
    assert!(is_storage_error(&unread, "count_unread_by_user"));

    Ok(())
}

#[tokio::test]
async fn test_list_fails_when_total_count_fails() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repo) = failing_setup(FailOn::CountByUser);
    seed(&repo, alice(), 1, false).await?;

    let error = service
        .list_notifications(&alice(), &GetPaginated::default())
        .await
        .expect_err("Expected the total count failure");

    assert!(is_storage_error(&error, "count_by_user"));

    Ok(())
}

#[tokio::test]
async fn test_create_notification_propagates_settings_failure() {
    let repo = MockNotificationRepository::new();
    let push = MockPushDelivery::new();
    let service = Service::new(
        repo.clone(),
        UnavailableSettingsRepository,
        MockHealthRepository::new(),
    );
    service.set_push_delivery(push.clone());

    let error = service
        .create_notification(input(alice(), bob(), NotificationType::Reply, "reply"))
        .await
        .expect_err("Expected the settings lookup failure");

    assert!(is_storage_error(&error, "find_by_user"));
    assert!(repo.all().is_empty(), "Nothing may be stored");
    tokio::task::yield_now().await;
    assert!(push.delivered().is_empty(), "Nothing may be pushed");
}

#[tokio::test]
async fn test_mark_as_read_passes_storage_error_through() -> Result<(), Box<dyn std::error::Error>>
{
    let (service, repo) = failing_setup(FailOn::MarkAsRead);
    let seeded = seed(&repo, alice(), 1, false).await?;

    let error = service
        .mark_as_read(&seeded.id, &alice())
        .await
        .expect_err("Expected the mark_as_read failure");

    assert!(is_storage_error(&error, "mark_as_read"));
    assert_eq!(repo.all(), vec![seeded]);

    Ok(())
}

#[tokio::test]
async fn test_delete_notification_passes_storage_error_through()
-> Result<(), Box<dyn std::error::Error>> {
    let (service, repo) = failing_setup(FailOn::Delete);
    let seeded = seed(&repo, alice(), 1, false).await?;

    let error = service
        .delete_notification(&seeded.id, &alice())
        .await
        .expect_err("Expected the delete failure");

    assert!(is_storage_error(&error, "delete"));
    assert_eq!(repo.all(), vec![seeded]);

    Ok(())
}
