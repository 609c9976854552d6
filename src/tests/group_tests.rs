use super::*;
use crate::core::errors::SplitEaseError;
use crate::core::models::user::display_name;

async fn register(service: &SplitEaseService<InMemoryLogging, InMemoryStorage>, id: &str, name: &str) {
    service
        .upsert_user(id, Some(name.to_string()), Some(format!("{}@example.com", id)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_group_adds_creator_as_member() {
    let service = create_test_service();
    register(&service, "alice", "Alice").await;

    let group = service
        .create_group("Trip".to_string(), "eur".to_string(), "alice")
        .await
        .unwrap();

    assert_eq!(group.currency, "EUR");
    assert_eq!(group.default_split_policy, SplitPolicy::Equal);
    assert_eq!(group.created_by, "alice");

    let details = service.get_group_details(&group.id, "alice").await.unwrap();
    assert_eq!(details.members.len(), 1);
    assert_eq!(details.members[0].name, "Alice");
    assert_eq!(details.members[0].email.as_deref(), Some("alice@example.com"));

    let groups = service.get_groups_for_user("alice").await.unwrap();
    assert_eq!(groups.len(), 1);
}

#[tokio::test]
async fn test_create_group_rejects_bad_currency() {
    let service = create_test_service();
    let result = service
        .create_group("Trip".to_string(), "EURO".to_string(), "alice")
        .await;
    assert!(matches!(result, Err(SplitEaseError::InvalidInput(field, _)) if field == "currency"));
}

#[tokio::test]
async fn test_invite_user_by_email() {
    let service = create_test_service();
    register(&service, "alice", "Alice").await;
    register(&service, "bob", "Bob").await;
    let group = service
        .create_group("Flat".to_string(), "USD".to_string(), "alice")
        .await
        .unwrap();

    let membership = service
        .invite_user_to_group(&group.id, "Bob@Example.com", "alice")
        .await
        .unwrap();
    assert_eq!(membership.user_id, "bob");

    let again = service
        .invite_user_to_group(&group.id, "bob@example.com", "alice")
        .await;
    assert!(matches!(again, Err(SplitEaseError::AlreadyGroupMember(id)) if id == "bob"));

    let unknown = service
        .invite_user_to_group(&group.id, "carol@example.com", "alice")
        .await;
    assert!(matches!(unknown, Err(SplitEaseError::EmailNotFound(_))));
}

#[tokio::test]
async fn test_non_member_cannot_view_or_invite() {
    let service = create_test_service();
    register(&service, "alice", "Alice").await;
    register(&service, "mallory", "Mallory").await;
    let group = service
        .create_group("Flat".to_string(), "USD".to_string(), "alice")
        .await
        .unwrap();

    let details = service.get_group_details(&group.id, "mallory").await;
    assert!(matches!(details, Err(SplitEaseError::NotGroupMember(_))));

    let invite = service
        .invite_user_to_group(&group.id, "mallory@example.com", "mallory")
        .await;
    assert!(matches!(invite, Err(SplitEaseError::NotGroupMember(_))));

    let missing = service.get_group_balances("nope", "alice").await;
    assert!(matches!(missing, Err(SplitEaseError::GroupNotFound(_))));
}

#[tokio::test]
async fn test_update_default_split_policy() {
    let service = create_test_service();
    register(&service, "alice", "Alice").await;
    register(&service, "bob", "Bob").await;
    let group = service
        .create_group("Flat".to_string(), "USD".to_string(), "alice")
        .await
        .unwrap();
    service
        .invite_user_to_group(&group.id, "bob@example.com", "alice")
        .await
        .unwrap();

    let updated = service
        .update_group_settings(
            &group.id,
            Some("Shared flat".to_string()),
            Some(percentages(&[("alice", 0.6), ("bob", 0.4)])),
            "bob",
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Shared flat");
    assert_eq!(updated.default_split_policy.kind(), "PERCENTAGES");
    assert_eq!(updated.currency, "USD");
}

#[tokio::test]
async fn test_update_rejects_invalid_default_policies() {
    let service = create_test_service();
    register(&service, "alice", "Alice").await;
    let group = service
        .create_group("Flat".to_string(), "USD".to_string(), "alice")
        .await
        .unwrap();

    let wrong_total = service
        .update_group_settings(&group.id, None, Some(percentages(&[("alice", 0.9)])), "alice")
        .await;
    assert!(matches!(wrong_total, Err(SplitEaseError::InvalidSplit(_))));

    let empty = service
        .update_group_settings(&group.id, None, Some(SplitPolicy::Percentages { shares: vec![] }), "alice")
        .await;
    assert!(matches!(empty, Err(SplitEaseError::InvalidSplit(_))));

    let fixed = service
        .update_group_settings(&group.id, None, Some(fixed_amounts(&[("alice", 1.0)])), "alice")
        .await;
    assert!(matches!(fixed, Err(SplitEaseError::InvalidSplit(_))));

    let stranger = service
        .update_group_settings(&group.id, None, Some(percentages(&[("zed", 1.0)])), "alice")
        .await;
    assert!(matches!(stranger, Err(SplitEaseError::InvalidSplitUser(id)) if id == "zed"));
}

#[tokio::test]
async fn test_actions_are_logged() {
    let service = create_test_service();
    register(&service, "alice", "Alice").await;
    service
        .create_group("Trip".to_string(), "EUR".to_string(), "alice")
        .await
        .unwrap();

    let logs = service.get_app_logs("alice").await.unwrap();
    let actions: Vec<&str> = logs.iter().map(|l| l.action.as_str()).collect();
    assert_eq!(actions, vec!["USER_UPSERTED", "GROUP_CREATED"]);
    assert_eq!(logs[1].user_id.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_logs_are_scoped_to_the_callers_groups() {
    let service = create_test_service();
    register(&service, "alice", "Alice").await;
    register(&service, "bob", "Bob").await;
    register(&service, "carol", "Carol").await;
    let trip = service
        .create_group("Trip".to_string(), "EUR".to_string(), "alice")
        .await
        .unwrap();
    service
        .create_group("Flat".to_string(), "EUR".to_string(), "bob")
        .await
        .unwrap();

    let before = service.get_app_logs("bob").await.unwrap();
    assert!(before.iter().all(|l| l.details.get("group_id").and_then(|v| v.as_str()) != Some(trip.id.as_str())));
    assert!(before.iter().all(|l| l.user_id.as_deref() == Some("bob")));

    service
        .invite_user_to_group(&trip.id, "bob@example.com", "alice")
        .await
        .unwrap();
    let after = service.get_app_logs("bob").await.unwrap();
    let actions: Vec<&str> = after.iter().map(|l| l.action.as_str()).collect();
    assert_eq!(actions, vec!["USER_UPSERTED", "GROUP_CREATED", "GROUP_CREATED", "MEMBER_INVITED"]);

    let outsider = service.get_app_logs("carol").await.unwrap();
    assert_eq!(outsider.len(), 1);
    assert_eq!(outsider[0].user_id.as_deref(), Some("carol"));
}

#[tokio::test]
async fn test_upsert_user_rejects_taken_email() {
    let service = create_test_service();
    register(&service, "alice", "Alice").await;

    let taken = service
        .upsert_user("bob", None, Some("alice@example.com".to_string()))
        .await;
    assert!(matches!(taken, Err(SplitEaseError::EmailTaken(email)) if email == "alice@example.com"));

    let invalid = service
        .upsert_user("bob", None, Some("not-an-email".to_string()))
        .await;
    assert!(matches!(invalid, Err(SplitEaseError::InvalidInput(_, _))));

    let nameless = service.upsert_user("carol", None, None).await.unwrap();
    assert_eq!(display_name(Some(&nameless)), "Unknown User");

    let renamed = service
        .upsert_user("alice", None, Some("alice@work.example.com".to_string()))
        .await
        .unwrap();
    assert_eq!(renamed.email.as_deref(), Some("alice@work.example.com"));
    let freed = service
        .upsert_user("bob", None, Some("alice@example.com".to_string()))
        .await;
    assert!(freed.is_ok());
}
