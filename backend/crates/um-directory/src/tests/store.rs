use crate::{
    DirectoryEntry, DirectoryError, DirectorySettings, DirectoryStore, MemoryDirectory,
    SearchPattern, user_from_entry,
};

use std::collections::HashMap;
use std::sync::Arc;

use googletest::prelude::*;

const BASE: &str = "ou=people,dc=x,dc=com";
const SERVICE_DN: &str = "cn=svc,dc=x,dc=com";

async fn setup() -> (MemoryDirectory, DirectoryStore) {
    let directory = MemoryDirectory::new();
    directory.set_service_account(SERVICE_DN, "svcpw").await;
    directory
        .add_entry("uid=bob,ou=people,dc=x,dc=com", "bobpw", &[("mail", "bob@x.com")])
        .await;
    directory
        .add_entry("uid=amy,ou=people,dc=x,dc=com", "amypw", &[("mail", "amy@x.com")])
        .await;

    let settings =
        DirectorySettings::new("memory", BASE).with_bind_account(SERVICE_DN, "svcpw");
    let store = DirectoryStore::new(settings, Arc::new(directory.clone()));

    (directory, store)
}

#[tokio::test]
async fn given_correct_secret_when_validating_then_second_bind_succeeds() {
    // Given
    let (directory, store) = setup().await;

    // When
    let result = store.validate("bob@x.com", "bobpw").await;

    // Then
    assert!(result.is_ok());
    // service bind for the search, then the user bind
    assert_that!(directory.bind_count().await, eq(2));
}

#[tokio::test]
async fn given_wrong_secret_when_validating_then_unauthorized() {
    // Given
    let (_directory, store) = setup().await;

    // When
    let result = store.validate("bob@x.com", "amypw").await;

    // Then
    assert!(matches!(result, Err(DirectoryError::Unauthorized { .. })));
}

#[tokio::test]
async fn given_unknown_login_when_validating_then_unauthorized() {
    // Given
    let (_directory, store) = setup().await;

    // When
    let result = store.validate("nobody@x.com", "bobpw").await;

    // Then
    assert!(matches!(result, Err(DirectoryError::Unauthorized { .. })));
}

#[tokio::test]
async fn given_empty_secret_when_validating_then_unauthorized_without_bind() {
    // Given
    let (directory, store) = setup().await;

    // When
    let result = store.validate("bob@x.com", "").await;

    // Then
    assert!(matches!(result, Err(DirectoryError::Unauthorized { .. })));
    assert_that!(directory.bind_count().await, eq(0));
}

#[tokio::test]
async fn given_outage_when_validating_then_unauthorized() {
    // Given
    let (directory, store) = setup().await;
    directory.set_available(false).await;

    // When
    let result = store.validate("bob@x.com", "bobpw").await;

    // Then
    assert!(matches!(result, Err(DirectoryError::Unauthorized { .. })));
}

#[tokio::test]
async fn given_wrong_service_password_when_listing_then_bind_error() {
    // Given
    let (directory, _store) = setup().await;
    let settings = DirectorySettings::new("memory", BASE).with_bind_account(SERVICE_DN, "bad");
    let store = DirectoryStore::new(settings, Arc::new(directory));

    // When
    let result = store.list(&SearchPattern::All).await;

    // Then
    assert!(matches!(result, Err(DirectoryError::Bind { .. })));
}

#[tokio::test]
async fn given_wildcard_when_listing_then_records_use_directory_defaults() {
    // Given
    let (_directory, store) = setup().await;

    // When
    let users = store.list(&SearchPattern::All).await;

    // Then
    let Ok(users) = users else {
        panic!("list failed");
    };
    assert_that!(users, len(eq(2)));
    for user in &users {
        assert_that!(user.id, eq(0));
        assert_that!(user.is_staff, eq(false));
        assert_that!(user.is_active, eq(true));
        assert_that!(user.created_at, eq(0));
    }
}

#[tokio::test]
async fn given_login_pattern_when_counting_then_only_that_entry_counts() {
    // Given
    let (_directory, store) = setup().await;

    // When
    let count = store.count(&SearchPattern::login("amy@x.com")).await;

    // Then
    assert_that!(count, eq(1));
}

#[tokio::test]
async fn given_no_matches_when_counting_then_zero() {
    // Given
    let (_directory, store) = setup().await;

    // When
    let count = store.count(&SearchPattern::login("zed@x.com")).await;

    // Then
    assert_that!(count, eq(0));
}

#[tokio::test]
async fn given_outage_when_counting_then_minus_one() {
    // Given
    let (directory, store) = setup().await;
    directory.set_available(false).await;

    // When
    let count = store.count(&SearchPattern::All).await;

    // Then
    assert_that!(count, eq(-1));
}

#[test]
fn given_entry_without_login_attribute_when_normalizing_then_skipped() {
    // Given
    let entry = DirectoryEntry {
        dn: "cn=printer,dc=x".to_string(),
        attrs: HashMap::new(),
    };

    // When
    let user = user_from_entry(&entry, "mail");

    // Then
    assert_that!(user, none());
}

#[test]
fn given_entry_with_several_values_when_normalizing_then_first_is_email() {
    // Given
    let entry = DirectoryEntry {
        dn: "uid=bob,dc=x".to_string(),
        attrs: HashMap::from([(
            "mail".to_string(),
            vec!["bob@x.com".to_string(), "robert@x.com".to_string()],
        )]),
    };

    // When
    let user = user_from_entry(&entry, "mail");

    // Then
    let Some(user) = user else {
        panic!("expected a record");
    };
    assert_that!(user.email, eq("bob@x.com"));
    assert_that!(user.password_digest, none());
}

#[test]
fn given_attribute_in_other_case_when_normalizing_then_still_found() {
    // Given: The server spells the attribute differently from the config
    let entry = DirectoryEntry {
        dn: "uid=bob,dc=x".to_string(),
        attrs: HashMap::from([("mail".to_string(), vec!["bob@x.com".to_string()])]),
    };

    // When
    let user = user_from_entry(&entry, "Mail");

    // Then
    let Some(user) = user else {
        panic!("expected a record");
    };
    assert_that!(user.email, eq("bob@x.com"));
}

#[tokio::test]
async fn given_login_attr_in_other_case_when_listing_then_entries_kept() {
    // Given
    let directory = MemoryDirectory::new();
    directory
        .add_entry(
            "uid=bob,ou=people,dc=x,dc=com",
            "bobpw",
            &[("sAMAccountName", "bob@x.com")],
        )
        .await;
    let settings = DirectorySettings::new("memory", BASE).with_login_attr("samaccountname");
    let store = DirectoryStore::new(settings, Arc::new(directory));

    // When
    let users = store.list(&SearchPattern::All).await.unwrap();

    // Then
    assert_that!(users, len(eq(1)));
    assert_that!(users[0].email, eq("bob@x.com"));
    assert_that!(store.count(&SearchPattern::All).await, eq(1));
}
