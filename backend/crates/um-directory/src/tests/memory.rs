use crate::{DirectoryConnector, DirectoryError, MemoryDirectory};

use googletest::prelude::*;

async fn directory() -> MemoryDirectory {
    let directory = MemoryDirectory::new();
    directory
        .add_entry("uid=bob,ou=people,dc=x,dc=com", "bobpw", &[("mail", "bob@x.com")])
        .await;
    directory
        .add_entry("uid=eve,ou=people,dc=x,dc=com", "evepw", &[("mail", "eve@x.com")])
        .await;
    directory
        .add_entry("cn=printer,dc=x,dc=com", "", &[("cn", "printer")])
        .await;
    directory
}

#[tokio::test]
async fn given_entry_password_when_binding_as_entry_then_bind_succeeds() {
    // Given
    let directory = directory().await;

    // When
    let session = directory
        .bind(Some("uid=bob,ou=people,dc=x,dc=com"), Some("bobpw"))
        .await;

    // Then
    assert!(session.is_ok());
    assert_that!(directory.bind_count().await, eq(1));
}

#[tokio::test]
async fn given_wrong_password_when_binding_then_bind_error() {
    // Given
    let directory = directory().await;

    // When
    let session = directory
        .bind(Some("uid=bob,ou=people,dc=x,dc=com"), Some("nope"))
        .await;

    // Then
    assert!(matches!(session, Err(DirectoryError::Bind { .. })));
}

#[tokio::test]
async fn given_outage_when_binding_then_connection_error() {
    // Given
    let directory = directory().await;
    directory.set_available(false).await;

    // When
    let session = directory.bind(None, None).await;

    // Then
    assert!(matches!(session, Err(DirectoryError::Connection { .. })));
}

#[tokio::test]
async fn given_wildcard_filter_when_searching_then_only_entries_with_attribute_match() {
    // Given
    let directory = directory().await;
    let Ok(mut session) = directory.bind(None, None).await else {
        panic!("anonymous bind failed");
    };

    // When
    let entries = session.search("dc=x,dc=com", "(mail=*)", &["mail"]).await.unwrap();

    // Then
    assert_that!(entries, len(eq(2)));
}

#[tokio::test]
async fn given_base_outside_tree_when_searching_then_nothing_matches() {
    // Given
    let directory = directory().await;
    let Ok(mut session) = directory.bind(None, None).await else {
        panic!("anonymous bind failed");
    };

    // When
    let entries = session.search("dc=y,dc=com", "(mail=*)", &["mail"]).await.unwrap();

    // Then
    assert_that!(entries, is_empty());
}

#[tokio::test]
async fn given_requested_attributes_when_searching_then_others_are_dropped() {
    // Given
    let directory = MemoryDirectory::new();
    directory
        .add_entry("uid=bob,dc=x", "pw", &[("mail", "bob@x.com"), ("cn", "Bob")])
        .await;
    let Ok(mut session) = directory.bind(None, None).await else {
        panic!("anonymous bind failed");
    };

    // When
    let entries = session.search("dc=x", "(mail=bob@x.com)", &["mail"]).await;

    // Then
    let Ok(entries) = entries else {
        panic!("search failed");
    };
    assert_that!(entries, len(eq(1)));
    assert_that!(entries[0].first("mail"), some(eq("bob@x.com")));
    assert_that!(entries[0].first("cn"), none());
}

#[tokio::test]
async fn given_malformed_filter_when_searching_then_search_error() {
    // Given
    let directory = directory().await;
    let Ok(mut session) = directory.bind(None, None).await else {
        panic!("anonymous bind failed");
    };

    // When
    let entries = session.search("dc=x,dc=com", "mail=bob", &["mail"]).await;

    // Then
    assert!(matches!(entries, Err(DirectoryError::Search { .. })));
}
