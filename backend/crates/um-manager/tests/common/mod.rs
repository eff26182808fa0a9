#![allow(dead_code)]

use std::sync::Arc;

use um_db::UserDatabase;
use um_directory::{DirectorySettings, DirectoryStore, MemoryDirectory};
use um_manager::UserManager;

pub const BASE: &str = "ou=people,dc=x,dc=com";
pub const SERVICE_DN: &str = "cn=svc,dc=x,dc=com";
pub const SERVICE_PASSWORD: &str = "svcpw";

pub async fn create_test_database() -> UserDatabase {
    UserDatabase::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create test database")
}

pub async fn local_manager() -> UserManager {
    UserManager::new(create_test_database().await, None)
}

/// Directory with bob and amy, reached through a service account.
pub async fn directory_fixture() -> MemoryDirectory {
    let directory = MemoryDirectory::new();
    directory
        .set_service_account(SERVICE_DN, SERVICE_PASSWORD)
        .await;
    directory
        .add_entry("uid=bob,ou=people,dc=x,dc=com", "bobpw", &[("mail", "bob@x.com")])
        .await;
    directory
        .add_entry("uid=amy,ou=people,dc=x,dc=com", "amypw", &[("mail", "amy@x.com")])
        .await;
    directory
}

pub async fn directory_manager() -> (UserManager, MemoryDirectory) {
    let directory = directory_fixture().await;
    let settings =
        DirectorySettings::new("memory", BASE).with_bind_account(SERVICE_DN, SERVICE_PASSWORD);
    let store = DirectoryStore::new(settings, Arc::new(directory.clone()));

    (
        UserManager::new(create_test_database().await, Some(store)),
        directory,
    )
}
