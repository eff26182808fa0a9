#![allow(dead_code)]

use um_db::UserDatabase;

/// Opens an in-memory SQLite user database with the schema in place
pub async fn create_test_database() -> UserDatabase {
    UserDatabase::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create test database")
}

/// Adds `count` active non-staff users named user{i}@example.com
pub async fn seed_users(db: &UserDatabase, count: usize) {
    let users = db.users();
    for i in 0..count {
        users
            .add(&format!("user{i}@example.com"), "pw", false, true)
            .await
            .expect("Failed to seed user");
    }
}
