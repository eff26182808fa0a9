use serde::{Deserialize, Serialize};

/// A user identity, either read from the local `EmailUser` table or
/// synthesized from a directory entry.
///
/// Directory-sourced users have `id == 0`, `created_at == 0` and no
/// `password_digest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailUser {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_digest: Option<String>,
    pub is_staff: bool,
    pub is_active: bool,
    /// Seconds since the Unix epoch.
    pub created_at: i64,
}

impl EmailUser {
    /// True when the record came from the local store.
    pub fn is_local(&self) -> bool {
        self.id != 0 && self.password_digest.is_some()
    }
}
