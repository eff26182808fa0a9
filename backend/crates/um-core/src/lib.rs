pub mod list_range;
pub mod models;
pub mod password;

pub use list_range::ListRange;
pub use models::email_user::EmailUser;
pub use password::{DIGEST_LEN, hash_password};

/// Directory attribute holding a user's login email when none is configured.
pub const DEFAULT_LOGIN_ATTR: &str = "mail";
