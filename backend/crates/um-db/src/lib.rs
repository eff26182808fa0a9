pub mod connection;
pub mod dialect;
pub mod error;
pub mod repositories;
pub mod schema;

pub use connection::user_database::UserDatabase;
pub use dialect::Dialect;
pub use error::{DbError, Result};
pub use repositories::email_user_repository::EmailUserRepository;
pub use schema::ensure_schema;
