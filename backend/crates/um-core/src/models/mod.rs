pub mod email_user;
