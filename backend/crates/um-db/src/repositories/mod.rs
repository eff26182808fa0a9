pub mod email_user_repository;
