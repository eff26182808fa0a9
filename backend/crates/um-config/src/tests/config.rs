use crate::tests::{EnvGuard, setup_config_dir, write_config};
use crate::{Config, ConfigError, DatabaseKind};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, none, ok, some};
use log::LevelFilter;
use serial_test::serial;
use std::path::Path;

// =========================================================================
// Loading
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_ok_with_defaults() {
    // Given
    let (_temp, _guard) = setup_config_dir();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    assert_that!(config.database.kind, eq(DatabaseKind::Sqlite));
    assert_that!(config.database.path, eq(crate::DEFAULT_DATABASE_PATH));
    assert_that!(config.ldap.is_enabled(), eq(false));
    assert_that!(config.ldap.login_attr, eq(um_core::DEFAULT_LOGIN_ATTR));
}

#[test]
#[serial]
fn given_no_config_file_when_load_and_validate_then_ok() {
    // Given
    let (_temp, _guard) = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_missing_config_dir_when_load_then_dir_is_created() {
    // Given
    let temp = tempfile::TempDir::new().unwrap();
    let nested = temp.path().join("nested").join("um");
    let _guard = EnvGuard::set("UM_CONFIG_DIR", nested.to_str().unwrap());

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    assert_that!(nested.is_dir(), eq(true));
}

#[test]
#[serial]
fn given_valid_toml_file_when_load_then_uses_toml_values() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(
        &temp,
        r#"
            [database]
            type = "pgsql"
            url = "postgres://um@localhost/um"
            max_connections = 8

            [ldap]
            host = "ldap.x.com"
            base = "dc=x,dc=com"
            login_attr = "uid"

            [logging]
            level = "debug"
            colored = false
        "#,
    );

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.database.kind, eq(DatabaseKind::Postgres));
    assert_that!(config.database.url, some(eq("postgres://um@localhost/um")));
    assert_that!(config.database.max_connections, eq(8));
    assert_that!(config.ldap.is_enabled(), eq(true));
    assert_that!(config.ldap.login_attr, eq("uid"));
    assert_that!(*config.logging.level, eq(LevelFilter::Debug));
    assert_that!(config.logging.colored, eq(false));
    assert_that!(config.validate(), ok(anything()));
}

#[test]
#[serial]
fn given_env_var_and_toml_when_load_then_env_var_overrides_toml() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(
        &temp,
        r#"
            [database]
            type = "mysql"
            url = "mysql://um@localhost/um"
        "#,
    );
    let _type = EnvGuard::set("UM_DATABASE_TYPE", "sqlite");
    let _path = EnvGuard::set("UM_DATABASE_PATH", "data/users.db");
    let _host = EnvGuard::set("UM_LDAP_HOST", "ldap.x.com");
    let _base = EnvGuard::set("UM_LDAP_BASE", "dc=x");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.database.kind, eq(DatabaseKind::Sqlite));
    assert_that!(config.database.path, eq("data/users.db"));
    assert_that!(config.ldap.host, some(eq("ldap.x.com")));
    assert_that!(config.ldap.base, some(eq("dc=x")));
}

#[test]
#[serial]
fn given_unknown_database_type_in_env_when_load_then_toml_value_kept() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _type = EnvGuard::set("UM_DATABASE_TYPE", "oracle");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.database.kind, eq(DatabaseKind::Sqlite));
}

#[test]
#[serial]
fn given_invalid_toml_when_load_then_toml_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(&temp, "[database\ntype = ");

    // When
    let result = Config::load();

    // Then
    assert!(matches!(result, Err(ConfigError::Toml { .. })));
}

#[test]
#[serial]
fn given_config_dir_when_database_path_then_joined_under_dir() {
    // Given
    let (temp, _guard) = setup_config_dir();

    // When
    let path = Config::load().unwrap().database_path().unwrap();

    // Then
    assert_eq!(path, temp.path().join("PeerMgr").join("usermgr.db"));
}

#[test]
#[serial]
fn given_explicit_dir_when_database_path_in_then_joined_under_that_dir() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _path = EnvGuard::set("UM_DATABASE_PATH", "data/users.db");
    let config = Config::load().unwrap();

    // When
    let path = config.database_path_in(Path::new("/srv/um"));

    // Then
    assert_eq!(path, Path::new("/srv/um").join("data").join("users.db"));
}

#[test]
#[serial]
fn given_no_log_file_when_log_file_path_then_none() {
    // Given
    let (_temp, _guard) = setup_config_dir();

    // When
    let path = Config::load().unwrap().log_file_path().unwrap();

    // Then
    assert_that!(path, none());
}

#[test]
#[serial]
fn given_log_file_when_log_file_path_then_under_log_dir() {
    // Given
    let (temp, _guard) = setup_config_dir();
    let _file = EnvGuard::set("UM_LOG_FILE", "um.log");

    // When
    let path = Config::load().unwrap().log_file_path().unwrap();

    // Then
    assert_eq!(path, Some(temp.path().join("log").join("um.log")));
}

#[test]
#[serial]
fn given_ldap_password_when_debug_formatting_then_password_is_masked() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _password = EnvGuard::set("UM_LDAP_PASSWORD", "hunter2");

    // When
    let rendered = format!("{:?}", Config::load().unwrap());

    // Then
    assert!(!rendered.contains("hunter2"));
    assert_that!(rendered, contains_substring("***".to_string()));
}
