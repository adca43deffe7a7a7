use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_env() {
    unsafe {
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("PORT");
        std::env::remove_var("DB_MAX_CONNECTIONS");
        std::env::remove_var("ADMIN_TOKEN");
        std::env::remove_var("CORS_ALLOW_ORIGIN");
    }
}

#[test]
fn from_env_applies_defaults_and_parses_overrides() {
    unsafe {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/wrenchmark");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.database_url, "postgres://localhost/wrenchmark");
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert!(cfg.admin_token.is_none());
    assert!(cfg.cors_allow_origin.is_none());

    unsafe {
        std::env::set_var("PORT", "8080");
        std::env::set_var("DB_MAX_CONNECTIONS", "12");
        std::env::set_var("ADMIN_TOKEN", "  s3cret ");
        std::env::set_var("CORS_ALLOW_ORIGIN", "https://wrenchmark.test");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.db_max_connections, 12);
    assert_eq!(cfg.admin_token.as_deref(), Some("s3cret"));
    assert_eq!(cfg.cors_allow_origin.as_deref(), Some("https://wrenchmark.test"));

    unsafe {
        std::env::set_var("CORS_ALLOW_ORIGIN", "*");
        std::env::set_var("ADMIN_TOKEN", "   ");
    }
    let cfg = AppConfig::from_env().unwrap();
    assert!(cfg.cors_allow_origin.is_none());
    assert!(cfg.admin_token.is_none());

    unsafe {
        std::env::set_var("PORT", "not-a-port");
    }
    assert_eq!(
        AppConfig::from_env().unwrap_err(),
        ConfigError::Invalid { var: "PORT", value: "not-a-port".into() }
    );

    unsafe {
        std::env::set_var("PORT", "3000");
        std::env::set_var("DB_MAX_CONNECTIONS", "0");
    }
    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::Invalid { var: "DB_MAX_CONNECTIONS", .. })
    ));

    unsafe {
        clear_env();
    }
    assert_eq!(AppConfig::from_env().unwrap_err(), ConfigError::Missing("DATABASE_URL"));
}
