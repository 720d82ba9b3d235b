//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

#[test]
fn default_config_path_contains_pagelist_config_toml() {
    let path = default_config_path().expect("Should have default path");
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("pagelist") && path_str.ends_with("config.toml"),
        "Path should contain 'pagelist' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn default_log_path_ends_with_pagelist_log() {
    let path = default_log_path();
    assert!(
        path.to_string_lossy().ends_with("pagelist.log"),
        "Default log path should end with 'pagelist.log', got: {:?}",
        path
    );
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = env::temp_dir().join("pagelist_test_config.toml");

    let toml_content = r#"
page_size = 25
auto_refresh_secs = 10
key_field = "uuid"
summary_field = "message"
log_file_path = "/tmp/pagelist-test.log"
"#;

    fs::write(&config_path, toml_content).expect("Failed to write test config");

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    assert_eq!(config.page_size, Some(25));
    assert_eq!(config.auto_refresh_secs, Some(10));
    assert_eq!(config.key_field, Some("uuid".to_string()));
    assert_eq!(config.summary_field, Some("message".to_string()));
    assert_eq!(
        config.log_file_path,
        Some(PathBuf::from("/tmp/pagelist-test.log"))
    );

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = env::temp_dir().join("pagelist_test_invalid.toml");

    fs::write(&config_path, "this is not valid TOML ][}{")
        .expect("Failed to write invalid test config");

    let result = load_config_file(&config_path);

    match result {
        Err(ConfigError::ParseError { path, reason: _ }) => {
            assert_eq!(path, config_path);
        }
        _ => panic!("Expected ParseError, got {:?}", result),
    }

    fs::remove_file(config_path).ok();
}

#[test]
fn config_file_rejects_unknown_fields() {
    let result: Result<ConfigFile, _> = toml::from_str("page_size = 5\ntheme = \"dark\"\n");

    assert!(result.is_err(), "Unknown field 'theme' should be rejected");
}

#[test]
fn merge_config_uses_defaults_when_none() {
    let resolved = merge_config(None);

    assert_eq!(resolved, ResolvedConfig::default());
    assert_eq!(resolved.page_size, 50);
    assert_eq!(resolved.auto_refresh_secs, 0);
    assert_eq!(resolved.key_field, "id");
    assert_eq!(resolved.summary_field, None);
}

#[test]
fn merge_config_uses_defaults_for_none_fields() {
    let config_file = ConfigFile {
        page_size: Some(10),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(config_file));

    assert_eq!(resolved.page_size, 10);
    assert_eq!(resolved.key_field, "id");
    assert_eq!(resolved.log_file_path, default_log_path());
}

#[test]
fn list_config_enables_auto_refresh_for_nonzero_interval() {
    let resolved = ResolvedConfig {
        page_size: 20,
        auto_refresh_secs: 5,
        ..ResolvedConfig::default()
    };

    let list = resolved.list_config().unwrap();

    assert_eq!(list.page_size(), 20);
    assert_eq!(list.auto_refresh(), Some(Duration::from_secs(5)));
}

#[test]
fn list_config_rejects_zero_page_size() {
    let resolved = ResolvedConfig {
        page_size: 0,
        ..ResolvedConfig::default()
    };

    assert_eq!(
        resolved.list_config(),
        Err(ConfigError::InvalidList(ListError::ZeroPageSize))
    );
}

#[test]
fn list_config_without_refresh_interval() {
    let list = ResolvedConfig::default().list_config().unwrap();

    assert_eq!(list.auto_refresh(), None);
}

/// RAII guard to ensure environment variable cleanup even under test parallelism.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
#[serial(pagelist_env)]
fn apply_env_overrides_respects_page_size_and_refresh() {
    let _page = EnvGuard::new(PAGE_SIZE_ENV);
    let _refresh = EnvGuard::new(REFRESH_SECS_ENV);
    env::set_var(PAGE_SIZE_ENV, "7");
    env::set_var(REFRESH_SECS_ENV, " 30 ");

    let result = apply_env_overrides(ResolvedConfig::default()).unwrap();

    assert_eq!(result.page_size, 7);
    assert_eq!(result.auto_refresh_secs, 30);
    assert_eq!(result.key_field, "id");
}

#[test]
#[serial(pagelist_env)]
fn apply_env_overrides_rejects_garbage() {
    let _page = EnvGuard::new(PAGE_SIZE_ENV);
    env::set_var(PAGE_SIZE_ENV, "many");

    let result = apply_env_overrides(ResolvedConfig::default());

    assert_eq!(
        result,
        Err(ConfigError::InvalidEnv {
            var: PAGE_SIZE_ENV,
            value: "many".to_string(),
        })
    );
}

#[test]
#[serial(pagelist_env)]
fn apply_env_overrides_no_change_when_env_var_not_set() {
    let _page = EnvGuard::new(PAGE_SIZE_ENV);
    let _refresh = EnvGuard::new(REFRESH_SECS_ENV);

    let base = ResolvedConfig::default();
    let result = apply_env_overrides(base.clone()).unwrap();

    assert_eq!(result, base);
}

#[test]
#[serial(pagelist_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let temp_dir = env::temp_dir();
    let explicit_path = temp_dir.join("pagelist_explicit.toml");
    let env_path = temp_dir.join("pagelist_env.toml");
    fs::write(&explicit_path, "page_size = 11\n").expect("Failed to write explicit config");
    fs::write(&env_path, "page_size = 22\n").expect("Failed to write env config");
    env::set_var(CONFIG_ENV, &env_path);

    let config = load_config_with_precedence(Some(explicit_path.clone()))
        .unwrap()
        .unwrap();

    assert_eq!(
        config.page_size,
        Some(11),
        "Should use explicit path, not PAGELIST_CONFIG env var"
    );

    fs::remove_file(explicit_path).ok();
    fs::remove_file(env_path).ok();
}

#[test]
#[serial(pagelist_config)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let env_path = env::temp_dir().join("pagelist_env_only.toml");
    fs::write(&env_path, "key_field = \"uuid\"\n").expect("Failed to write env config");
    env::set_var(CONFIG_ENV, &env_path);

    let config = load_config_with_precedence(None).unwrap().unwrap();

    assert_eq!(config.key_field, Some("uuid".to_string()));

    fs::remove_file(env_path).ok();
}

#[test]
fn apply_cli_overrides_only_touches_set_flags() {
    let base = ResolvedConfig {
        summary_field: Some("msg".to_string()),
        ..ResolvedConfig::default()
    };

    let result = apply_cli_overrides(
        base.clone(),
        CliOverrides {
            page_size: Some(3),
            ..CliOverrides::default()
        },
    );

    assert_eq!(result.page_size, 3);
    assert_eq!(result.summary_field, base.summary_field);
    assert_eq!(result.auto_refresh_secs, base.auto_refresh_secs);
}

#[test]
#[serial(pagelist_env)]
fn precedence_chain_full_defaults_to_cli() {
    let _page = EnvGuard::new(PAGE_SIZE_ENV);
    let _refresh = EnvGuard::new(REFRESH_SECS_ENV);

    // File sets page size and refresh, env overrides refresh, CLI overrides page size.
    let file = ConfigFile {
        page_size: Some(10),
        auto_refresh_secs: Some(60),
        key_field: Some("uuid".to_string()),
        ..ConfigFile::default()
    };
    env::set_var(REFRESH_SECS_ENV, "15");

    let merged = merge_config(Some(file));
    let with_env = apply_env_overrides(merged).unwrap();
    let resolved = apply_cli_overrides(
        with_env,
        CliOverrides {
            page_size: Some(5),
            ..CliOverrides::default()
        },
    );

    assert_eq!(resolved.page_size, 5);
    assert_eq!(resolved.auto_refresh_secs, 15);
    assert_eq!(resolved.key_field, "uuid");
}
