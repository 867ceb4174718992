use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

fn temp_settings_file(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let root = env::temp_dir().join(format!("ereport_config_test_{suffix}"));
    fs::create_dir_all(&root).expect("temp root");
    let path = root.join("ereport.toml");
    fs::write(&path, contents).expect("write settings");
    path
}

#[test]
fn missing_base_url_is_a_startup_error() {
    let err = RawSettings::default().validate().expect_err("must fail");
    assert!(matches!(err, ConfigError::MissingBaseUrl));
}

#[test]
fn blank_base_url_counts_as_missing() {
    let err = RawSettings {
        api_base_url: Some("   ".to_string()),
        ..RawSettings::default()
    }
    .validate()
    .expect_err("must fail");
    assert!(matches!(err, ConfigError::MissingBaseUrl));
}

#[test]
fn rejects_unparseable_and_non_http_urls() {
    let err = ClientSettings::for_base_url("not a url").expect_err("must fail");
    assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));

    let err = ClientSettings::for_base_url("ftp://school.example/api").expect_err("must fail");
    assert!(matches!(err, ConfigError::UnsupportedScheme(_)));
}

#[test]
fn base_url_gains_trailing_slash_for_joining() {
    let settings = ClientSettings::for_base_url("https://school.example/api/v1").expect("valid");
    assert_eq!(settings.api_base_url.as_str(), "https://school.example/api/v1/");
    assert_eq!(
        settings
            .api_base_url
            .join("teachers")
            .expect("join")
            .as_str(),
        "https://school.example/api/v1/teachers"
    );
}

#[test]
fn defaults_apply_when_only_base_url_is_set() {
    let settings = ClientSettings::for_base_url("http://127.0.0.1:8000").expect("valid");
    assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(
        settings.request_timeout,
        Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
    );
}

#[test]
fn zero_page_size_is_rejected_and_large_sizes_are_capped() {
    let err = RawSettings {
        api_base_url: Some("http://localhost".to_string()),
        page_size: Some(0),
        ..RawSettings::default()
    }
    .validate()
    .expect_err("must fail");
    assert!(matches!(err, ConfigError::Zero("page_size")));

    let settings = RawSettings {
        api_base_url: Some("http://localhost".to_string()),
        page_size: Some(10_000),
        ..RawSettings::default()
    }
    .validate()
    .expect("valid");
    assert_eq!(settings.page_size, MAX_PAGE_SIZE);
}

#[test]
fn environment_overrides_file_values() {
    let path = temp_settings_file(
        "api_base_url = \"http://from-file.example\"\npage_size = 20\n",
    );

    let raw = load_settings_with(
        Some(&path),
        env_from(&[
            ("APP__API_BASE_URL", "http://from-env.example"),
            ("APP__PAGE_SIZE", "50"),
        ]),
    )
    .expect("load");
    assert_eq!(raw.api_base_url.as_deref(), Some("http://from-env.example"));
    assert_eq!(raw.page_size, Some(50));

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn unparseable_numeric_override_is_an_error() {
    let path = temp_settings_file("api_base_url = \"http://from-file.example\"\n");

    for (name, value) in [
        ("APP__PAGE_SIZE", "twenty"),
        ("APP__REQUEST_TIMEOUT_SECS", "-5"),
        ("APP__NOTIFICATION_TTL_SECS", "6s"),
    ] {
        let err = load_settings_with(Some(&path), env_from(&[(name, value)]))
            .expect_err("must fail");
        match err {
            ConfigError::InvalidNumber {
                name: reported,
                value: raw,
            } => {
                assert_eq!(reported, name);
                assert_eq!(raw, value);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn blank_environment_values_are_ignored() {
    let path = temp_settings_file("api_base_url = \"http://from-file.example\"\n");

    let raw = load_settings_with(Some(&path), env_from(&[("EREPORT_API_BASE_URL", "  ")]))
        .expect("load");
    assert_eq!(raw.api_base_url.as_deref(), Some("http://from-file.example"));

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn explicit_settings_file_must_exist() {
    let missing = env::temp_dir().join("ereport_config_test_missing/ereport.toml");
    let err = load_settings_with(Some(&missing), env_from(&[])).expect_err("must fail");
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn malformed_settings_file_reports_parse_error() {
    let path = temp_settings_file("api_base_url = [not toml");
    let err = load_settings_with(Some(&path), env_from(&[])).expect_err("must fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}
