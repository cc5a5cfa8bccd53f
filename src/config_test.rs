use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn from_lookup_defaults_to_production() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg.environment, Environment::Production);
    assert_eq!(cfg.identity_api_url, PRODUCTION_IDENTITY_API_URL);
    assert_eq!(cfg.blog_api_url, PRODUCTION_BLOG_API_URL);
    assert_eq!(cfg.login_path, "/login");
    assert_eq!(cfg.session_file, PathBuf::from(DEFAULT_SESSION_FILE));
    assert_eq!(cfg.timeouts, Timeouts::default());
}

#[test]
fn from_lookup_development_uses_localhost() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("BLOGGY_ENV", "development")])).unwrap();
    assert_eq!(cfg.environment, Environment::Development);
    assert_eq!(cfg.identity_api_url, DEVELOPMENT_IDENTITY_API_URL);
    assert_eq!(cfg.blog_api_url, DEVELOPMENT_BLOG_API_URL);
}

#[test]
fn from_lookup_overrides_and_trims_urls() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("BLOGGY_IDENTITY_API_URL", "http://id.test/api/identity/"),
        ("BLOGGY_BLOG_API_URL", "http://blog.test/api/blog//"),
        ("BLOGGY_LOGIN_PATH", "/signin"),
        ("BLOGGY_SESSION_FILE", "/tmp/session.json"),
        ("BLOGGY_REQUEST_TIMEOUT_SECS", "42"),
        ("BLOGGY_CONNECT_TIMEOUT_SECS", " 7 "),
    ]))
    .unwrap();
    assert_eq!(cfg.identity_api_url, "http://id.test/api/identity");
    assert_eq!(cfg.blog_api_url, "http://blog.test/api/blog");
    assert_eq!(cfg.login_path, "/signin");
    assert_eq!(cfg.session_file, PathBuf::from("/tmp/session.json"));
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 42, connect_secs: 7 });
}

#[test]
fn from_lookup_rejects_unknown_environment() {
    let err = ClientConfig::from_lookup(lookup_from(&[("BLOGGY_ENV", "staging")])).unwrap_err();
    assert_eq!(err, ConfigError::UnknownEnvironment("staging".into()));
}

#[test]
fn from_lookup_rejects_bad_timeout() {
    let err = ClientConfig::from_lookup(lookup_from(&[("BLOGGY_REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidNumber { var: "BLOGGY_REQUEST_TIMEOUT_SECS", .. }));
}
