//! Login redirect helpers.
//!
//! The login screen receives the page the user came from as a `redirect`
//! query parameter and sends them back there afterwards. Only same-origin
//! targets are honoured so the login flow cannot be used as an open redirect.

#[cfg(test)]
#[path = "redirect_test.rs"]
mod redirect_test;

use reqwest::Url;

pub const REDIRECT_PARAM: &str = "redirect";

/// `login_path?redirect=<encoded return_to>`.
#[must_use]
pub fn login_url(login_path: &str, return_to: &str) -> String {
    format!("{login_path}?{REDIRECT_PARAM}={}", urlencoding::encode(return_to))
}

/// Decoded `redirect` value from a query string (leading `?` optional).
#[must_use]
pub fn redirect_param(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == REDIRECT_PARAM)
        .and_then(|(_, value)| urlencoding::decode(&value.replace('+', " ")).map(|v| v.into_owned()).ok())
        .filter(|value| !value.is_empty())
}

/// A target is safe if it is a root-relative path or an absolute URL with
/// exactly the same origin as `current_origin`.
///
/// Protocol-relative (`//host`) and backslash (`/\host`) forms are rejected;
/// browsers resolve both to another host.
#[must_use]
pub fn is_safe_redirect(target: &str, current_origin: &str) -> bool {
    if target.starts_with('/') {
        return !(target.starts_with("//") || target.starts_with("/\\"));
    }
    let (Ok(target), Ok(current)) = (Url::parse(target), Url::parse(current_origin)) else {
        return false;
    };
    let origin = target.origin();
    origin.is_tuple() && origin == current.origin()
}

/// `target` if it is safe, otherwise `fallback`.
#[must_use]
pub fn safe_redirect(target: Option<&str>, current_origin: &str, fallback: &str) -> String {
    match target {
        Some(target) if is_safe_redirect(target, current_origin) => target.to_owned(),
        _ => fallback.to_owned(),
    }
}
