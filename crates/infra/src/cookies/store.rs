//! Session cookie jar with a user-toggleable retention policy.
//!
//! Cookies live in memory for the duration of the process; when "remember
//! me" retention is enabled the full jar is additionally serialized to one
//! durable key as a snapshot rewrite on every mutation. Expired cookies are
//! pruned lazily at read time.
//!
//! One mutex guards the lazy one-time load and every read/mutate. This is
//! the only shared mutable resource in the client core with an explicit
//! locking discipline.

use std::sync::Arc;

use chrono::Utc;
use cookie::Cookie as RawCookie;
use eloquia_core::KeyValueStore;
use parking_lot::Mutex;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

/// Durable key holding the retention ("remember me") flag.
pub const REMEMBER_ME_KEY: &str = "auth.rememberMe.enabled";
/// Durable key holding the serialized cookie jar.
pub const COOKIES_KEY: &str = "auth.cookies.json";

/// One stored session cookie. Identity key is `(name, domain, path)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_epoch_millis: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
}

impl SessionCookie {
    /// Parse one `Set-Cookie` header value.
    pub fn parse_set_cookie(raw: &str) -> Option<Self> {
        let parsed = RawCookie::parse(raw.to_owned()).ok()?;
        Some(Self {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            domain: parsed.domain().map(str::to_owned),
            path: parsed.path().map(str::to_owned),
            expires_epoch_millis: parsed
                .expires_datetime()
                .map(|expires| (expires.unix_timestamp_nanos() / 1_000_000) as i64),
            max_age: parsed.max_age().map(|age| age.whole_seconds()),
            secure: parsed.secure().unwrap_or(false),
            http_only: parsed.http_only().unwrap_or(false),
        })
    }

    fn same_key(&self, other: &Self) -> bool {
        self.name == other.name
            && self.domain.as_deref().unwrap_or("") == other.domain.as_deref().unwrap_or("")
            && self.path.as_deref().unwrap_or("/") == other.path.as_deref().unwrap_or("/")
    }

    fn is_expired(&self, now_millis: i64) -> bool {
        self.expires_epoch_millis.is_some_and(|expires| expires <= now_millis)
    }

    fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };

        let cookie_domain = self.domain.as_deref().unwrap_or(host).trim_start_matches('.');
        let domain_matches =
            host == cookie_domain || host.ends_with(&format!(".{cookie_domain}"));

        let cookie_path = self.path.as_deref().unwrap_or("/");
        let path_matches = url.path().starts_with(cookie_path);

        let secure_matches = !self.secure || url.scheme().eq_ignore_ascii_case("https");

        domain_matches && path_matches && secure_matches
    }
}

#[derive(Default)]
struct JarState {
    loaded: bool,
    cookies: Vec<SessionCookie>,
}

/// Persistent cookie jar over a durable key-value store.
pub struct PersistentCookieJar {
    prefs: Arc<dyn KeyValueStore>,
    state: Mutex<JarState>,
}

impl PersistentCookieJar {
    /// Create a jar over the given preference store. Nothing is read from
    /// durable storage until the first access.
    pub fn new(prefs: Arc<dyn KeyValueStore>) -> Self {
        Self { prefs, state: Mutex::new(JarState::default()) }
    }

    /// Whether cookies are persisted across restarts.
    pub fn is_remember_me_enabled(&self) -> bool {
        self.prefs.get_bool(REMEMBER_ME_KEY, false)
    }

    /// Toggle retention. Disabling wipes only the persisted copy; in-memory
    /// cookies stay valid for the remainder of this run.
    pub fn set_remember_me_enabled(&self, enabled: bool) {
        self.prefs.put_bool(REMEMBER_ME_KEY, enabled);
        if !enabled {
            self.prefs.remove(COOKIES_KEY);
        }
    }

    /// Drop the persisted cookie copy without touching the live session.
    pub fn clear_remembered(&self) {
        self.prefs.remove(COOKIES_KEY);
    }

    /// Wipe both persisted and in-memory cookies and force retention off.
    /// Use when the session is invalid or on logout.
    pub fn clear_all(&self) {
        let mut state = self.state.lock();
        state.cookies.clear();
        state.loaded = true;
        self.prefs.remove(COOKIES_KEY);
        self.prefs.put_bool(REMEMBER_ME_KEY, false);
        debug!("cleared session cookies");
    }

    /// All non-expired cookies matching the request URL's domain, path, and
    /// scheme.
    pub fn get(&self, url: &Url) -> Vec<SessionCookie> {
        let mut state = self.state.lock();
        self.ensure_loaded(&mut state);

        let now = Utc::now().timestamp_millis();
        state
            .cookies
            .iter()
            .filter(|cookie| !cookie.is_expired(now) && cookie.matches(url))
            .cloned()
            .collect()
    }

    /// Store a cookie received for the given URL, replacing any existing
    /// cookie with the same `(name, domain, path)` key.
    pub fn add(&self, url: &Url, cookie: SessionCookie) {
        let mut state = self.state.lock();
        self.ensure_loaded(&mut state);

        state.cookies.retain(|existing| !existing.same_key(&cookie));
        if !cookie.is_expired(Utc::now().timestamp_millis()) {
            debug!(name = %cookie.name, host = ?url.host_str(), "storing session cookie");
            state.cookies.push(cookie);
        }
        self.persist_if_enabled(&state);
    }

    fn ensure_loaded(&self, state: &mut JarState) {
        if state.loaded {
            return;
        }
        state.loaded = true;

        if !self.prefs.get_bool(REMEMBER_ME_KEY, false) {
            return;
        }

        let Some(raw) = self.prefs.get_string(COOKIES_KEY) else {
            return;
        };
        if raw.trim().is_empty() {
            return;
        }

        match serde_json::from_str::<Vec<SessionCookie>>(&raw) {
            Ok(cookies) => state.cookies = cookies,
            Err(err) => warn!(error = %err, "discarding unreadable persisted cookie jar"),
        }
    }

    fn persist_if_enabled(&self, state: &JarState) {
        if !self.prefs.get_bool(REMEMBER_ME_KEY, false) {
            return;
        }

        // Full-snapshot rewrite, never a partial append.
        match serde_json::to_string(&state.cookies) {
            Ok(encoded) => self.prefs.put_string(COOKIES_KEY, &encoded),
            Err(err) => warn!(error = %err, "failed to encode cookie jar"),
        }
    }
}

impl reqwest::cookie::CookieStore for PersistentCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        for header in cookie_headers {
            let Ok(raw) = header.to_str() else {
                continue;
            };
            let Some(cookie) = SessionCookie::parse_set_cookie(raw) else {
                continue;
            };
            self.add(url, cookie);
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let cookies = self.get(url);
        if cookies.is_empty() {
            return None;
        }

        let header = cookies
            .iter()
            .map(|cookie| format!("{}={}", cookie.name, cookie.value))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&header).ok()
    }
}

#[cfg(test)]
mod tests {
    use crate::prefs::MemoryKeyValueStore;

    use super::*;

    fn cookie(name: &str, value: &str) -> SessionCookie {
        SessionCookie {
            name: name.to_string(),
            value: value.to_string(),
            domain: Some("example.com".to_string()),
            path: Some("/".to_string()),
            expires_epoch_millis: None,
            max_age: None,
            secure: false,
            http_only: true,
        }
    }

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    fn jar_over(prefs: Arc<MemoryKeyValueStore>) -> PersistentCookieJar {
        PersistentCookieJar::new(prefs)
    }

    #[test]
    fn replaces_cookie_with_same_key() {
        let jar = jar_over(Arc::new(MemoryKeyValueStore::default()));
        let target = url("https://example.com/x");

        jar.add(&target, cookie("SESSION", "first"));
        jar.add(&target, cookie("SESSION", "second"));

        let cookies = jar.get(&target);
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].value, "second");
    }

    #[test]
    fn suffix_domain_match_includes_subdomains() {
        let jar = jar_over(Arc::new(MemoryKeyValueStore::default()));
        jar.add(&url("https://example.com/"), cookie("SESSION", "abc"));

        let cookies = jar.get(&url("https://api.example.com/x"));
        assert_eq!(cookies.len(), 1);

        let other = jar.get(&url("https://example.org/x"));
        assert!(other.is_empty());
    }

    #[test]
    fn unrelated_host_sharing_suffix_text_does_not_match() {
        let jar = jar_over(Arc::new(MemoryKeyValueStore::default()));
        jar.add(&url("https://example.com/"), cookie("SESSION", "abc"));

        // "badexample.com" ends with "example.com" textually but is not a
        // subdomain.
        assert!(jar.get(&url("https://badexample.com/")).is_empty());
    }

    #[test]
    fn path_prefix_is_required() {
        let jar = jar_over(Arc::new(MemoryKeyValueStore::default()));
        let mut scoped = cookie("SESSION", "abc");
        scoped.path = Some("/api".to_string());
        jar.add(&url("https://example.com/api"), scoped);

        assert_eq!(jar.get(&url("https://example.com/api/entries")).len(), 1);
        assert!(jar.get(&url("https://example.com/other")).is_empty());
    }

    #[test]
    fn secure_cookie_requires_https() {
        let jar = jar_over(Arc::new(MemoryKeyValueStore::default()));
        let mut secure = cookie("SESSION", "abc");
        secure.secure = true;
        jar.add(&url("https://example.com/"), secure);

        assert_eq!(jar.get(&url("https://example.com/")).len(), 1);
        assert!(jar.get(&url("http://example.com/")).is_empty());
    }

    #[test]
    fn expired_cookies_are_pruned_at_read() {
        let jar = jar_over(Arc::new(MemoryKeyValueStore::default()));
        let mut expired = cookie("SESSION", "abc");
        expired.expires_epoch_millis = Some(1);
        jar.add(&url("https://example.com/"), expired);

        assert!(jar.get(&url("https://example.com/")).is_empty());
    }

    #[test]
    fn retention_enabled_survives_restart() {
        let prefs = Arc::new(MemoryKeyValueStore::default());

        let jar = jar_over(prefs.clone());
        jar.set_remember_me_enabled(true);
        jar.add(&url("https://example.com/"), cookie("SESSION", "abc"));
        drop(jar);

        // Fresh jar over the same durable store simulates a process restart.
        let restarted = jar_over(prefs);
        let cookies = restarted.get(&url("https://example.com/"));
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].value, "abc");
    }

    #[test]
    fn retention_disabled_yields_empty_jar_after_restart() {
        let prefs = Arc::new(MemoryKeyValueStore::default());

        let jar = jar_over(prefs.clone());
        jar.add(&url("https://example.com/"), cookie("SESSION", "abc"));
        drop(jar);

        let restarted = jar_over(prefs);
        assert!(restarted.get(&url("https://example.com/")).is_empty());
    }

    #[test]
    fn disabling_retention_keeps_in_memory_session() {
        let prefs = Arc::new(MemoryKeyValueStore::default());
        let jar = jar_over(prefs.clone());

        jar.set_remember_me_enabled(true);
        jar.add(&url("https://example.com/"), cookie("SESSION", "abc"));

        jar.set_remember_me_enabled(false);

        // Persisted copy is gone, live session is not.
        assert!(prefs.get_string(COOKIES_KEY).is_none());
        assert_eq!(jar.get(&url("https://example.com/")).len(), 1);
    }

    #[test]
    fn clear_all_wipes_memory_and_storage_and_retention() {
        let prefs = Arc::new(MemoryKeyValueStore::default());
        let jar = jar_over(prefs.clone());

        jar.set_remember_me_enabled(true);
        jar.add(&url("https://example.com/"), cookie("SESSION", "abc"));

        jar.clear_all();

        assert!(jar.get(&url("https://example.com/")).is_empty());
        assert!(prefs.get_string(COOKIES_KEY).is_none());
        assert!(!jar.is_remember_me_enabled());
    }

    #[test]
    fn parses_set_cookie_attributes() {
        let parsed =
            SessionCookie::parse_set_cookie("SESSION=abc; Path=/; Domain=example.com; Secure; HttpOnly")
                .unwrap();

        assert_eq!(parsed.name, "SESSION");
        assert_eq!(parsed.value, "abc");
        assert_eq!(parsed.domain.as_deref(), Some("example.com"));
        assert_eq!(parsed.path.as_deref(), Some("/"));
        assert!(parsed.secure);
        assert!(parsed.http_only);
    }

    #[test]
    fn expired_set_cookie_removes_existing_key() {
        let jar = jar_over(Arc::new(MemoryKeyValueStore::default()));
        let target = url("https://example.com/");
        jar.add(&target, cookie("SESSION", "abc"));

        let mut tombstone = cookie("SESSION", "");
        tombstone.expires_epoch_millis = Some(1);
        jar.add(&target, tombstone);

        assert!(jar.get(&target).is_empty());
    }

    #[test]
    fn persisted_wire_format_is_stable() {
        let mut stored = cookie("SESSION", "abc");
        stored.expires_epoch_millis = Some(1_700_000_000_000);
        stored.max_age = Some(3600);

        let encoded = serde_json::to_value(&stored).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({
                "name": "SESSION",
                "value": "abc",
                "domain": "example.com",
                "path": "/",
                "expiresEpochMillis": 1_700_000_000_000_i64,
                "maxAge": 3600,
                "secure": false,
                "httpOnly": true,
            })
        );
    }
}
