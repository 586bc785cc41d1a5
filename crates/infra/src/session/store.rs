//! Session store over the persistent cookie jar

use std::sync::Arc;

use async_trait::async_trait;
use eloquia_core::AuthSessionStore;
use tracing::info;

use crate::cookies::PersistentCookieJar;

/// [`AuthSessionStore`] delegating retention and teardown to the cookie jar.
pub struct CookieSessionStore {
    jar: Arc<PersistentCookieJar>,
}

impl CookieSessionStore {
    pub fn new(jar: Arc<PersistentCookieJar>) -> Self {
        Self { jar }
    }
}

#[async_trait]
impl AuthSessionStore for CookieSessionStore {
    async fn is_remember_me_enabled(&self) -> bool {
        self.jar.is_remember_me_enabled()
    }

    async fn set_remember_me_enabled(&self, enabled: bool) {
        info!(enabled, "toggling session retention");
        self.jar.set_remember_me_enabled(enabled);
    }

    async fn clear_remembered_session(&self) {
        self.jar.clear_remembered();
    }

    async fn clear_session(&self) {
        info!("clearing session");
        self.jar.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use eloquia_core::KeyValueStore;
    use url::Url;

    use crate::cookies::store::{COOKIES_KEY, REMEMBER_ME_KEY};
    use crate::cookies::SessionCookie;
    use crate::prefs::MemoryKeyValueStore;

    use super::*;

    fn session_cookie() -> SessionCookie {
        SessionCookie {
            name: "SESSION".to_string(),
            value: "abc".to_string(),
            domain: Some("example.com".to_string()),
            path: Some("/".to_string()),
            expires_epoch_millis: None,
            max_age: None,
            secure: false,
            http_only: true,
        }
    }

    #[tokio::test]
    async fn toggling_retention_flips_durable_flag() {
        let prefs = Arc::new(MemoryKeyValueStore::default());
        let jar = Arc::new(PersistentCookieJar::new(prefs.clone()));
        let store = CookieSessionStore::new(jar);

        assert!(!store.is_remember_me_enabled().await);
        store.set_remember_me_enabled(true).await;
        assert!(prefs.get_bool(REMEMBER_ME_KEY, false));
    }

    #[tokio::test]
    async fn clear_session_wipes_jar() {
        let prefs = Arc::new(MemoryKeyValueStore::default());
        let jar = Arc::new(PersistentCookieJar::new(prefs.clone()));
        jar.set_remember_me_enabled(true);
        jar.add(&Url::parse("https://example.com/").unwrap(), session_cookie());

        let store = CookieSessionStore::new(jar.clone());
        store.clear_session().await;

        assert!(jar.get(&Url::parse("https://example.com/").unwrap()).is_empty());
        assert!(prefs.get_string(COOKIES_KEY).is_none());
        assert!(!store.is_remember_me_enabled().await);
    }
}
