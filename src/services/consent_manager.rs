//! Consent Manager for blogsync.
//!
//! Persists the reader's cookie-banner decision as a single JSON object next
//! to the bookmarks, and announces changes on the event bus so banners and
//! analytics loaders in the same tab react immediately.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use crate::config::SyncConfig;
use crate::events::EventBus;
use crate::storage::PersistentStore;
use crate::types::consent::{ConsentPreferences, CookieCategory, CONSENT_VERSION};
use crate::types::events::SyncEvent;

/// Trait defining cookie-consent operations.
pub trait ConsentManagerTrait {
    fn current(&self) -> Option<ConsentPreferences>;
    fn has_decided(&self) -> bool;
    fn accept_all(&self) -> ConsentPreferences;
    fn reject_non_essential(&self) -> ConsentPreferences;
    fn save(&self, preferences: ConsentPreferences) -> ConsentPreferences;
    fn reset(&self);
    fn allows(&self, category: CookieCategory) -> bool;
}

#[derive(Clone)]
pub struct ConsentManager {
    store: PersistentStore,
    bus: EventBus<SyncEvent>,
    consent_key: String,
    consent_event: String,
    clock: fn() -> DateTime<Utc>,
}

impl ConsentManager {
    pub fn new(store: PersistentStore, bus: EventBus<SyncEvent>, config: &SyncConfig) -> Self {
        Self {
            store,
            bus,
            consent_key: config.consent_key.clone(),
            consent_event: config.consent_event.clone(),
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn consent_key(&self) -> &str {
        &self.consent_key
    }

    pub fn consent_event(&self) -> &str {
        &self.consent_event
    }

    fn publish(&self, preferences: Option<ConsentPreferences>) {
        self.bus
            .publish(&self.consent_event, &SyncEvent::Consent(preferences));
    }
}

impl ConsentManagerTrait for ConsentManager {
    /// The stored decision, if it was made under the current consent version.
    fn current(&self) -> Option<ConsentPreferences> {
        self.store
            .load::<Option<ConsentPreferences>>(&self.consent_key)
            .filter(|p| p.version == CONSENT_VERSION)
    }

    fn has_decided(&self) -> bool {
        self.current().is_some()
    }

    fn accept_all(&self) -> ConsentPreferences {
        self.save(ConsentPreferences::uniform(true, String::new()))
    }

    fn reject_non_essential(&self) -> ConsentPreferences {
        self.save(ConsentPreferences::uniform(false, String::new()))
    }

    /// Stores `preferences`, stamped with the current time and version.
    /// Necessary cookies are always allowed.
    fn save(&self, mut preferences: ConsentPreferences) -> ConsentPreferences {
        preferences.necessary = true;
        preferences.version = CONSENT_VERSION;
        preferences.consented_at = (self.clock)().to_rfc3339_opts(SecondsFormat::Millis, true);

        if self.store.save(&self.consent_key, &preferences) {
            debug!(
                analytics = preferences.analytics,
                marketing = preferences.marketing,
                "cookie consent saved"
            );
            self.publish(Some(preferences.clone()));
        }
        preferences
    }

    /// Forgets the decision so the banner is shown again.
    fn reset(&self) {
        if self.store.remove(&self.consent_key) {
            debug!("cookie consent reset");
            self.publish(None);
        }
    }

    /// Whether `category` may be used. Without a decision only necessary
    /// cookies are allowed.
    fn allows(&self, category: CookieCategory) -> bool {
        match self.current() {
            Some(preferences) => preferences.allows(category),
            None => category == CookieCategory::Necessary,
        }
    }
}
