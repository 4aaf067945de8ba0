use serde::{Deserialize, Serialize};

/// Bumped when the cookie categories change; older decisions are re-asked.
pub const CONSENT_VERSION: u32 = 1;

/// Optional cookie categories a reader can allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookieCategory {
    Necessary,
    Analytics,
    Marketing,
    Preferences,
}

/// A reader's cookie-banner decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentPreferences {
    #[serde(default = "default_true")]
    pub necessary: bool,
    #[serde(default)]
    pub analytics: bool,
    #[serde(default)]
    pub marketing: bool,
    #[serde(default)]
    pub preferences: bool,
    #[serde(default)]
    pub consented_at: String,
    #[serde(default)]
    pub version: u32,
}

fn default_true() -> bool {
    true
}

impl ConsentPreferences {
    /// Preferences with every optional category switched on or off.
    pub fn uniform(allow: bool, consented_at: String) -> Self {
        Self {
            necessary: true,
            analytics: allow,
            marketing: allow,
            preferences: allow,
            consented_at,
            version: CONSENT_VERSION,
        }
    }

    pub fn allows(&self, category: CookieCategory) -> bool {
        match category {
            CookieCategory::Necessary => true,
            CookieCategory::Analytics => self.analytics,
            CookieCategory::Marketing => self.marketing,
            CookieCategory::Preferences => self.preferences,
        }
    }
}
