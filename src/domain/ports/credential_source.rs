use std::fmt;

use super::errors::CredentialError;

/// Keys this short or shorter are treated as typos rather than credentials.
pub const MIN_API_KEY_LEN: usize = 10;

/// An API key with surrounding whitespace removed.
///
/// `Debug` and `Display` never print the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Trim `raw`, returning `None` when nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The key, for placing in a request header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Sanity check only; the service may still reject the key.
    pub fn is_ready(&self) -> bool {
        self.0.chars().count() > MIN_API_KEY_LEN
    }

    /// Short form safe for logs and terminal output.
    pub fn redacted(&self) -> String {
        if self.0.chars().count() > 8 {
            let prefix: String = self.0.chars().take(4).collect();
            format!("{prefix}...[REDACTED]")
        } else {
            "[REDACTED]".to_string()
        }
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.redacted()).finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// One place an API key may be stored.
///
/// Sources are consulted in order by the credential resolver; the first one
/// returning a non-blank value wins.
pub trait CredentialSource: Send + Sync {
    /// Short label shown to the user ("secrets file", "environment", ...).
    fn name(&self) -> &'static str;

    /// Look for a key. `Ok(None)` means this source has nothing to offer.
    fn fetch(&self) -> Result<Option<String>, CredentialError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_trims_whitespace() {
        let key = ApiKey::new("  AIzaSyExampleKey123 \n").unwrap();
        assert_eq!(key.expose(), "AIzaSyExampleKey123");
    }

    #[test]
    fn test_api_key_rejects_blank() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new(" \t\n").is_none());
    }

    #[test]
    fn test_api_key_readiness_threshold() {
        assert!(!ApiKey::new("0123456789").unwrap().is_ready());
        assert!(ApiKey::new("0123456789a").unwrap().is_ready());
        assert!(!ApiKey::new("   short   ").unwrap().is_ready());
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("AIzaSyVerySecretValue").unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("VerySecretValue"));
        assert!(debug.contains("AIza...[REDACTED]"));
        assert_eq!(ApiKey::new("tiny").unwrap().to_string(), "[REDACTED]");
    }
}
