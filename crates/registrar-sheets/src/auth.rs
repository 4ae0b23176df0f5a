use crate::{Result, SheetError};
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Cached tokens are replaced once they are this close to expiring.
pub const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, lifetime: Duration) -> Self {
        let now = Instant::now();
        Self {
            value: value.into(),
            expires_at: now.checked_add(lifetime).unwrap_or(now),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn usable_at(&self, now: Instant) -> bool {
        now.checked_add(REFRESH_MARGIN)
            .is_some_and(|deadline| self.expires_at > deadline)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Mints short-lived bearer tokens for the sheets API.
pub trait TokenSource: Send + Sync {
    fn fetch(&self) -> Result<AccessToken>;
}

/// Hands out the current token, fetching a new one when it is missing,
/// near expiry, or was rejected by the service.
pub struct TokenCache {
    source: Box<dyn TokenSource>,
    current: Mutex<Option<AccessToken>>,
}

impl TokenCache {
    pub fn new(source: impl TokenSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            current: Mutex::new(None),
        }
    }

    pub fn bearer(&self) -> Result<String> {
        // Held across the fetch so concurrent callers share one refresh.
        let mut current = self
            .current
            .lock()
            .map_err(|_| SheetError::Unavailable("token cache lock poisoned".to_string()))?;
        if let Some(token) = current
            .as_ref()
            .filter(|token| token.usable_at(Instant::now()))
        {
            return Ok(token.value.clone());
        }

        let token = self.source.fetch()?;
        let value = token.value.clone();
        *current = Some(token);
        Ok(value)
    }

    pub fn invalidate(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
    }
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache").finish_non_exhaustive()
    }
}
