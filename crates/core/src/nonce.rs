//! Anti-forgery tokens for the license form

use sha2::{Digest, Sha256};

/// Default token lifetime: 24 hours, split into two 12-hour ticks.
pub const DEFAULT_LIFETIME_SECS: u64 = 24 * 60 * 60;

const TOKEN_HEX_LEN: usize = 10;

/// Issues and checks per-action tokens embedded in submitted forms.
pub trait NonceVerifier {
    fn issue(&self, action: &str) -> String;

    fn verify(&self, action: &str, token: &str) -> bool;
}

impl<T: NonceVerifier + ?Sized> NonceVerifier for &T {
    fn issue(&self, action: &str) -> String {
        (**self).issue(action)
    }

    fn verify(&self, action: &str, token: &str) -> bool {
        (**self).verify(action, token)
    }
}

/// Secret-keyed SHA-256 token over `(tick, action)`.
///
/// A token stays valid for the tick it was issued in and the one after it.
#[derive(Debug, Clone)]
pub struct HashNonce {
    secret: String,
    lifetime_secs: u64,
}

impl HashNonce {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs: DEFAULT_LIFETIME_SECS,
        }
    }

    pub fn with_lifetime(mut self, lifetime_secs: u64) -> Self {
        self.lifetime_secs = lifetime_secs.max(2);
        self
    }

    fn tick(&self, now: u64) -> u64 {
        now.div_ceil(self.lifetime_secs / 2)
    }

    fn token_for_tick(&self, action: &str, tick: u64) -> String {
        let hash = Sha256::digest(format!("{tick}|{action}|{}", self.secret).as_bytes());
        let mut token = hex_encode(&hash);
        token.truncate(TOKEN_HEX_LEN);
        token
    }

    pub fn issue_at(&self, action: &str, now: u64) -> String {
        self.token_for_tick(action, self.tick(now))
    }

    pub fn verify_at(&self, action: &str, token: &str, now: u64) -> bool {
        let token = token.trim();
        if token.len() != TOKEN_HEX_LEN {
            return false;
        }
        let tick = self.tick(now);
        [tick, tick.saturating_sub(1)]
            .iter()
            .any(|t| constant_time_eq(self.token_for_tick(action, *t).as_bytes(), token.as_bytes()))
    }
}

impl NonceVerifier for HashNonce {
    fn issue(&self, action: &str) -> String {
        self.issue_at(action, now_epoch())
    }

    fn verify(&self, action: &str, token: &str) -> bool {
        self.verify_at(action, token, now_epoch())
    }
}

pub fn now_epoch() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Lowercase hex, two chars per byte.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
