use std::time::{SystemTime, UNIX_EPOCH};

pub const TOKEN_LEN: usize = 8;

/// Supplies the digits embedded in synthetic emails and text.
pub trait TokenSource: Send + Sync {
    fn next_token(&self) -> String;
}

/// Eight digits mixed from a random draw and the current time.
///
/// Tokens are not guaranteed unique; two records masked in the same instant
/// may share one.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSeededTokens;

impl TokenSource for TimeSeededTokens {
    fn next_token(&self) -> String {
        let random = uuid::Uuid::new_v4().as_u128();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        format!("{:08}", (random ^ nanos) % 100_000_000)
    }
}

/// Always the same token. Handy where output must be reproducible.
#[derive(Debug, Clone)]
pub struct FixedToken(pub String);

impl TokenSource for FixedToken {
    fn next_token(&self) -> String {
        self.0.clone()
    }
}
