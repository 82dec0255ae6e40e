//! Bearer token expiry inspection.
//!
//! The client never holds the signing key, so tokens are decoded without
//! signature validation and only the `exp` claim is looked at.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;

/// Reports whether a token's embedded expiry has passed.
pub trait TokenExpiryCheck: Send + Sync {
    fn is_expired(&self, token: &str) -> bool;
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

/// Expiry check for JWT-encoded tokens.
#[derive(Debug, Clone, Default)]
pub struct JwtExpiryCheck {
    leeway_secs: u64,
}

impl JwtExpiryCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat tokens as expired `leeway_secs` before their `exp`.
    pub fn with_leeway(leeway_secs: u64) -> Self {
        Self { leeway_secs }
    }

    /// Decode the `exp` claim (seconds since the epoch).
    pub fn expires_at(token: &str) -> Option<i64> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        match decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
            Ok(data) => data.claims.exp,
            Err(e) => {
                tracing::debug!("Could not decode token claims: {}", e);
                None
            }
        }
    }
}

impl TokenExpiryCheck for JwtExpiryCheck {
    fn is_expired(&self, token: &str) -> bool {
        match Self::expires_at(token) {
            Some(exp) => {
                let now = chrono::Utc::now().timestamp();
                exp <= now.saturating_add(self.leeway_secs as i64)
            }
            // Undecodable or no expiry: unusable for refresh
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    fn token_with(claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-secret"),
        )
        .unwrap()
    }

    fn token_expiring_in(secs: i64) -> String {
        token_with(json!({
            "sub": "parent-1",
            "exp": chrono::Utc::now().timestamp() + secs,
        }))
    }

    #[test]
    fn test_future_token_is_valid() {
        let check = JwtExpiryCheck::new();
        assert!(!check.is_expired(&token_expiring_in(3600)));
    }

    #[test]
    fn test_past_token_is_expired() {
        let check = JwtExpiryCheck::new();
        assert!(check.is_expired(&token_expiring_in(-10)));
    }

    #[test]
    fn test_leeway_expires_early() {
        let token = token_expiring_in(30);
        assert!(!JwtExpiryCheck::with_leeway(0).is_expired(&token));
        assert!(JwtExpiryCheck::with_leeway(60).is_expired(&token));
    }

    #[test]
    fn test_garbage_and_missing_exp_are_expired() {
        let check = JwtExpiryCheck::new();
        assert!(check.is_expired("not-a-jwt"));
        assert!(check.is_expired(""));
        assert!(check.is_expired(&token_with(json!({"sub": "parent-1"}))));
    }

    #[test]
    fn test_expires_at_reads_claim() {
        let token = token_with(json!({"exp": 1_900_000_000_i64}));
        assert_eq!(JwtExpiryCheck::expires_at(&token), Some(1_900_000_000));
    }
}
