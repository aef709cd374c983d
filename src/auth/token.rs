//! Signed, self-expiring session tokens.
//!
//! Format: `<user_id>.<expires_unix>.<hex hmac-sha256>`. The token carries all
//! session state; nothing is stored server-side.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("bad token signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("signing key rejected")]
    InvalidKey,
}

#[derive(Clone)]
pub struct TokenSigner {
    mac: HmacSha256,
    lifetime: Duration,
}

impl TokenSigner {
    pub fn new(secret: &[u8], lifetime: Duration) -> Result<Self, TokenError> {
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| TokenError::InvalidKey)?;
        Ok(Self { mac, lifetime })
    }

    /// Signer with a throwaway key; tokens do not survive a restart
    pub fn ephemeral(lifetime: Duration) -> Result<Self, TokenError> {
        let secret: [u8; 32] = rand::random();
        Self::new(&secret, lifetime)
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn issue(&self, user_id: &str) -> String {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: &str, now: DateTime<Utc>) -> String {
        let expires = now
            .checked_add_signed(self.lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
            .timestamp();
        let payload = format!("{user_id}.{expires}");
        let signature = self.sign(&payload).finalize().into_bytes();
        format!("{payload}.{}", hex::encode(signature))
    }

    /// Returns the user id the token was issued for
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let (payload, signature) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;
        let (user_id, expires) = payload.split_once('.').ok_or(TokenError::Malformed)?;
        if user_id.is_empty() {
            return Err(TokenError::Malformed);
        }
        let signature = hex::decode(signature).map_err(|_| TokenError::Malformed)?;

        // verify_slice compares in constant time
        self.sign(payload)
            .verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let expires: i64 = expires.parse().map_err(|_| TokenError::Malformed)?;
        if expires <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(user_id.to_string())
    }

    fn sign(&self, payload: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(b"test-secret", Duration::days(30)).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let signer = signer();
        let token = signer.issue("abc123");
        assert_eq!(signer.verify(&token).unwrap(), "abc123");
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let signer = signer();
        let token = signer.issue("abc123");
        let forged = token.replacen("abc123", "def456", 1);
        assert_eq!(signer.verify(&forged), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_other_key_is_rejected() {
        let token = signer().issue("abc123");
        let other = TokenSigner::new(b"another-secret", Duration::days(30)).unwrap();
        assert_eq!(other.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let signer = signer();
        let issued = Utc::now() - Duration::days(31);
        let token = signer.issue_at("abc123", issued);
        assert_eq!(signer.verify(&token), Err(TokenError::Expired));
        assert!(signer.verify_at(&token, issued).is_ok());
    }

    #[test]
    fn test_malformed_tokens() {
        let signer = signer();
        for token in ["", "abc", "abc.123", ".123.00", "abc.123.zz"] {
            assert_eq!(signer.verify(token), Err(TokenError::Malformed), "{token}");
        }
    }

    #[test]
    fn test_huge_lifetime_does_not_overflow() {
        let signer = TokenSigner::new(b"test-secret", Duration::days(100_000_000)).unwrap();
        let token = signer.issue("abc123");
        assert_eq!(signer.verify(&token).unwrap(), "abc123");
    }
}
