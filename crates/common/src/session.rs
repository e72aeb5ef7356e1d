//! Signed session tokens.
//!
//! The `session` cookie carries `user_id.expires_unix.signature` where the
//! signature is an HMAC-SHA256 over the first two segments. Verification
//! rejects malformed, tampered, or expired tokens; there is no server-side
//! session table, so expiry is the only revocation.

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies session tokens.
#[derive(Clone)]
pub struct SessionSigner {
    secret: String,
}

impl SessionSigner {
    /// Create a signer from the configured session secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issue a token for a user, valid for `max_age_days` from now.
    #[must_use]
    pub fn issue(&self, user_id: &str, max_age_days: i64) -> String {
        let expires = (Utc::now() + Duration::days(max_age_days)).timestamp();
        let payload = format!("{user_id}.{expires}");
        format!("{payload}.{}", self.sign(&payload))
    }

    /// Verify a token and return the user id it was issued for.
    ///
    /// Returns `None` for malformed, tampered, or expired tokens.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<String> {
        let (payload, signature) = token.rsplit_once('.')?;
        let (user_id, expires) = payload.rsplit_once('.')?;

        if user_id.is_empty() {
            return None;
        }

        let expires: i64 = expires.parse().ok()?;
        if expires < Utc::now().timestamp() {
            return None;
        }

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let expected = hex::decode(signature).ok()?;
        mac.verify_slice(&expected).ok()?;

        Some(user_id.to_string())
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[allow(clippy::expect_used)] // HMAC accepts any key size, this cannot fail
    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size")
    }
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSigner").finish_non_exhaustive()
    }
}
