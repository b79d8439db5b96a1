use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// The only token kind this API hands out.
pub const TOKEN_TYPE: &str = "Bearer";

/// Lifetime of an issued access token, fixed for every issuance.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Random bytes per token value. 48 bytes encode to exactly 64 base64url chars.
pub const TOKEN_BYTES: usize = 48;

/// The single stateful entity behind authentication.
#[derive(Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AccessToken {
    /// Build a fresh token with a new random value, expiring one hour after `now`.
    pub fn mint(now: DateTime<Utc>) -> Self {
        Self {
            access_token: generate_token_value(),
            token_type: TOKEN_TYPE.to_string(),
            expires_at: now + Duration::seconds(TOKEN_TTL_SECS),
            created_at: now,
        }
    }

    /// A token is live strictly before its expiry instant.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Constant-time comparison of the stored value against a presented one.
    pub fn matches(&self, candidate: &str) -> bool {
        self.access_token
            .as_bytes()
            .ct_eq(candidate.as_bytes())
            .into()
    }
}

// Never print the token value itself.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &mask(&self.access_token))
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Wire shape of a successful `/oauth2/access_token` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    TOKEN_TYPE.to_string()
}

impl From<&AccessToken> for TokenResponse {
    fn from(token: &AccessToken) -> Self {
        Self {
            access_token: token.access_token.clone(),
            token_type: token.token_type.clone(),
        }
    }
}

/// URL-safe token value drawn from the OS CSPRNG.
pub fn generate_token_value() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Shorten a credential for log output: first and last four characters only.
pub fn mask(value: &str) -> String {
    if value.len() > 8 && value.is_ascii() {
        format!("{}…{}", &value[..4], &value[value.len() - 4..])
    } else {
        "****".to_string()
    }
}
