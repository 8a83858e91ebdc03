use actix_web::cookie::{Cookie, CookieJar, Key};
use serde::{Deserialize, Serialize};
use tracing::*;

/// Name of the cookie carrying the encoded identity. It is also bound into the
/// token as associated data, so a token minted for another cookie won't decode.
pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to create session keys: {0}")]
    Key(String),

    #[error("Session token failed authentication")]
    Tampered,

    #[error("Session token could not be sealed")]
    Seal,

    #[error("Session payload is malformed: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Authenticated encoder for session tokens.
///
/// Tokens are the identity serialized as JSON and sealed with AEAD, so both
/// confidentiality and integrity are covered. The key is owned by the codec:
/// build one at startup and share it, nothing is persisted.
#[derive(Clone)]
pub struct SessionCodec {
    key: Key,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec").finish_non_exhaustive()
    }
}

impl SessionCodec {
    pub fn new(key: Key) -> Self {
        Self { key }
    }

    /// Fresh random keys, valid until the process exits.
    pub fn generate() -> Result<Self, SessionError> {
        let key = Key::try_generate()
            .ok_or_else(|| SessionError::Key("no randomness available".to_string()))?;

        Ok(Self::new(key))
    }

    /// Deterministic keys from a secret of at least 64 bytes.
    pub fn from_secret(secret: &[u8]) -> Result<Self, SessionError> {
        let key = Key::try_from(secret).map_err(|error| SessionError::Key(error.to_string()))?;

        Ok(Self::new(key))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn encode(&self, identity: &Identity) -> Result<String, SessionError> {
        let payload = serde_json::to_string(identity)?;

        let mut jar = CookieJar::new();
        jar.private_mut(&self.key)
            .add(Cookie::new(SESSION_COOKIE, payload));

        jar.get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(SessionError::Seal)
    }

    #[instrument(level = "trace", skip_all)]
    pub fn decode(&self, token: &str) -> Result<Identity, SessionError> {
        let jar = CookieJar::new();
        let sealed = Cookie::new(SESSION_COOKIE, token.to_string());

        let opened = jar
            .private(&self.key)
            .decrypt(sealed)
            .ok_or(SessionError::Tampered)?;

        Ok(serde_json::from_str(opened.value())?)
    }
}
