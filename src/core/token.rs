//! Bearer token issuance
//!
//! Tokens are opaque shared secrets: random bytes from the operating system
//! CSPRNG, hex-encoded. An issuer never falls back to a weaker source; if the
//! OS generator fails, issuance fails with
//! [`TokenError::RandomnessUnavailable`].

use crate::core::error::{ConfigError, SyndicationResult, TokenError};
use rand::RngCore;
use rand::rngs::OsRng;

/// Random bytes per token unless configured otherwise (40 hex characters)
pub const DEFAULT_TOKEN_BYTES: usize = 20;

/// Shortest token an issuer will produce
pub const MIN_TOKEN_BYTES: usize = 16;

/// Source of fresh bearer tokens
pub trait TokenIssuer: Send + Sync {
    /// Produce a new, unpredictable token
    fn generate_token(&self) -> Result<String, TokenError>;
}

/// Issuer backed by the operating system random number generator
#[derive(Debug, Clone, Copy)]
pub struct OsTokenIssuer {
    bytes: usize,
}

impl OsTokenIssuer {
    /// Issuer producing [`DEFAULT_TOKEN_BYTES`] random bytes per token
    pub fn new() -> Self {
        Self {
            bytes: DEFAULT_TOKEN_BYTES,
        }
    }

    /// Issuer producing `bytes` random bytes per token
    pub fn with_bytes(bytes: usize) -> SyndicationResult<Self> {
        if bytes < MIN_TOKEN_BYTES {
            return Err(ConfigError::InvalidValue {
                field: "tokens.bytes".to_string(),
                value: bytes.to_string(),
                message: format!("must be at least {}", MIN_TOKEN_BYTES),
            }
            .into());
        }
        Ok(Self { bytes })
    }

    /// Length of generated tokens in characters
    pub fn token_len(&self) -> usize {
        self.bytes * 2
    }
}

impl Default for OsTokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenIssuer for OsTokenIssuer {
    fn generate_token(&self) -> Result<String, TokenError> {
        let mut buf = vec![0u8; self.bytes];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| TokenError::RandomnessUnavailable {
                message: e.to_string(),
            })?;
        Ok(hex::encode(buf))
    }
}

/// Generate a token with the default OS-backed issuer
pub fn generate_token() -> Result<String, TokenError> {
    OsTokenIssuer::new().generate_token()
}
