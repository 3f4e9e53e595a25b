//! Time-based one-time passwords (RFC 6238, HMAC-SHA1, 30 s, 6 digits)

use grouptrack_core::config::TOTP_STEP_SECS;
use grouptrack_core::{Result, TrackerError};
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

const DIGITS: u32 = 6;
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// TOTP generator for one shared secret.
#[derive(Clone)]
pub struct Totp {
    secret: Vec<u8>,
}

impl std::fmt::Debug for Totp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Totp").field("secret", &"<redacted>").finish()
    }
}

impl Totp {
    /// Build a generator from a base32 secret as an operator would paste it.
    ///
    /// Whitespace anywhere in the secret is ignored, as are case and `=`
    /// padding.
    pub fn from_base32(raw: &str) -> Result<Self> {
        let normalized = normalize_secret(raw);
        if normalized.is_empty() {
            return Err(TrackerError::authentication("2FA secret is empty"));
        }
        let secret = decode_base32(&normalized)?;
        Ok(Self { secret })
    }

    /// Build a generator from raw secret bytes
    pub fn from_bytes(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Code valid during the step containing `unix_secs`
    pub fn code_at(&self, unix_secs: u64) -> Result<String> {
        let counter = unix_secs / TOTP_STEP_SECS;
        let mut mac = HmacSha1::new_from_slice(&self.secret)
            .map_err(|e| TrackerError::authentication(format!("invalid 2FA secret: {e}")))?;
        mac.update(&counter.to_be_bytes());
        let digest = mac.finalize().into_bytes();

        let offset = (digest[digest.len() - 1] & 0x0f) as usize;
        let binary = (u32::from(digest[offset] & 0x7f) << 24)
            | (u32::from(digest[offset + 1]) << 16)
            | (u32::from(digest[offset + 2]) << 8)
            | u32::from(digest[offset + 3]);
        let code = binary % 10u32.pow(DIGITS);
        Ok(format!("{code:0width$}", width = DIGITS as usize))
    }

    /// Seconds until the code for `unix_secs` expires, in `1..=30`
    pub fn remaining_seconds(&self, unix_secs: u64) -> u64 {
        TOTP_STEP_SECS - unix_secs % TOTP_STEP_SECS
    }
}

/// Strip whitespace and padding, and uppercase.
fn normalize_secret(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Decode unpadded RFC 4648 base32.
fn decode_base32(input: &str) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for c in input.bytes() {
        let value = BASE32_ALPHABET
            .iter()
            .position(|&a| a == c)
            .ok_or_else(|| {
                TrackerError::authentication(format!(
                    "2FA secret contains invalid base32 character {:?}",
                    c as char
                ))
            })?;
        buffer = (buffer << 5) | value as u32;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            output.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }
    Ok(output)
}
