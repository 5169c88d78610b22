//! Request signing for the venue's private API.
//!
//! The venue uses an "amx" authorization scheme: an HMAC-SHA256 signature
//! over the public key, HTTP verb, lowercased url-encoded endpoint, a
//! nonce, and the base64 MD5 digest of the request body, keyed with the
//! base64-decoded private key.

use crate::error::{ClientError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// API key pair. The private key is wiped from memory on drop.
#[derive(Clone)]
pub struct Credentials {
    public_key: String,
    private_key: Zeroizing<Vec<u8>>,
}

impl Credentials {
    /// Build credentials from the venue-issued keys.
    ///
    /// The private key is the base64 string from the venue key page; it is
    /// decoded once here so signing never re-handles the text form.
    pub fn new(public_key: impl Into<String>, private_key_b64: &str) -> Result<Self> {
        let decoded = BASE64
            .decode(private_key_b64)
            .map_err(|e| ClientError::Credentials(format!("private key is not base64: {e}")))?;
        Ok(Self {
            public_key: public_key.into(),
            private_key: Zeroizing::new(decoded),
        })
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Authorization header value for one POST request.
    pub fn authorization_header(&self, url: &str, nonce: &str, body: &[u8]) -> Result<String> {
        let body_digest = BASE64.encode(Md5::digest(body));

        let encoded_url: String = url::form_urlencoded::byte_serialize(url.as_bytes()).collect();
        let message = format!(
            "{}POST{}{}{}",
            self.public_key,
            encoded_url.to_lowercase(),
            nonce,
            body_digest
        );

        let mut mac = HmacSha256::new_from_slice(&self.private_key)
            .map_err(|e| ClientError::Credentials(format!("bad private key length: {e}")))?;
        mac.update(message.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());

        Ok(format!("amx {}:{}:{}", self.public_key, signature, nonce))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Wall-clock nonce, strictly increasing at millisecond resolution.
pub fn nonce() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
