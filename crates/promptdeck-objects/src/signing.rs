// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HMAC-SHA256 signed read URLs.
//!
//! A URL is `{base}/objects/{path}?expires={unix}&signature={hex}`, where the
//! signature covers `path` and `expires`. Holding the URL is the only credential
//! needed to read the object until it expires.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use promptdeck_core::PromptdeckError;

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies signed read URLs.
#[derive(Clone)]
pub struct UrlSigner {
    key: Vec<u8>,
    base_url: String,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("key", &"[redacted]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl UrlSigner {
    pub fn new(key: impl Into<Vec<u8>>, base_url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Signer with a random 32-byte key. URLs do not survive a restart.
    pub fn ephemeral(base_url: impl Into<String>) -> Self {
        let mut key = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);
        Self::new(key, base_url)
    }

    fn mac(&self, path: &str, expires: i64) -> Result<HmacSha256, PromptdeckError> {
        let mut mac = HmacSha256::new_from_slice(&self.key).map_err(|e| {
            PromptdeckError::SignError {
                path: path.to_string(),
                message: e.to_string(),
            }
        })?;
        mac.update(path.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        Ok(mac)
    }

    /// Hex signature over `path` and `expires`.
    pub fn signature(&self, path: &str, expires: i64) -> Result<String, PromptdeckError> {
        Ok(hex::encode(self.mac(path, expires)?.finalize().into_bytes()))
    }

    /// Signed URL for `path`, valid until the unix timestamp `expires`.
    pub fn sign(&self, path: &str, expires: i64) -> Result<String, PromptdeckError> {
        let signature = self.signature(path, expires)?;
        Ok(format!(
            "{}/objects/{path}?expires={expires}&signature={signature}",
            self.base_url
        ))
    }

    /// Check a presented signature. Expiry is checked before the signature.
    pub fn verify(
        &self,
        path: &str,
        expires: i64,
        signature: &str,
        now: i64,
    ) -> Result<(), PromptdeckError> {
        if now >= expires {
            return Err(PromptdeckError::UrlExpired {
                path: path.to_string(),
            });
        }
        let presented = hex::decode(signature).map_err(|_| PromptdeckError::InvalidSignature {
            path: path.to_string(),
        })?;
        self.mac(path, expires)?
            .verify_slice(&presented)
            .map_err(|_| PromptdeckError::InvalidSignature {
                path: path.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> UrlSigner {
        UrlSigner::new(b"0123456789abcdef0123456789abcdef".to_vec(), "http://localhost:8080/")
    }

    #[test]
    fn url_carries_path_expiry_and_signature() {
        let url = signer().sign("Output/1-abc.png", 1_700_003_600).unwrap();
        assert!(url.starts_with("http://localhost:8080/objects/Output/1-abc.png?expires=1700003600&signature="));
        let sig = url.rsplit_once("signature=").unwrap().1;
        assert_eq!(sig.len(), 64);
    }

    #[test]
    fn valid_signature_verifies_before_expiry() {
        let s = signer();
        let sig = s.signature("Output/a.png", 2_000).unwrap();
        assert!(s.verify("Output/a.png", 2_000, &sig, 1_999).is_ok());
    }

    #[test]
    fn expired_url_is_rejected() {
        let s = signer();
        let sig = s.signature("Output/a.png", 2_000).unwrap();
        let err = s.verify("Output/a.png", 2_000, &sig, 2_000).unwrap_err();
        assert!(matches!(err, PromptdeckError::UrlExpired { .. }));
    }

    #[test]
    fn tampered_path_or_expiry_is_rejected() {
        let s = signer();
        let sig = s.signature("Output/a.png", 2_000).unwrap();
        assert!(matches!(
            s.verify("Output/b.png", 2_000, &sig, 1_000),
            Err(PromptdeckError::InvalidSignature { .. })
        ));
        assert!(matches!(
            s.verify("Output/a.png", 3_000, &sig, 1_000),
            Err(PromptdeckError::InvalidSignature { .. })
        ));
        assert!(matches!(
            s.verify("Output/a.png", 2_000, "not-hex", 1_000),
            Err(PromptdeckError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn ephemeral_signers_do_not_share_keys() {
        let a = UrlSigner::ephemeral("http://x");
        let b = UrlSigner::ephemeral("http://x");
        let sig = a.signature("Output/a.png", 10).unwrap();
        assert!(b.verify("Output/a.png", 10, &sig, 0).is_err());
        assert!(!format!("{a:?}").contains("key: ["));
    }
}
