//! The configured app password, kept only as a digest.
use std::fmt::Debug;

use sha2::{Digest, Sha512};

/// The app password that grants access to the API.
#[derive(Clone, PartialEq, Eq)]
pub struct AppSecret {
    digest: Vec<u8>,
}

impl AppSecret {
    /// Keep the digest of `password`.
    pub fn new(password: &str) -> Self {
        Self {
            digest: Sha512::digest(password.as_bytes()).to_vec(),
        }
    }

    /// Whether `candidate` is the app password.
    ///
    /// Every byte of the digests is compared, whatever the outcome.
    pub fn verify(&self, candidate: &str) -> bool {
        let candidate = Sha512::digest(candidate.as_bytes());

        self.digest.len() == candidate.len()
            && self
                .digest
                .iter()
                .zip(candidate.iter())
                .fold(0u8, |difference, (a, b)| difference | (a ^ b))
                == 0
    }
}

impl Debug for AppSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AppSecret(<redacted>)")
    }
}
