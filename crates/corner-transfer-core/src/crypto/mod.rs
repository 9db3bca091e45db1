//! Decryption of downloaded portal files.
//!
//! Files on the portal are encrypted to the customer's OpenPGP key.
//! `Decryptor` is the seam the client decrypts through; `GpgDecryptor`
//! drives the local `gpg` installation and its keyring.

pub mod gpg;

use async_trait::async_trait;

use crate::api::Result;

pub use gpg::GpgDecryptor;

#[async_trait]
pub trait Decryptor: Send + Sync {
    /// Decrypt a complete blob, failing with `PortalError::Decryption`
    /// unless decryption fully succeeded.
    async fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>>;
}
