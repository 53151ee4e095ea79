// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page image storage for the desktop scanner, optionally encrypted at rest
// with age (scrypt passphrase).

use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};

use age::secrecy::SecretString;
use certscan_core::error::{CertscanError, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

/// Directory of stored page images.
///
/// With a passphrase every file is a complete age file; without one the
/// files are plain images that a webview can load directly.
pub struct PageVault {
    dir: PathBuf,
    passphrase: Option<SecretString>,
}

impl PageVault {
    pub fn new(dir: impl Into<PathBuf>, passphrase: Option<String>) -> Self {
        Self {
            dir: dir.into(),
            passphrase: passphrase.map(SecretString::from),
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.passphrase.is_some()
    }

    /// Store `image` and return its path. The file name is the SHA-256 of
    /// the stored bytes plus `extension`.
    #[instrument(skip_all, fields(image_len = image.len(), encrypted = self.is_encrypted()))]
    pub fn store(&self, image: &[u8], extension: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;

        let stored = match self.passphrase {
            Some(ref passphrase) => seal(passphrase, image)?,
            None => image.to_vec(),
        };

        let name = format!("{}.{extension}", hex::encode(Sha256::digest(&stored)));
        let path = self.dir.join(name);
        if !path.exists() {
            std::fs::write(&path, &stored)?;
        }
        debug!(path = %path.display(), "page image stored");
        Ok(path)
    }

    /// Read back an image stored by this vault, decrypting it if needed.
    #[instrument(skip(self))]
    pub fn load(&self, path: &Path) -> Result<Vec<u8>> {
        if !self.contains(path) {
            return Err(CertscanError::Bridge(format!(
                "{} is outside the page store",
                path.display()
            )));
        }
        let stored = std::fs::read(path)?;
        match self.passphrase {
            Some(ref passphrase) => open(passphrase, &stored),
            None => Ok(stored),
        }
    }

    /// Whether `path` names a file inside the store once `..` and symlinks
    /// are taken into account.
    fn contains(&self, path: &Path) -> bool {
        if path.components().any(|c| c == Component::ParentDir) {
            return false;
        }
        match (self.dir.canonicalize(), path.canonicalize()) {
            (Ok(dir), Ok(resolved)) => resolved.starts_with(dir),
            // Nothing to resolve yet; a missing file fails on read.
            _ => path.starts_with(&self.dir),
        }
    }
}

fn seal(passphrase: &SecretString, plaintext: &[u8]) -> Result<Vec<u8>> {
    let encryptor = age::Encryptor::with_user_passphrase(passphrase.clone());
    let mut ciphertext = Vec::new();

    let mut writer = encryptor
        .wrap_output(&mut ciphertext)
        .map_err(|e| CertscanError::Encryption(e.to_string()))?;
    writer
        .write_all(plaintext)
        .map_err(|e| CertscanError::Encryption(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| CertscanError::Encryption(e.to_string()))?;

    Ok(ciphertext)
}

fn open(passphrase: &SecretString, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let decryptor =
        age::Decryptor::new(ciphertext).map_err(|e| CertscanError::Decryption(e.to_string()))?;
    let identity = age::scrypt::Identity::new(passphrase.clone());

    let mut reader = decryptor
        .decrypt(std::iter::once(&identity as &dyn age::Identity))
        .map_err(|e| CertscanError::Decryption(e.to_string()))?;

    let mut plaintext = Vec::new();
    reader
        .read_to_end(&mut plaintext)
        .map_err(|e| CertscanError::Decryption(e.to_string()))?;
    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_store_keeps_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = PageVault::new(dir.path(), None);

        let path = vault.store(b"jpeg bytes", "jpg").expect("store failed");
        assert_eq!(std::fs::read(&path).expect("read"), b"jpeg bytes");
        assert_eq!(vault.load(&path).expect("load failed"), b"jpeg bytes");
        assert!(path.extension().is_some_and(|e| e == "jpg"));
    }

    #[test]
    fn encrypted_store_is_opaque_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = PageVault::new(dir.path(), Some("correct-horse".into()));

        let path = vault.store(b"png bytes", "png").expect("store failed");
        assert_ne!(std::fs::read(&path).expect("read"), b"png bytes");
        assert_eq!(vault.load(&path).expect("load failed"), b"png bytes");
    }

    #[test]
    fn wrong_passphrase_is_a_decryption_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = PageVault::new(dir.path(), Some("alpha".into()))
            .store(b"secret page", "jpg")
            .expect("store failed");

        let other = PageVault::new(dir.path(), Some("beta".into()));
        assert!(matches!(other.load(&path), Err(CertscanError::Decryption(_))));
    }

    #[test]
    fn refuses_paths_outside_the_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = PageVault::new(dir.path().join("pages"), None);
        assert!(matches!(
            vault.load(Path::new("/etc/passwd")),
            Err(CertscanError::Bridge(_))
        ));
    }

    #[test]
    fn parent_dir_cannot_escape_the_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pages = dir.path().join("pages");
        std::fs::create_dir_all(&pages).expect("mkdir");
        std::fs::write(dir.path().join("outside.txt"), b"not a page").expect("write");

        let vault = PageVault::new(&pages, None);
        assert!(matches!(
            vault.load(&pages.join("..").join("outside.txt")),
            Err(CertscanError::Bridge(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_cannot_escape_the_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pages = dir.path().join("pages");
        std::fs::create_dir_all(&pages).expect("mkdir");
        let outside = dir.path().join("outside.txt");
        std::fs::write(&outside, b"not a page").expect("write");
        let link = pages.join("link.jpg");
        std::os::unix::fs::symlink(&outside, &link).expect("symlink");

        let vault = PageVault::new(&pages, None);
        assert!(matches!(vault.load(&link), Err(CertscanError::Bridge(_))));
    }
}
