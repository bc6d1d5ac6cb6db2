use crate::app_dirs;
use std::path::PathBuf;

const KEYRING_SERVICE: &str = "mammodesk";
const KEYRING_KEY: &str = "mammodesk_session_token";
const FALLBACK_TOKEN_FILE: &str = "session_token.bin";
const FALLBACK_KEY_FILE: &str = "session_token.key";

#[derive(Debug, thiserror::Error)]
pub enum SessionTokenStoreError {
    #[error("Token store unavailable: {0}")]
    Unavailable(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Crypto error: {0}")]
    Crypto(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error(transparent)]
    AppDir(#[from] crate::app_dirs::AppDirError),
}

/// Persists the bearer token across launches.
///
/// Prefers the OS keyring; falls back to an encrypted file under the app
/// directory when no keyring is available. `MAMMODESK_DISABLE_KEYRING=1`
/// forces the fallback, which tests rely on.
#[derive(Clone, Debug)]
pub struct SessionTokenStore {
    fallback_dir: PathBuf,
}

impl SessionTokenStore {
    pub fn new() -> Result<Self, SessionTokenStoreError> {
        let fallback_dir = app_dirs::app_root_dir()?.join("secrets");
        std::fs::create_dir_all(&fallback_dir)?;
        Ok(Self { fallback_dir })
    }

    pub fn get(&self) -> Result<Option<String>, SessionTokenStoreError> {
        if let Some(token) = self.try_keyring_get()? {
            return Ok(Some(token));
        }
        self.fallback_get()
    }

    pub fn set(&self, token: &str) -> Result<(), SessionTokenStoreError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(());
        }
        if self.try_keyring_set(token).is_ok() {
            let _ = self.fallback_delete();
            return Ok(());
        }
        self.fallback_set(token)
    }

    pub fn delete(&self) -> Result<(), SessionTokenStoreError> {
        let _ = self.try_keyring_delete();
        let _ = self.fallback_delete();
        Ok(())
    }

    fn try_keyring_get(&self) -> Result<Option<String>, SessionTokenStoreError> {
        if keyring_disabled() {
            return Ok(None);
        }
        let entry = keyring_entry()?;
        match entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(_) => Ok(None),
        }
    }

    fn try_keyring_set(&self, token: &str) -> Result<(), SessionTokenStoreError> {
        if keyring_disabled() {
            return Err(SessionTokenStoreError::Unavailable(
                "keyring disabled".into(),
            ));
        }
        keyring_entry()?
            .set_password(token)
            .map_err(|err| SessionTokenStoreError::Unavailable(err.to_string()))
    }

    fn try_keyring_delete(&self) -> Result<(), SessionTokenStoreError> {
        if keyring_disabled() {
            return Ok(());
        }
        let _ = keyring_entry()?.delete_credential();
        Ok(())
    }

    fn fallback_token_path(&self) -> PathBuf {
        self.fallback_dir.join(FALLBACK_TOKEN_FILE)
    }

    fn fallback_key_path(&self) -> PathBuf {
        self.fallback_dir.join(FALLBACK_KEY_FILE)
    }

    fn fallback_get(&self) -> Result<Option<String>, SessionTokenStoreError> {
        let token_path = self.fallback_token_path();
        if !token_path.exists() {
            return Ok(None);
        }
        let data = std::fs::read(token_path)?;
        if data.len() < 12 {
            return Err(SessionTokenStoreError::Decode("token file too short".into()));
        }
        let (nonce, ciphertext) = data.split_at(12);
        let key_bytes = std::fs::read(self.fallback_key_path())?;
        if key_bytes.len() != 32 {
            return Err(SessionTokenStoreError::Decode("token key invalid".into()));
        }
        let plaintext = decrypt(&key_bytes, nonce, ciphertext)?;
        let token = String::from_utf8(plaintext)
            .map_err(|err| SessionTokenStoreError::Decode(err.to_string()))?;
        Ok(Some(token))
    }

    fn fallback_set(&self, token: &str) -> Result<(), SessionTokenStoreError> {
        let key_path = self.fallback_key_path();
        let key_bytes = if key_path.exists() {
            std::fs::read(&key_path)?
        } else {
            let bytes = random_bytes(32)?;
            write_private_file(&key_path, &bytes)?;
            bytes
        };
        if key_bytes.len() != 32 {
            return Err(SessionTokenStoreError::Decode("token key invalid".into()));
        }
        let nonce = random_bytes(12)?;
        let ciphertext = encrypt(&key_bytes, &nonce, token.as_bytes())?;
        let mut payload = Vec::with_capacity(nonce.len() + ciphertext.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&ciphertext);
        write_private_file(&self.fallback_token_path(), &payload)?;
        Ok(())
    }

    fn fallback_delete(&self) -> Result<(), SessionTokenStoreError> {
        let _ = std::fs::remove_file(self.fallback_token_path());
        let _ = std::fs::remove_file(self.fallback_key_path());
        Ok(())
    }
}

fn keyring_entry() -> Result<keyring::Entry, SessionTokenStoreError> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_KEY)
        .map_err(|err| SessionTokenStoreError::Unavailable(err.to_string()))
}

fn keyring_disabled() -> bool {
    std::env::var("MAMMODESK_DISABLE_KEYRING")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn random_bytes(len: usize) -> Result<Vec<u8>, SessionTokenStoreError> {
    let mut out = vec![0u8; len];
    use rand::TryRngCore;
    rand::rngs::OsRng
        .try_fill_bytes(&mut out)
        .map_err(|err| SessionTokenStoreError::Unavailable(err.to_string()))?;
    Ok(out)
}

fn write_private_file(path: &PathBuf, bytes: &[u8]) -> Result<(), SessionTokenStoreError> {
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    file.write_all(bytes)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

fn encrypt(key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, SessionTokenStoreError> {
    use chacha20poly1305::aead::{Aead, KeyInit};
    let cipher = chacha20poly1305::ChaCha20Poly1305::new_from_slice(key)
        .map_err(|err| SessionTokenStoreError::Crypto(err.to_string()))?;
    let nonce = chacha20poly1305::Nonce::from_slice(nonce);
    cipher
        .encrypt(nonce, plaintext)
        .map_err(|err| SessionTokenStoreError::Crypto(err.to_string()))
}

fn decrypt(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, SessionTokenStoreError> {
    use chacha20poly1305::aead::{Aead, KeyInit};
    let cipher = chacha20poly1305::ChaCha20Poly1305::new_from_slice(key)
        .map_err(|err| SessionTokenStoreError::Crypto(err.to_string()))?;
    let nonce = chacha20poly1305::Nonce::from_slice(nonce);
    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|err| SessionTokenStoreError::Crypto(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn fallback_roundtrip_when_keyring_disabled() {
        unsafe {
            std::env::set_var("MAMMODESK_DISABLE_KEYRING", "1");
        }
        let base = tempdir().unwrap();
        let _guard = app_dirs::ConfigBaseGuard::set(base.path().to_path_buf());
        let store = SessionTokenStore::new().unwrap();
        assert_eq!(store.get().unwrap(), None);

        store.set("tok_0123456789abcdef").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("tok_0123456789abcdef"));

        // Blank tokens are ignored rather than clobbering the stored one.
        store.set("   ").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("tok_0123456789abcdef"));

        store.delete().unwrap();
        assert_eq!(store.get().unwrap(), None);
        unsafe {
            std::env::remove_var("MAMMODESK_DISABLE_KEYRING");
        }
    }
}
