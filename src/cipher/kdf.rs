//! # Key Derivation
//!
//! OpenSSL `EVP_BytesToKey` with MD5 and a single iteration, as used by
//! CryptoJS passphrase mode:
//!
//! ```text
//! D_1 = MD5(passphrase || salt)
//! D_i = MD5(D_{i-1} || passphrase || salt)
//! key || iv = D_1 || D_2 || D_3 ...   (first 32 + 16 bytes)
//! ```

use super::errors::{CipherError, CipherResult};

/// Salt length of a `Salted__` container
pub const SALT_LEN: usize = 8;

/// AES-256 key length
pub const KEY_LEN: usize = 32;

/// AES block length, also the IV length
pub const IV_LEN: usize = 16;

/// Length of the hex passphrase derived from `key` and `password`
const PASSPHRASE_LEN: usize = 16;

/// Ephemeral cipher key and IV. Derived per request, never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    pub cipher_key: [u8; KEY_LEN],
    pub iv: [u8; IV_LEN],
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyMaterial(..)")
    }
}

/// Derive the internal passphrase: the first 16 lowercase hex characters of
/// `MD5(key + "-" + password)`.
///
/// The result is ASCII hex, not raw bytes. Existing ciphertexts depend on
/// this, so it must stay as is.
pub fn derive_passphrase(key: &str, password: &str) -> String {
    let digest = md5::compute(format!("{}-{}", key, password));
    let mut hex = format!("{:x}", digest);
    hex.truncate(PASSPHRASE_LEN);
    hex
}

/// Derive key and IV from a passphrase and an 8-byte salt.
pub fn bytes_to_key(passphrase: &[u8], salt: &[u8]) -> CipherResult<KeyMaterial> {
    if salt.len() != SALT_LEN {
        return Err(CipherError::InvalidSalt(salt.len()));
    }

    let total = KEY_LEN + IV_LEN;
    let mut derived: Vec<u8> = Vec::with_capacity(total + 16);
    let mut last_hash: Vec<u8> = Vec::new();

    while derived.len() < total {
        let mut block = Vec::with_capacity(last_hash.len() + passphrase.len() + salt.len());
        block.extend_from_slice(&last_hash);
        block.extend_from_slice(passphrase);
        block.extend_from_slice(salt);

        last_hash = md5::compute(&block).0.to_vec();
        derived.extend_from_slice(&last_hash);
    }

    let mut cipher_key = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    cipher_key.copy_from_slice(&derived[..KEY_LEN]);
    iv.copy_from_slice(&derived[KEY_LEN..total]);

    Ok(KeyMaterial { cipher_key, iv })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unhex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn test_passphrase_is_16_lowercase_hex() {
        let p = derive_passphrase("abc123", "hunter2");
        assert_eq!(p, "6d64d1831dae1db5");
        assert_eq!(p.len(), 16);
        assert!(p.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_passphrase_joins_with_dash() {
        // MD5("uuid-password")
        assert_eq!(derive_passphrase("uuid", "password"), "c1afd3d73880531d");
    }

    #[test]
    fn test_matches_openssl() {
        // openssl enc -aes-256-cbc -md md5 -S 0102030405060708 -pass pass:6d64d1831dae1db5 -P
        let salt = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let km = bytes_to_key(b"6d64d1831dae1db5", &salt).unwrap();

        assert_eq!(
            km.cipher_key.to_vec(),
            unhex("7c3a891cdc1454132fc9ba609422223c6bda4ef80ae594928d1ab6a675680d58")
        );
        assert_eq!(km.iv.to_vec(), unhex("bc962ac23bf4923e7f2935894d0e0fb8"));
    }

    #[test]
    fn test_deterministic() {
        let salt = *b"saltsalt";
        let a = bytes_to_key(b"passphrase", &salt).unwrap();
        let b = bytes_to_key(b"passphrase", &salt).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_salt_changes_key() {
        let a = bytes_to_key(b"passphrase", b"saltsal1").unwrap();
        let b = bytes_to_key(b"passphrase", b"saltsal2").unwrap();
        assert_ne!(a.cipher_key, b.cipher_key);
        assert_ne!(a.iv, b.iv);
    }

    #[test]
    fn test_wrong_salt_length_is_error() {
        assert_eq!(bytes_to_key(b"p", b"short"), Err(CipherError::InvalidSalt(5)));
        assert_eq!(bytes_to_key(b"p", &[]), Err(CipherError::InvalidSalt(0)));
        assert_eq!(bytes_to_key(b"p", &[0u8; 9]), Err(CipherError::InvalidSalt(9)));
    }

    #[test]
    fn test_debug_hides_material() {
        let km = bytes_to_key(b"p", b"12345678").unwrap();
        assert_eq!(format!("{:?}", km), "KeyMaterial(..)");
    }
}
