//! # Passphrase Container
//!
//! Wire format produced by `CryptoJS.AES.encrypt(text, passphrase)` and by
//! `openssl enc -aes-256-cbc -md md5`:
//!
//! ```text
//! base64( "Salted__" || salt[8] || AES-256-CBC(PKCS7(plaintext)) )
//! ```

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::Engine;
use cbc::cipher::block_padding::{NoPadding, Pkcs7};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::{CipherError, CipherResult};
use super::kdf::{bytes_to_key, IV_LEN, SALT_LEN};

type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

/// Magic tag at the start of every container
pub const MAGIC: &[u8; 8] = b"Salted__";

const HEADER_LEN: usize = MAGIC.len() + SALT_LEN;

/// Standard alphabet, padded, tolerant of non-zero trailing bits in the
/// final quantum. Line breaks are removed before decoding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Decrypt a base64 container with the given passphrase.
pub fn open(passphrase: &str, ciphertext: &str) -> CipherResult<Vec<u8>> {
    let unwrapped: String = ciphertext
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect();
    let raw = LENIENT
        .decode(unwrapped)
        .map_err(|e| CipherError::Base64(e.to_string()))?;

    if raw.len() <= HEADER_LEN {
        return Err(CipherError::InvalidContainer("too short"));
    }
    if raw.len() % IV_LEN != 0 {
        return Err(CipherError::InvalidContainer("not block aligned"));
    }
    if &raw[..MAGIC.len()] != MAGIC {
        return Err(CipherError::InvalidContainer("missing Salted__ tag"));
    }

    let salt = &raw[MAGIC.len()..HEADER_LEN];
    let body = &raw[HEADER_LEN..];

    let material = bytes_to_key(passphrase.as_bytes(), salt)?;
    let decryptor = Aes256CbcDec::new_from_slices(&material.cipher_key, &material.iv)
        .map_err(|_| CipherError::InvalidKeyLength)?;

    let decrypted = decryptor
        .decrypt_padded_vec_mut::<NoPadding>(body)
        .map_err(|_| CipherError::InvalidContainer("not block aligned"))?;

    pkcs7_strip(decrypted)
}

/// Encrypt `plaintext` into a container with a fresh random salt.
pub fn seal(passphrase: &str, plaintext: &[u8]) -> CipherResult<String> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    seal_with_salt(passphrase, &salt, plaintext)
}

/// Encrypt `plaintext` into a container using the given salt.
pub fn seal_with_salt(passphrase: &str, salt: &[u8], plaintext: &[u8]) -> CipherResult<String> {
    let material = bytes_to_key(passphrase.as_bytes(), salt)?;
    let encryptor = Aes256CbcEnc::new_from_slices(&material.cipher_key, &material.iv)
        .map_err(|_| CipherError::InvalidKeyLength)?;
    let body = encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut raw = Vec::with_capacity(HEADER_LEN + body.len());
    raw.extend_from_slice(MAGIC);
    raw.extend_from_slice(salt);
    raw.extend_from_slice(&body);

    Ok(STANDARD.encode(raw))
}

/// Remove PKCS#7 padding. The pad byte `N` must be in `1..=16` and the last
/// `N` bytes must all equal `N`.
pub fn pkcs7_strip(mut data: Vec<u8>) -> CipherResult<Vec<u8>> {
    let pad = match data.last() {
        Some(&b) => b as usize,
        None => return Err(CipherError::BadPadding),
    };
    if pad == 0 || pad > IV_LEN || pad > data.len() {
        return Err(CipherError::BadPadding);
    }

    let start = data.len() - pad;
    if !data[start..].iter().all(|&b| b as usize == pad) {
        return Err(CipherError::BadPadding);
    }

    data.truncate(start);
    Ok(data)
}
