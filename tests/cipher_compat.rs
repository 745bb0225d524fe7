//! Cipher Compatibility Tests
//!
//! Vectors were produced with OpenSSL:
//!
//! ```text
//! P=$(printf 'abc123-hunter2' | md5sum | cut -c1-16)      # 6d64d1831dae1db5
//! printf '{"foo":"bar"}' | openssl enc -aes-256-cbc -md md5 \
//!     -S 0102030405060708 -pass pass:$P
//! ```
//!
//! prefixed with `Salted__` and the salt, then base64 encoded, which is the
//! layout `CryptoJS.AES.encrypt` emits.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cookiebox::cipher::{self, container, derive_passphrase, CipherError, EMPTY_OBJECT};
use proptest::prelude::*;

const KEY: &str = "abc123";
const PASSWORD: &str = "hunter2";
const CIPHERTEXT: &str = "U2FsdGVkX18BAgMEBQYHCB7/bgGAvxYj52NLy0hUbu8=";

#[test]
fn test_openssl_vector_decrypts() {
    assert_eq!(cipher::decrypt(KEY, CIPHERTEXT, PASSWORD), br#"{"foo":"bar"}"#);
}

#[test]
fn test_passphrase_for_vector() {
    assert_eq!(derive_passphrase(KEY, PASSWORD), "6d64d1831dae1db5");
}

#[test]
fn test_client_style_round_trip() {
    let plaintext = br#"{"cookie_data":{"example.com":[{"name":"sid","value":"x"}]},"local_storage_data":{}}"#;
    let sealed = cipher::encrypt("3f2a-device", plaintext, "sync-pass").unwrap();

    let raw = STANDARD.decode(&sealed).unwrap();
    assert_eq!(&raw[..8], b"Salted__");
    assert_eq!(raw.len() % 16, 0);

    assert_eq!(cipher::decrypt("3f2a-device", &sealed, "sync-pass"), plaintext);
}

#[test]
fn test_noncanonical_trailing_bits_accepted() {
    // Last symbol `8` -> `9` only flips bits dropped by the decoder
    let noncanonical = "U2FsdGVkX18BAgMEBQYHCB7/bgGAvxYj52NLy0hUbu9=";
    assert_ne!(noncanonical, CIPHERTEXT);
    assert_eq!(cipher::decrypt(KEY, noncanonical, PASSWORD), br#"{"foo":"bar"}"#);
}

#[test]
fn test_line_wrapped_container_accepted() {
    let plaintext = vec![b'z'; 100];
    let sealed = cipher::encrypt(KEY, &plaintext, PASSWORD).unwrap();
    assert!(sealed.len() > 64);

    let lines: Vec<&str> = sealed
        .as_bytes()
        .chunks(64)
        .map(|c| std::str::from_utf8(c).unwrap())
        .collect();

    assert_eq!(cipher::decrypt(KEY, &lines.join("\n"), PASSWORD), plaintext);
    assert_eq!(cipher::decrypt(KEY, &lines.join("\r\n"), PASSWORD), plaintext);
    assert_eq!(
        cipher::decrypt(KEY, &format!("{}\n", lines.join("\n")), PASSWORD),
        plaintext
    );
}

#[test]
fn test_every_malformed_input_is_empty_object() {
    let mut misaligned = b"Salted__12345678".to_vec();
    misaligned.extend_from_slice(&[7u8; 20]);

    let mut bad_padding = STANDARD.decode(CIPHERTEXT).unwrap();
    let last = bad_padding.len() - 1;
    bad_padding[last] ^= 0x55;

    let cases = vec![
        ("malformed base64", "not*base64".to_string()),
        ("too short", STANDARD.encode(b"Salted__")),
        ("wrong tag", STANDARD.encode([0u8; 48])),
        ("not block aligned", STANDARD.encode(&misaligned)),
        ("tampered", STANDARD.encode(&bad_padding)),
    ];

    for (name, input) in cases {
        assert_eq!(cipher::decrypt(KEY, &input, PASSWORD), EMPTY_OBJECT, "{}", name);
    }
}

#[test]
fn test_typed_reasons_stay_internal() {
    assert!(matches!(
        cipher::open_container(KEY, "not*base64", PASSWORD),
        Err(CipherError::Base64(_))
    ));
    assert_eq!(
        container::open("6d64d1831dae1db5", &STANDARD.encode([0u8; 48])),
        Err(CipherError::InvalidContainer("missing Salted__ tag"))
    );
}

proptest! {
    #[test]
    fn prop_decrypt_never_panics(input in ".{0,128}", password in "[a-z]{0,12}") {
        let _ = cipher::decrypt(KEY, &input, &password);
    }

    #[test]
    fn prop_arbitrary_bytes_after_tag_never_panic(body in proptest::collection::vec(any::<u8>(), 0..96)) {
        let mut raw = b"Salted__".to_vec();
        raw.extend_from_slice(&body);
        let _ = cipher::decrypt(KEY, &STANDARD.encode(raw), PASSWORD);
    }

    #[test]
    fn prop_kdf_deterministic(passphrase in "[0-9a-f]{16}", salt in any::<[u8; 8]>()) {
        let a = cipher::bytes_to_key(passphrase.as_bytes(), &salt).unwrap();
        let b = cipher::bytes_to_key(passphrase.as_bytes(), &salt).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_seal_open(plaintext in proptest::collection::vec(any::<u8>(), 0..256)) {
        let sealed = cipher::encrypt(KEY, &plaintext, PASSWORD).unwrap();
        prop_assert_eq!(cipher::open_container(KEY, &sealed, PASSWORD).unwrap(), plaintext);
    }
}
