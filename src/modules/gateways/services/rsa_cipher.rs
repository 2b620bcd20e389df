//! Chunked raw RSA used by gateways that "sign" by private-key encryption
//!
//! Plaintext is split into blocks of `key_size - 11` bytes (PKCS#1 v1.5
//! overhead), each block is encrypted on its own and the ciphertext blocks are
//! concatenated. Decryption walks the ciphertext in `key_size` blocks.

use crate::core::{AppError, Result};
use openssl::pkey::{PKey, Private, Public};
use openssl::rsa::{Padding, Rsa};

const PKCS1_PADDING_OVERHEAD: usize = 11;
const PEM_LINE_WIDTH: usize = 64;

/// Loads a private key from PEM or from a bare base64 PKCS#8 body
pub fn load_private_key(material: &str) -> Result<Rsa<Private>> {
    let pem = armor(material, "PRIVATE KEY");
    let key = PKey::private_key_from_pem(pem.as_bytes())
        .map_err(|e| AppError::configuration(format!("Invalid merchant private key: {}", e)))?;
    key.rsa()
        .map_err(|e| AppError::configuration(format!("Merchant private key is not RSA: {}", e)))
}

/// Loads a public key from PEM or from a bare base64 SubjectPublicKeyInfo body
pub fn load_public_key(material: &str) -> Result<Rsa<Public>> {
    let pem = armor(material, "PUBLIC KEY");
    let parsed = if pem.contains("BEGIN RSA PUBLIC KEY") {
        Rsa::public_key_from_pem_pkcs1(pem.as_bytes())
    } else {
        Rsa::public_key_from_pem(pem.as_bytes())
    };
    parsed.map_err(|e| AppError::configuration(format!("Invalid platform public key: {}", e)))
}

/// Largest plaintext block a key can take in one operation
pub fn plaintext_chunk_size<T: openssl::pkey::HasPublic>(key: &Rsa<T>) -> usize {
    key.size() as usize - PKCS1_PADDING_OVERHEAD
}

/// Encrypts `plaintext` block by block with the private key
pub fn private_encrypt(key: &Rsa<Private>, plaintext: &[u8]) -> Result<Vec<u8>> {
    let block = key.size() as usize;
    let mut out = Vec::with_capacity(plaintext.len().div_ceil(plaintext_chunk_size(key)) * block);
    let mut buf = vec![0u8; block];

    for chunk in plaintext.chunks(plaintext_chunk_size(key)) {
        let len = key.private_encrypt(chunk, &mut buf, Padding::PKCS1)?;
        out.extend_from_slice(&buf[..len]);
    }

    Ok(out)
}

/// Decrypts ciphertext produced by a peer's [`private_encrypt`]
pub fn public_decrypt(key: &Rsa<Public>, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let block = key.size() as usize;
    if ciphertext.len() % block != 0 {
        return Err(AppError::signature_mismatch(format!(
            "ciphertext length {} is not a multiple of the {}-byte key block",
            ciphertext.len(),
            block
        )));
    }

    let mut out = Vec::with_capacity(ciphertext.len());
    let mut buf = vec![0u8; block];

    for chunk in ciphertext.chunks(block) {
        let len = key
            .public_decrypt(chunk, &mut buf, Padding::PKCS1)
            .map_err(|e| AppError::signature_mismatch(format!("RSA block rejected: {}", e)))?;
        out.extend_from_slice(&buf[..len]);
    }

    Ok(out)
}

/// Wraps a bare base64 key body in PEM armor; full PEM passes through
fn armor(material: &str, label: &str) -> String {
    let trimmed = material.trim();
    if trimmed.starts_with("-----BEGIN") {
        return trimmed.to_string();
    }

    let body: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    let lines = body
        .as_bytes()
        .chunks(PEM_LINE_WIDTH)
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect::<Vec<_>>()
        .join("\n");

    format!("-----BEGIN {label}-----\n{lines}\n-----END {label}-----\n")
}
