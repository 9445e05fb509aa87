//! TRON address helpers
//!
//! Base58Check: `0x41 || 20-byte account id || first 4 bytes of
//! sha256(sha256(body))`.

use sha2::{Digest, Sha256};

use super::constants::{TRON_ADDRESS_BODY_LEN, TRON_ADDRESS_PREFIX, TRON_CHECKSUM_LEN};
use crate::models::errors::{AppError, AppResult, ErrorCode};

const ACCOUNT_ID_LEN: usize = TRON_ADDRESS_BODY_LEN - 1;

fn checksum(body: &[u8]) -> [u8; TRON_CHECKSUM_LEN] {
    let digest = Sha256::digest(Sha256::digest(body));
    let mut out = [0u8; TRON_CHECKSUM_LEN];
    out.copy_from_slice(&digest[..TRON_CHECKSUM_LEN]);
    out
}

/// Decode and verify a base58 address, returning the 21-byte body
pub fn decode_tron_address(address: &str) -> AppResult<[u8; TRON_ADDRESS_BODY_LEN]> {
    let raw = bs58::decode(address.trim()).into_vec().map_err(|e| {
        AppError::new(ErrorCode::AddressInvalidEncoding, format!("Invalid base58 address: {}", e))
    })?;

    if raw.len() != TRON_ADDRESS_BODY_LEN + TRON_CHECKSUM_LEN {
        return Err(AppError::new(
            ErrorCode::AddressInvalidLength,
            format!("Decoded address is {} bytes, expected {}", raw.len(), TRON_ADDRESS_BODY_LEN + TRON_CHECKSUM_LEN),
        ));
    }

    let (body, check) = raw.split_at(TRON_ADDRESS_BODY_LEN);
    if body[0] != TRON_ADDRESS_PREFIX {
        return Err(AppError::new(
            ErrorCode::AddressInvalidPrefix,
            format!("Address prefix 0x{:02x} is not a TRON mainnet address", body[0]),
        ));
    }
    if checksum(body) != check {
        return Err(AppError::new(ErrorCode::AddressInvalidChecksum, "Address checksum mismatch"));
    }

    let mut out = [0u8; TRON_ADDRESS_BODY_LEN];
    out.copy_from_slice(body);
    Ok(out)
}

/// Validate a base58 TRON address
pub fn validate_tron_address(address: &str) -> AppResult<()> {
    decode_tron_address(address).map(|_| ())
}

/// Base58 address to `41`-prefixed lowercase hex
pub fn tron_base58_to_hex(address: &str) -> AppResult<String> {
    decode_tron_address(address).map(hex::encode)
}

/// Hex address (`0x41..`, `41..`, bare 20 bytes or a wider word) to base58
pub fn tron_hex_to_base58(hex_address: &str) -> AppResult<String> {
    let trimmed = hex_address.trim();
    let stripped = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes = hex::decode(stripped).map_err(|e| {
        AppError::new(ErrorCode::AddressInvalidEncoding, format!("Invalid hex address: {}", e))
    })?;

    // Anything not already a 0x41 body is re-prefixed from its last 20 bytes
    let body = match bytes.len() {
        TRON_ADDRESS_BODY_LEN if bytes[0] == TRON_ADDRESS_PREFIX => bytes,
        n if n >= ACCOUNT_ID_LEN => {
            let mut body = Vec::with_capacity(TRON_ADDRESS_BODY_LEN);
            body.push(TRON_ADDRESS_PREFIX);
            body.extend_from_slice(&bytes[n - ACCOUNT_ID_LEN..]);
            body
        }
        n => {
            return Err(AppError::new(
                ErrorCode::AddressInvalidLength,
                format!("Hex address is {} bytes, expected at least {}", n, ACCOUNT_ID_LEN),
            ))
        }
    };

    let mut full = body.clone();
    full.extend_from_slice(&checksum(&body));
    Ok(bs58::encode(full).into_string())
}

/// Accept either form and return the canonical base58 address
pub fn canonical_address(input: &str) -> AppResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::new(ErrorCode::AddressInvalidLength, "Address is empty"));
    }

    if trimmed.starts_with('T') {
        validate_tron_address(trimmed)?;
        Ok(trimmed.to_string())
    } else {
        tron_hex_to_base58(trimmed)
    }
}
