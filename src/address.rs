use sha2::{Digest, Sha256};
use thiserror::Error;

/// The base58 alphabet used by classic ledger addresses. The first character
/// is `r`, which is why every account address starts with at least one `r`
/// (the account-id payload begins with a zero type byte).
const ALPHABET: &[u8; 58] = b"rpshnaf39wBUDNEGHJKLM4PQRST7VWXYZ2bcdeCg65jkm8oFqi1tuvAxyz";

/// Type prefix of an account-id payload.
const ACCOUNT_ID_PREFIX: u8 = 0x00;

/// Length of the checksum appended to every encoded payload.
const CHECKSUM_LEN: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid base58 character {0:?} in address")]
    InvalidCharacter(char),
    #[error("address too short to carry a checksum")]
    TooShort,
    #[error("address checksum mismatch")]
    BadChecksum,
    #[error("unexpected address type prefix {0:#04x}")]
    BadPrefix(u8),
    #[error("unexpected account id length of {0} bytes, expected 20")]
    BadLength(usize),
}

/// Decodes a classic address into its 160-bit account id, verifying the
/// double-SHA-256 checksum and the account-id type prefix.
pub fn decode_account_id(address: &str) -> Result<[u8; 20], AddressError> {
    let raw = decode_base58(address)?;
    if raw.len() <= CHECKSUM_LEN {
        return Err(AddressError::TooShort);
    }
    let (payload, checksum) = raw.split_at(raw.len() - CHECKSUM_LEN);
    if checksum_of(payload) != checksum {
        return Err(AddressError::BadChecksum);
    }
    if payload[0] != ACCOUNT_ID_PREFIX {
        return Err(AddressError::BadPrefix(payload[0]));
    }
    let body = &payload[1..];
    if body.len() != 20 {
        return Err(AddressError::BadLength(body.len()));
    }
    let mut account_id = [0u8; 20];
    account_id.copy_from_slice(body);
    Ok(account_id)
}

/// Encodes a 160-bit account id as a classic address.
pub fn encode_account_id(account_id: [u8; 20]) -> String {
    let mut payload = Vec::with_capacity(1 + account_id.len() + CHECKSUM_LEN);
    payload.push(ACCOUNT_ID_PREFIX);
    payload.extend_from_slice(&account_id);
    let checksum = checksum_of(&payload);
    payload.extend_from_slice(&checksum);
    encode_base58(&payload)
}

/// First four bytes of SHA-256 applied twice.
fn checksum_of(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(Sha256::digest(payload));
    let mut checksum = [0u8; CHECKSUM_LEN];
    checksum.copy_from_slice(&digest[..CHECKSUM_LEN]);
    checksum
}

fn decode_base58(text: &str) -> Result<Vec<u8>, AddressError> {
    // big-endian byte accumulator: multiply by 58 and add each digit
    let mut out: Vec<u8> = Vec::new();
    for ch in text.chars() {
        let digit = ALPHABET
            .iter()
            .position(|&letter| ch.is_ascii() && letter == ch as u8)
            .ok_or(AddressError::InvalidCharacter(ch))? as u32;
        let mut carry = digit;
        for byte in out.iter_mut().rev() {
            let value = u32::from(*byte) * 58 + carry;
            *byte = (value & 0xFF) as u8;
            carry = value >> 8;
        }
        while carry > 0 {
            out.insert(0, (carry & 0xFF) as u8);
            carry >>= 8;
        }
    }
    // each leading first-alphabet character stands for one zero byte
    let leading_zeros = text.bytes().take_while(|&byte| byte == ALPHABET[0]).count();
    let mut bytes = vec![0u8; leading_zeros];
    bytes.extend_from_slice(&out);
    Ok(bytes)
}

fn encode_base58(bytes: &[u8]) -> String {
    let leading_zeros = bytes.iter().take_while(|&&byte| byte == 0).count();
    // little-endian digit accumulator: multiply by 256 and add each byte
    let mut digits: Vec<u8> = Vec::new();
    for &byte in bytes {
        let mut carry = u32::from(byte);
        for digit in digits.iter_mut() {
            let value = u32::from(*digit) * 256 + carry;
            *digit = (value % 58) as u8;
            carry = value / 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }
    let mut text = String::with_capacity(leading_zeros + digits.len());
    for _ in 0..leading_zeros {
        text.push(ALPHABET[0] as char);
    }
    for &digit in digits.iter().rev() {
        text.push(ALPHABET[digit as usize] as char);
    }
    text
}
