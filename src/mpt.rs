use crate::address::{AddressError, decode_account_id};

/// Derives the 192-bit issuance id of a multi-purpose token from the
/// issuance entry's `Sequence` and `Issuer`: the big-endian sequence number
/// followed by the issuer's 160-bit account id, as uppercase hex.
///
/// This is the ledger's token-id scheme, so the result matches the
/// `MPTokenIssuanceID` holders carry on their balance entries.
pub fn make_mpt_id(sequence: u32, issuer: &str) -> Result<String, AddressError> {
    let account_id = decode_account_id(issuer)?;
    Ok(format!("{sequence:08X}{}", hex::encode_upper(account_id)))
}
