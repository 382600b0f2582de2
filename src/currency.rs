use crate::float::ieee754_from_bytes;

/// By convention the ledger's interest/demurrage rules use a fixed number of
/// seconds per year, not adjusted for leap days or leap seconds.
const YEAR_SECONDS: f64 = 31_536_000.0;

/// Length of the hex-encoded 160-bit currency code form.
const ENCODED_LEN: usize = 40;

/// First byte of an AMM pool-share token code.
const AMM_PREFIX: &str = "03";
/// First byte of a demurrage/interest-bearing asset code.
const DEMURRAGE_PREFIX: &str = "01";

/// Decodes a hex currency code to a display symbol, substituting `"?"` for
/// text that cannot be rendered.
///
/// Short codes pass through unchanged: `currency_to_symbol("USD") == "USD"`.
pub fn currency_to_symbol(currency_code: &str) -> String {
    currency_to_symbol_or(currency_code, "?")
}

/// Same as [`currency_to_symbol`] with a caller-supplied fallback for
/// malformed text.
///
/// A 160-bit code starting with byte `0x03` is an AMM pool-share token (the
/// remaining 19 bytes are a hash, not text) and renders as `LP <code>`. A
/// code starting with `0x01` carries a demurrage rate and renders as
/// `<CODE> (<rate>% pa)`. Anything else is treated as padded ASCII text.
pub fn currency_to_symbol_or(currency_code: &str, fallback: &str) -> String {
    if currency_code.len() != ENCODED_LEN {
        return currency_code.to_string();
    }

    if currency_code.starts_with(AMM_PREFIX) {
        return format!("LP {currency_code}");
    }

    let Ok(bytes) = hex::decode(currency_code) else {
        // 40 characters but not the hex-encoded form
        return currency_code.to_string();
    };

    if currency_code.starts_with(DEMURRAGE_PREFIX) {
        return demurrage_symbol(&bytes);
    }

    let cleaned = strip_control_bytes(trim_padding(&bytes));
    if cleaned
        .iter()
        .any(|byte| !byte.is_ascii_graphic() && *byte != b' ')
    {
        // arbitrary binary, keep whatever is printable
        return cleaned
            .iter()
            .filter(|byte| byte.is_ascii_graphic() || **byte == b' ')
            .map(|&byte| byte as char)
            .collect();
    }

    match String::from_utf8(cleaned) {
        Ok(text) => text,
        Err(_) => fallback.to_string(),
    }
}

/// Renders a demurrage code: three ASCII characters for the base code and an
/// annualized interest rate decoded from the embedded IEEE-754 double.
fn demurrage_symbol(bytes: &[u8]) -> String {
    let code: String = bytes[1..4].iter().map(|&byte| byte as char).collect();
    let rate = match ieee754_from_bytes(&bytes[8..16]) {
        Ok(interest_period) if interest_period.is_finite() => {
            let interest_after_year = (YEAR_SECONDS / interest_period).exp();
            let percentage = 100.0 * (interest_after_year - 1.0);
            if percentage.is_finite() {
                format!("{percentage:.1}")
            } else {
                "?".to_string()
            }
        }
        // an infinite or NaN period has no meaningful annualized rate
        _ => "?".to_string(),
    };
    format!("{code} ({rate}% pa)")
}

/// Strips the NUL/whitespace padding a fixed-width code carries around its
/// text, from both ends.
fn trim_padding(bytes: &[u8]) -> &[u8] {
    const PADDING: &[u8] = b" \t\n\r\x0B\0";
    let start = bytes
        .iter()
        .position(|byte| !PADDING.contains(byte))
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|byte| !PADDING.contains(byte))
        .map_or(start, |index| index + 1);
    &bytes[start..end]
}

/// Removes ASCII control characters (0x00-0x1F and 0x7F) anywhere in the
/// byte string.
fn strip_control_bytes(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .copied()
        .filter(|byte| !byte.is_ascii_control())
        .collect()
}
