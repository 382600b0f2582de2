use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FloatError {
    #[error("unsupported float width of {0} bytes, expected 4 or 8")]
    UnsupportedWidth(usize),
}

/// Reconstructs an IEEE-754 floating-point value from its big-endian byte
/// representation. 4 bytes decode as single precision, 8 bytes as double.
///
/// The decode is done bit by bit on purpose: the demurrage rate embedded in
/// currency codes must come out identical on every platform, so we never go
/// through a native float parse.
pub fn ieee754_from_bytes(bytes: &[u8]) -> Result<f64, FloatError> {
    let (exponent_bits, mantissa_bits) = match bytes.len() {
        4 => (8u32, 23u32),
        8 => (11u32, 52u32),
        n => return Err(FloatError::UnsupportedWidth(n)),
    };
    let bias = (1i64 << (exponent_bits - 1)) - 1;

    let mut raw: u64 = 0;
    for &byte in bytes {
        raw = (raw << 8) | u64::from(byte);
    }

    let total_bits = bytes.len() as u32 * 8;
    let sign = if raw >> (total_bits - 1) & 1 == 1 {
        -1.0
    } else {
        1.0
    };
    let exponent = ((raw >> mantissa_bits) & ((1 << exponent_bits) - 1)) as i64;
    let mantissa = raw & ((1u64 << mantissa_bits) - 1);
    let max_exponent = (1i64 << exponent_bits) - 1;

    let magnitude = if exponent == 0 {
        // zero or denormalized
        mantissa as f64 * pow2(1 - bias - i64::from(mantissa_bits))
    } else if exponent == max_exponent {
        if mantissa == 0 {
            f64::INFINITY
        } else {
            f64::NAN
        }
    } else {
        (1.0 + mantissa as f64 * pow2(-i64::from(mantissa_bits))) * pow2(exponent - bias)
    };

    Ok(sign * magnitude)
}

/// Exact power of two. `powi` computes negative exponents as the reciprocal
/// of the positive power, which overflows to infinity before the reciprocal
/// can land in the subnormal range, so large negative exponents are split.
fn pow2(exponent: i64) -> f64 {
    if exponent < -1022 {
        2f64.powi(-1022) * 2f64.powi((exponent + 1022) as i32)
    } else {
        2f64.powi(exponent as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_double_bits(hex: &str) {
        let bytes = hex::decode(hex).unwrap();
        let expected = f64::from_be_bytes(bytes.clone().try_into().unwrap());
        let decoded = ieee754_from_bytes(&bytes).unwrap();
        assert_eq!(
            decoded.to_bits(),
            expected.to_bits(),
            "mismatch for {hex}: {decoded} vs {expected}"
        );
    }

    fn assert_single_bits(hex: &str) {
        let bytes = hex::decode(hex).unwrap();
        let expected = f64::from(f32::from_be_bytes(bytes.clone().try_into().unwrap()));
        let decoded = ieee754_from_bytes(&bytes).unwrap();
        assert_eq!(
            decoded.to_bits(),
            expected.to_bits(),
            "mismatch for {hex}: {decoded} vs {expected}"
        );
    }

    #[test]
    fn decodes_double_precision() {
        assert_double_bits("0000000000000000"); // 0.0
        assert_double_bits("8000000000000000"); // -0.0
        assert_double_bits("3FF0000000000000"); // 1.0
        assert_double_bits("BFF0000000000000"); // -1.0
        assert_double_bits("400921FB54442D18"); // pi
        assert_double_bits("C1F76FF6ECB0BAC6"); // demurrage period from the XAU test code
        assert_double_bits("7FEFFFFFFFFFFFFF"); // f64::MAX
    }

    #[test]
    fn decodes_double_denormals() {
        assert_double_bits("0000000000000001"); // smallest subnormal
        assert_double_bits("000FFFFFFFFFFFFF"); // largest subnormal
        assert_double_bits("8000000000000001"); // negative subnormal
    }

    #[test]
    fn decodes_single_precision() {
        assert_single_bits("00000000"); // 0.0
        assert_single_bits("3F800000"); // 1.0
        assert_single_bits("C0000000"); // -2.0
        assert_single_bits("40490FDB"); // pi, f32
        assert_single_bits("00000001"); // smallest single subnormal
    }

    #[test]
    fn decodes_infinities() {
        let pos = ieee754_from_bytes(&hex::decode("7FF0000000000000").unwrap()).unwrap();
        assert_eq!(pos, f64::INFINITY);
        let neg = ieee754_from_bytes(&hex::decode("FFF0000000000000").unwrap()).unwrap();
        assert_eq!(neg, f64::NEG_INFINITY);
        let single = ieee754_from_bytes(&hex::decode("7F800000").unwrap()).unwrap();
        assert_eq!(single, f64::INFINITY);
    }

    #[test]
    fn decodes_nan() {
        let quiet = ieee754_from_bytes(&hex::decode("7FF8000000000000").unwrap()).unwrap();
        assert!(quiet.is_nan());
        let payload = ieee754_from_bytes(&hex::decode("FFF0000000000001").unwrap()).unwrap();
        assert!(payload.is_nan());
        let single = ieee754_from_bytes(&hex::decode("7FC00000").unwrap()).unwrap();
        assert!(single.is_nan());
    }

    #[test]
    fn rejects_unsupported_widths() {
        assert_eq!(
            ieee754_from_bytes(&[0x00; 2]),
            Err(FloatError::UnsupportedWidth(2))
        );
        assert_eq!(
            ieee754_from_bytes(&[0x00; 16]),
            Err(FloatError::UnsupportedWidth(16))
        );
        assert_eq!(
            ieee754_from_bytes(&[]),
            Err(FloatError::UnsupportedWidth(0))
        );
    }
}
