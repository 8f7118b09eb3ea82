//! Checksum validation for detected card numbers
//!
//! Aadhaar numbers carry a Verhoeff check digit: the running check value is
//! accumulated through the multiplication table of the dihedral group D5,
//! with each digit first permuted according to its position.

use tracing::{instrument, trace};

use crate::error::{Result, ValidationError};
use crate::types::{parse_digits, DigitSequence, AADHAAR_LEN};

/// Multiplication table of the dihedral group of order 10.
const VERHOEFF_D: [[u8; 10]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 2, 3, 4, 0, 6, 7, 8, 9, 5],
    [2, 3, 4, 0, 1, 7, 8, 9, 5, 6],
    [3, 4, 0, 1, 2, 8, 9, 5, 6, 7],
    [4, 0, 1, 2, 3, 9, 5, 6, 7, 8],
    [5, 9, 8, 7, 6, 0, 4, 3, 2, 1],
    [6, 5, 9, 8, 7, 1, 0, 4, 3, 2],
    [7, 6, 5, 9, 8, 2, 1, 0, 4, 3],
    [8, 7, 6, 5, 9, 3, 2, 1, 0, 4],
    [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
];

/// Position permutation; row `i % 8` applies to the i-th digit from the right.
const VERHOEFF_P: [[u8; 10]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 5, 7, 6, 2, 8, 3, 0, 9, 4],
    [5, 8, 0, 3, 7, 9, 6, 1, 4, 2],
    [8, 9, 1, 6, 0, 4, 3, 5, 2, 7],
    [9, 4, 5, 3, 1, 2, 6, 8, 7, 0],
    [4, 2, 8, 6, 5, 7, 3, 9, 0, 1],
    [2, 7, 9, 3, 8, 0, 6, 4, 1, 5],
    [7, 0, 4, 6, 9, 1, 3, 2, 5, 8],
];

/// Inverse of each element of D5 under `VERHOEFF_D`.
const VERHOEFF_INV: [u8; 10] = [0, 4, 3, 2, 1, 5, 6, 7, 8, 9];

/// Fold digits right to left; `offset` shifts the permutation row.
fn verhoeff_fold(digits: &[u8], offset: usize) -> u8 {
    digits.iter().rev().enumerate().fold(0, |c, (i, &d)| {
        VERHOEFF_D[c as usize][VERHOEFF_P[(i + offset) % 8][d as usize] as usize]
    })
}

/// Validate an Aadhaar number using the Verhoeff algorithm
pub fn verhoeff(seq: &DigitSequence) -> bool {
    verhoeff_fold(seq.digits(), 0) == 0
}

/// Parse and validate a 12-digit number given as text.
///
/// Whitespace is stripped first, so grouped input like `"2345 6789 0124"`
/// is accepted.
#[instrument(level = "trace", skip_all, fields(len = number.len()))]
pub fn verhoeff_str(number: &str) -> Result<bool> {
    let seq = DigitSequence::parse(number)?;
    let valid = verhoeff(&seq);
    trace!(valid, "Verhoeff check complete");
    Ok(valid)
}

/// Compute the check digit to append to `payload`.
///
/// Appending the result yields a sequence for which the Verhoeff check
/// passes. Any element above 9 is rejected as [`ValidationError::NonDigit`].
pub fn verhoeff_check_digit(payload: &[u8]) -> Result<u8> {
    if let Some(position) = payload.iter().position(|&d| d > 9) {
        return Err(ValidationError::NonDigit {
            position,
            found: char::from(b'0'.wrapping_add(payload[position])),
        });
    }
    Ok(VERHOEFF_INV[verhoeff_fold(payload, 1) as usize])
}

/// Check digit for an 11-digit Aadhaar payload given as text.
pub fn verhoeff_check_digit_str(payload: &str) -> Result<u8> {
    let digits = parse_digits(payload)?;
    if digits.len() != AADHAAR_LEN - 1 {
        return Err(ValidationError::InvalidLength {
            expected: AADHAAR_LEN - 1,
            actual: digits.len(),
        });
    }
    verhoeff_check_digit(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> DigitSequence {
        DigitSequence::parse(s).unwrap()
    }

    #[test]
    fn test_verhoeff_valid() {
        assert!(verhoeff(&seq("234567890124")));
        assert!(verhoeff(&seq("123456789010")));
        assert!(verhoeff(&seq("499118665246")));
        assert!(verhoeff(&seq("2341 2341 2346"))); // Grouped
        assert!(verhoeff(&seq("999999999999")));
    }

    #[test]
    fn test_verhoeff_invalid() {
        assert!(!verhoeff(&seq("123456789012")));
        assert!(!verhoeff(&seq("234567890121"))); // Wrong check digit
        assert!(!verhoeff(&seq("000000000000")));
    }

    #[test]
    fn test_verhoeff_str() {
        assert_eq!(verhoeff_str("2345 6789 0124"), Ok(true));
        assert_eq!(verhoeff_str("123456789012"), Ok(false));
        assert_eq!(
            verhoeff_str("12345"),
            Err(ValidationError::InvalidLength {
                expected: 12,
                actual: 5
            })
        );
        assert!(matches!(
            verhoeff_str("not a number"),
            Err(ValidationError::NonDigit { position: 0, found: 'n' })
        ));
    }

    #[test]
    fn test_check_digit() {
        assert_eq!(verhoeff_check_digit(&[2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2]), Ok(4));
        assert_eq!(verhoeff_check_digit(&[]), Ok(0));
        assert_eq!(verhoeff_check_digit_str("12345678901"), Ok(0));
        assert_eq!(verhoeff_check_digit_str("0000 0000 000"), Ok(3));
        assert!(matches!(
            verhoeff_check_digit_str("123456789012"),
            Err(ValidationError::InvalidLength { actual: 12, .. })
        ));
    }

    #[test]
    fn test_check_digit_rejects_out_of_range() {
        assert_eq!(
            verhoeff_check_digit(&[10]),
            Err(ValidationError::NonDigit {
                position: 0,
                found: ':'
            })
        );
        assert!(matches!(
            verhoeff_check_digit(&[1, 2, 3, 255]),
            Err(ValidationError::NonDigit { position: 3, .. })
        ));
    }

    #[test]
    fn test_tables_form_group() {
        // Row and column 0 are the identity element.
        for (i, row) in VERHOEFF_D.iter().enumerate() {
            assert_eq!(row[0] as usize, i);
            assert_eq!(VERHOEFF_D[0][i] as usize, i);
            assert_eq!(VERHOEFF_D[i][VERHOEFF_INV[i] as usize], 0);
        }
        // Every permutation row is a bijection on 0..=9.
        for row in VERHOEFF_P {
            let mut seen = [false; 10];
            for d in row {
                seen[d as usize] = true;
            }
            assert!(seen.iter().all(|&s| s));
        }
    }
}
