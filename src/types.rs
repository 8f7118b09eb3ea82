//! Result and value types shared by the matcher and validators

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Number of digits in an Aadhaar number.
pub const AADHAAR_LEN: usize = 12;

/// The identity formats this crate recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardFormat {
    /// 12-digit number, optionally grouped `DDDD DDDD DDDD`, Verhoeff checked.
    Aadhaar,
    /// `AAAAA9999A` code with no checksum.
    Pan,
}

impl CardFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardFormat::Aadhaar => "aadhaar",
            CardFormat::Pan => "pan",
        }
    }
}

impl fmt::Display for CardFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strip whitespace and decode the remaining characters as decimal digits.
///
/// `NonDigit::position` counts characters after whitespace removal.
pub(crate) fn parse_digits(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .enumerate()
        .map(|(position, c)| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => Ok(d as u8),
            _ => Err(ValidationError::NonDigit { position, found: c }),
        })
        .collect()
}

/// A normalized 12-digit Aadhaar number.
///
/// Only constructible through [`DigitSequence::parse`] or
/// [`DigitSequence::from_digits`], so every value has exactly 12 digits in
/// `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigitSequence([u8; AADHAAR_LEN]);

impl DigitSequence {
    /// Parse text such as `"2345 6789 0124"`; embedded whitespace is dropped.
    pub fn parse(text: &str) -> Result<Self> {
        let digits = parse_digits(text)?;
        let actual = digits.len();
        let digits: [u8; AADHAAR_LEN] = digits
            .try_into()
            .map_err(|_| ValidationError::InvalidLength {
                expected: AADHAAR_LEN,
                actual,
            })?;
        Ok(Self(digits))
    }

    /// Build from raw digit values, rejecting anything above 9.
    pub fn from_digits(digits: [u8; AADHAAR_LEN]) -> Result<Self> {
        if let Some(position) = digits.iter().position(|&d| d > 9) {
            return Err(ValidationError::NonDigit {
                position,
                found: char::from(b'0'.wrapping_add(digits[position])),
            });
        }
        Ok(Self(digits))
    }

    pub fn digits(&self) -> &[u8; AADHAAR_LEN] {
        &self.0
    }

    pub fn as_string(&self) -> String {
        self.0.iter().map(|&d| char::from(b'0' + d)).collect()
    }
}

impl fmt::Display for DigitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl std::str::FromStr for DigitSequence {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// One pattern hit inside scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMatch {
    pub format: CardFormat,
    /// Matched substring exactly as it appeared (spaces included).
    pub text: String,
    /// Byte offset of the match start
    pub start: usize,
    /// Byte offset of the match end
    pub end: usize,
}

/// First hit of each pattern, independent of the classification precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detections {
    pub aadhaar: Option<RawMatch>,
    pub pan: Option<RawMatch>,
}

impl Detections {
    pub fn is_empty(&self) -> bool {
        self.aadhaar.is_none() && self.pan.is_none()
    }
}

/// Where the classified text came from; only affects [`Classification::message`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextSource {
    #[default]
    Ocr,
    Manual,
}

/// Outcome of classifying one piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    /// Neither pattern was found.
    NoMatch,
    /// A format was recognized but has no checksum to run.
    Candidate { format: CardFormat, raw: String },
    /// A checksummed format was recognized and verified.
    Validated {
        format: CardFormat,
        number: String,
        valid: bool,
    },
}

impl Classification {
    pub fn format(&self) -> Option<CardFormat> {
        match self {
            Classification::NoMatch => None,
            Classification::Candidate { format, .. } | Classification::Validated { format, .. } => {
                Some(*format)
            }
        }
    }

    pub fn is_match(&self) -> bool {
        !matches!(self, Classification::NoMatch)
    }

    /// `Some(valid)` for checksummed results, `None` otherwise.
    pub fn is_valid(&self) -> Option<bool> {
        match self {
            Classification::Validated { valid, .. } => Some(*valid),
            _ => None,
        }
    }

    /// The user-facing status line for this result.
    pub fn message(&self, source: TextSource) -> String {
        match self {
            Classification::NoMatch => match source {
                TextSource::Ocr => "No card detected".to_string(),
                TextSource::Manual => "Invalid Input".to_string(),
            },
            Classification::Validated { valid: false, .. } => {
                "Invalid Aadhar Card (Checksum Failed)".to_string()
            }
            // Manual wording carries no number.
            Classification::Validated { number, .. } => match source {
                TextSource::Ocr => format!("Valid Aadhar Card {number}"),
                TextSource::Manual => "Valid Aadhar Card".to_string(),
            },
            Classification::Candidate { raw, .. } => match source {
                TextSource::Ocr => format!("Detected: PAN Card {raw}"),
                TextSource::Manual => "Detected: PAN Card".to_string(),
            },
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message(TextSource::Ocr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_whitespace() {
        let seq = DigitSequence::parse("2345 6789\t0124").unwrap();
        assert_eq!(seq.as_string(), "234567890124");
        assert_eq!(seq.digits()[0], 2);
        assert_eq!(seq.to_string(), "234567890124");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert_eq!(
            DigitSequence::parse("12345678901"),
            Err(ValidationError::InvalidLength {
                expected: 12,
                actual: 11
            })
        );
        assert_eq!(
            DigitSequence::parse(""),
            Err(ValidationError::InvalidLength {
                expected: 12,
                actual: 0
            })
        );
    }

    #[test]
    fn test_parse_rejects_non_digits() {
        assert_eq!(
            DigitSequence::parse("1234-5678-9012"),
            Err(ValidationError::NonDigit {
                position: 4,
                found: '-'
            })
        );
        // Non-ASCII digits are not Aadhaar digits
        assert!(matches!(
            DigitSequence::parse("١٢٣٤٥٦٧٨٩٠١٢"),
            Err(ValidationError::NonDigit { position: 0, .. })
        ));
    }

    #[test]
    fn test_from_digits_range() {
        assert!(DigitSequence::from_digits([9; 12]).is_ok());
        let mut digits = [1; 12];
        digits[5] = 10;
        assert!(matches!(
            DigitSequence::from_digits(digits),
            Err(ValidationError::NonDigit { position: 5, .. })
        ));
    }

    #[test]
    fn test_messages() {
        let valid = Classification::Validated {
            format: CardFormat::Aadhaar,
            number: "234567890124".into(),
            valid: true,
        };
        assert_eq!(valid.to_string(), "Valid Aadhar Card 234567890124");

        let invalid = Classification::Validated {
            format: CardFormat::Aadhaar,
            number: "123456789012".into(),
            valid: false,
        };
        assert_eq!(
            invalid.message(TextSource::Manual),
            "Invalid Aadhar Card (Checksum Failed)"
        );

        let pan = Classification::Candidate {
            format: CardFormat::Pan,
            raw: "ABCDE1234F".into(),
        };
        assert_eq!(pan.to_string(), "Detected: PAN Card ABCDE1234F");
        assert_eq!(pan.message(TextSource::Manual), "Detected: PAN Card");
        assert_eq!(valid.message(TextSource::Manual), "Valid Aadhar Card");

        assert_eq!(Classification::NoMatch.to_string(), "No card detected");
        assert_eq!(
            Classification::NoMatch.message(TextSource::Manual),
            "Invalid Input"
        );
    }

    #[test]
    fn test_accessors() {
        let pan = Classification::Candidate {
            format: CardFormat::Pan,
            raw: "ABCDE1234F".into(),
        };
        assert_eq!(pan.format(), Some(CardFormat::Pan));
        assert_eq!(pan.is_valid(), None);
        assert!(pan.is_match());
        assert!(!Classification::NoMatch.is_match());
        assert!(Detections::default().is_empty());
    }
}
