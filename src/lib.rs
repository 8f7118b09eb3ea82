//! Card scan native kernel
//!
//! Detects identity card numbers in OCR output or typed input and validates
//! Aadhaar numbers with the Verhoeff checksum. Every entry point is a pure
//! function of its input text; the regex patterns and checksum tables are
//! read-only statics, so calls are safe from any number of threads.
//!
//! Camera capture, image preprocessing and the OCR engine itself live in the
//! host application, which hands the recognized text to [`classify`].

pub mod error;
pub mod matcher;
pub mod types;
pub mod validators;

#[cfg(feature = "python")]
mod python;

pub use error::{Result, ValidationError};
pub use matcher::{classify, classify_batch, classify_manual, find_aadhaar, find_pan, scan};
pub use types::{
    CardFormat, Classification, Detections, DigitSequence, RawMatch, TextSource, AADHAAR_LEN,
};
pub use validators::{verhoeff, verhoeff_check_digit, verhoeff_check_digit_str, verhoeff_str};
