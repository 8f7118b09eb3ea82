//! Card number detection in free-form text
//!
//! Two fixed patterns are searched independently: the 12-digit Aadhaar number
//! (optionally grouped in fours) and the 10-character PAN code. Only the first
//! hit of each pattern is reported.

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, instrument, trace};

use crate::types::{CardFormat, Classification, DigitSequence, Detections, RawMatch};
use crate::validators::verhoeff;

// Word boundaries are ASCII-only: "Nº2345 6789 0124" still yields a number.
static AADHAAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)[0-9]{4} ?[0-9]{4} ?[0-9]{4}(?-u:\b)").expect("Valid Aadhaar pattern")
});

static PAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)[A-Z]{5}[0-9]{4}[A-Z](?-u:\b)").expect("Valid PAN pattern")
});

static MANUAL_AADHAAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{12}$").expect("Valid manual Aadhaar pattern"));

// Manual PAN lookup is unanchored and unbounded: "xABCDE1234Fy" still counts.
static MANUAL_PAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]{5}[0-9]{4}[A-Z]").expect("Valid manual PAN pattern"));

fn first_match(pattern: &Regex, format: CardFormat, text: &str) -> Option<RawMatch> {
    pattern.find(text).map(|m| RawMatch {
        format,
        text: m.as_str().to_string(),
        start: m.start(),
        end: m.end(),
    })
}

/// First Aadhaar-shaped number in `text`, as written.
pub fn find_aadhaar(text: &str) -> Option<RawMatch> {
    first_match(&AADHAAR, CardFormat::Aadhaar, text)
}

/// First PAN-shaped code in `text`.
pub fn find_pan(text: &str) -> Option<RawMatch> {
    first_match(&PAN, CardFormat::Pan, text)
}

/// Run both patterns and report each first hit.
///
/// Unlike [`classify`], nothing is discarded when both formats are present.
pub fn scan(text: &str) -> Detections {
    Detections {
        aadhaar: find_aadhaar(text),
        pan: find_pan(text),
    }
}

fn validate_aadhaar(number: &str) -> Classification {
    match DigitSequence::parse(number) {
        Ok(seq) => Classification::Validated {
            format: CardFormat::Aadhaar,
            number: seq.as_string(),
            valid: verhoeff(&seq),
        },
        // Pattern output always parses.
        Err(err) => {
            debug!(%err, "Aadhaar candidate failed normalization");
            Classification::NoMatch
        }
    }
}

/// Classify OCR output.
///
/// When both formats appear, the PAN result replaces the Aadhaar result.
/// Callers that need both should use [`scan`].
#[instrument(skip_all, fields(len = text.len()))]
pub fn classify(text: &str) -> Classification {
    let detections = scan(text.trim());

    // Numbers are personal data: log formats and validity only.
    let mut result = Classification::NoMatch;
    if let Some(aadhaar) = &detections.aadhaar {
        result = validate_aadhaar(&aadhaar.text);
        debug!(valid = ?result.is_valid(), "Aadhaar number detected");
    }
    if let Some(pan) = detections.pan {
        if detections.aadhaar.is_some() {
            debug!("PAN code supersedes Aadhaar number");
        }
        result = Classification::Candidate {
            format: CardFormat::Pan,
            raw: pan.text,
        };
        debug!("PAN code detected");
    }

    if !result.is_match() {
        trace!("no card pattern found");
    }
    result
}

/// Classify a number typed by the user.
///
/// The whole (trimmed) input must be 12 digits to be checked as Aadhaar;
/// grouped input is not accepted here. A PAN code may appear anywhere.
#[instrument(skip_all, fields(len = input.len()))]
pub fn classify_manual(input: &str) -> Classification {
    let input = input.trim();

    if MANUAL_AADHAAR.is_match(input) {
        let result = validate_aadhaar(input);
        debug!(valid = ?result.is_valid(), "manual Aadhaar number checked");
        return result;
    }

    if let Some(m) = MANUAL_PAN.find(input) {
        debug!("manual PAN code detected");
        return Classification::Candidate {
            format: CardFormat::Pan,
            raw: m.as_str().to_string(),
        };
    }

    trace!("manual input matched no format");
    Classification::NoMatch
}

/// Classify many OCR texts in parallel, preserving input order.
pub fn classify_batch<S>(texts: &[S]) -> Vec<Classification>
where
    S: AsRef<str> + Sync,
{
    debug!(count = texts.len(), "classifying batch");
    texts.par_iter().map(|t| classify(t.as_ref())).collect()
}
