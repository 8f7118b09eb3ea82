//! Python bindings, built with the `python` feature
//!
//! Scanning releases the GIL, so Python threads classifying frames run in
//! parallel.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::matcher;
use crate::types::{Classification, TextSource};
use crate::validators;

/// Classification result as seen from Python
#[pyclass(name = "Classification", frozen)]
pub struct PyClassification {
    inner: Classification,
    /// "no_match", "candidate" or "validated"
    #[pyo3(get)]
    kind: &'static str,
    /// "aadhaar", "pan" or None
    #[pyo3(get)]
    format: Option<&'static str>,
    /// Normalized number or raw match text
    #[pyo3(get)]
    value: Option<String>,
    /// Checksum outcome; None when no checksum applies
    #[pyo3(get)]
    valid: Option<bool>,
}

impl From<Classification> for PyClassification {
    fn from(inner: Classification) -> Self {
        let (kind, value) = match &inner {
            Classification::NoMatch => ("no_match", None),
            Classification::Candidate { raw, .. } => ("candidate", Some(raw.clone())),
            Classification::Validated { number, .. } => ("validated", Some(number.clone())),
        };
        Self {
            kind,
            format: inner.format().map(|f| f.as_str()),
            value,
            valid: inner.is_valid(),
            inner,
        }
    }
}

#[pymethods]
impl PyClassification {
    /// User-facing status line; `source` is "ocr" or "manual"
    #[pyo3(signature = (source = "ocr"))]
    fn message(&self, source: &str) -> PyResult<String> {
        let source = match source {
            "ocr" => TextSource::Ocr,
            "manual" => TextSource::Manual,
            other => {
                return Err(PyValueError::new_err(format!(
                    "unknown source {other:?}, expected \"ocr\" or \"manual\""
                )))
            }
        };
        Ok(self.inner.message(source))
    }

    fn __repr__(&self) -> String {
        format!(
            "Classification(kind={:?}, format={:?}, valid={:?})",
            self.kind, self.format, self.valid
        )
    }
}

/// Classify OCR text
#[pyfunction]
fn classify(py: Python<'_>, text: &str) -> PyClassification {
    py.allow_threads(|| matcher::classify(text)).into()
}

/// Classify a manually entered card number
#[pyfunction]
fn classify_manual(py: Python<'_>, text: &str) -> PyClassification {
    py.allow_threads(|| matcher::classify_manual(text)).into()
}

/// Classify many OCR texts in parallel
#[pyfunction]
fn classify_batch(py: Python<'_>, texts: Vec<String>) -> Vec<PyClassification> {
    py.allow_threads(|| matcher::classify_batch(&texts))
        .into_iter()
        .map(PyClassification::from)
        .collect()
}

/// Validate a 12-digit Aadhaar number using the Verhoeff algorithm
#[pyfunction]
fn validate_verhoeff(number: &str) -> PyResult<bool> {
    validators::verhoeff_str(number).map_err(|err| PyValueError::new_err(err.to_string()))
}

/// Compute the Verhoeff check digit for an 11-digit payload
#[pyfunction]
fn verhoeff_check_digit(payload: &str) -> PyResult<u8> {
    validators::verhoeff_check_digit_str(payload)
        .map_err(|err| PyValueError::new_err(err.to_string()))
}

/// Install a stderr tracing subscriber; returns False if one was already set
#[pyfunction]
#[pyo3(signature = (filter = None))]
fn init_tracing(filter: Option<&str>) -> PyResult<bool> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|err| PyValueError::new_err(err.to_string()))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok())
}

/// Check if native extension is working
#[pyfunction]
fn is_native_available() -> bool {
    true
}

/// Card scan native extension module
#[pymodule]
fn _rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyClassification>()?;
    m.add_function(wrap_pyfunction!(classify, m)?)?;
    m.add_function(wrap_pyfunction!(classify_manual, m)?)?;
    m.add_function(wrap_pyfunction!(classify_batch, m)?)?;
    m.add_function(wrap_pyfunction!(validate_verhoeff, m)?)?;
    m.add_function(wrap_pyfunction!(verhoeff_check_digit, m)?)?;
    m.add_function(wrap_pyfunction!(init_tracing, m)?)?;
    m.add_function(wrap_pyfunction!(is_native_available, m)?)?;
    Ok(())
}
