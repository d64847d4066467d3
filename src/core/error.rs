//! Error types for detour-rank
//!
//! Chunk- and cell-level service failures never show up here: the engine
//! degrades them to missing distances. What remains is fatal.

use std::fmt;

use strsim::normalized_levenshtein;

/// Minimum similarity for a header to be offered as a column suggestion
const SUGGESTION_THRESHOLD: f64 = 0.6;

/// Suggest the header the user most likely meant when `wanted` is absent.
///
/// A case-insensitive exact match wins outright; otherwise the closest header
/// by normalized Levenshtein similarity is returned if it clears the threshold.
pub fn suggest_column(wanted: &str, headers: &[String]) -> Option<String> {
    let wanted_lower = wanted.to_lowercase();

    if let Some(exact) = headers
        .iter()
        .find(|h| h.trim().eq_ignore_ascii_case(wanted))
    {
        return Some(exact.clone());
    }

    let mut best_match = None;
    let mut best_score = SUGGESTION_THRESHOLD;

    for header in headers {
        let score = normalized_levenshtein(&wanted_lower, &header.trim().to_lowercase());
        if score >= best_score {
            best_score = score;
            best_match = Some(header.clone());
        }
    }

    best_match
}

/// Main error type for detour-rank operations
#[derive(Debug)]
pub enum Error {
    /// Bad input or settings detected before any service call
    Configuration(String),

    /// The distance service answered with an unusable HTTP response
    Http(String),

    /// Network connectivity issues talking to the distance service
    Network(String),

    /// File I/O error
    Io(std::io::Error),

    /// Malformed CSV input or failure writing CSV output
    Csv(csv::Error),
}

impl Error {
    /// Error for a table lacking the required column, with a hint when one fits
    pub fn missing_column(column: &str, headers: &[String]) -> Self {
        let mut msg = format!("CSV file must have an `{column}` column");
        if let Some(suggestion) = suggest_column(column, headers) {
            msg.push_str(&format!(" (found `{suggestion}`, did you mean that?)"));
        }
        Error::Configuration(msg)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            Error::Http(msg) => {
                write!(f, "HTTP error: {}", msg)
            }
            Error::Network(msg) => {
                write!(f, "Network error: {}", msg)
            }
            Error::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
            Error::Csv(err) => {
                write!(f, "CSV error: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::Network(err.to_string())
        } else {
            Error::Http(err.to_string())
        }
    }
}

/// Convenience result type for detour-rank operations
pub type Result<T> = std::result::Result<T, Error>;
