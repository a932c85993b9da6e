//! Error taxonomy for the chart binding workflow.
//!
//! Every variant is locally recoverable and user-correctable; none is fatal
//! to the process. Coercion anomalies (non-numeric y values) are not errors
//! at all: they default to 0 by policy (see `result_set::Scalar::to_number`).

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Missing or empty required input, recoverable by editing the form.
    Input(String),
    /// The query collaborator rejected or failed to run the SQL text.
    Query(String),
    /// The persistence collaborator reported a non-success outcome
    /// (including transport failure).
    Persistence(String),
    /// A save was requested while a previous save is still persisting.
    SaveInFlight,
    /// The post-save confirmation has not been resolved yet; query and save
    /// actions are blocked until it is.
    ConfirmationPending,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Input(msg) => write!(f, "{}", msg),
            Error::Query(msg) => write!(f, "Query failed: {}", msg),
            Error::Persistence(msg) => write!(f, "Save failed: {}", msg),
            Error::SaveInFlight => write!(f, "A save is already in progress"),
            Error::ConfirmationPending => {
                write!(f, "Resolve the pending save confirmation first")
            }
        }
    }
}

impl std::error::Error for Error {}
