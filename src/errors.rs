//! Error types for the BBU health check
//!
//! Uses thiserror for ergonomic error definitions.
//! These errors can be converted to anyhow::Error in the main application.

/// Run-fatal probe errors: the vendor tool could not be executed at all.
///
/// A nonzero exit from a successfully launched tool is NOT a ProbeError;
/// it is captured per adapter as an acquisition failure and the run
/// continues for the remaining controllers.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("error executing {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse controller discovery output: {0}")]
    Discovery(#[from] ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Malformed vendor report: the tool ran successfully but an always-expected
/// field is absent from its output. Captured per adapter, never run-fatal
/// when it occurs during battery collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("no '{0}' field in battery report")]
    MissingField(&'static str),

    #[error("no 'Controller Count' line in discovery output")]
    MissingControllerCount,
}
