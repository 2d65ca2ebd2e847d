use thiserror::Error;

/// Failure taxonomy for a pipeline run.
///
/// `ScheduleMismatch` and `StructuralParse` abort the run. `Fetch` aborts the
/// run during catalog discovery (discovery is all-or-nothing) and is handled
/// as an item-level failure during detail extraction. Everything else is
/// item-local: logged, skipped, and the run continues.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("run invoked at {actual}, scheduled start is {expected}")]
    ScheduleMismatch { expected: String, actual: String },

    #[error("catalog page layout changed: {0}")]
    StructuralParse(String),

    #[error("request to {url} failed")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("browser session failed: {0}")]
    Render(String),

    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    #[error("field `{field}` has unparseable value `{value}`")]
    InvalidField { field: &'static str, value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
