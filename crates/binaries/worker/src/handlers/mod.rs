pub mod cluster_event;
pub mod match_selfie;

/// The outcome of a job handler's execution.
#[derive(Debug, PartialEq, Eq)]
pub enum JobResult {
    Done,
    /// The pipeline ran fine but produced nothing to show. Rendered
    /// as an explanatory message, not a failure.
    NoMatches,
}
