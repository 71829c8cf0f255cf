/// Classification of market data failures.
///
/// Enrichment treats every failure as "no data for this item this cycle",
/// but callers that want to log or surface errors differently can use this
/// to tell the cases apart.
///
/// # Behavior Summary
///
/// | Class | Meaning | Sensible reaction |
/// |-------|---------|-------------------|
/// | `NoData` | The symbol or range has nothing to return | Cache the absence |
/// | `Transient` | Rate limit, timeout, connection trouble | Try again next cycle |
/// | `Permanent` | Provider or validation failure | Log and move on |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureClass {
    /// The requested data does not exist at the source.
    NoData,

    /// The request failed for reasons that may clear up on their own
    /// (rate limiting, timeouts, connection resets).
    Transient,

    /// The request failed in a way that won't fix itself this cycle.
    Permanent,
}
