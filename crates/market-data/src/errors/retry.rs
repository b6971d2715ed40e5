/// Classification for retry policy.
///
/// Used by sync jobs to decide whether a failed provider call is worth
/// repeating.
///
/// | Class | Retry? |
/// |-------|--------|
/// | `Never` | No |
/// | `WithBackoff` | Yes, after waiting the provider's backoff delay |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - unknown symbol, malformed payload, or terminal failure.
    Never,

    /// Transient failure such as rate limiting (429) or a timeout.
    WithBackoff,
}
