/// Stable short code for an error, independent of its `Display` text.
///
/// Every error enum in this workspace (`MemoryError`, `ProviderError`,
/// `OrchestratorError`, ...) implements this so a caller crossing a process
/// boundary (HTTP response, log line, metrics tag) can key off a fixed
/// string instead of matching on `Display` output.
pub trait ErrorCode {
    fn code(&self) -> &'static str;
}
