/// A trait for reporting progress of long-running operations.
pub trait Progress: Send + Sync + core::fmt::Debug {
    /// Set the phase label for the current operation (e.g., "Fetching", "Processing").
    fn set_phase(&self, phase: &str);

    /// Start a determinate run of `total` steps.
    fn set_length(&self, total: u64);

    /// Mark one step as complete.
    fn advance(&self);

    /// Finish and clear the progress indicator.
    fn done(&self);
}
