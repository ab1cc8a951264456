/// Configuration for a single load: retry budget, backoff base and per-attempt
/// deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadConfig {
    /// Number of retries after the first attempt.
    ///
    /// `3` means up to 4 total attempts.
    pub retry_count: u32,

    /// Base delay between attempts in milliseconds.
    ///
    /// The delay after failed attempt `n` is `retry_delay_ms * n`, so backoff
    /// grows linearly with the attempt number.
    pub retry_delay_ms: u64,

    /// Deadline for each individual attempt in milliseconds. Must be > 0.
    pub timeout_ms: u64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        LoadConfig {
            retry_count: 3,
            retry_delay_ms: 1_000,
            timeout_ms: 10_000,
        }
    }
}

impl LoadConfig {
    /// Total number of attempts this config allows (initial + retries).
    pub fn total_attempts(&self) -> u32 {
        self.retry_count + 1
    }

    /// Worst-case wall time of a full load in milliseconds: every attempt
    /// times out and every backoff delay is taken.
    pub fn worst_case_ms(&self) -> u64 {
        let retries = u64::from(self.retry_count);
        let backoff_total = self.retry_delay_ms * (retries * (retries + 1) / 2);
        u64::from(self.total_attempts()) * self.timeout_ms + backoff_total
    }
}
