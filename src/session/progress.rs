/// Running completion progress against a total that is only learned after
/// the stream starts.
///
/// The percentage is recomputed on each processed unit, never on a total
/// announcement, so it is monotonically non-decreasing within a session as
/// long as the backend declares the total once, early. An unknown or zero
/// total pins the percentage at 0 rather than erroring.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    processed: u64,
    total: Option<u64>,
    percentage: u8,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the authoritative unit total. Calling this again overwrites
    /// the previous value; the backend sends it once per session in
    /// practice and the tracker does not enforce single-call.
    pub fn record_total(&mut self, total: u64) {
        self.total = Some(total);
    }

    /// Count one processed unit and recompute the percentage when the total
    /// is known. Clamped to 100 if the backend over-delivers.
    pub fn record_unit_processed(&mut self) {
        self.processed += 1;
        if let Some(total) = self.total {
            if total > 0 {
                self.percentage = ((self.processed * 100) / total).min(100) as u8;
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    /// True once every declared unit has been counted. Signals that the
    /// submission control may be re-enabled.
    pub fn is_complete(&self) -> bool {
        self.percentage >= 100
    }
}
