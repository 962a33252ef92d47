/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// `answered / total * 100`.
    pub percent: f64,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub(crate) fn new(total: usize, current_index: usize, is_complete: bool) -> Self {
        let answered = current_index.min(total);
        // Problem counts are small; no precision concern.
        #[allow(clippy::cast_precision_loss)]
        let percent = if total == 0 {
            0.0
        } else {
            answered as f64 / total as f64 * 100.0
        };
        Self {
            total,
            answered,
            remaining: total - answered,
            percent,
            is_complete,
        }
    }
}
