pub mod listing;
pub mod submission;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub use listing::{ListingFlow, ListingStatus};
pub use submission::SubmissionFlow;

/// Generation counter shared between writers and the listing. A write bumps
/// it; the listing re-fetches when it sees a generation it has not loaded.
#[derive(Debug, Clone, Default)]
pub struct RefreshTrigger {
    generation: Arc<AtomicU64>,
}

impl RefreshTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
